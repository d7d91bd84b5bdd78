//! Reconciliation engine: partition parsed products into create/update
//! sets against the existing catalog, assembling upload-ready DTOs.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::attributes::{self, DefaultAttributes, OptionSchema, PropertyIndex};
use crate::catalog::{ClassifierProperty, ParsedProduct};
use crate::handle::handle_from_name;
use crate::settings::AttributeMapping;
use crate::store::ExistingProduct;

/// Title of the single default variant every product DTO carries.
pub const DEFAULT_VARIANT_TITLE: &str = "Default variant";

/// The default variant of a product DTO: SKU, barcode, and the resolved
/// option selections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantDto {
    pub title: String,
    pub sku: Option<String>,
    pub barcode: Option<String>,
    pub options: IndexMap<String, String>,
}

/// An upload-ready product, destined for either the create or the update
/// bulk operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDto {
    /// Internal catalog id of the matched existing product. Present on
    /// updates, never on creates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub external_id: String,
    pub title: String,
    pub handle: String,
    #[serde(default)]
    pub description: Option<String>,
    /// The catalog-wide option schema, shared by every DTO of one upload.
    pub options: Vec<OptionSchema>,
    pub variants: Vec<VariantDto>,
    pub metadata: IndexMap<String, String>,
    #[serde(flatten)]
    pub attributes: DefaultAttributes,
}

/// Partitioned output of one reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MutationBatch {
    pub create: Vec<ProductDto>,
    pub update: Vec<ProductDto>,
}

impl MutationBatch {
    pub fn is_empty(&self) -> bool {
        self.create.is_empty() && self.update.is_empty()
    }
}

/// Reconcile parsed products against the existing catalog.
///
/// Products are processed independently and in input order. The lookup is
/// by external identifier only; when several existing products share one
/// external id, the first wins. Duplicate external ids among the parsed
/// products are not deduplicated: each occurrence resolves on its own and
/// produces its own DTO.
pub fn reconcile(
    products: &[ParsedProduct],
    properties: &[ClassifierProperty],
    mapping: &AttributeMapping,
    existing: &[ExistingProduct],
) -> MutationBatch {
    let index = PropertyIndex::new(properties);
    let schema = attributes::option_schema(properties, mapping);

    let mut existing_by_external_id: HashMap<&str, &ExistingProduct> = HashMap::new();
    for product in existing {
        existing_by_external_id
            .entry(product.external_id.as_str())
            .or_insert(product);
    }

    let mut batch = MutationBatch::default();

    for product in products {
        let (attrs, selection) = attributes::extract(product, &index, mapping);

        let mut dto = ProductDto {
            id: None,
            external_id: product.id.clone(),
            title: product.name.clone(),
            handle: handle_from_name(&product.name),
            description: product.description.clone(),
            options: schema.clone(),
            variants: vec![VariantDto {
                title: DEFAULT_VARIANT_TITLE.to_string(),
                sku: product.article.clone(),
                barcode: product.barcode.clone(),
                options: selection.options,
            }],
            metadata: selection.metadata,
            attributes: attrs,
        };

        match existing_by_external_id.get(product.id.as_str()) {
            Some(matched) => {
                dto.id = Some(matched.id.clone());
                batch.update.push(dto);
            }
            None => batch.create.push(dto),
        }
    }

    batch
}
