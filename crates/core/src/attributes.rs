//! Attribute mapper: classifies product property values into typed default
//! attributes, option selections, and a metadata fallback bucket.
//!
//! Extraction into a default-attribute slot is exclusive: a classifier
//! property claimed by the attribute mapping never surfaces as a product
//! option or a metadata entry, whatever its kind.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::catalog::{ClassifierProperty, ParsedProduct, PropertyKind};
use crate::settings::{AttributeMapping, AttributeSlot};

// ---------------------------------------------------------------------------
// Property index
// ---------------------------------------------------------------------------

/// Id-keyed lookup over the batch's classifier properties.
///
/// Built once per upload and shared across all products.
pub struct PropertyIndex<'a> {
    by_id: HashMap<&'a str, &'a ClassifierProperty>,
}

impl<'a> PropertyIndex<'a> {
    pub fn new(properties: &'a [ClassifierProperty]) -> Self {
        let mut by_id = HashMap::with_capacity(properties.len());
        for property in properties {
            // First declaration wins on duplicate ids.
            by_id.entry(property.id.as_str()).or_insert(property);
        }
        Self { by_id }
    }

    pub fn get(&self, property_id: &str) -> Option<&'a ClassifierProperty> {
        self.by_id.get(property_id).copied()
    }
}

// ---------------------------------------------------------------------------
// Default attributes
// ---------------------------------------------------------------------------

/// Typed physical/compliance attributes extracted from mapped classifier
/// properties. Every slot is optional; unmapped or unparsable values leave
/// the slot empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultAttributes {
    pub height: Option<f64>,
    pub width: Option<f64>,
    pub length: Option<f64>,
    pub weight: Option<f64>,
    pub mid_code: Option<String>,
    pub hs_code: Option<String>,
    pub origin_country: Option<String>,
}

impl DefaultAttributes {
    /// Store a parsed number into a numeric slot. A number extracted for a
    /// string slot is discarded: the slot's type governs.
    fn set_number(&mut self, slot: AttributeSlot, value: f64) {
        match slot {
            AttributeSlot::Height => self.height = Some(value),
            AttributeSlot::Width => self.width = Some(value),
            AttributeSlot::Length => self.length = Some(value),
            AttributeSlot::Weight => self.weight = Some(value),
            AttributeSlot::MidCode | AttributeSlot::HsCode | AttributeSlot::OriginCountry => {}
        }
    }

    /// Store a string into a string slot. Text extracted for a numeric slot
    /// is discarded rather than coerced.
    fn set_text(&mut self, slot: AttributeSlot, value: String) {
        match slot {
            AttributeSlot::MidCode => self.mid_code = Some(value),
            AttributeSlot::HsCode => self.hs_code = Some(value),
            AttributeSlot::OriginCountry => self.origin_country = Some(value),
            AttributeSlot::Height
            | AttributeSlot::Width
            | AttributeSlot::Length
            | AttributeSlot::Weight => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Product selection
// ---------------------------------------------------------------------------

/// Per-product option selections and the metadata fallback bucket.
///
/// Both maps preserve the order in which property values appear on the
/// product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductSelection {
    /// Option title (classifier property name) to the resolved display
    /// value.
    pub options: IndexMap<String, String>,
    /// Property name to raw value, for everything that resolved neither as
    /// a default attribute nor as a dictionary option.
    pub metadata: IndexMap<String, String>,
}

/// A catalog-wide option definition derived from a dictionary property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSchema {
    pub title: String,
    /// Allowed display values, in declared dictionary order.
    pub values: Vec<String>,
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Classify every property value on a product.
///
/// Per value: an unknown property id or an empty value is skipped
/// silently. A mapped property id is extracted into its attribute slot
/// (number parse with `,` decimal normalization, verbatim string, or
/// dictionary display value) and never reaches the option/metadata path;
/// an unparsable or unresolvable mapped value is discarded without error.
/// An unmapped dictionary property whose raw value resolves becomes an
/// option selection; everything else falls back to metadata under the
/// property name with the raw value.
pub fn extract(
    product: &ParsedProduct,
    index: &PropertyIndex<'_>,
    mapping: &AttributeMapping,
) -> (DefaultAttributes, ProductSelection) {
    let mut attributes = DefaultAttributes::default();
    let mut selection = ProductSelection::default();

    for property_value in &product.property_values {
        let Some(property) = index.get(&property_value.property_id) else {
            continue;
        };
        let Some(raw) = property_value.first_value() else {
            continue;
        };

        if let Some(slot) = mapping.slot_for(&property.id) {
            match &property.kind {
                PropertyKind::Number => {
                    if let Ok(number) = raw.replace(',', ".").parse::<f64>() {
                        attributes.set_number(slot, number);
                    }
                }
                PropertyKind::String => attributes.set_text(slot, raw.to_string()),
                PropertyKind::Dictionary { .. } => {
                    if let Some(display) = property.resolve_dictionary(raw) {
                        attributes.set_text(slot, display.to_string());
                    }
                }
            }
            continue;
        }

        if let Some(display) = property.resolve_dictionary(raw) {
            selection
                .options
                .insert(property.name.clone(), display.to_string());
            continue;
        }

        selection
            .metadata
            .insert(property.name.clone(), raw.to_string());
    }

    (attributes, selection)
}

/// Derive the catalog-wide option schema for one upload.
///
/// Every dictionary property that is not claimed by the attribute mapping
/// and has at least one dictionary value becomes one schema entry, its
/// allowed values in declared order.
pub fn option_schema(
    properties: &[ClassifierProperty],
    mapping: &AttributeMapping,
) -> Vec<OptionSchema> {
    properties
        .iter()
        .filter(|property| !mapping.contains_property(&property.id))
        .filter_map(|property| match &property.kind {
            PropertyKind::Dictionary { entries } if !entries.is_empty() => Some(OptionSchema {
                title: property.name.clone(),
                values: entries.iter().map(|entry| entry.value.clone()).collect(),
            }),
            _ => None,
        })
        .collect()
}
