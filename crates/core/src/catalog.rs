//! Parsed catalog data model and the parser collaborator seam.
//!
//! These types are the complete, immutable result of parsing one uploaded
//! catalog file. Grammar-level parsing of the CommerceML XML export lives
//! behind the [`CatalogParser`] trait: an implementation consumes the raw
//! (already decompressed) bytes and returns the whole batch in file order.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One allowed value of a dictionary-kind classifier property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    /// Exporter-assigned value identifier (what products reference).
    pub id: String,
    /// Human-readable display value.
    pub value: String,
}

/// The value shape of a classifier property.
///
/// Dictionary properties carry their allowed values in declared order;
/// number and string properties carry none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PropertyKind {
    Number,
    String,
    Dictionary { entries: Vec<DictionaryEntry> },
}

/// A catalog-wide attribute/option definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierProperty {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub kind: PropertyKind,
}

impl ClassifierProperty {
    /// Resolve a raw product value against this property's dictionary.
    ///
    /// Returns the display value for a matching entry id, or `None` when
    /// the property is not dictionary-kind or the id is unknown.
    pub fn resolve_dictionary(&self, raw: &str) -> Option<&str> {
        match &self.kind {
            PropertyKind::Dictionary { entries } => entries
                .iter()
                .find(|entry| entry.id == raw)
                .map(|entry| entry.value.as_str()),
            _ => None,
        }
    }
}

/// The classifier header of an uploaded catalog (exactly one per file).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classifier {
    pub id: String,
    pub name: String,
}

/// A classifier group (category tree node).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierGroup {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<String>,
}

/// A product's reference to a classifier property, with its raw values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyValue {
    pub property_id: String,
    #[serde(default)]
    pub values: Vec<String>,
}

impl PropertyValue {
    /// The first non-empty raw value, if any.
    ///
    /// The exporter sends at most one meaningful value per property on a
    /// product; trailing values are ignored.
    pub fn first_value(&self) -> Option<&str> {
        self.values
            .iter()
            .map(String::as_str)
            .find(|value| !value.is_empty())
    }
}

/// One product record as parsed from the uploaded catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedProduct {
    /// External identifier assigned by the exporter. The only join key
    /// against the store's catalog.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    /// SKU in exporter terminology.
    #[serde(default)]
    pub article: Option<String>,
    #[serde(default)]
    pub property_values: Vec<PropertyValue>,
}

/// The complete, immutable result of parsing one uploaded catalog file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogBatch {
    #[serde(default)]
    pub classifier: Option<Classifier>,
    #[serde(default)]
    pub groups: Vec<ClassifierGroup>,
    #[serde(default)]
    pub properties: Vec<ClassifierProperty>,
    #[serde(default)]
    pub products: Vec<ParsedProduct>,
}

/// Parser collaborator: turns decompressed catalog bytes into a batch.
///
/// A failure is terminal for the whole parse; partial batches are never
/// returned.
pub trait CatalogParser: Send + Sync {
    fn parse(&self, bytes: &[u8]) -> Result<CatalogBatch, CoreError>;
}
