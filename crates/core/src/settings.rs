//! Exchange settings snapshot and the default-attribute mapping.
//!
//! Settings persistence is external to this crate; the service consumes a
//! read-only snapshot per request via [`SettingsProvider`]. An absent
//! snapshot is a valid state and means "no credentials configured" -- every
//! authentication check fails in that state.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Advertised `file_limit` when the snapshot carries no chunk size
/// (1000 MiB, matching what the exporter expects by default).
pub const DEFAULT_FILE_LIMIT_BYTES: u64 = 1000 * 1024 * 1024;

// ---------------------------------------------------------------------------
// Attribute slots
// ---------------------------------------------------------------------------

/// The fixed set of typed product attributes a classifier property can be
/// mapped onto. Dimensions and weight are numeric; the trade codes and
/// origin country are strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeSlot {
    Height,
    Width,
    Length,
    Weight,
    MidCode,
    HsCode,
    OriginCountry,
}

impl AttributeSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Height => "height",
            Self::Width => "width",
            Self::Length => "length",
            Self::Weight => "weight",
            Self::MidCode => "mid_code",
            Self::HsCode => "hs_code",
            Self::OriginCountry => "origin_country",
        }
    }

    /// Whether the slot stores a parsed number rather than a string.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Height | Self::Width | Self::Length | Self::Weight)
    }

    /// All slots, in the order they appear on the product DTO.
    pub const ALL: &'static [AttributeSlot] = &[
        Self::Height,
        Self::Width,
        Self::Length,
        Self::Weight,
        Self::MidCode,
        Self::HsCode,
        Self::OriginCountry,
    ];
}

impl std::fmt::Display for AttributeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Attribute mapping
// ---------------------------------------------------------------------------

/// Mapping from attribute slots to the classifier-property ids that feed
/// them.
///
/// A property id present here is extracted exclusively into its slot and
/// never surfaces as a product option or metadata entry. The default table
/// carries the well-known property ids of the upstream ERP configuration;
/// deployments with different ids override it through the settings
/// snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeMapping {
    slots: HashMap<AttributeSlot, String>,
}

impl AttributeMapping {
    /// An empty mapping: nothing is extracted as a default attribute.
    pub fn empty() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }

    pub fn from_slots(slots: HashMap<AttributeSlot, String>) -> Self {
        Self { slots }
    }

    /// The slot a classifier property feeds, if the property is mapped.
    pub fn slot_for(&self, property_id: &str) -> Option<AttributeSlot> {
        self.slots
            .iter()
            .find(|(_, id)| id.as_str() == property_id)
            .map(|(slot, _)| *slot)
    }

    /// Whether the property id is claimed by any slot.
    pub fn contains_property(&self, property_id: &str) -> bool {
        self.slot_for(property_id).is_some()
    }

    pub fn property_id(&self, slot: AttributeSlot) -> Option<&str> {
        self.slots.get(&slot).map(String::as_str)
    }
}

impl Default for AttributeMapping {
    /// The well-known property-id table of the upstream ERP configuration.
    /// `hs_code` has no default id.
    fn default() -> Self {
        let mut slots = HashMap::new();
        slots.insert(
            AttributeSlot::Height,
            "8cb50d27-260b-11e9-80c9-0cc47ab29cd1".to_string(),
        );
        slots.insert(
            AttributeSlot::Width,
            "729246b8-260b-11e9-80c9-0cc47ab29cd1".to_string(),
        );
        slots.insert(
            AttributeSlot::Length,
            "0ce59660-260b-11e9-80c9-0cc47ab29cd1".to_string(),
        );
        slots.insert(
            AttributeSlot::Weight,
            "38409b0c-29da-11e9-80c9-0cc47ab29cd1".to_string(),
        );
        slots.insert(
            AttributeSlot::MidCode,
            "8d11c16f-1d64-11e9-80c9-0cc47ab29cd1".to_string(),
        );
        slots.insert(
            AttributeSlot::OriginCountry,
            "3268183f-18fa-11e7-80c2-0cc47ab29cd1".to_string(),
        );
        Self { slots }
    }
}

// ---------------------------------------------------------------------------
// Settings snapshot
// ---------------------------------------------------------------------------

/// Read-only snapshot of the exchange integration settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExchangeSettings {
    pub login: Option<String>,
    pub password: Option<String>,
    /// Advertised upload chunk size in bytes (`file_limit` in the `init`
    /// response). `None` falls back to [`DEFAULT_FILE_LIMIT_BYTES`].
    pub chunk_size_bytes: Option<u64>,
    /// Whether uploaded files are gzip-compressed.
    pub use_zip: bool,
    #[serde(default)]
    pub attribute_mapping: AttributeMapping,
}

impl ExchangeSettings {
    /// The `file_limit` value advertised during the `init` phase.
    pub fn file_limit_bytes(&self) -> u64 {
        self.chunk_size_bytes.unwrap_or(DEFAULT_FILE_LIMIT_BYTES)
    }
}

/// Settings collaborator: yields the current read-only snapshot.
#[async_trait]
pub trait SettingsProvider: Send + Sync {
    /// `Ok(None)` means no settings are configured, which fails every
    /// authentication check rather than allowing all.
    async fn get(&self) -> Result<Option<ExchangeSettings>, CoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mapping_claims_the_well_known_ids() {
        let mapping = AttributeMapping::default();
        assert_eq!(
            mapping.slot_for("8cb50d27-260b-11e9-80c9-0cc47ab29cd1"),
            Some(AttributeSlot::Height)
        );
        assert_eq!(mapping.property_id(AttributeSlot::HsCode), None);
        assert!(!mapping.contains_property("some-other-property"));
    }

    #[test]
    fn file_limit_falls_back_to_default() {
        let settings = ExchangeSettings::default();
        assert_eq!(settings.file_limit_bytes(), DEFAULT_FILE_LIMIT_BYTES);

        let settings = ExchangeSettings {
            chunk_size_bytes: Some(64 * 1024),
            ..Default::default()
        };
        assert_eq!(settings.file_limit_bytes(), 64 * 1024);
    }

    #[test]
    fn mapping_deserializes_from_slot_keys() {
        let mapping: AttributeMapping =
            serde_json::from_str(r#"{"weight":"prop-w","origin_country":"prop-o"}"#).unwrap();
        assert_eq!(mapping.slot_for("prop-w"), Some(AttributeSlot::Weight));
        assert_eq!(
            mapping.slot_for("prop-o"),
            Some(AttributeSlot::OriginCountry)
        );
        assert_eq!(mapping.slot_for("prop-h"), None);
    }
}
