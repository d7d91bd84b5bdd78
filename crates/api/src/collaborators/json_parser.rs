//! Catalog batch parser over the typed JSON serialization.
//!
//! Grammar-level CommerceML XML parsing stays behind the
//! [`CatalogParser`] seam and is supplied by the embedding deployment;
//! this implementation decodes the same typed batch from its JSON form,
//! which keeps the binary and the end-to-end tests self-contained.

use onec_bridge_core::catalog::{CatalogBatch, CatalogParser};
use onec_bridge_core::error::CoreError;

pub struct JsonCatalogParser;

impl CatalogParser for JsonCatalogParser {
    fn parse(&self, bytes: &[u8]) -> Result<CatalogBatch, CoreError> {
        serde_json::from_slice(bytes).map_err(|error| CoreError::Parse(error.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_typed_batch() {
        let payload = br#"{
            "classifier": {"id": "cl-1", "name": "Main catalog"},
            "properties": [
                {"id": "prop-color", "name": "Color", "kind": "dictionary",
                 "entries": [{"id": "c1", "value": "Red"}]}
            ],
            "products": [
                {"id": "42", "name": "Bolt",
                 "property_values": [{"property_id": "prop-color", "values": ["c1"]}]}
            ]
        }"#;

        let batch = JsonCatalogParser.parse(payload).unwrap();
        assert_eq!(batch.classifier.unwrap().name, "Main catalog");
        assert_eq!(batch.properties.len(), 1);
        assert_eq!(batch.products[0].id, "42");
    }

    #[test]
    fn malformed_payload_is_a_parse_error() {
        let error = JsonCatalogParser.parse(b"<xml/>").unwrap_err();
        assert!(matches!(error, CoreError::Parse(_)));
    }
}
