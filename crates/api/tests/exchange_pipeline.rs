//! End-to-end tests for the upload phase: intake, parsing, attribute
//! extraction, reconciliation, and catalog mutation through the reference
//! collaborators.

mod common;

use std::collections::HashMap;
use std::io::Write;

use axum::http::StatusCode;
use common::{body_text, build_test_app, establish_session, exporter_settings, post_file};
use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::json;

use onec_bridge_core::settings::{AttributeMapping, AttributeSlot, ExchangeSettings};

const UPLOAD: &str = "/bitrix/admin/1c_exchange.php?type=catalog&mode=file&filename=import.xml";

/// Settings whose attribute mapping claims the `prop-h` property for the
/// height slot.
fn settings_with_height_mapping() -> ExchangeSettings {
    let mut slots = HashMap::new();
    slots.insert(AttributeSlot::Height, "prop-h".to_string());
    ExchangeSettings {
        attribute_mapping: AttributeMapping::from_slots(slots),
        ..exporter_settings()
    }
}

/// A one-product catalog batch: a mapped numeric height property and an
/// unmapped color dictionary.
fn bolt_catalog() -> Vec<u8> {
    json!({
        "classifier": {"id": "cl-1", "name": "Main catalog"},
        "properties": [
            {"id": "prop-h", "name": "Height", "kind": "number"},
            {"id": "prop-color", "name": "Color", "kind": "dictionary",
             "entries": [{"id": "id1", "value": "Red"}, {"id": "id2", "value": "Blue"}]}
        ],
        "products": [
            {"id": "42", "name": "Steel Bolt M8", "description": "Hex head bolt",
             "barcode": "4600000000001", "article": "SKU-42",
             "property_values": [
                 {"property_id": "prop-h", "values": ["12,5"]},
                 {"property_id": "prop-color", "values": ["id2"]}
             ]}
        ]
    })
    .to_string()
    .into_bytes()
}

fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

// ---------------------------------------------------------------------------
// Create path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upload_creates_unmatched_products() {
    let (app, catalog) = build_test_app(Some(settings_with_height_mapping()));
    let cookie = establish_session(&app).await;

    let response = post_file(app, UPLOAD, Some(&cookie), bolt_catalog()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "success");

    let stored = catalog.get("42").await.expect("product must be stored");
    let dto = &stored.dto;

    assert_eq!(dto.title, "Steel Bolt M8");
    assert_eq!(dto.handle, "steel-bolt-m8");
    assert_eq!(dto.description.as_deref(), Some("Hex head bolt"));
    assert_eq!(dto.id, None, "create DTOs carry no internal id");

    // The mapped height property was extracted with comma normalization.
    assert_eq!(dto.attributes.height, Some(12.5));

    // The single default variant carries SKU, barcode, and the resolved
    // color selection.
    assert_eq!(dto.variants.len(), 1);
    let variant = &dto.variants[0];
    assert_eq!(variant.sku.as_deref(), Some("SKU-42"));
    assert_eq!(variant.barcode.as_deref(), Some("4600000000001"));
    assert_eq!(variant.options.get("Color").map(String::as_str), Some("Blue"));
}

#[tokio::test]
async fn mapped_property_never_surfaces_as_option_or_metadata() {
    let (app, catalog) = build_test_app(Some(settings_with_height_mapping()));
    let cookie = establish_session(&app).await;

    post_file(app, UPLOAD, Some(&cookie), bolt_catalog()).await;

    let dto = catalog.get("42").await.unwrap().dto;

    // Only the unmapped dictionary property becomes an option schema entry.
    let titles: Vec<&str> = dto.options.iter().map(|option| option.title.as_str()).collect();
    assert_eq!(titles, vec!["Color"]);
    assert_eq!(dto.options[0].values, vec!["Red".to_string(), "Blue".to_string()]);

    assert!(dto.metadata.is_empty());
}

// ---------------------------------------------------------------------------
// Update path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn reupload_updates_the_matched_product_in_place() {
    let (app, catalog) = build_test_app(Some(settings_with_height_mapping()));
    let internal_id = catalog.seed("42", "Old Bolt").await;
    let cookie = establish_session(&app).await;

    let response = post_file(app, UPLOAD, Some(&cookie), bolt_catalog()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let all = catalog.all().await;
    assert_eq!(all.len(), 1, "update must not create a second product");

    let stored = catalog.get("42").await.unwrap();
    assert_eq!(stored.id, internal_id, "internal id survives the update");
    assert_eq!(stored.dto.title, "Steel Bolt M8");
    assert_eq!(stored.dto.id.as_deref(), Some(internal_id.as_str()));
}

// ---------------------------------------------------------------------------
// Compressed intake
// ---------------------------------------------------------------------------

#[tokio::test]
async fn gzip_payload_is_decompressed_before_parsing() {
    let settings = ExchangeSettings {
        use_zip: true,
        ..settings_with_height_mapping()
    };
    let (app, catalog) = build_test_app(Some(settings));
    let cookie = establish_session(&app).await;

    let response = post_file(app, UPLOAD, Some(&cookie), gzip(&bolt_catalog())).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "success");
    assert!(catalog.get("42").await.is_some());
}

#[tokio::test]
async fn corrupt_gzip_payload_aborts_the_pipeline() {
    let settings = ExchangeSettings {
        use_zip: true,
        ..exporter_settings()
    };
    let (app, catalog) = build_test_app(Some(settings));
    let cookie = establish_session(&app).await;

    let response = post_file(app, UPLOAD, Some(&cookie), "definitely not gzip").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_text(response).await,
        "failure\nFailed to decompress file import.xml."
    );
    assert!(catalog.all().await.is_empty());
}

// ---------------------------------------------------------------------------
// Parse failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn malformed_payload_fails_the_upload() {
    let (app, catalog) = build_test_app(Some(exporter_settings()));
    let cookie = establish_session(&app).await;

    let response = post_file(app, UPLOAD, Some(&cookie), "<not-the-expected-format/>").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_text(response).await;
    assert!(
        body.starts_with("failure\nCatalog parse failed"),
        "unexpected body: {body}"
    );
    assert!(catalog.all().await.is_empty());
}
