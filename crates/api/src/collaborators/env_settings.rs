//! Settings snapshots from environment variables.

use async_trait::async_trait;

use onec_bridge_core::error::CoreError;
use onec_bridge_core::settings::{ExchangeSettings, SettingsProvider};

/// Reads the integration settings snapshot from `ONEC_*` environment
/// variables on every request.
///
/// | Env Var                  | Meaning                                   |
/// |--------------------------|-------------------------------------------|
/// | `ONEC_LOGIN`             | exporter login                            |
/// | `ONEC_PASSWORD`          | exporter password                         |
/// | `ONEC_USE_ZIP`           | `1`/`true`/`yes` to expect gzip payloads  |
/// | `ONEC_CHUNK_SIZE_BYTES`  | advertised `file_limit`                   |
/// | `ONEC_ATTRIBUTE_MAPPING` | JSON object `{slot: property-id}`         |
///
/// With neither login nor password set, the snapshot is absent and every
/// authentication check fails.
pub struct EnvSettingsProvider;

#[async_trait]
impl SettingsProvider for EnvSettingsProvider {
    async fn get(&self) -> Result<Option<ExchangeSettings>, CoreError> {
        Ok(parse_snapshot(
            std::env::var("ONEC_LOGIN").ok(),
            std::env::var("ONEC_PASSWORD").ok(),
            std::env::var("ONEC_USE_ZIP").ok(),
            std::env::var("ONEC_CHUNK_SIZE_BYTES").ok(),
            std::env::var("ONEC_ATTRIBUTE_MAPPING").ok(),
        ))
    }
}

fn parse_snapshot(
    login: Option<String>,
    password: Option<String>,
    use_zip: Option<String>,
    chunk_size: Option<String>,
    mapping: Option<String>,
) -> Option<ExchangeSettings> {
    if login.is_none() && password.is_none() {
        return None;
    }

    let use_zip = use_zip
        .map(|value| {
            let value = value.to_ascii_lowercase();
            value == "1" || value == "true" || value == "yes"
        })
        .unwrap_or(false);

    let chunk_size_bytes = chunk_size.and_then(|value| match value.parse() {
        Ok(bytes) => Some(bytes),
        Err(_) => {
            tracing::warn!(%value, "Ignoring unparsable ONEC_CHUNK_SIZE_BYTES");
            None
        }
    });

    let attribute_mapping = mapping
        .and_then(|json| match serde_json::from_str(&json) {
            Ok(mapping) => Some(mapping),
            Err(error) => {
                tracing::warn!(%error, "Ignoring unparsable ONEC_ATTRIBUTE_MAPPING");
                None
            }
        })
        .unwrap_or_default();

    Some(ExchangeSettings {
        login,
        password,
        chunk_size_bytes,
        use_zip,
        attribute_mapping,
    })
}

/// A fixed settings snapshot, for tests and embedded wiring.
pub struct StaticSettingsProvider {
    settings: Option<ExchangeSettings>,
}

impl StaticSettingsProvider {
    pub fn new(settings: Option<ExchangeSettings>) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl SettingsProvider for StaticSettingsProvider {
    async fn get(&self) -> Result<Option<ExchangeSettings>, CoreError> {
        Ok(self.settings.clone())
    }
}
