use std::sync::Arc;

use onec_bridge_core::catalog::CatalogParser;
use onec_bridge_core::settings::SettingsProvider;
use onec_bridge_core::store::CatalogStore;

use crate::config::ServerConfig;
use crate::session::SessionStore;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`). The three
/// collaborator seams are trait objects so deployments can wire their own
/// settings source, catalog parser, and catalog store.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Registry of issued exchange sessions.
    pub sessions: Arc<SessionStore>,
    /// Read-only integration settings snapshot source.
    pub settings: Arc<dyn SettingsProvider>,
    /// Catalog file parser.
    pub parser: Arc<dyn CatalogParser>,
    /// Catalog lookup and bulk mutation.
    pub catalog: Arc<dyn CatalogStore>,
}
