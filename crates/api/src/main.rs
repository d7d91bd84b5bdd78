use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use onec_bridge_api::collaborators::{EnvSettingsProvider, JsonCatalogParser, MemoryCatalogStore};
use onec_bridge_api::config::ServerConfig;
use onec_bridge_api::router::build_app_router;
use onec_bridge_api::session::SessionStore;
use onec_bridge_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "onec_bridge_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Session store ---
    let sessions = Arc::new(SessionStore::new(
        config.session_ttl(),
        config.session_capacity,
    ));

    // --- Collaborators ---
    // Reference wiring: settings from ONEC_* env vars, the typed-JSON
    // catalog parser, and a non-persistent in-memory catalog. Deployments
    // embedding this crate substitute their own implementations here.
    let settings = Arc::new(EnvSettingsProvider);
    let parser = Arc::new(JsonCatalogParser);
    let catalog = Arc::new(MemoryCatalogStore::new());
    tracing::warn!("Using the in-memory catalog store; products do not survive a restart");

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        sessions,
        settings,
        parser,
        catalog,
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
