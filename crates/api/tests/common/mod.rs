use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use base64::Engine as _;
use http_body_util::BodyExt;
use tower::ServiceExt;

use onec_bridge_api::collaborators::{JsonCatalogParser, MemoryCatalogStore, StaticSettingsProvider};
use onec_bridge_api::config::ServerConfig;
use onec_bridge_api::router::build_app_router;
use onec_bridge_api::session::SessionStore;
use onec_bridge_api::state::AppState;
use onec_bridge_core::settings::ExchangeSettings;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
        max_upload_bytes: 10 * 1024 * 1024,
        session_ttl_secs: 60,
        session_capacity: 8,
    }
}

/// Settings snapshot with the credentials the tests authenticate with.
pub fn exporter_settings() -> ExchangeSettings {
    ExchangeSettings {
        login: Some("exporter".to_string()),
        password: Some("secret".to_string()),
        ..Default::default()
    }
}

/// Build the full application router with all middleware layers, wired to
/// the reference collaborators. Returns the catalog store alongside so
/// tests can seed and inspect it.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack that production uses.
pub fn build_test_app(settings: Option<ExchangeSettings>) -> (Router, Arc<MemoryCatalogStore>) {
    let config = test_config();
    let catalog = Arc::new(MemoryCatalogStore::new());

    let state = AppState {
        config: Arc::new(config.clone()),
        sessions: Arc::new(SessionStore::new(
            Duration::from_secs(config.session_ttl_secs),
            config.session_capacity,
        )),
        settings: Arc::new(StaticSettingsProvider::new(settings)),
        parser: Arc::new(JsonCatalogParser),
        catalog: catalog.clone(),
    };

    (build_app_router(state, &config), catalog)
}

/// `Authorization: Basic` header value for the given credentials.
pub fn basic_auth(login: &str, password: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(format!("{login}:{password}"));
    format!("Basic {encoded}")
}

/// Issue a GET request without credentials.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Issue a GET request with the test exporter's Basic credentials.
pub async fn get_authed(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, basic_auth("exporter", "secret"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Issue a POST request carrying a session cookie and a raw body.
pub async fn post_file(
    app: Router,
    uri: &str,
    cookie: Option<&str>,
    body: impl Into<Body>,
) -> Response<Body> {
    let mut builder = Request::builder().method(Method::POST).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = builder.body(body.into()).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body as UTF-8 text.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Run the `checkauth` phase and return the session cookie
/// (`<label>=<token>`) the exporter would echo back.
pub async fn establish_session(app: &Router) -> String {
    let response = get_authed(
        app.clone(),
        "/bitrix/admin/1c_exchange.php?type=catalog&mode=checkauth",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines.len(), 3, "checkauth must answer three lines: {body}");
    assert_eq!(lines[0], "success");
    format!("{}={}", lines[1], lines[2])
}
