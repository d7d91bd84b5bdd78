//! The exchange protocol state machine.
//!
//! A single endpoint dispatches on the `mode` query parameter. Read phases
//! (GET) authenticate with Basic credentials; the upload phase (POST)
//! authenticates with the session cookie issued by `checkauth`. Response
//! bodies are bit-exact: the exporter is a legacy client matching on the
//! text, so every line here is part of the wire contract.

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use serde::Deserialize;

use onec_bridge_core::error::CoreError;
use onec_bridge_core::pipeline;

use crate::auth;
use crate::error::ExchangeError;
use crate::intake;
use crate::response::plain;
use crate::state::AppState;

/// The only accepted value of the `type` query parameter.
pub const CATALOG_EXCHANGE_TYPE: &str = "catalog";

/// Query parameters carried on every exchange request.
#[derive(Debug, Deserialize)]
pub struct ExchangeParams {
    #[serde(rename = "type")]
    pub exchange_type: Option<String>,
    pub mode: Option<String>,
    /// Upload phase only.
    pub filename: Option<String>,
}

// ---------------------------------------------------------------------------
// Phases
// ---------------------------------------------------------------------------

/// The protocol phase selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeMode {
    Checkauth,
    Init,
    File,
    Import,
    Query,
    Success,
}

impl ExchangeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Checkauth => "checkauth",
            Self::Init => "init",
            Self::File => "file",
            Self::Import => "import",
            Self::Query => "query",
            Self::Success => "success",
        }
    }

    /// Parse a mode string. Returns `None` for unknown values.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "checkauth" => Some(Self::Checkauth),
            "init" => Some(Self::Init),
            "file" => Some(Self::File),
            "import" => Some(Self::Import),
            "query" => Some(Self::Query),
            "success" => Some(Self::Success),
            _ => None,
        }
    }
}

impl std::fmt::Display for ExchangeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Read phases (GET)
// ---------------------------------------------------------------------------

/// GET /bitrix/admin/1c_exchange.php -- read-phase dispatch.
pub async fn get_exchange(
    State(state): State<AppState>,
    Query(params): Query<ExchangeParams>,
    headers: HeaderMap,
) -> Result<Response, ExchangeError> {
    if params.exchange_type.as_deref() != Some(CATALOG_EXCHANGE_TYPE) {
        return Err(ExchangeError::InvalidType);
    }
    let mode_param = params.mode.unwrap_or_default();

    let settings = state
        .settings
        .get()
        .await
        .map_err(|error| ExchangeError::Pipeline(error.to_string()))?;

    // Every read phase requires valid credentials, checkauth included: a
    // session must never be issued to an unauthenticated caller.
    if !auth::check_credentials(&headers, settings.as_ref()) {
        return Err(ExchangeError::AuthenticationFailed(mode_param));
    }
    let settings = settings.unwrap_or_default();

    match ExchangeMode::from_str(&mode_param) {
        Some(ExchangeMode::Checkauth) => {
            let session = state.sessions.issue().await;
            tracing::debug!(label = %session.label, "Issued session for checkauth");
            Ok(plain(
                StatusCode::OK,
                format!("success\n{}\n{}", session.label, session.token),
            ))
        }

        Some(ExchangeMode::Init) => {
            let zip = if settings.use_zip { "yes" } else { "no" };
            let file_limit = settings.file_limit_bytes();
            tracing::debug!(zip, file_limit, "Negotiated exchange capabilities");
            Ok(plain(
                StatusCode::OK,
                format!("zip={zip}\nfile_limit={file_limit}"),
            ))
        }

        Some(ExchangeMode::Import) | Some(ExchangeMode::Success) => {
            Ok(plain(StatusCode::OK, "success"))
        }

        Some(ExchangeMode::Query) => Ok(plain(
            StatusCode::OK,
            "failure\nExport functionality (query mode) is not implemented yet.",
        )),

        // File intake only occurs on the upload verb.
        Some(ExchangeMode::File) | None => Err(ExchangeError::InvalidMode),
    }
}

// ---------------------------------------------------------------------------
// Upload phase (POST)
// ---------------------------------------------------------------------------

/// POST /bitrix/admin/1c_exchange.php -- file intake and the full
/// parse/reconcile/mutate pipeline, synchronous within this request.
pub async fn post_exchange(
    State(state): State<AppState>,
    Query(params): Query<ExchangeParams>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ExchangeError> {
    if !auth::check_session(&headers, &state.sessions).await {
        return Err(ExchangeError::UploadAuthenticationFailed);
    }

    if params.exchange_type.as_deref() != Some(CATALOG_EXCHANGE_TYPE)
        || params.mode.as_deref() != Some(ExchangeMode::File.as_str())
    {
        return Err(ExchangeError::InvalidPostParameters);
    }

    let filename = params
        .filename
        .filter(|filename| !filename.is_empty())
        .ok_or(ExchangeError::MissingFilename)?;
    tracing::debug!(%filename, bytes = body.len(), "Receiving exchange file");

    let settings = state
        .settings
        .get()
        .await
        .map_err(|error| ExchangeError::Pipeline(error.to_string()))?
        .unwrap_or_default();

    let payload = intake::decode(&filename, &body, settings.use_zip)?;

    match pipeline::run(
        &payload,
        &settings.attribute_mapping,
        state.parser.as_ref(),
        state.catalog.as_ref(),
    )
    .await
    {
        Ok(summary) => {
            tracing::info!(
                %filename,
                products = summary.products,
                created = summary.created,
                updated = summary.updated,
                "Exchange file processed"
            );
            Ok(plain(StatusCode::OK, "success"))
        }
        Err(CoreError::Mutation(message)) => Err(ExchangeError::Upload { filename, message }),
        Err(error) => Err(ExchangeError::Pipeline(error.to_string())),
    }
}
