use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::response::plain;

/// Error type for the exchange endpoint.
///
/// Every variant renders as a plain-text `failure` response whose exact
/// body the exporter matches on -- the texts are a compatibility contract,
/// not an implementation detail. The `Display` output of a variant is the
/// second line of the body.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    /// The `type` query parameter is not the catalog-exchange constant.
    #[error("Invalid type parameter")]
    InvalidType,

    /// Unknown `mode` on a read-phase request.
    #[error("Invalid mode parameter for GET request")]
    InvalidMode,

    /// Wrong `type`/`mode` combination on the upload verb.
    #[error("Invalid parameters for POST request")]
    InvalidPostParameters,

    /// Basic-Auth failure on a read phase; carries the phase name.
    #[error("Authentication failed for {0}")]
    AuthenticationFailed(String),

    /// Missing or invalid session token on the upload verb.
    #[error("Authentication failed for file upload")]
    UploadAuthenticationFailed,

    #[error("Filename not provided for file upload")]
    MissingFilename,

    #[error("No file content received for {0}.")]
    EmptyPayload(String),

    #[error("Failed to decompress file {0}.")]
    Decompress(String),

    /// Aggregated per-item mutation failures for one uploaded file.
    #[error("Errors occurred during file upload for {filename}: {message}")]
    Upload { filename: String, message: String },

    /// Any other pipeline failure (parse error, settings fetch, ...).
    #[error("{0}")]
    Pipeline(String),
}

impl ExchangeError {
    fn status(&self) -> StatusCode {
        match self {
            Self::InvalidType
            | Self::InvalidMode
            | Self::InvalidPostParameters
            | Self::MissingFilename
            | Self::EmptyPayload(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationFailed(_) | Self::UploadAuthenticationFailed => {
                StatusCode::UNAUTHORIZED
            }
            Self::Decompress(_) | Self::Upload { .. } | Self::Pipeline(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ExchangeError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Exchange request failed");
        } else {
            tracing::debug!(error = %self, "Exchange request rejected");
        }
        plain(status, format!("failure\n{self}"))
    }
}
