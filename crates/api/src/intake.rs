//! File intake: buffered payload accumulation and optional gzip decoding.
//!
//! Each upload request carries one complete file; intake is a single
//! buffered accumulation, not chunk-resumable. The request-body ceiling is
//! enforced by the router's body-limit layer before the payload reaches
//! this module.

use std::io::Read;

use flate2::read::GzDecoder;

use crate::error::ExchangeError;

/// Decode one uploaded payload.
///
/// An empty payload is rejected. When `use_zip` is set in the settings
/// snapshot, the payload is gunzipped; a decompression failure aborts the
/// pipeline and is not retried.
pub fn decode(filename: &str, body: &[u8], use_zip: bool) -> Result<Vec<u8>, ExchangeError> {
    if body.is_empty() {
        return Err(ExchangeError::EmptyPayload(filename.to_string()));
    }

    if !use_zip {
        return Ok(body.to_vec());
    }

    let mut decoder = GzDecoder::new(body);
    let mut decoded = Vec::new();
    decoder.read_to_end(&mut decoded).map_err(|error| {
        tracing::error!(filename, %error, "Failed to decompress uploaded file");
        ExchangeError::Decompress(filename.to_string())
    })?;
    Ok(decoded)
}
