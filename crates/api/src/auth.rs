//! Transport-level authentication for the exchange endpoint.
//!
//! Read phases authenticate with HTTP Basic credentials checked against
//! the settings snapshot; the upload phase authenticates with a session
//! cookie previously issued by `checkauth`. Absent settings mean "no
//! credentials configured" and fail every check -- never "allow all".

use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::HeaderMap;
use base64::Engine as _;

use onec_bridge_core::settings::ExchangeSettings;

use crate::session::SessionStore;

/// Check decoded Basic-Auth credentials against the settings snapshot.
pub fn check_credentials(headers: &HeaderMap, settings: Option<&ExchangeSettings>) -> bool {
    let Some(settings) = settings else {
        return false;
    };
    let (Some(login), Some(password)) = (settings.login.as_deref(), settings.password.as_deref())
    else {
        return false;
    };

    match decode_basic_auth(headers) {
        Some((presented_login, presented_password)) => {
            presented_login == login && presented_password == password
        }
        None => false,
    }
}

/// Decode the `Authorization: Basic` header into `(login, password)`.
///
/// Returns `None` for a missing header, a non-Basic scheme, malformed
/// base64, or a payload without the `login:password` separator.
fn decode_basic_auth(headers: &HeaderMap) -> Option<(String, String)> {
    let header = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let mut parts = header.splitn(2, ' ');
    let scheme = parts.next()?;
    if !scheme.eq_ignore_ascii_case("Basic") {
        return None;
    }

    let encoded = parts.next()?.trim();
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .ok()?;
    let decoded = String::from_utf8(decoded).ok()?;

    let (login, password) = decoded.split_once(':')?;
    Some((login.to_string(), password.to_string()))
}

/// Check the request's cookies against the session registry.
///
/// The exporter echoes the issued session as `<label>=<token>`; any cookie
/// pair matching a registered session authenticates the request.
pub async fn check_session(headers: &HeaderMap, sessions: &SessionStore) -> bool {
    for (name, value) in cookie_pairs(headers) {
        if sessions.validate(&name, &value).await {
            return true;
        }
    }
    false
}

/// Parse the `Cookie` header into `(name, value)` pairs. Values containing
/// `=` are kept whole.
fn cookie_pairs(headers: &HeaderMap) -> Vec<(String, String)> {
    let Some(header) = headers.get(COOKIE).and_then(|value| value.to_str().ok()) else {
        return Vec::new();
    };

    header
        .split(';')
        .filter_map(|cookie| {
            let (name, value) = cookie.split_once('=')?;
            Some((name.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}
