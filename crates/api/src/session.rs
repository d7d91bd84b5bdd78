//! Exchange session store.
//!
//! Sessions are issued during the `checkauth` phase and echoed back by the
//! exporter as a cookie `<label>=<token>` on every upload request. The
//! registry is a bounded TTL cache: entries expire after the configured
//! time-to-live and are evicted lazily on lookup and on insert, so the map
//! never grows past its capacity however long the process runs.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use rand::Rng;
use tokio::sync::RwLock;

/// Cookie name under which issued tokens must be echoed back.
pub const SESSION_COOKIE_NAME: &str = "onec_bridge_session_id";

/// Length of the generated session token (alphanumeric characters).
pub const TOKEN_LENGTH: usize = 32;

/// One issued exchange session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// The cookie name the exporter must use.
    pub label: String,
    /// Opaque random token.
    pub token: String,
}

struct SessionEntry {
    label: String,
    expires_at: Instant,
}

/// Registry of issued session tokens, keyed by token.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared across all request handlers.
pub struct SessionStore {
    ttl: Duration,
    capacity: usize,
    entries: RwLock<HashMap<String, SessionEntry>>,
}

impl SessionStore {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Issue and register a fresh session.
    pub async fn issue(&self) -> Session {
        let token: String = rand::rng()
            .sample_iter(&rand::distr::Alphanumeric)
            .take(TOKEN_LENGTH)
            .map(char::from)
            .collect();

        let mut entries = self.entries.write().await;
        let now = Instant::now();
        entries.retain(|_, entry| entry.expires_at > now);

        // At capacity even after dropping expired entries: evict the
        // soonest-to-expire session to stay bounded.
        if entries.len() >= self.capacity {
            if let Some(oldest) = entries
                .iter()
                .min_by_key(|(_, entry)| entry.expires_at)
                .map(|(token, _)| token.clone())
            {
                entries.remove(&oldest);
            }
        }

        entries.insert(
            token.clone(),
            SessionEntry {
                label: SESSION_COOKIE_NAME.to_string(),
                expires_at: now + self.ttl,
            },
        );

        tracing::debug!(live_sessions = entries.len(), "Issued exchange session");
        Session {
            label: SESSION_COOKIE_NAME.to_string(),
            token,
        }
    }

    /// Check a presented `(label, token)` pair against the registry.
    ///
    /// Expired entries are removed on the way out.
    pub async fn validate(&self, label: &str, token: &str) -> bool {
        let mut entries = self.entries.write().await;
        match entries.get(token) {
            Some(entry) if entry.expires_at <= Instant::now() => {
                entries.remove(token);
                false
            }
            Some(entry) => entry.label == label,
            None => false,
        }
    }

    /// Number of registered (possibly expired, not yet evicted) sessions.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
