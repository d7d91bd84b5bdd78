use std::time::Duration;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// HTTP request timeout in seconds (default: `300`; uploads are
    /// processed synchronously within the request).
    pub request_timeout_secs: u64,
    /// Hard ceiling on an uploaded payload in bytes (default: 2 GiB,
    /// well above the advertised `file_limit` so a differently-chunked
    /// exporter is still accepted).
    pub max_upload_bytes: usize,
    /// Exchange session time-to-live in seconds (default: `3600`).
    pub session_ttl_secs: u64,
    /// Maximum number of live exchange sessions (default: `1024`).
    pub session_capacity: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default      |
    /// |------------------------|--------------|
    /// | `HOST`                 | `0.0.0.0`    |
    /// | `PORT`                 | `3000`       |
    /// | `REQUEST_TIMEOUT_SECS` | `300`        |
    /// | `MAX_UPLOAD_BYTES`     | `2147483648` |
    /// | `SESSION_TTL_SECS`     | `3600`       |
    /// | `SESSION_CAPACITY`     | `1024`       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| "2147483648".into())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let session_ttl_secs: u64 = std::env::var("SESSION_TTL_SECS")
            .unwrap_or_else(|_| "3600".into())
            .parse()
            .expect("SESSION_TTL_SECS must be a valid u64");

        let session_capacity: usize = std::env::var("SESSION_CAPACITY")
            .unwrap_or_else(|_| "1024".into())
            .parse()
            .expect("SESSION_CAPACITY must be a valid usize");

        Self {
            host,
            port,
            request_timeout_secs,
            max_upload_bytes,
            session_ttl_secs,
            session_capacity,
        }
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}
