//! Board client configuration.

use std::env;
use std::fmt;
use std::time::Duration;

#[derive(Clone)]
pub struct BoardConfig {
    /// Base URL of the room service
    pub server_url: String,
    /// Bearer token issued by the identity provider
    pub access_token: Option<String>,
    /// Per-request timeout; expiry counts as a failed move
    pub request_timeout_ms: u64,
}

impl BoardConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server_url: env::var("BOARD_SERVER_URL").unwrap_or(defaults.server_url),
            access_token: env::var("BOARD_ACCESS_TOKEN").ok().filter(|t| !t.is_empty()),
            request_timeout_ms: env::var("BOARD_REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.request_timeout_ms),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:3000".to_string(),
            access_token: None,
            request_timeout_ms: 10_000,
        }
    }
}

impl fmt::Debug for BoardConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoardConfig")
            .field("server_url", &self.server_url)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("request_timeout_ms", &self.request_timeout_ms)
            .finish()
    }
}
