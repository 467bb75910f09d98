//! Room service configuration.

use std::env;

use axum::http::HeaderValue;
use common::{DatabaseConfig, JwtConfig, ServiceConfig};
use domain::MIN_JWT_SECRET_LENGTH;

/// Room service configuration.
#[derive(Debug, Clone)]
pub struct RoomServiceConfig {
    pub server: ServiceConfig,
    pub database: DatabaseConfig,
    /// Identity-provider signing secret
    pub jwt: JwtConfig,
    /// Allowed CORS origin; unset or `*` allows any
    pub cors_allowed_origin: Option<String>,
}

impl RoomServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = DatabaseConfig::default();

        Self {
            server: ServiceConfig {
                service_name: "room-service".to_string(),
                host: env::var("ROOM_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("ROOM_SERVICE_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(3000),
            },
            database: DatabaseConfig {
                url: env::var("ROOM_SERVICE_DATABASE_URL")
                    .or_else(|_| env::var("DATABASE_URL"))
                    .unwrap_or(defaults.url),
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.max_connections),
                min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.min_connections),
            },
            jwt: JwtConfig {
                secret: env::var("JWT_SECRET").unwrap_or_default(),
            },
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN").ok(),
        }
    }

    /// Reject configurations the server must not start with.
    pub fn validate(&self) -> Result<(), String> {
        if self.jwt.secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(format!(
                "JWT_SECRET must be at least {} characters",
                MIN_JWT_SECRET_LENGTH
            ));
        }
        if let Some(origin) = &self.cors_allowed_origin {
            parse_origin(origin)?;
        }
        Ok(())
    }
}

/// `None` for the wildcard, otherwise a single `http(s)://` origin usable as a header value.
pub fn parse_origin(origin: &str) -> Result<Option<HeaderValue>, String> {
    if origin == "*" {
        return Ok(None);
    }
    let well_formed = (origin.starts_with("http://") || origin.starts_with("https://"))
        && !origin.chars().any(char::is_whitespace);
    if !well_formed {
        return Err(format!("CORS_ALLOWED_ORIGIN '{}' is not an origin", origin));
    }
    HeaderValue::from_str(origin)
        .map(Some)
        .map_err(|_| format!("CORS_ALLOWED_ORIGIN '{}' is not an origin", origin))
}
