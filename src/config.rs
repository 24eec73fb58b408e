//! Configuration loading and constants.
//!
//! Configuration comes from environment variables (the service is built for
//! containerized deployments where env vars are the contract). `DATABASE_URL`
//! is the only required setting; everything else has a default. Retry tuning
//! for startup and the per-request diagnostic lookup lives here as constants.

use std::time::Duration;

use serde::Serialize;

// =============================================================================
// Startup Retry Policy
// =============================================================================
// In docker-compose style deployments the database container often comes up
// after the application container. The bootstrapper and schema initializer
// both retry with a fixed delay before giving up.

/// Maximum connection attempts at startup
pub const BOOTSTRAP_MAX_ATTEMPTS: u32 = 5;

/// Delay between startup connection attempts
pub const BOOTSTRAP_RETRY_DELAY: Duration = Duration::from_secs(2);

// =============================================================================
// Diagnostic Lookup Retry Policy
// =============================================================================

/// Maximum attempts for the per-request `SELECT version()` lookup
pub const DIAGNOSTIC_MAX_ATTEMPTS: u32 = 3;

/// Delay between diagnostic lookup attempts (kept short; this runs inside
/// a request and only feeds a display string)
pub const DIAGNOSTIC_RETRY_DELAY: Duration = Duration::from_millis(500);

// =============================================================================
// Database Pool Settings
// =============================================================================

/// Maximum connections held by the pool
pub const POOL_MAX_CONNECTIONS: u32 = 5;

/// How long a request waits for a pooled connection before failing
pub const POOL_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

// =============================================================================
// Default Paths and Strings
// =============================================================================

/// Glob pattern for template files
pub const TEMPLATE_GLOB: &str = "templates/**/*";

/// Default bind address for the HTTP listener
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "tallyboard=debug,tower_http=debug";

/// Default for the display-only `PORT` variable
pub const DEFAULT_PORT_INFO: &str = "8000";

/// Default for the display-only `SERVER_SOFTWARE` variable
pub const DEFAULT_SERVER_INFO: &str = "tokio";

/// Default for the display-only `CONTAINER_NAME` variable
pub const DEFAULT_CONTAINER_INFO: &str = "tallyboard";

/// Application configuration, read once at startup.
///
/// The display-only fields (`port_info`, `server_info`, `container_info`) are
/// rendered on the status page verbatim; nothing in the service behaves
/// differently based on them. In particular `PORT` does not configure the
/// listening socket (that comes from the `--bind` CLI flag).
#[derive(Debug, Clone, Serialize)]
pub struct AppConfig {
    /// Postgres connection string (required)
    pub database_url: String,
    /// Display string for the configured port
    pub port_info: String,
    /// Display string for the serving stack
    pub server_info: String,
    /// Display string for the container name
    pub container_info: String,
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// `DATABASE_URL` must be set and non-empty; startup aborts otherwise.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Split out from [`AppConfig::from_env`] so tests can supply variables
    /// without mutating the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = match lookup("DATABASE_URL") {
            Some(url) if !url.trim().is_empty() => url,
            _ => return Err(ConfigError::MissingDatabaseUrl),
        };

        Ok(Self {
            database_url,
            port_info: lookup("PORT").unwrap_or_else(|| DEFAULT_PORT_INFO.to_string()),
            server_info: lookup("SERVER_SOFTWARE")
                .unwrap_or_else(|| DEFAULT_SERVER_INFO.to_string()),
            container_info: lookup("CONTAINER_NAME")
                .unwrap_or_else(|| DEFAULT_CONTAINER_INFO.to_string()),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("DATABASE_URL must be set to a non-empty Postgres connection string")]
    MissingDatabaseUrl,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn missing_database_url_is_fatal() {
        let result = AppConfig::from_lookup(lookup_from(&[]));
        assert!(matches!(result, Err(ConfigError::MissingDatabaseUrl)));
    }

    #[test]
    fn empty_database_url_is_fatal() {
        let result = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "  ")]));
        assert!(matches!(result, Err(ConfigError::MissingDatabaseUrl)));
    }

    #[test]
    fn display_fields_use_defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup_from(&[(
            "DATABASE_URL",
            "postgres://localhost/visits",
        )]))
        .unwrap();

        assert_eq!(config.port_info, DEFAULT_PORT_INFO);
        assert_eq!(config.server_info, DEFAULT_SERVER_INFO);
        assert_eq!(config.container_info, DEFAULT_CONTAINER_INFO);
    }

    #[test]
    fn display_fields_come_from_environment() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/visits"),
            ("PORT", "9090"),
            ("SERVER_SOFTWARE", "nginx"),
            ("CONTAINER_NAME", "visits-prod"),
        ]))
        .unwrap();

        assert_eq!(config.port_info, "9090");
        assert_eq!(config.server_info, "nginx");
        assert_eq!(config.container_info, "visits-prod");
    }
}
