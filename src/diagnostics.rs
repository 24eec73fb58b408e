//! Display-only runtime and environment diagnostics for the status page.
//!
//! Nothing in the service behaves differently based on these values; they are
//! assembled per request and handed straight to the template. The one fallible
//! field is the database version lookup, which degrades to an inline error
//! string rather than failing the page.

use serde::Serialize;

use crate::config::{AppConfig, DIAGNOSTIC_MAX_ATTEMPTS, DIAGNOSTIC_RETRY_DELAY};
use crate::{db, retry};

/// Framework identity shown on the status page.
const FRAMEWORK_INFO: &str = concat!(
    "axum / ",
    env!("CARGO_PKG_NAME"),
    " ",
    env!("CARGO_PKG_VERSION")
);

/// The six display strings rendered on the status page.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostics {
    /// Database server version, or an inline error string
    pub db_info: String,
    /// Web framework name and crate version
    pub framework_info: String,
    /// Serving stack identity (`SERVER_SOFTWARE`)
    pub server_info: String,
    /// Host operating system
    pub os_info: String,
    /// Configured port (`PORT`, display-only)
    pub port_info: String,
    /// Container name (`CONTAINER_NAME`)
    pub container_info: String,
}

/// Assemble the diagnostics record.
///
/// Everything except `db_info` is a pure read with a default. The version
/// lookup goes over its own connection with a bounded retry; exhausting the
/// retries substitutes the failure reason instead of propagating, so a broken
/// diagnostics path never turns into an HTTP error.
pub async fn collect(config: &AppConfig) -> Diagnostics {
    let db_info = retry::with_fixed_delay(
        "version lookup",
        DIAGNOSTIC_MAX_ATTEMPTS,
        DIAGNOSTIC_RETRY_DELAY,
        || db::server_version(&config.database_url),
    )
    .await
    .unwrap_or_else(|err| format!("Error retrieving database info: {}", err));

    Diagnostics {
        db_info,
        framework_info: FRAMEWORK_INFO.to_string(),
        server_info: config.server_info.clone(),
        os_info: std::env::consts::OS.to_string(),
        port_info: config.port_info.clone(),
        container_info: config.container_info.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(database_url: &str) -> AppConfig {
        AppConfig::from_lookup(|name| match name {
            "DATABASE_URL" => Some(database_url.to_string()),
            "PORT" => Some("8080".to_string()),
            _ => None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn unreachable_database_degrades_to_inline_error() {
        // Nothing listens on this port; the lookup must substitute, not fail.
        let diagnostics = collect(&test_config("postgres://127.0.0.1:1/none")).await;

        assert!(diagnostics.db_info.starts_with("Error retrieving database info:"));
    }

    #[tokio::test]
    async fn static_fields_do_not_depend_on_the_database() {
        let diagnostics = collect(&test_config("postgres://127.0.0.1:1/none")).await;

        assert!(diagnostics.framework_info.starts_with("axum / tallyboard"));
        assert_eq!(diagnostics.os_info, std::env::consts::OS);
        assert_eq!(diagnostics.port_info, "8080");
    }
}
