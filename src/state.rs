//! Shared application state for request handlers.

use std::sync::Arc;

use sqlx::PgPool;
use tera::Tera;

use crate::config::AppConfig;

/// Shared application state, cloneable across handlers.
///
/// Holds the configuration, the Tera template engine, and the database pool.
/// The pool is constructed and injected at startup (see `main`); handlers
/// never reach for ambient globals.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tera: Arc<Tera>,
    pub pool: PgPool,
}

impl AppState {
    /// Creates a new application state from the given configuration, templates, and pool.
    pub fn new(config: AppConfig, tera: Tera, pool: PgPool) -> Self {
        Self {
            config: Arc::new(config),
            tera: Arc::new(tera),
            pool,
        }
    }
}
