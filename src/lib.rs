//! Tallyboard: a visit counter status page.
//!
//! A small web service that increments a persisted counter on every page load
//! and renders it together with runtime/environment diagnostics. Built for
//! containerized deployments: startup tolerates the database coming up late
//! by retrying with a fixed delay, and keeps running in a degraded mode if the
//! database never appears.

pub mod config;
pub mod db;
pub mod diagnostics;
pub mod error;
pub mod middleware;
pub mod retry;
pub mod routes;
pub mod state;
pub mod templates;

pub use error::AppError;
