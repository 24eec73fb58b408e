//! Database access: startup bootstrap, schema initialization, and the
//! per-request counter increment.
//!
//! The pool is constructed once at startup and handed to the request handlers
//! through [`crate::state::AppState`]; nothing here is process-global. If the
//! database is unreachable when the process boots, the bootstrapper falls back
//! to a lazily-connecting pool so the service still comes up and reports
//! failures per-request instead of crash-looping.

use sqlx::postgres::{PgConnection, PgPool, PgPoolOptions};
use sqlx::Connection;

use crate::config::{
    BOOTSTRAP_MAX_ATTEMPTS, BOOTSTRAP_RETRY_DELAY, POOL_ACQUIRE_TIMEOUT, POOL_MAX_CONNECTIONS,
};
use crate::retry;

/// The single persisted record tracking total page visits.
///
/// The application only ever reads "the first row" (by `id` order); the row is
/// created lazily on the first visit and never deleted.
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct Counter {
    pub id: i32,
    pub count: i64,
}

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS visit_counter (\
     id INTEGER PRIMARY KEY, \
     count BIGINT NOT NULL DEFAULT 0\
     )";

/// Open the connection pool, retrying while the database container comes up.
///
/// Connection attempts are retried [`BOOTSTRAP_MAX_ATTEMPTS`] times with a
/// fixed delay. Exhausting the retries is not fatal: the error is logged and a
/// lazily-connecting pool is returned, so later per-request queries surface
/// the connectivity failure instead of the process refusing to start. Only a
/// malformed connection string is an immediate error.
pub async fn bootstrap_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let result = retry::with_fixed_delay(
        "database connect",
        BOOTSTRAP_MAX_ATTEMPTS,
        BOOTSTRAP_RETRY_DELAY,
        || pool_options().connect(database_url),
    )
    .await;

    match result {
        Ok(pool) => {
            tracing::info!("Connected to the database");
            Ok(pool)
        }
        Err(err) => {
            tracing::error!(
                error = %err,
                "Database unreachable after {} attempts, continuing with a lazy pool",
                BOOTSTRAP_MAX_ATTEMPTS
            );
            pool_options().connect_lazy(database_url)
        }
    }
}

fn pool_options() -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(POOL_MAX_CONNECTIONS)
        .acquire_timeout(POOL_ACQUIRE_TIMEOUT)
}

/// Create the `visit_counter` table if it does not exist.
///
/// Idempotent and safe to run on every startup. Shares the bootstrap retry
/// policy since the usual failure mode is the same: the database is not
/// accepting connections yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    retry::with_fixed_delay(
        "schema init",
        BOOTSTRAP_MAX_ATTEMPTS,
        BOOTSTRAP_RETRY_DELAY,
        || async {
            sqlx::query(CREATE_TABLE_SQL).execute(pool).await?;
            Ok::<_, sqlx::Error>(())
        },
    )
    .await
}

/// Increment the visit counter and return the new count.
///
/// Runs inside a transaction: the existing row (if any) is read with a row
/// lock, incremented, and committed. An empty table inserts the row with
/// count = 1; two first visits racing on the insert resolve through the
/// conflict clause. Either way concurrent requests serialize on the row, so
/// K concurrent visits always advance the count by exactly K.
///
/// The transaction handle rolls back on drop, so the session is released on
/// every exit path including errors and cancellation.
pub async fn record_visit(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let existing = sqlx::query_as::<_, Counter>(
        "SELECT id, count FROM visit_counter ORDER BY id LIMIT 1 FOR UPDATE",
    )
    .fetch_optional(&mut *tx)
    .await?;

    let count = match existing {
        Some(counter) => {
            let next = counter.count + 1;
            sqlx::query("UPDATE visit_counter SET count = $1 WHERE id = $2")
                .bind(next)
                .bind(counter.id)
                .execute(&mut *tx)
                .await?;
            next
        }
        None => {
            sqlx::query_scalar::<_, i64>(
                "INSERT INTO visit_counter (id, count) VALUES (1, 1) \
                 ON CONFLICT (id) DO UPDATE SET count = visit_counter.count + 1 \
                 RETURNING count",
            )
            .fetch_one(&mut *tx)
            .await?
        }
    };

    tx.commit().await?;
    Ok(count)
}

/// Fetch the server version string over a dedicated connection.
///
/// Display-only; callers substitute an inline error string when this fails
/// (see [`crate::diagnostics`]). Deliberately bypasses the pool so a healthy
/// counter path and a broken diagnostics path stay independent.
pub async fn server_version(database_url: &str) -> Result<String, sqlx::Error> {
    let mut conn = PgConnection::connect(database_url).await?;
    let version = sqlx::query_scalar::<_, String>("SELECT version()")
        .fetch_one(&mut conn)
        .await?;
    conn.close().await.ok();
    Ok(version)
}
