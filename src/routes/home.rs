//! Status page handler.
//!
//! Each page load increments the persisted visit counter exactly once, then
//! renders the count alongside runtime diagnostics. The increment is the only
//! unguarded failure path: if it fails, the request maps to an error page
//! rather than rendering a page without a valid count.

use axum::{extract::State, response::Html};
use tracing::instrument;

use crate::db;
use crate::diagnostics;
use crate::error::AppError;
use crate::state::AppState;

/// Status page handler for `GET /`.
#[instrument(name = "home::index", skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    // Read-or-create the counter row and commit the increment. This happens
    // before the diagnostics pass so a broken version lookup cannot delay or
    // shadow the durability point.
    let count = db::record_visit(&state.pool).await?;

    // Best-effort diagnostics; the db_info field degrades to an inline error
    // string instead of failing the page.
    let diagnostics = diagnostics::collect(&state.config).await;

    let mut context = tera::Context::new();
    context.insert("count", &count);
    context.insert("diagnostics", &diagnostics);

    let html = state.tera.render("index.html", &context)?;
    Ok(Html(html))
}
