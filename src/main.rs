//! Tallyboard: a visit counter status page.
//!
//! This is the application entry point. It initializes tracing, loads
//! configuration from the environment, bootstraps the database pool (retrying
//! while the database container comes up), ensures the counter table exists,
//! sets up the Axum router, and starts the HTTP server.

use std::net::SocketAddr;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tallyboard::config::{AppConfig, DEFAULT_BIND_ADDR, DEFAULT_LOG_FILTER};
use tallyboard::db;
use tallyboard::routes::create_router;
use tallyboard::state::AppState;
use tallyboard::templates::init_templates;

/// Tallyboard: a visit counter status page
#[derive(Parser, Debug)]
#[command(name = "tallyboard", version, about)]
struct Args {
    /// Address to bind the HTTP listener to
    #[arg(short, long, default_value = DEFAULT_BIND_ADDR)]
    bind: SocketAddr,

    /// Log level filter (e.g., "tallyboard=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&log_filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from the environment. A missing DATABASE_URL is the
    // one fatal startup error: the process exits instead of guessing at a
    // connection string.
    let config = AppConfig::from_env()?;
    tracing::info!(
        port_info = %config.port_info,
        container_info = %config.container_info,
        "Loaded configuration"
    );

    // Initialize Tera templates
    let tera = init_templates()?;
    tracing::info!("Initialized templates");

    // Bootstrap the database pool. Retries connectivity failures, then falls
    // back to a lazy pool so the service still starts when the database is
    // down; only a malformed URL aborts here.
    let pool = db::bootstrap_pool(&config.database_url).await?;

    // Ensure the counter table exists. Idempotent; a connectivity failure
    // after retries is logged and tolerated, the same degraded mode as above.
    if let Err(err) = db::ensure_schema(&pool).await {
        tracing::error!(error = %err, "Schema initialization failed, continuing anyway");
    } else {
        tracing::info!("Counter table ready");
    }

    // Create application state
    let state = AppState::new(config, tera, pool);

    // Create router
    let app = create_router(state);

    // Start server
    tracing::info!("Starting server at http://{}", args.bind);
    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Resolves when SIGTERM or Ctrl+C arrives, triggering graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
