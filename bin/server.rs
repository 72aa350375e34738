// Fedora Catalog - Web Server
// REST API with Axum over SQLite

use anyhow::{Context, Result};
use clap::Parser;
use fedora::{build_router, AppState, Catalog, SqliteStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "fedora-server")]
#[command(about = "Fedora catalog REST API", version)]
struct Args {
    /// SQLite database file (created if missing)
    #[arg(long, env = "FEDORA_DB", default_value = "fedora.db")]
    db: PathBuf,

    /// Address to bind
    #[arg(long, env = "FEDORA_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "FEDORA_PORT", default_value = "8000")]
    port: u16,

    /// Login page for HTML endpoints that need a signed-in caller
    #[arg(long, env = "FEDORA_LOGIN_URL", default_value = fedora::api::DEFAULT_LOGIN_URL)]
    login_url: String,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG wins over --verbose when set
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    let store = SqliteStore::open(&args.db)?;
    info!("database opened: {}", args.db.display());

    let state = AppState::new(Catalog::new(Arc::new(store))).with_login_url(&args.login_url);
    let app = build_router(state);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server failed")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // no signal handler available; run until killed
        std::future::pending::<()>().await;
    }
}
