// crates/server/src/main.rs
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use siteview_server::create_app;
use siteview_types::PageAnalytics;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "siteview", version, about = "Personal site analytics dashboard server")]
struct Args {
    /// Path to the analytics JSON export
    #[arg(long, env = "SITEVIEW_DATA", default_value = "analytics.json")]
    data: PathBuf,

    /// Address to bind to
    #[arg(long, env = "SITEVIEW_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(long, env = "SITEVIEW_PORT", default_value_t = 4321)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let raw = std::fs::read_to_string(&args.data)
        .with_context(|| format!("failed to read analytics export {}", args.data.display()))?;
    let pages: Vec<PageAnalytics> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse analytics export {}", args.data.display()))?;

    tracing::info!(
        pages = pages.len(),
        data = %args.data.display(),
        "Loaded analytics export"
    );

    let app = create_app(pages);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("Siteview server listening on http://{addr}");

    axum::serve(listener, app)
        .await
        .context("server error")?;

    Ok(())
}
