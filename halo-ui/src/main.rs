//! halo-ui - Bible reading tracker service
//!
//! Serves the passage passthrough endpoint and the reading-session API.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use halo_common::config;
use halo_ui::providers::{BibleApiClient, EsvClient, Providers};
use halo_ui::speech::NullEngine;
use halo_ui::store::ProgressStore;
use halo_ui::{build_router, AppState};

#[derive(Parser, Debug)]
#[command(name = "halo-ui", about = "Bible reading tracker service")]
struct Args {
    /// Port to listen on
    #[arg(long, env = "HALO_PORT", default_value_t = 5780)]
    port: u16,

    /// Data directory for persisted reading state
    #[arg(long)]
    data_dir: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting Halo reading tracker (halo-ui) v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let data_dir = config::resolve_data_dir(args.data_dir.as_deref())?;
    config::ensure_data_dir(&data_dir)?;
    info!("Data directory: {}", data_dir.display());

    let store = ProgressStore::load(&data_dir);

    let esv = match config::esv_api_key() {
        Some(key) => {
            info!("ESV API key configured");
            Some(EsvClient::new(key).context("build ESV client")?)
        }
        None => {
            info!("No ESV API key; esv requests will be rejected with 401");
            None
        }
    };
    let providers = Providers {
        bible_api: BibleApiClient::new().context("build bible-api client")?,
        esv,
    };

    // No host speech engine in a headless server; playback reports as
    // unsupported until one is wired in.
    let state = AppState::new(store, providers, Arc::new(NullEngine));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", args.port)).await?;
    info!("halo-ui listening on http://127.0.0.1:{}", args.port);
    info!("Health check: http://127.0.0.1:{}/health", args.port);

    axum::serve(listener, app).await?;

    Ok(())
}
