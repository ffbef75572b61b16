//! Binary for the weather proxy server.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use weather_core::{Config, provider::provider_from_config};
use weather_server::AppState;

#[derive(Debug, Parser)]
#[command(name = "weather-server", version, about = "Weather API proxy server")]
struct Args {
    /// Port to listen on; overrides config and WEATHER_PORT.
    #[arg(long)]
    port: Option<u16>,

    /// Config file to read instead of the platform default.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let mut config = Config::load_from(path)?;
            config.apply_overrides(|name| std::env::var(name).ok())?;
            config
        }
        None => Config::load()?,
    };

    let has_api_key = config.is_api_key_configured();
    let server = config.server;
    let port = args.port.unwrap_or(server.port);

    if has_api_key {
        tracing::info!("API key loaded");
    } else {
        tracing::warn!("API key not configured; lookups will fail until WEATHER_API_KEY is set");
    }
    tracing::info!("Using WeatherAPI.com at {}", server.upstream_url);

    let provider = provider_from_config(&server)?;
    weather_server::run(port, AppState::new(provider)).await
}
