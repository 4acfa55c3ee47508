//! psaccd - PSA Car Controller bridge daemon
//!
//! Usage: psaccd [--config <FILE>] [--api-url <URL>] [--vin <VIN>] [--port <PORT>]

use std::path::PathBuf;

use clap::Parser;
use psaccd::{Config, Overrides};
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "psaccd")]
#[command(author, version, about = "PSA Car Controller bridge daemon", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, env = "PSACC_CONFIG")]
    config: Option<PathBuf>,

    /// Base URL of the PSA Car Controller service
    #[arg(long, env = "PSACC_API_URL")]
    api_url: Option<String>,

    /// Track only this vehicle instead of discovering all of them
    #[arg(long, env = "PSACC_VIN")]
    vin: Option<String>,

    /// Minutes between refreshes
    #[arg(long, env = "PSACC_UPDATE_INTERVAL")]
    update_interval: Option<u64>,

    /// Listen host
    #[arg(long, env = "PSACC_HOST")]
    host: Option<String>,

    /// Listen port
    #[arg(short, long, env = "PSACC_PORT")]
    port: Option<u16>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            api_url: self.api_url.clone(),
            vin: self.vin.clone(),
            update_interval: self.update_interval,
            host: self.host.clone(),
            port: self.port,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "psaccd=info,psacc_api=info,psacc_coordinator=info,psacc_client=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting psaccd (PSA Car Controller bridge)");

    let cli = Cli::parse();
    if let Some(path) = &cli.config {
        tracing::info!("Loading config from: {}", path.display());
    }
    let config = Config::load(cli.config.as_deref(), cli.overrides())?;

    let listener = tokio::net::TcpListener::bind(config.listen_addr()?).await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Shutdown requested");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Cannot listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        }
    });

    psaccd::run(config, listener, shutdown_rx).await
}
