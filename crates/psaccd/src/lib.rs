//! psaccd - PSA Car Controller bridge daemon
//!
//! Wires one configured vehicle service into a running bridge:
//!
//! 1. build the HTTP client for the configured `api_url`
//! 2. validate the configuration against the live service
//! 3. create the coordinator and run its first refresh
//! 4. serve the REST API while the coordinator polls in the background
//!
//! Everything is owned by a [`Daemon`] value; nothing is registered globally,
//! so dropping it (after [`Daemon::serve`] returns) unloads the entry.

pub mod config;
pub mod setup;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use psacc_api::{create_router, AppState};
use psacc_client::PsaccClient;
use psacc_coordinator::Coordinator;
use psacc_core::VehicleApi;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{info, warn};

pub use config::{Config, ConfigError, FileConfig, Overrides};
pub use setup::{validate_setup, ConfigEntry, SetupError};

/// First wait before retrying a setup whose first refresh failed
pub const SETUP_RETRY_DELAY: Duration = Duration::from_secs(5);
/// Upper bound for the setup retry backoff
pub const MAX_SETUP_RETRY_DELAY: Duration = Duration::from_secs(300);

/// A loaded configuration entry with its coordinator
pub struct Daemon {
    entry: ConfigEntry,
    coordinator: Arc<Coordinator>,
}

impl Daemon {
    /// Validate `config`, create the coordinator and run its first refresh
    pub async fn setup(config: &Config) -> Result<Self, SetupError> {
        let client = PsaccClient::new(&config.api_url)?;
        Self::setup_with_api(Arc::new(client), config).await
    }

    /// Same as [`Daemon::setup`] over an already built client
    pub async fn setup_with_api(
        api: Arc<dyn VehicleApi>,
        config: &Config,
    ) -> Result<Self, SetupError> {
        let entry = validate_setup(api.as_ref(), config).await?;

        let coordinator = Arc::new(Coordinator::new(
            api,
            config.mode(),
            config.update_interval(),
        ));
        coordinator.first_refresh().await?;

        info!(
            title = %entry.title,
            mode = coordinator.mode().as_str(),
            interval_secs = config.update_interval().as_secs(),
            "Config entry loaded"
        );
        Ok(Self { entry, coordinator })
    }

    pub fn entry(&self) -> &ConfigEntry {
        &self.entry
    }

    pub fn coordinator(&self) -> &Arc<Coordinator> {
        &self.coordinator
    }

    pub fn router(&self) -> Router {
        create_router(AppState::from_coordinator(self.coordinator.clone()))
    }

    /// Serve the API and poll until `shutdown` turns true
    ///
    /// The coordinator loop is stopped and awaited before returning.
    pub async fn serve(
        self,
        listener: TcpListener,
        mut shutdown: watch::Receiver<bool>,
    ) -> anyhow::Result<()> {
        let (stop_tx, stop_rx) = watch::channel(false);
        let poller = tokio::spawn({
            let coordinator = self.coordinator.clone();
            async move { coordinator.run(stop_rx).await }
        });

        if let Ok(addr) = listener.local_addr() {
            info!("Listening on http://{}", addr);
        }

        let served = axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                let _ = shutdown.wait_for(|stop| *stop).await;
            })
            .await;

        let _ = stop_tx.send(true);
        poller.await?;
        info!(title = %self.entry.title, "Config entry unloaded");

        served?;
        Ok(())
    }
}

/// Set up with backoff while the service is not ready, then serve
///
/// A rejected configuration is returned as an error. Returns `Ok(())` when
/// `shutdown` fires before setup completes.
pub async fn run(
    config: Config,
    listener: TcpListener,
    mut shutdown: watch::Receiver<bool>,
) -> anyhow::Result<()> {
    let mut delay = SETUP_RETRY_DELAY;
    let daemon = loop {
        match Daemon::setup(&config).await {
            Ok(daemon) => break daemon,
            Err(SetupError::NotReady(e)) => {
                warn!(error = %e, retry_in_secs = delay.as_secs(), "Setup not ready, retrying");
            }
            Err(e) => return Err(e.into()),
        }

        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = shutdown.wait_for(|stop| *stop) => return Ok(()),
        }
        delay = (delay * 2).min(MAX_SETUP_RETRY_DELAY);
    };

    daemon.serve(listener, shutdown).await
}
