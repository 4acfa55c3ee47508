//! psacc-coordinator - Periodic polling of the PSA Car Controller service
//!
//! The [`Coordinator`] owns the vehicle cache. Each refresh cycle discovers
//! vehicles (once), fetches every vehicle's status and swaps the whole cache
//! in one step, so readers never observe a half-updated mapping.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                         Coordinator                            │
//! │                                                                │
//! │   run loop ── interval / request_refresh / shutdown            │
//! │      │                                                         │
//! │      ▼                                                         │
//! │   refresh() ──► list_vehicles (first cycle only)               │
//! │      │          get_vehicle_status (every VIN, every cycle)    │
//! │      ▼                                                         │
//! │   Arc<VehicleMap> ◄── get_vehicle_data / get_all_vehicles      │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use psacc_coordinator::{Coordinator, CoordinatorMode};
//!
//! let coordinator = Arc::new(Coordinator::new(api, CoordinatorMode::Discovery, interval));
//! coordinator.first_refresh().await?;
//!
//! let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! tokio::spawn({
//!     let coordinator = coordinator.clone();
//!     async move { coordinator.run(shutdown_rx).await }
//! });
//! ```

use std::time::Duration;

mod coordinator;

pub use coordinator::{Coordinator, CoordinatorMode, CoordinatorStatus, RefreshError};

// Re-export core types for convenience
pub use psacc_core::{RefreshTrigger, VehicleDataSource, VehicleMap, VehicleRecord};

/// Default polling period, in minutes
pub const DEFAULT_UPDATE_INTERVAL_MINUTES: u64 = 5;

/// Shortest accepted polling period, in minutes
pub const MIN_UPDATE_INTERVAL_MINUTES: u64 = 1;

/// Longest accepted polling period, in minutes
pub const MAX_UPDATE_INTERVAL_MINUTES: u64 = 60;

/// Polling period for a configured number of minutes
pub fn update_interval_from_minutes(minutes: u64) -> Duration {
    Duration::from_secs(minutes * 60)
}
