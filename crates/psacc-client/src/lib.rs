//! PSA Car Controller client library
//!
//! Typed HTTP client for the PSA Car Controller REST service. It implements
//! [`psacc_core::VehicleApi`], so the coordinator and the entity layer never
//! see HTTP details.
//!
//! # Example
//!
//! ```rust,no_run
//! use psacc_client::PsaccClient;
//! use psacc_core::VehicleApi;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PsaccClient::new("http://psacc.local:5000/")?;
//!
//!     // Reads propagate errors
//!     let status = client.get_vehicle_status("VR3UHZKXZLT123456").await?;
//!
//!     // Commands report success as a boolean
//!     if !client.wakeup("VR3UHZKXZLT123456").await {
//!         eprintln!("wakeup failed");
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Testing
//!
//! The `testing` module spins up an axum router standing in for the remote
//! service and returns a client bound to it:
//!
//! ```rust,ignore
//! use psacc_client::testing::TestServer;
//!
//! let server = TestServer::start(router).await?;
//! let vehicles = server.client.list_vehicles().await?;
//! ```

mod client;
pub mod endpoints;
mod error;
pub mod testing;

pub use client::{PsaccClient, DEFAULT_CONNECT_TIMEOUT, DEFAULT_TIMEOUT};
pub use psacc_core::{ApiError, ApiResult, VehicleApi};
