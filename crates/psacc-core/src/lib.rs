//! psacc-core - Core traits and types for the PSA Car Controller bridge
//!
//! This crate provides the abstractions shared by the HTTP client, the polling
//! coordinator and the entity layer:
//!
//! - [`VehicleApi`]: the seam to the remote telematics REST service
//! - [`VehicleDataSource`] / [`RefreshTrigger`]: the read and refresh interface
//!   the coordinator exposes to entities and command handlers
//! - [`VehicleRecord`] and [`merge_record`]: the cached per-VIN state
//! - [`ApiError`]: the client error taxonomy

pub mod backend;
pub mod error;
pub mod lookup;
pub mod record;
pub mod source;
pub mod testing;

pub use backend::VehicleApi;
pub use error::{ApiError, ApiResult};
pub use record::{merge_record, VehicleMap, VehicleRecord};
pub use source::{RefreshTrigger, VehicleDataSource};

/// Integration domain, used in device identifiers
pub const DOMAIN: &str = "psacc";

/// Manufacturer reported for every vehicle device
pub const MANUFACTURER: &str = "PSA";
