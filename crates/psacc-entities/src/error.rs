//! Entity error types

use thiserror::Error;

/// Errors raised when acting on an entity
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EntityError {
    /// No such entity on this platform
    #[error("Unknown {platform}: {key}")]
    UnknownEntity { platform: &'static str, key: String },

    /// The vehicle is not in the coordinator cache
    #[error("Vehicle not found: {0}")]
    VehicleNotFound(String),

    /// Number value outside `[min, max]`
    #[error("Value {value} for {key} is out of range [{min}, {max}]")]
    OutOfRange {
        key: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Select option not in the option list
    #[error("Invalid option for {key}: {option}")]
    InvalidOption { key: &'static str, option: String },
}

pub type EntityResult<T> = Result<T, EntityError>;
