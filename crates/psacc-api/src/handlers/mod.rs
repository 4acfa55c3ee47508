//! HTTP request handlers
//!
//! Handlers read from the coordinator cache and act through the entity
//! layer or, for services, directly through the injected client.

pub mod entities;
pub mod services;
pub mod system;
pub mod vehicles;
