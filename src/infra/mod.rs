//! Infrastructure layer: config, logging, and state persistence.

pub mod config;
pub mod error;
pub mod logging;
pub mod store;
