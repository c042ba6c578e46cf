//! # connect-infra-common
//!
//! Shared infrastructure for the connect-routing crates:
//!
//! - [`logging`]: `tracing-subscriber` setup for handlers that embed the validators
//! - [`config`]: layered configuration loading (defaults, TOML, environment)
//! - [`errors`]: the infrastructure error type

pub mod config;
pub mod errors;
pub mod logging;

pub use errors::{Error, Result};
pub use logging::{setup_logging, LoggingConfig, LoggingSettings};
