//! Configuration loading and management.
//!
//! - [`types`]: config struct definitions and loading
//! - [`validation`]: startup checks
//! - `defaults`: serde default values

mod defaults;
mod types;
mod validation;

pub use types::{Config, ConfigError, InputConfig, LogConfig, OutputConfig, ProtocolConfig};
pub use validation::{ValidationError, validate};
