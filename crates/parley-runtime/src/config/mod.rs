//! Configuration module for the Parley runtime.
//!
//! This module provides layered configuration loading and validation for
//! logging and the line loop.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
pub use schema::{
    LogFormat, LogLevel, LogOutput, LoggingConfig, ParleyConfig, RuntimeConfig, SpanEventConfig,
};
pub use validation::validate_config;
