//! Parley Runtime - configuration, logging and the line loop.
//!
//! This crate provides:
//! - Layered configuration (`parley.toml`, `PARLEY_*` environment variables)
//! - Logging setup driven by that configuration
//! - [`ParleyRuntime`], which feeds input lines to a shared pattern registry
//!
//! ```ignore
//! use parley_runtime::ParleyRuntime;
//! use parley_framework::{Args, Pattern};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let runtime = ParleyRuntime::new();
//!
//!     runtime.register(Pattern::new("say {text}", |args: &Args| {
//!         println!("say {}", args.require("text"));
//!     })?);
//!     runtime.register(Pattern::new("say {text?}", || println!("Usage: say <text>"))?);
//!
//!     // Reads stdin until EOF or Ctrl+C
//!     runtime.run().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;

// Re-exports
pub use config::{ConfigError, ConfigLoader, ConfigResult, ParleyConfig, RuntimeConfig};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{LoggingBuilder, SpanEvents};
pub use runtime::{ParleyRuntime, RuntimeBuilder, RuntimeStats};

pub use tokio_util::sync::CancellationToken;

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Logging macros for handler code.
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
