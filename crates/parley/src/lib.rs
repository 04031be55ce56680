//! # Parley
//!
//! A pattern-matching command dispatcher for line-based input.
//!
//! ## Overview
//!
//! Handlers are registered under small patterns made of literal words and
//! `{key}` / `{key?}` placeholders. Each input line is matched against the
//! patterns in registration order and the first match runs its handler with
//! the captured values.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────────┐     ┌──────────────────────────┐
//! │   Runtime   │────▶│ SharedDispatcher │────▶│ "say {text}"   → handler │
//! │ (stdin loop)│     │  (first match)   │────▶│ "say {text?}"  → handler │
//! └─────────────┘     └──────────────────┘────▶│ "hi lol"       → handler │
//!                                              └──────────────────────────┘
//! ```
//!
//! - **Core**: pattern grammar, captured [`Args`](prelude::Args), compile errors
//! - **Framework**: compiled patterns, handlers, the dispatcher
//! - **Runtime**: configuration, logging, the line loop
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use parley::prelude::*;
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
//!     runtime.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config`: load `parley.toml` (default)
//! - `yaml-config`: load `parley.yaml`
//! - `json-log`: JSON log output

pub use parley_core as core;
pub use parley_framework as framework;
pub use parley_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use parley::prelude::*;
/// ```
pub mod prelude {
    // Runtime - main entry point
    pub use parley_runtime::{ParleyRuntime, RuntimeError, RuntimeResult, RuntimeStats};

    // Patterns and dispatch
    pub use parley_framework::{
        DispatchError, DispatchOutcome, Dispatcher, HandlerError, Pattern, SharedDispatcher,
    };

    // Captured values and compile errors
    pub use parley_core::{Args, ArgsError, CompileError};
}
