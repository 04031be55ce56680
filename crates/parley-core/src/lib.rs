//! # Parley Core
//!
//! The foundation layer of the Parley command dispatcher.
//!
//! This crate holds the pieces that have no dependency on how handlers are
//! invoked:
//!
//! - **Grammar**: turning a pattern string such as `say {text?}` into an
//!   ordered list of [`Element`]s ([`parse_elements`])
//! - **Argument lookup**: the [`Args`] map handed to handlers after a match
//! - **Errors**: [`CompileError`] for malformed patterns and [`ArgsError`] for
//!   strict argument access
//!
//! Matching and dispatch live in `parley-framework`.

pub mod args;
pub mod error;
pub mod grammar;

pub use args::Args;
pub use error::{ArgsError, ArgsResult, CompileError, CompileResult};
pub use grammar::{Element, ElementKind, parse_element, parse_elements};
