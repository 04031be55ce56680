//! # Parley Framework
//!
//! Matching and dispatch for the Parley command dispatcher.
//!
//! This layer provides:
//! - [`Pattern`]: a compiled pattern string plus its handler
//! - [`Handler`]: the handler trait, implemented for plain closures
//! - [`Dispatcher`]: an ordered registry that routes each input line to the
//!   first matching pattern
//! - [`SharedDispatcher`]: a cloneable, lock-protected registry for setups
//!   where patterns are registered while lines are being dispatched
//!
//! ```text
//! "say hello world"
//!          │  split_line
//!          ▼
//! ["say", "hello", "world"]
//!          │  patterns tried in registration order
//!          ▼
//! "say {text}"  →  Args { text: "hello world" }  →  handler(&args)
//! ```

pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod matcher;
pub mod pattern;
pub mod shared;
pub mod split;

pub use dispatcher::{DispatchOutcome, Dispatcher, Resolution};
pub use error::{DispatchError, DispatchResult, HandlerError, HandlerResult};
pub use handler::{BoxedHandler, ErasedHandler, HandleResponse, Handler, HandlerFn, into_handler};
pub use matcher::match_elements;
pub use pattern::{Pattern, PatternBuilder};
pub use shared::SharedDispatcher;
pub use split::split_line;

pub use parley_core::{Args, ArgsError, CompileError, CompileResult, Element, ElementKind};
