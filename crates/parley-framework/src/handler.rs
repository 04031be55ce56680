//! Handler system for the Parley framework.
//!
//! A handler is whatever runs once a pattern has matched. Handlers are plain
//! closures or functions; the [`Handler`] trait is implemented for them through
//! blanket implementations, so no registration macro is needed.
//!
//! # Example
//!
//! ```rust,ignore
//! use parley_framework::{Args, Pattern};
//!
//! // Receives the captured arguments
//! fn say(args: &Args) {
//!     println!("say {}", args.require("text"));
//! }
//!
//! // Ignores the arguments
//! fn usage() {
//!     println!("Usage: say <text>");
//! }
//!
//! // Reports failure through its return value
//! fn repeat(args: &Args) -> Result<(), std::num::ParseIntError> {
//!     let times: usize = args.require("times").parse()?;
//!     println!("{}", "hi ".repeat(times));
//!     Ok(())
//! }
//! ```

use std::fmt::Display;
use std::marker::PhantomData;
use std::sync::Arc;

use parley_core::Args;

use crate::error::{HandlerError, HandlerResult};

// ============================================================================
// HandleResponse - Handle handler return values
// ============================================================================

/// A trait for types that can be returned from a handler.
pub trait HandleResponse {
    /// Converts the return value into a handler result.
    fn into_result(self) -> HandlerResult;
}

/// Implementation for `()` - the handler always succeeds.
impl HandleResponse for () {
    fn into_result(self) -> HandlerResult {
        Ok(())
    }
}

/// Implementation for `Result<T, E>` - `Err` becomes a [`HandlerError`].
impl<T: HandleResponse, E: Display> HandleResponse for Result<T, E> {
    fn into_result(self) -> HandlerResult {
        match self {
            Ok(t) => t.into_result(),
            Err(e) => Err(HandlerError::new(e.to_string())),
        }
    }
}

/// Implementation for `Option<T>` - `None` counts as success.
impl<T: HandleResponse> HandleResponse for Option<T> {
    fn into_result(self) -> HandlerResult {
        match self {
            Some(t) => t.into_result(),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Handler Trait
// ============================================================================

/// The core trait for pattern handlers.
///
/// The type parameter `T` only disambiguates the blanket implementations:
///
/// - `Fn(&Args) -> R` receives the captured arguments
/// - `Fn() -> R` ignores them
///
/// where `R` implements [`HandleResponse`].
pub trait Handler<T>: Send + Sync + 'static {
    /// Invokes the handler with the arguments captured by a match.
    fn call(&self, args: &Args) -> HandlerResult;
}

impl<F, R> Handler<(Args, R)> for F
where
    F: Fn(&Args) -> R + Send + Sync + 'static,
    R: HandleResponse + 'static,
{
    fn call(&self, args: &Args) -> HandlerResult {
        (self)(args).into_result()
    }
}

impl<F, R> Handler<((), R)> for F
where
    F: Fn() -> R + Send + Sync + 'static,
    R: HandleResponse + 'static,
{
    fn call(&self, _args: &Args) -> HandlerResult {
        (self)().into_result()
    }
}

// ============================================================================
// BoxedHandler - Type-erased handler stored in patterns
// ============================================================================

/// Type-erased handler trait for dynamic dispatch.
pub trait ErasedHandler: Send + Sync {
    /// Invokes the handler with the given arguments.
    fn call(&self, args: &Args) -> HandlerResult;
}

/// A type-erased handler that can be stored in a pattern.
pub type BoxedHandler = Arc<dyn ErasedHandler>;

/// Wraps a [`Handler`] so it can be stored behind [`ErasedHandler`].
pub struct HandlerFn<F, T> {
    f: F,
    _marker: PhantomData<fn() -> T>,
}

impl<F, T> HandlerFn<F, T> {
    /// Creates a new handler function wrapper.
    pub fn new(f: F) -> Self {
        Self {
            f,
            _marker: PhantomData,
        }
    }
}

impl<F, T> ErasedHandler for HandlerFn<F, T>
where
    F: Handler<T>,
    T: 'static,
{
    fn call(&self, args: &Args) -> HandlerResult {
        self.f.call(args)
    }
}

/// Converts a handler function into a boxed handler.
pub fn into_handler<F, T>(f: F) -> BoxedHandler
where
    F: Handler<T>,
    T: 'static,
{
    Arc::new(HandlerFn::new(f))
}
