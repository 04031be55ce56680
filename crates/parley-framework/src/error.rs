//! Error types for the Parley framework.

use thiserror::Error;

/// Returned by a handler to signal that it failed.
///
/// The dispatcher wraps it in [`DispatchError::Handler`] together with the
/// pattern that was matched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    /// Creates a handler error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The failure message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result type returned by a handler invocation.
pub type HandlerResult = Result<(), HandlerError>;

/// Errors that can occur while dispatching an input line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// No registered pattern matched the input.
    ///
    /// This is a normal negative outcome rather than a fault.
    #[error("no matching query found for '{input}'")]
    NoMatch {
        /// The trimmed input line.
        input: String,
    },

    /// A pattern matched but its handler reported a failure.
    #[error("handler for pattern '{pattern}' failed: {source}")]
    Handler {
        /// Source text of the matched pattern.
        pattern: String,
        /// The handler's error.
        #[source]
        source: HandlerError,
    },
}

impl DispatchError {
    /// Returns `true` for [`DispatchError::NoMatch`].
    pub fn is_no_match(&self) -> bool {
        matches!(self, Self::NoMatch { .. })
    }
}

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;
