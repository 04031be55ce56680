//! Error types for the Parley core.
//!
//! Pattern authoring mistakes surface as [`CompileError`] when a pattern is
//! compiled. Dispatch-level errors live in `parley-framework`.

use thiserror::Error;

// =============================================================================
// Compile Errors
// =============================================================================

/// Errors produced while compiling a pattern string.
///
/// All variants are terminal for the pattern being compiled: no pattern is
/// produced. Patterns are normally static, so callers usually treat these as
/// startup failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// A raw element was empty (empty pattern or doubled space).
    #[error("empty element at position {position}")]
    EmptyElement {
        /// Zero-based position of the empty element.
        position: usize,
    },

    /// A value element opened with `{` but never closed.
    #[error("missing closing bracket in element '{element}'")]
    MissingClosingBracket {
        /// The raw element text.
        element: String,
    },

    /// A token element ended with `}` without an opening `{`.
    #[error("missing opening bracket in element '{element}'")]
    MissingOpeningBracket {
        /// The raw element text.
        element: String,
    },

    /// A value element had no key between its brackets.
    #[error("missing key name in element '{element}'")]
    MissingKeyName {
        /// The raw element text.
        element: String,
    },

    /// Two elements of the same pattern share a key.
    #[error("key names must be unique: '{key}' appears more than once")]
    DuplicateKey {
        /// The repeated key.
        key: String,
    },

    /// The pattern was built without a handler.
    #[error("pattern '{pattern}' has no handler")]
    InvalidHandler {
        /// The pattern source text.
        pattern: String,
    },
}

impl CompileError {
    /// Creates a missing closing bracket error.
    pub fn missing_closing_bracket(element: impl Into<String>) -> Self {
        Self::MissingClosingBracket {
            element: element.into(),
        }
    }

    /// Creates a missing opening bracket error.
    pub fn missing_opening_bracket(element: impl Into<String>) -> Self {
        Self::MissingOpeningBracket {
            element: element.into(),
        }
    }

    /// Creates a missing key name error.
    pub fn missing_key_name(element: impl Into<String>) -> Self {
        Self::MissingKeyName {
            element: element.into(),
        }
    }

    /// Creates a duplicate key error.
    pub fn duplicate_key(key: impl Into<String>) -> Self {
        Self::DuplicateKey { key: key.into() }
    }

    /// Creates an invalid handler error.
    pub fn invalid_handler(pattern: impl Into<String>) -> Self {
        Self::InvalidHandler {
            pattern: pattern.into(),
        }
    }
}

/// Result type for pattern compilation.
pub type CompileResult<T> = Result<T, CompileError>;

// =============================================================================
// Argument Errors
// =============================================================================

/// Errors raised by the strict accessors of [`Args`](crate::Args).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgsError {
    /// The key was not captured for this match.
    #[error("missing required argument '{key}'")]
    Missing {
        /// The requested key.
        key: String,
    },

    /// The captured value could not be parsed into the requested type.
    #[error("invalid value '{value}' for argument '{key}': {reason}")]
    Invalid {
        /// The requested key.
        key: String,
        /// The captured text.
        value: String,
        /// Parser error message.
        reason: String,
    },
}

/// Result type for strict argument access.
pub type ArgsResult<T> = Result<T, ArgsError>;
