//! Compiled patterns.
//!
//! A [`Pattern`] pairs the elements parsed from a pattern string with the
//! handler to invoke when the pattern matches. Patterns are immutable once
//! compiled and use an internal `Arc`, so registering the same pattern into
//! several dispatchers is cheap.
//!
//! # Example
//!
//! ```rust,ignore
//! use parley_framework::{Args, Pattern};
//!
//! let say = Pattern::new("say {text}", |args: &Args| {
//!     println!("say {}", args.require("text"));
//! })?;
//!
//! // Builder form, useful when the handler is chosen later
//! let usage = Pattern::builder("say {text?}")
//!     .handler(|| println!("Usage: say <text>"))
//!     .build()?;
//! ```

use std::fmt;
use std::sync::Arc;

use parley_core::{Args, CompileError, CompileResult, Element, parse_elements};
use tracing::debug;

use crate::error::HandlerResult;
use crate::handler::{BoxedHandler, Handler, into_handler};

struct PatternInner {
    /// The pattern string as written.
    source: String,
    /// Parsed elements, in pattern order.
    elements: Vec<Element>,
    /// Invoked on match.
    handler: BoxedHandler,
}

/// A compiled pattern: ordered elements plus a handler.
#[derive(Clone)]
pub struct Pattern {
    inner: Arc<PatternInner>,
}

impl Pattern {
    /// Compiles `source` and attaches `handler`.
    pub fn new<F, T>(source: impl Into<String>, handler: F) -> CompileResult<Self>
    where
        F: Handler<T>,
        T: 'static,
    {
        Self::builder(source).handler(handler).build()
    }

    /// Starts building a pattern from `source`.
    pub fn builder(source: impl Into<String>) -> PatternBuilder {
        PatternBuilder::new(source)
    }

    /// The pattern string this pattern was compiled from.
    pub fn source(&self) -> &str {
        &self.inner.source
    }

    /// The compiled elements, in pattern order.
    pub fn elements(&self) -> &[Element] {
        &self.inner.elements
    }

    /// Looks up an element by key.
    pub fn element(&self, key: &str) -> Option<&Element> {
        self.inner.elements.iter().find(|e| e.key() == key)
    }

    /// Invokes the handler with the captured arguments.
    pub(crate) fn invoke(&self, args: &Args) -> HandlerResult {
        self.inner.handler.call(args)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("source", &self.inner.source)
            .field("elements", &self.inner.elements)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.source)
    }
}

// =============================================================================
// PatternBuilder
// =============================================================================

/// Builder for a [`Pattern`].
///
/// Building without a handler fails with [`CompileError::InvalidHandler`].
pub struct PatternBuilder {
    source: String,
    handler: Option<BoxedHandler>,
}

impl PatternBuilder {
    /// Creates a builder for `source`.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            handler: None,
        }
    }

    /// Sets the handler.
    pub fn handler<F, T>(mut self, f: F) -> Self
    where
        F: Handler<T>,
        T: 'static,
    {
        self.handler = Some(into_handler(f));
        self
    }

    /// Sets a pre-built boxed handler.
    pub fn handler_boxed(mut self, handler: BoxedHandler) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Compiles the pattern.
    pub fn build(self) -> CompileResult<Pattern> {
        let elements = parse_elements(&self.source)?;
        let handler = self
            .handler
            .ok_or_else(|| CompileError::invalid_handler(&self.source))?;

        debug!(
            pattern = %self.source,
            elements = elements.len(),
            "Compiled pattern"
        );

        Ok(Pattern {
            inner: Arc::new(PatternInner {
                source: self.source,
                elements,
                handler,
            }),
        })
    }
}
