//! Line dispatcher for the Parley framework.
//!
//! This module provides the [`Dispatcher`], which holds compiled patterns and
//! routes each input line to the first one that matches.
//!
//! # Registration-order Dispatch
//!
//! When a line is dispatched:
//!
//! 1. The line is trimmed and split into words
//! 2. Patterns are tried in registration order
//! 3. The first pattern that matches has its handler invoked, and dispatch stops
//! 4. If nothing matches, [`DispatchError::NoMatch`] is returned
//!
//! Registration order is the only tie-break. A general pattern registered
//! before a more specific one shadows it:
//!
//! ```rust,ignore
//! use parley_framework::{Args, Dispatcher, Pattern};
//!
//! let mut dispatcher = Dispatcher::new();
//! dispatcher.add(Pattern::new("say {text}", |args: &Args| {
//!     println!("say {}", args.require("text"));
//! })?);
//! dispatcher.add(Pattern::new("say {text?}", || println!("Usage: say <text>"))?);
//!
//! dispatcher.run("say hello world")?; // first pattern, text = "hello world"
//! dispatcher.run("say")?;             // second pattern, text absent
//! ```

use tracing::{Level, debug, error, span, trace};

use parley_core::Args;

use crate::error::{DispatchError, DispatchResult};
use crate::matcher::match_elements;
use crate::pattern::Pattern;
use crate::split::split_line;

/// The pattern chosen for an input line, without invoking its handler.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Registration index of the matched pattern.
    pub index: usize,
    /// The matched pattern.
    pub pattern: Pattern,
    /// Values captured from the line.
    pub args: Args,
}

/// Outcome of a successful dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Registration index of the matched pattern.
    pub index: usize,
    /// Source text of the matched pattern.
    pub pattern: String,
}

/// An ordered, append-only registry of patterns.
///
/// Mutation requires `&mut self`, so a plain `Dispatcher` cannot be modified
/// while it is dispatching. Use [`SharedDispatcher`](crate::SharedDispatcher)
/// when registration and dispatch must happen from different places.
#[derive(Default, Clone)]
pub struct Dispatcher {
    /// The registered patterns, in registration order.
    patterns: Vec<Pattern>,
}

impl Dispatcher {
    /// Creates a new, empty dispatcher.
    pub fn new() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    /// Registers a pattern.
    ///
    /// Patterns are tried in the order they are added.
    pub fn add(&mut self, pattern: Pattern) {
        debug!(pattern = %pattern, index = self.patterns.len(), "Registered pattern");
        self.patterns.push(pattern);
    }

    /// Registers a pattern (builder pattern).
    pub fn with(mut self, pattern: Pattern) -> Self {
        self.add(pattern);
        self
    }

    /// Registers several patterns, preserving their order.
    pub fn extend<I: IntoIterator<Item = Pattern>>(&mut self, patterns: I) {
        for pattern in patterns {
            self.add(pattern);
        }
    }

    /// Returns the registered patterns in registration order.
    pub fn list(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Returns the number of registered patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns `true` if no pattern is registered.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Finds the pattern that `line` resolves to, without invoking any handler.
    pub fn find(&self, line: &str) -> Option<Resolution> {
        let words = split_line(line);

        self.patterns.iter().enumerate().find_map(|(index, pattern)| {
            let args = match_elements(pattern.elements(), &words);
            trace!(
                pattern = %pattern,
                index,
                matched = args.is_some(),
                "Tried pattern"
            );
            args.map(|args| Resolution {
                index,
                pattern: pattern.clone(),
                args,
            })
        })
    }

    /// Dispatches one input line.
    ///
    /// Invokes the handler of the first matching pattern exactly once. A
    /// handler failure is returned as [`DispatchError::Handler`].
    pub fn run(&self, line: &str) -> DispatchResult<DispatchOutcome> {
        let input = line.trim();
        let span = span!(Level::DEBUG, "dispatch", input = %input);
        let _enter = span.enter();

        let Some(resolution) = self.find(input) else {
            debug!(patterns = self.patterns.len(), "No pattern matched");
            return Err(DispatchError::NoMatch {
                input: input.to_string(),
            });
        };

        let Resolution {
            index,
            pattern,
            args,
        } = resolution;

        debug!(
            pattern = %pattern,
            index,
            captured = args.len(),
            "Pattern matched, invoking handler"
        );

        if let Err(source) = pattern.invoke(&args) {
            error!(pattern = %pattern, error = %source, "Handler failed");
            return Err(DispatchError::Handler {
                pattern: pattern.source().to_string(),
                source,
            });
        }

        Ok(DispatchOutcome {
            index,
            pattern: pattern.source().to_string(),
        })
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("pattern_count", &self.patterns.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::Mutex;

    use crate::error::HandlerError;

    type Log = Arc<Mutex<Vec<(usize, Option<String>)>>>;

    /// A pattern whose handler records its id and the captured `key`.
    fn recording(source: &str, id: usize, key: &'static str, log: &Log) -> Pattern {
        let log = Arc::clone(log);
        Pattern::new(source, move |args: &Args| {
            log.lock().push((id, args.get(key).map(str::to_string)));
        })
        .unwrap()
    }

    #[test]
    fn test_dispatch_no_patterns() {
        let dispatcher = Dispatcher::new();
        let err = dispatcher.run("say hi").unwrap_err();
        assert!(err.is_no_match());
    }

    #[test]
    fn test_say_falls_through_to_optional() {
        let log = Log::default();
        let dispatcher = Dispatcher::new()
            .with(recording("say {text}", 0, "text", &log))
            .with(recording("say {text?}", 1, "text", &log));

        let outcome = dispatcher.run("say hello world").unwrap();
        assert_eq!(outcome.index, 0);
        assert_eq!(outcome.pattern, "say {text}");

        let outcome = dispatcher.run("say").unwrap();
        assert_eq!(outcome.index, 1);

        assert_eq!(
            *log.lock(),
            vec![(0, Some("hello world".to_string())), (1, None)]
        );
    }

    #[test]
    fn test_tokens_only_pattern() {
        let log = Log::default();
        let mut dispatcher = Dispatcher::new();
        dispatcher.add(recording("hi lol", 0, "unused", &log));

        assert!(dispatcher.run("hi lol").is_ok());
        assert!(dispatcher.run("hi").unwrap_err().is_no_match());
        assert!(dispatcher.run("hi there").unwrap_err().is_no_match());
        assert_eq!(*log.lock(), vec![(0, None)]);
    }

    #[test]
    fn test_registration_order_wins_over_specificity() {
        // "a b" is a literal match for the second pattern, but the first one
        // is registered earlier and structurally satisfied.
        let log = Log::default();
        let dispatcher = Dispatcher::new()
            .with(recording("a {x}", 0, "x", &log))
            .with(recording("a b", 1, "x", &log));

        let outcome = dispatcher.run("a b").unwrap();
        assert_eq!(outcome.index, 0);
        assert_eq!(*log.lock(), vec![(0, Some("b".to_string()))]);
    }

    #[test]
    fn test_tokens_only_pattern_ignores_trailing_words() {
        let log = Log::default();
        let dispatcher = Dispatcher::new()
            .with(recording("hi lol", 0, "x", &log))
            .with(recording("hi {x}", 1, "x", &log));

        let outcome = dispatcher.run("hi lol extra").unwrap();
        assert_eq!(outcome.index, 0);
        assert_eq!(outcome.pattern, "hi lol");

        let outcome = dispatcher.run("hi there").unwrap();
        assert_eq!(outcome.index, 1);

        assert_eq!(
            *log.lock(),
            vec![(0, None), (1, Some("there".to_string()))]
        );
    }

    #[test]
    fn test_run_is_idempotent() {
        let log = Log::default();
        let dispatcher = Dispatcher::new()
            .with(recording("say {text}", 0, "text", &log))
            .with(recording("say {text?}", 1, "text", &log));

        let first = dispatcher.run("say hello world").unwrap();
        let second = dispatcher.run("say hello world").unwrap();
        assert_eq!(first, second);

        let log = log.lock();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0], log[1]);
    }

    #[test]
    fn test_handler_invoked_exactly_once() {
        let counter = Arc::new(AtomicUsize::new(0));
        let c1 = Arc::clone(&counter);
        let c2 = Arc::clone(&counter);

        let dispatcher = Dispatcher::new()
            .with(
                Pattern::new("go {where}", move || {
                    c1.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap(),
            )
            .with(
                Pattern::new("go {where?}", move || {
                    c2.fetch_add(10, Ordering::SeqCst);
                })
                .unwrap(),
            );

        dispatcher.run("go north").unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_handler_failure_is_dispatch_error() {
        let dispatcher = Dispatcher::new().with(
            Pattern::new("fail {why}", |args: &Args| -> Result<(), String> {
                Err(format!("because {}", args.require("why")))
            })
            .unwrap(),
        );

        let err = dispatcher.run("fail now").unwrap_err();
        assert_eq!(
            err,
            DispatchError::Handler {
                pattern: "fail {why}".to_string(),
                source: HandlerError::new("because now"),
            }
        );
        assert!(!err.is_no_match());
    }

    #[test]
    fn test_find_does_not_invoke() {
        let counter = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&counter);
        let dispatcher = Dispatcher::new().with(
            Pattern::new("say {text}", move || {
                c.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap(),
        );

        let resolution = dispatcher.find("  say hi  ").unwrap();
        assert_eq!(resolution.index, 0);
        assert_eq!(resolution.pattern.source(), "say {text}");
        assert_eq!(resolution.args.get("text"), Some("hi"));
        assert!(dispatcher.find("yell hi").is_none());
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_list_preserves_order() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.extend([
            Pattern::new("b", || ()).unwrap(),
            Pattern::new("a", || ()).unwrap(),
        ]);

        let sources: Vec<_> = dispatcher.list().iter().map(Pattern::source).collect();
        assert_eq!(sources, vec!["b", "a"]);
        assert_eq!(dispatcher.len(), 2);
        assert!(!dispatcher.is_empty());
    }

    #[test]
    fn test_no_match_reports_trimmed_input() {
        let dispatcher = Dispatcher::new();
        assert_eq!(
            dispatcher.run("  nope \n").unwrap_err(),
            DispatchError::NoMatch {
                input: "nope".to_string()
            }
        );
    }
}
