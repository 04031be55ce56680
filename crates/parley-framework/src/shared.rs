//! A dispatcher that can be registered into and run from several places.
//!
//! [`SharedDispatcher`] keeps the registry behind a read/write lock holding an
//! `Arc<Dispatcher>` snapshot. Registration is copy-on-write: it clones the
//! registry only if a snapshot is still in use. Dispatch takes a snapshot and
//! releases the lock before any handler runs, so a handler may itself register
//! new patterns without deadlocking. Patterns added during a dispatch become
//! visible from the next one.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::dispatcher::{DispatchOutcome, Dispatcher, Resolution};
use crate::error::DispatchResult;
use crate::pattern::Pattern;

/// Cloneable handle to a shared, append-only pattern registry.
#[derive(Clone, Default)]
pub struct SharedDispatcher {
    inner: Arc<RwLock<Arc<Dispatcher>>>,
}

impl SharedDispatcher {
    /// Creates an empty shared dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a pattern.
    pub fn add(&self, pattern: Pattern) {
        let mut guard = self.inner.write();
        Arc::make_mut(&mut guard).add(pattern);
    }

    /// Registers several patterns, preserving their order.
    pub fn extend<I: IntoIterator<Item = Pattern>>(&self, patterns: I) {
        let mut guard = self.inner.write();
        Arc::make_mut(&mut guard).extend(patterns);
    }

    /// Returns the current registry snapshot.
    pub fn snapshot(&self) -> Arc<Dispatcher> {
        Arc::clone(&self.inner.read())
    }

    /// Returns the registered patterns in registration order.
    pub fn list(&self) -> Vec<Pattern> {
        self.snapshot().list().to_vec()
    }

    /// Returns the number of registered patterns.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Returns `true` if no pattern is registered.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// See [`Dispatcher::find`].
    pub fn find(&self, line: &str) -> Option<Resolution> {
        self.snapshot().find(line)
    }

    /// Dispatches one input line against the current snapshot.
    pub fn run(&self, line: &str) -> DispatchResult<DispatchOutcome> {
        self.snapshot().run(line)
    }
}

impl From<Dispatcher> for SharedDispatcher {
    fn from(dispatcher: Dispatcher) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(dispatcher))),
        }
    }
}

impl std::fmt::Debug for SharedDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedDispatcher")
            .field("pattern_count", &self.len())
            .finish()
    }
}
