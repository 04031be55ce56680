//! Line-driven runtime.
//!
//! [`ParleyRuntime`] owns a [`SharedDispatcher`] and feeds it one input line
//! at a time, either from any async reader via [`ParleyRuntime::run_lines`]
//! or from stdin via [`ParleyRuntime::run`].
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use parley_runtime::ParleyRuntime;
//!
//! // Auto-loads parley.toml from the current directory if present
//! let runtime = ParleyRuntime::new();
//!
//! // Custom configuration path
//! let runtime = ParleyRuntime::builder()
//!     .config_file("config/parley.toml")
//!     .build()?;
//!
//! runtime.register(Pattern::new("say {text}", |args: &Args| {
//!     println!("say {}", args.require("text"));
//! })?);
//! runtime.run().await?;
//! ```

use std::borrow::Cow;
use std::path::Path;

use parley_framework::{DispatchError, Pattern, SharedDispatcher};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::{ConfigLoader, ConfigResult, ParleyConfig};
use crate::error::RuntimeResult;
use crate::logging;

/// Counters collected while running the line loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeStats {
    /// Lines handed to the dispatcher. Skipped blank lines are not counted.
    pub lines: usize,
    /// Lines whose pattern handler succeeded.
    pub matched: usize,
    /// Lines no pattern matched.
    pub unmatched: usize,
    /// Lines whose pattern handler failed.
    pub failed: usize,
}

/// The Parley runtime.
///
/// Cloning is cheap and clones share the same registry and shutdown token.
#[derive(Clone)]
pub struct ParleyRuntime {
    config: ParleyConfig,
    dispatcher: SharedDispatcher,
    shutdown: CancellationToken,
}

impl ParleyRuntime {
    /// Creates a runtime from `parley.toml` in the current directory, falling
    /// back to defaults when loading fails.
    pub fn new() -> Self {
        let config = ConfigLoader::new()
            .with_current_dir()
            .load()
            .unwrap_or_else(|e| {
                eprintln!("Warning: Failed to load config ({e}), using defaults");
                ParleyConfig::default()
            });

        Self::from_config(&config)
    }

    /// Creates a runtime builder for custom configuration.
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Creates a runtime from configuration and initializes logging.
    pub fn from_config(config: &ParleyConfig) -> Self {
        logging::init_from_config(&config.logging);

        info!(
            log_level = %config.logging.level,
            log_format = ?config.logging.format,
            "Runtime initialized from configuration"
        );

        Self {
            config: config.clone(),
            dispatcher: SharedDispatcher::new(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Returns the configuration this runtime was built from.
    pub fn config(&self) -> &ParleyConfig {
        &self.config
    }

    /// Returns the pattern registry.
    ///
    /// Clone it into a handler to register patterns while the loop runs.
    pub fn dispatcher(&self) -> &SharedDispatcher {
        &self.dispatcher
    }

    /// Registers a pattern. Patterns are tried in the order they are added.
    pub fn register(&self, pattern: Pattern) {
        self.dispatcher.add(pattern);
    }

    /// Registers several patterns, preserving their order.
    pub fn register_all<I: IntoIterator<Item = Pattern>>(&self, patterns: I) {
        self.dispatcher.extend(patterns);
    }

    /// Returns the number of registered patterns.
    pub fn pattern_count(&self) -> usize {
        self.dispatcher.len()
    }

    /// Returns the token that stops the line loop when cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Stops the line loop after the line currently being dispatched.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Returns whether shutdown has been requested.
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Dispatches every line of `reader` until end of input or shutdown.
    ///
    /// The prompt and the no-match message are written to `writer`. Handler
    /// output is the handler's own business. A handler failure is logged and
    /// counted, and ends the loop with an error only when
    /// `stop_on_handler_error` is set.
    ///
    /// Lines are decoded lossily: invalid UTF-8 becomes U+FFFD and the line is
    /// still dispatched.
    pub async fn run_lines<R, W>(&self, mut reader: R, mut writer: W) -> RuntimeResult<RuntimeStats>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let settings = &self.config.runtime;
        let mut buf = Vec::new();
        let mut stats = RuntimeStats::default();

        loop {
            if self.shutdown.is_cancelled() {
                break;
            }

            if let Some(prompt) = &settings.prompt {
                writer.write_all(prompt.as_bytes()).await?;
                writer.flush().await?;
            }

            buf.clear();
            let read = tokio::select! {
                biased;
                () = self.shutdown.cancelled() => break,
                read = reader.read_until(b'\n', &mut buf) => read?,
            };
            if read == 0 {
                debug!("Input closed");
                break;
            }

            let line = decode_line(&buf);

            if settings.skip_blank_lines && line.trim().is_empty() {
                continue;
            }
            stats.lines += 1;

            match self.dispatcher.run(&line) {
                Ok(_) => stats.matched += 1,
                Err(DispatchError::NoMatch { .. }) => {
                    stats.unmatched += 1;
                    if let Some(message) = &settings.no_match_message {
                        writer.write_all(message.as_bytes()).await?;
                        writer.write_all(b"\n").await?;
                    }
                }
                Err(err @ DispatchError::Handler { .. }) => {
                    stats.failed += 1;
                    if settings.stop_on_handler_error {
                        writer.flush().await?;
                        return Err(err.into());
                    }
                }
            }
        }

        writer.flush().await?;
        info!(
            lines = stats.lines,
            matched = stats.matched,
            unmatched = stats.unmatched,
            failed = stats.failed,
            "Line loop finished"
        );
        Ok(stats)
    }

    /// Runs the line loop over stdin and stdout until end of input, shutdown
    /// or a Ctrl+C / SIGTERM.
    ///
    /// A stdin read that is still pending when the loop stops keeps a blocking
    /// thread alive until the next line arrives.
    pub async fn run(&self) -> RuntimeResult<RuntimeStats> {
        info!(
            patterns = self.pattern_count(),
            "Parley runtime is reading from stdin. Press Ctrl+C to stop."
        );

        let result = self.run_until(wait_for_shutdown()).await;

        info!("Runtime stopped");
        result
    }

    /// Runs the line loop over stdin and stdout until end of input, shutdown
    /// or `shutdown` completing.
    pub async fn run_until<F>(&self, shutdown: F) -> RuntimeResult<RuntimeStats>
    where
        F: Future<Output = ()>,
    {
        let lines = self.run_lines(BufReader::new(tokio::io::stdin()), tokio::io::stdout());
        tokio::pin!(lines);

        tokio::select! {
            result = &mut lines => result,
            () = shutdown => {
                self.shutdown.cancel();
                lines.await
            }
        }
    }
}

impl Default for ParleyRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ParleyRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParleyRuntime")
            .field("pattern_count", &self.pattern_count())
            .field("shutdown", &self.is_shutdown())
            .finish()
    }
}

/// Decodes one raw input line without its line terminator.
fn decode_line(raw: &[u8]) -> Cow<'_, str> {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    let line = String::from_utf8_lossy(raw);
    if let Cow::Owned(_) = line {
        warn!(bytes = raw.len(), "Input line is not valid UTF-8, decoding lossily");
    }
    line
}

/// Waits for Ctrl+C or, on Unix, SIGTERM.
///
/// Never completes if no signal handler can be installed.
async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        use signal::unix::{SignalKind, signal as unix_signal};

        match unix_signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    () = ctrl_c() => {}
                    _ = sigterm.recv() => {
                        info!("Received SIGTERM, shutting down");
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to register SIGTERM handler");
                ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    ctrl_c().await;
}

async fn ctrl_c() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down"),
        Err(e) => {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    }
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for creating a [`ParleyRuntime`] with custom configuration.
///
/// ```rust,ignore
/// let runtime = ParleyRuntime::builder()
///     .config_file("config/parley.toml")
///     .profile("production")
///     .build()?;
/// ```
pub struct RuntimeBuilder {
    config_loader: ConfigLoader,
}

impl RuntimeBuilder {
    /// Creates a builder that searches the current directory.
    pub fn new() -> Self {
        Self {
            config_loader: ConfigLoader::new().with_current_dir(),
        }
    }

    /// Sets a specific configuration file to load.
    pub fn config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.file(path);
        self
    }

    /// Sets the configuration profile (e.g., "development", "production").
    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.config_loader = self.config_loader.profile(profile);
        self
    }

    /// Adds a search path for configuration files.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.search_path(path);
        self
    }

    /// Ignores `PARLEY_*` environment variables.
    pub fn without_env(mut self) -> Self {
        self.config_loader = self.config_loader.without_env();
        self
    }

    /// Merges additional configuration programmatically.
    pub fn merge(mut self, config: ParleyConfig) -> Self {
        self.config_loader = self.config_loader.merge(config);
        self
    }

    /// Loads the configuration and builds the runtime.
    pub fn build(self) -> ConfigResult<ParleyRuntime> {
        let config = self.config_loader.load()?;
        Ok(ParleyRuntime::from_config(&config))
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
