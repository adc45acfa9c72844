//! Logging setup for kennel.
//!
//! Logging goes through `tracing`; this module installs the subscriber.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Verbosity level for logging output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Suppress all output except errors.
    Quiet,
    /// Normal output level (info and above).
    #[default]
    Normal,
    /// Verbose output (debug and above), including every dispatched request.
    Verbose,
    /// Very verbose output (trace level), including axum's extractor rejections.
    Trace,
}

impl Verbosity {
    /// Convert verbosity to tracing level filter.
    #[must_use]
    pub fn to_level_filter(&self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Default filter directives for this verbosity.
    #[must_use]
    pub fn filter_directives(&self) -> String {
        let level = self.to_level_filter();
        format!("kennel={level},axum::rejection={level}")
    }
}

/// Initialize the logging system.
///
/// Call once at startup. `RUST_LOG`, when set, takes precedence over
/// `verbosity`.
///
/// # Examples
///
/// ```no_run
/// use kennel::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::Verbose);
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.filter_directives()));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false),
    );

    // Ignore the error if a subscriber is already installed
    let _ = subscriber.try_init();
}

/// Initialize logging for tests.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}
