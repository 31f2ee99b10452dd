//! Shared tracing configuration utilities for the prism workspace.
//!
//! The helpers in this crate centralise how integration tests, benches,
//! and supporting tools install `tracing` subscribers. Routing setup
//! through a single crate keeps the logging surface consistent instead of
//! copy-pasting builder logic.

use std::env;

pub use tracing::{debug, error, info, trace, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Output format for the formatter layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TracingOutput {
    /// Human-oriented multi-line output.
    Pretty,
    /// Single-line output suited to log collection.
    Compact,
}

/// Configuration describing how the shared tracing subscriber should behave.
#[derive(Clone, Debug)]
pub struct TracingConfig {
    /// Optional tracing directives (e.g. `prism_core=debug,info`). When
    /// absent the crate falls back to `RUST_LOG` and finally to
    /// `default_directive`.
    pub directives: Option<String>,
    /// Fallback directive used when neither `directives` nor `RUST_LOG`
    /// resolve to a valid filter.
    pub default_directive: String,
    /// Controls whether event targets (module paths) appear in output.
    pub include_targets: bool,
    /// Controls ANSI formatting. Disable for CI logs that strip colour codes.
    pub ansi: bool,
    /// Output format for the formatter layer.
    pub output: TracingOutput,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self::for_local()
    }
}

impl TracingConfig {
    /// Returns a configuration tuned for local development (pretty, ANSI-enabled output).
    pub fn for_local() -> Self {
        Self {
            directives: None,
            default_directive: "info".to_string(),
            include_targets: true,
            ansi: true,
            output: TracingOutput::Pretty,
        }
    }

    /// Returns a configuration tuned for CI or log collection environments (compact, no ANSI).
    pub fn for_ci() -> Self {
        Self {
            directives: None,
            default_directive: "info".to_string(),
            include_targets: true,
            ansi: false,
            output: TracingOutput::Compact,
        }
    }

    fn filter(&self) -> EnvFilter {
        let directives = self
            .directives
            .clone()
            .or_else(|| env::var("RUST_LOG").ok())
            .unwrap_or_else(|| self.default_directive.clone());
        EnvFilter::try_new(directives)
            .unwrap_or_else(|_| EnvFilter::new(self.default_directive.clone()))
    }

    /// Install the subscriber described by this configuration.
    ///
    /// Returns an error if a global subscriber is already set.
    pub fn try_init(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let builder = fmt()
            .with_env_filter(self.filter())
            .with_target(self.include_targets)
            .with_ansi(self.ansi);
        match self.output {
            TracingOutput::Pretty => builder.pretty().try_init(),
            TracingOutput::Compact => builder.compact().try_init(),
        }
    }

    /// Install the subscriber, ignoring an already-installed one.
    pub fn init(&self) {
        let _ = self.try_init();
    }
}

/// Install the local-development subscriber, tolerating repeat calls.
///
/// Intended for `#[test]` bodies, where several tests race to initialise
/// logging in one process.
pub fn init_for_tests() {
    TracingConfig::for_local().init();
}
