//! Subscriber setup for request traces
//!
//! The client only emits `tracing` events: `debug!` once per remote action,
//! `trace!` for response status codes and `warn!` for envelopes reporting
//! `success: false`. Binaries and integration tests that want to see them
//! install a stderr subscriber with [`init_logging`].
//!
//! ```no_run
//! use ckan_common::logging::{init_logging, LogConfig};
//! use tracing::Level;
//!
//! fn main() -> anyhow::Result<()> {
//!     init_logging(&LogConfig::new(Level::INFO).with_directives("ckan_client=debug"))
//! }
//! ```

use anyhow::{Context, Result};
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Baseline level for every target
    pub level: Level,
    /// Comma-separated per-target overrides such as `ckan_client=trace`
    pub directives: Option<String>,
    /// Emit JSON lines instead of text
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new(Level::INFO)
    }
}

impl LogConfig {
    pub fn new(level: Level) -> Self {
        Self {
            level,
            directives: None,
            json: false,
        }
    }

    pub fn with_directives(mut self, directives: impl Into<String>) -> Self {
        self.directives = Some(directives.into());
        self
    }
}

/// `RUST_LOG`, then the baseline level, then each configured directive
fn env_filter(config: &LogConfig) -> Result<EnvFilter> {
    let base = EnvFilter::from_default_env().add_directive(config.level.into());

    config
        .directives
        .iter()
        .flat_map(|directives| directives.split(','))
        .map(str::trim)
        .filter(|directive| !directive.is_empty())
        .try_fold(base, |filter, directive| {
            let parsed = directive
                .parse()
                .with_context(|| format!("invalid log directive `{directive}`"))?;
            Ok(filter.add_directive(parsed))
        })
}

/// Install the global subscriber. Fails if one is already set.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let registry = tracing_subscriber::registry().with(env_filter(config)?);

    if config.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()?;
    }

    Ok(())
}
