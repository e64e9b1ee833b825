//! Tracing subscriber setup.
//!
//! Output format is chosen by `BCZ_LOG_FORMAT`:
//!
//! - `text` (default): flat `tracing-subscriber` lines
//! - `tree`: indented span hierarchy via `tracing-tree`
//! - `json`: one JSON object per event
//!
//! ```bash
//! BCZ_LOG=debug BCZ_LOG_FORMAT=tree bcz main.json
//! BCZ_LOG="bcz_semantics=trace,bcz_checker=trace" bcz main.json
//! ```
//!
//! Nothing is installed unless `BCZ_LOG` or `RUST_LOG` is set.

use std::str::FromStr;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

pub const LOG_ENV: &str = "BCZ_LOG";
pub const LOG_FORMAT_ENV: &str = "BCZ_LOG_FORMAT";
const FALLBACK_LOG_ENV: &str = "RUST_LOG";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Tree,
    Json,
}

impl FromStr for LogFormat {
    type Err = std::convert::Infallible;

    /// Unrecognized values fall back to `Text`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(match value.trim().to_ascii_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        })
    }
}

/// Resolved logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    pub directives: String,
    pub format: LogFormat,
}

impl TracingConfig {
    /// Read settings from the process environment.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings from an arbitrary variable lookup.
    ///
    /// `BCZ_LOG` wins over `RUST_LOG`. Returns `None` when neither is set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let directives = lookup(LOG_ENV).or_else(|| lookup(FALLBACK_LOG_ENV))?;
        let format = lookup(LOG_FORMAT_ENV)
            .and_then(|value| value.parse().ok())
            .unwrap_or_default();
        Some(Self { directives, format })
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::builder().parse_lossy(&self.directives)
    }
}

/// Install the global subscriber when logging was requested.
///
/// All output goes to stderr; stdout carries diagnostics only.
pub fn init_tracing() {
    if let Some(config) = TracingConfig::from_env() {
        install(&config);
    }
}

/// Install a subscriber for `config`, returning whether it became the global one.
///
/// A subscriber installed by an embedding program takes precedence.
pub(crate) fn install(config: &TracingConfig) -> bool {
    let filter = config.filter();

    let installed = match config.format {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::new(2)
                .with_writer(std::io::stderr)
                .with_indent_lines(true)
                .with_targets(true);
            Registry::default().with(filter).with(tree_layer).try_init()
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default().with(filter).with(json_layer).try_init()
        }
        LogFormat::Text => {
            let text_layer = fmt::layer().with_writer(std::io::stderr);
            Registry::default().with(filter).with(text_layer).try_init()
        }
    };
    match installed {
        Ok(()) => true,
        Err(error) => {
            tracing::debug!(%error, "keeping the already installed global subscriber");
            false
        }
    }
}
