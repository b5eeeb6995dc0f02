//! Logging initialization for the `doxmd` binary
//!
//! Logs go to stderr; stdout is reserved for the Markdown document.

use crate::config::{Config, LogFormat};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Workspace crates that receive the configured level.
const CRATES: [&str; 5] = [
    "doxmd",
    "doxmd_cli",
    "doxmd_path",
    "doxmd_index",
    "doxmd_markdown",
];

/// Initialize the global subscriber. `RUST_LOG` takes precedence over `--log-level`.
pub fn init_logging(config: &Config) -> anyhow::Result<()> {
    let env_filter = build_env_filter(&config.log_level);
    let registry = tracing_subscriber::registry().with(env_filter);

    match config.log_format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()?,
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()?,
    }

    tracing::debug!(level = %config.log_level, format = ?config.log_format, "Logging initialized");
    Ok(())
}

fn build_env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(level)))
}

fn default_directives(level: &str) -> String {
    CRATES
        .iter()
        .map(|krate| format!("{krate}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}
