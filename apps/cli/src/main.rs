//! doxmd - Doxygen XML to Markdown
//!
//! Usage:
//!   doxmd --ns my_ns_ --xml-dir build/xml --out-dir build > api.md

use anyhow::Context;
use clap::Parser;
use doxmd_cli::{logging, pipeline, Config};

fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    logging::init_logging(&config).context("Failed to initialize logging")?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        namespace = %config.namespace,
        xml_dir = %config.xml_dir.display(),
        "Starting doxmd"
    );

    let summary = pipeline::run(&config)?;

    tracing::info!(
        compounds = summary.compounds,
        definitions = summary.definitions,
        bytes = summary.markdown_bytes,
        "Done"
    );
    Ok(())
}
