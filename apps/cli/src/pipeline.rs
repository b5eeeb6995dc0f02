//! The conversion run: XML → index → definitions → Markdown

use crate::config::Config;
use anyhow::Context;
use doxmd_index::{write_definitions, CompoundIndex, Resolver};
use doxmd_markdown::MarkdownRenderer;
use doxmd_path::Engine;
use std::fs;
use std::io::{self, Write};
use std::time::Instant;

/// Counts reported after a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub compounds: usize,
    pub definitions: usize,
    pub markdown_bytes: usize,
}

/// Run every stage, writing `index.json` and `defs.json` to the output
/// directory and the Markdown to `--output` or stdout.
pub fn run(config: &Config) -> anyhow::Result<RunSummary> {
    let engine = Engine::default();

    let started = Instant::now();
    let built = CompoundIndex::from_directory(&config.xml_dir).with_context(|| {
        format!(
            "Failed to build compound index from {}",
            config.xml_dir.display()
        )
    })?;
    tracing::info!(
        compounds = built.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Built compound index"
    );

    fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("Failed to create {}", config.out_dir.display()))?;
    let started = Instant::now();
    let index = built
        .persist(&config.out_dir)
        .context("Failed to write compound index")?;
    tracing::info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Persisted compound index"
    );

    let started = Instant::now();
    let defs = resolver(config, engine.clone())
        .definitions(index.root())
        .context("Failed to resolve definitions")?;
    let defs_path = write_definitions(&defs, &config.out_dir)
        .context("Failed to write definition records")?;
    tracing::info!(
        definitions = defs.len(),
        path = %defs_path.display(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Resolved definitions"
    );

    let started = Instant::now();
    let markdown = MarkdownRenderer::new(engine)
        .render(&defs)
        .context("Failed to render Markdown")?;
    write_markdown(config, &markdown)?;
    tracing::info!(
        bytes = markdown.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Rendered Markdown"
    );

    Ok(RunSummary {
        compounds: index.len(),
        definitions: defs.len(),
        markdown_bytes: markdown.len(),
    })
}

fn resolver(config: &Config, engine: Engine) -> Resolver {
    let resolver =
        Resolver::new(engine, config.namespace.as_str()).with_header(config.header.clone());
    match config.jobs {
        Some(jobs) => resolver.with_workers(jobs),
        None => resolver,
    }
}

fn write_markdown(config: &Config, markdown: &str) -> anyhow::Result<()> {
    match &config.output {
        Some(path) => fs::write(path, markdown)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(markdown.as_bytes())
                .and_then(|()| stdout.flush())
                .context("Failed to write Markdown to stdout")
        }
    }
}
