//! Command-line configuration
//!
//! Every flag can also be set through a `DOXMD_*` environment variable.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "doxmd", version)]
#[command(about = "Convert Doxygen XML output into a single Markdown API reference")]
pub struct Config {
    /// Namespace prefix; only symbols starting with it are documented (groups excepted)
    #[arg(long = "ns", env = "DOXMD_NAMESPACE", default_value = "")]
    pub namespace: String,

    /// Directory holding the Doxygen XML output
    #[arg(long, env = "DOXMD_XML_DIR", default_value = "xml")]
    pub xml_dir: PathBuf,

    /// Directory receiving index.json and defs.json
    #[arg(long, env = "DOXMD_OUT_DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Markdown destination (stdout when omitted)
    #[arg(long, env = "DOXMD_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Public header to document when several candidates exist (e.g. foo.h)
    #[arg(long, env = "DOXMD_HEADER")]
    pub header: Option<String>,

    /// Resolver worker threads (defaults to the host parallelism)
    #[arg(long, env = "DOXMD_JOBS")]
    pub jobs: Option<usize>,

    /// Default log level, overridden by RUST_LOG
    #[arg(long, env = "DOXMD_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Log output format
    #[arg(long, value_enum, env = "DOXMD_LOG_FORMAT", default_value = "text")]
    pub log_format: LogFormat,
}

impl Config {
    /// Reject settings that would fail halfway through a run.
    pub fn validate(&self) -> Result<(), String> {
        if self.jobs == Some(0) {
            return Err("--jobs must be at least 1".to_string());
        }
        if !self.xml_dir.is_dir() {
            return Err(format!(
                "XML directory {} does not exist",
                self.xml_dir.display()
            ));
        }
        Ok(())
    }
}
