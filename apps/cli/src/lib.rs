//! `doxmd`: Doxygen XML to Markdown.

pub mod config;
pub mod logging;
pub mod pipeline;

pub use config::{Config, LogFormat};
pub use pipeline::{run, RunSummary};
