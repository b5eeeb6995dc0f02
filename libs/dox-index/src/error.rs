use doxmd_format::FormatError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to convert {}: {source}", .path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: FormatError,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid query: {0}")]
    Query(#[from] doxmd_path::Error),
    #[error("No public header (a file compound named *.h) found in the index")]
    NoPublicHeader,
    #[error("Ambiguous public header, candidates: {}; pick one with --header", .0.join(", "))]
    AmbiguousPublicHeader(Vec<String>),
    #[error("Header '{0}' is not among the public header candidates")]
    HeaderNotFound(String),
    #[error("A resolver worker panicked")]
    WorkerPanicked,
}

pub type IndexResult<T> = Result<T, IndexError>;

impl IndexError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
