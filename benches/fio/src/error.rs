use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("No result directories matching {pattern:?} found in {}", root.display())]
    NoResults { root: PathBuf, pattern: String },
    #[error("Could not parse {}", path.display())]
    MalformedDocument {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("I/O error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
