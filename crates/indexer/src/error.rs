use owlset_graph::{GraphError, StoreError};
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexerError>;

/// Failures that abort a scan
#[derive(Error, Debug)]
pub enum IndexerError {
    #[error("Repository root does not exist or is not a directory: {}", .0.display())]
    MissingRepositoryRoot(PathBuf),

    #[error("Repository root {} is not readable: {source}", .path.display())]
    UnreadableRepositoryRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Graph store error: {0}")]
    Store(#[from] StoreError),
}

/// Why a single file was left out of the graph. Never aborts a scan.
#[derive(Error, Debug)]
pub(crate) enum FileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Graph(#[from] GraphError),
}
