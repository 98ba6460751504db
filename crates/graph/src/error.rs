use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Language setup failed: {0}")]
    Language(String),
}

/// Failures raised by a [`crate::GraphStore`] backend.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store backend error: {0}")]
    Backend(String),

    #[error("Store lock poisoned")]
    LockPoisoned,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
