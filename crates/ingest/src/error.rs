use thiserror::Error;

pub type Result<T> = std::result::Result<T, IngestError>;

/// Typed ingestion failure. Any of these aborts the run; no partial project is produced.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid project path: {0}")]
    InvalidPath(String),

    #[error("Project contains no files")]
    EmptyProject,

    #[error("Project has more than {limit} files")]
    TooManyFiles { limit: usize },

    #[error("Project content exceeds {limit} bytes")]
    TotalSizeExceeded { limit: u64 },

    #[error("Ingestion timed out after {ms} ms")]
    Timeout { ms: u64 },

    #[error("Ingestion cancelled")]
    Cancelled,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid exclude pattern: {0}")]
    Glob(#[from] globset::Error),

    #[error("{0}")]
    Other(String),
}
