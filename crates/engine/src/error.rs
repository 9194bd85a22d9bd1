use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Project contains no files")]
    EmptyProject,

    #[error("Project has no analyzable files ({files} listed)")]
    NoAnalyzableFiles { files: usize },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
