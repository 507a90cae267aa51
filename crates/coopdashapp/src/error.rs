use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoopdashError {
    #[error("Invalid page size: {0} (must be a positive integer)")]
    InvalidPageSize(i64),

    #[error("Invalid criteria: {0}")]
    InvalidCriteria(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] confique::Error),

    #[error("Source error: {0}")]
    Source(String),
}

pub type Result<T> = std::result::Result<T, CoopdashError>;
