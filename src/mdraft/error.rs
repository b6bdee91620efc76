use thiserror::Error;

#[derive(Error, Debug)]
pub enum MdraftError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Generation(String),
}

pub type Result<T> = std::result::Result<T, MdraftError>;
