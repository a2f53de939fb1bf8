use thiserror::Error;

#[derive(Debug, Error)]
pub enum SsfError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid dimension: {0}")]
    InvalidDimension(String),
    #[error("length mismatch: {0}")]
    LengthMismatch(String),
    #[error("invalid group size: {0}")]
    InvalidGroupSize(String),
    #[error("invalid grid: {0}")]
    InvalidGrid(String),
    #[error("group count mismatch: {0}")]
    GroupCountMismatch(String),
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type SsfResult<T> = Result<T, SsfError>;
