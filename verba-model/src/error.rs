use thiserror::Error;

/// Errors produced by model constructors and validation routines.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid duration: {0}")]
    InvalidDuration(f64),

    #[error("invalid progress value: {0}")]
    InvalidProgress(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
