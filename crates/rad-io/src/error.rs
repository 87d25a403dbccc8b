//! Error types for rad-io

use rad_deck::ParseError;
use rad_model::ValidationError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IoError>;

#[derive(Error, Debug)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("File validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Refusing to write invalid model: {0}")]
    InvalidModel(ValidationError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
