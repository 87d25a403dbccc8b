//! Error types for rad-deck

use std::path::PathBuf;

use thiserror::Error;

/// Fatal read failure. Malformed data lines never produce this.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("cannot read {}: {source}", path_label(.path))]
    Io {
        path: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },
}

impl ParseError {
    pub fn from_io(source: std::io::Error, path: Option<PathBuf>) -> Self {
        ParseError::Io { path, source }
    }
}

fn path_label(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => format!("file '{}'", p.display()),
        None => "stream source".to_string(),
    }
}

/// Why a single data line was rejected. Recovered locally by the reader.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    #[error("expected at least {expected} fields, found {found}")]
    TooFewTokens { expected: usize, found: usize },

    #[error("invalid integer '{0}'")]
    InvalidInteger(String),

    #[error("invalid number '{0}'")]
    InvalidReal(String),

    #[error("invalid degree-of-freedom or node token '{0}'")]
    InvalidDof(String),
}
