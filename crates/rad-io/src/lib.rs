//! File I/O for Radioss-style decks.
//!
//! This crate provides:
//! - **Writer** re-emitting a [`Model`](rad_model::Model) as a deck
//! - **`ModelFile`** load/save/clear entry points with last-error reporting
//! - **Format detection** by extension and content signature
//! - **JSON statistics** reports

pub mod error;
mod file;
pub mod format;
mod report;
pub mod writer;

pub use error::{IoError, Result};
pub use file::ModelFile;
pub use format::{DeckFormat, detect_file_format, detect_format, is_deck_path};
pub use report::{statistics_json, write_statistics};
pub use writer::{WriterOptions, write_model, write_model_file, write_model_string};
