//! Deck file recognition.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckFormat {
    Radioss,
    LsDyna,
    Unknown,
}

/// True for `.rad`, `.key` and `.k` files (case-insensitive).
pub fn is_deck_path(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "rad" | "key" | "k"))
        .unwrap_or(false)
}

/// Scans lines until a format signature is found.
pub fn detect_format<R: BufRead>(reader: R) -> io::Result<DeckFormat> {
    for line in reader.split(b'\n') {
        let line = line?;
        let line = String::from_utf8_lossy(&line);
        if line.contains("#RADIOSS") || line.contains("/BEGIN") {
            return Ok(DeckFormat::Radioss);
        }
        if line.contains("*KEYWORD") {
            return Ok(DeckFormat::LsDyna);
        }
    }
    Ok(DeckFormat::Unknown)
}

pub fn detect_file_format(path: impl AsRef<Path>) -> io::Result<DeckFormat> {
    detect_format(BufReader::new(File::open(path)?))
}
