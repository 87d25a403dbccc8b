//! File-level entry points: load, save and clear a model.

use std::io::Write;
use std::path::{Path, PathBuf};

use rad_deck::{DeckReader, Diagnostics, ReadSummary, ReaderOptions, TracingDiagnostics};
use rad_model::Model;

use crate::error::{IoError, Result};
use crate::writer::{WriterOptions, write_model};

/// Owns the model loaded from one deck file.
///
/// `load` and `save` report success as a `bool` and keep a human-readable
/// [`ModelFile::last_error`]; `try_load` and `try_save` return the typed error.
#[derive(Debug)]
pub struct ModelFile<D = TracingDiagnostics> {
    model: Model,
    current_file: Option<PathBuf>,
    last_error: Option<String>,
    last_summary: Option<ReadSummary>,
    reader_options: ReaderOptions,
    writer_options: WriterOptions,
    diagnostics: D,
}

impl ModelFile<TracingDiagnostics> {
    pub fn new() -> Self {
        Self::with_diagnostics(TracingDiagnostics)
    }
}

impl Default for ModelFile<TracingDiagnostics> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Diagnostics> ModelFile<D> {
    pub fn with_diagnostics(diagnostics: D) -> Self {
        Self {
            model: Model::new(),
            current_file: None,
            last_error: None,
            last_summary: None,
            reader_options: ReaderOptions::default(),
            writer_options: WriterOptions::default(),
            diagnostics,
        }
    }

    pub fn reader_options(mut self, options: ReaderOptions) -> Self {
        self.reader_options = options;
        self
    }

    pub fn writer_options(mut self, options: WriterOptions) -> Self {
        self.writer_options = options;
        self
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }

    pub fn diagnostics(&self) -> &D {
        &self.diagnostics
    }

    /// Path of the last successfully loaded or saved deck.
    pub fn current_file(&self) -> Option<&Path> {
        self.current_file.as_deref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn last_summary(&self) -> Option<&ReadSummary> {
        self.last_summary.as_ref()
    }

    pub fn is_valid(&self) -> bool {
        self.model.is_valid()
    }

    pub fn clear(&mut self) {
        self.model.clear();
        self.current_file = None;
        self.last_error = None;
        self.last_summary = None;
    }

    pub fn load(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        match self.try_load(path) {
            Ok(summary) => {
                tracing::info!(
                    path = %path.display(),
                    nodes = self.model.node_count(),
                    elements = self.model.element_count(),
                    rejected = summary.rejected,
                    "deck loaded"
                );
                true
            }
            Err(err) => {
                tracing::error!(path = %path.display(), error = %err, "deck load failed");
                false
            }
        }
    }

    /// Clears the store, reads `path`, rebuilds indexes and bounds, then validates.
    ///
    /// On a validation failure the partially populated model stays in memory
    /// for inspection; call [`ModelFile::clear`] before retrying.
    pub fn try_load(&mut self, path: impl AsRef<Path>) -> Result<ReadSummary> {
        let path = path.as_ref();
        self.clear();

        let result = DeckReader::with_diagnostics(&mut self.diagnostics)
            .options(self.reader_options.clone())
            .read_file(path, &mut self.model);

        let summary = match result {
            Ok(summary) => summary,
            Err(err) => return Err(self.record_error(err.into())),
        };
        self.model.finalize();
        self.last_summary = Some(summary.clone());

        if let Err(err) = self.model.validate() {
            return Err(self.record_error(IoError::Validation(err)));
        }

        self.current_file = Some(path.to_path_buf());
        Ok(summary)
    }

    pub fn save(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        match self.try_save(path) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "deck saved");
                true
            }
            Err(err) => {
                tracing::error!(path = %path.display(), error = %err, "deck save failed");
                false
            }
        }
    }

    /// Writes the model to `path` through a temporary file in the same
    /// directory, so an existing file is only replaced by a complete deck.
    pub fn try_save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Err(err) = self.model.validate() {
            return Err(self.record_error(IoError::InvalidModel(err)));
        }

        if let Err(err) = self.write_atomically(path) {
            return Err(self.record_error(err));
        }

        self.last_error = None;
        self.current_file = Some(path.to_path_buf());
        Ok(())
    }

    fn write_atomically(&self, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        {
            let mut writer = std::io::BufWriter::new(tmp.as_file_mut());
            write_model(&mut writer, &self.model, &self.writer_options)?;
            writer.flush()?;
        }
        tmp.persist(path).map_err(|e| IoError::Io(e.error))?;
        Ok(())
    }

    fn record_error(&mut self, err: IoError) -> IoError {
        self.last_error = Some(err.to_string());
        err
    }
}
