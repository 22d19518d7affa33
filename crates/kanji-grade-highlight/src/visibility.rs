//! Persistence of per-grade visibility across sessions.

use kanji_grade_core::GradeVisibility;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced by a [`VisibilityStore`].
pub enum VisibilityError {
    #[error("I/O error: {0}")]
    /// Reading or writing the backing file failed.
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    /// The stored state is malformed.
    Json(#[from] serde_json::Error),
}

/// Where per-grade visibility is kept between sessions.
pub trait VisibilityStore {
    /// Stored visibility, or `None` if nothing was saved yet.
    fn load(&self) -> Result<Option<GradeVisibility>, VisibilityError>;

    /// Persist `visibility`.
    fn save(&mut self, visibility: &GradeVisibility) -> Result<(), VisibilityError>;
}

/// In-memory store (state lives as long as the store).
#[derive(Debug, Clone, Default)]
pub struct MemoryVisibilityStore {
    stored: Option<GradeVisibility>,
}

impl MemoryVisibilityStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `visibility`.
    pub fn with_visibility(visibility: GradeVisibility) -> Self {
        Self {
            stored: Some(visibility),
        }
    }

    /// The stored value.
    pub fn stored(&self) -> Option<&GradeVisibility> {
        self.stored.as_ref()
    }
}

impl VisibilityStore for MemoryVisibilityStore {
    fn load(&self) -> Result<Option<GradeVisibility>, VisibilityError> {
        Ok(self.stored)
    }

    fn save(&mut self, visibility: &GradeVisibility) -> Result<(), VisibilityError> {
        self.stored = Some(*visibility);
        Ok(())
    }
}

/// Store backed by a JSON file (`{"g1": true, ...}`).
#[derive(Debug, Clone)]
pub struct JsonFileVisibilityStore {
    path: PathBuf,
}

impl JsonFileVisibilityStore {
    /// Store at `path`. The file is created on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl VisibilityStore for JsonFileVisibilityStore {
    fn load(&self) -> Result<Option<GradeVisibility>, VisibilityError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_str(&text)?))
    }

    fn save(&mut self, visibility: &GradeVisibility) -> Result<(), VisibilityError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(visibility)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}
