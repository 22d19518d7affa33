//! User settings for highlighting.
//!
//! Settings files are YAML; since YAML is a superset of JSON, JSON settings files load too.
//!
//! ```yaml
//! opacity: 0.4
//! textColor: "#222222"
//! colors:
//!   g1: "#ffeeaa"
//! definitionsPath: ./grades.json
//! debounceMs: 120
//! ```

use kanji_grade_core::{GradeDefinitions, GradeKey, load_definitions};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default debounce delay between the last edit and the rescan.
pub const DEFAULT_DEBOUNCE_MS: u64 = 80;

/// Default background opacity.
pub const DEFAULT_OPACITY: f32 = 0.6;

/// Default text color drawn over highlighted characters.
pub const DEFAULT_TEXT_COLOR: &str = "#000000";

#[derive(Debug, Error)]
/// Errors produced while loading settings.
pub enum SettingsError {
    #[error("YAML parse error: {0}")]
    /// The settings document is malformed.
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    /// Reading the settings file failed.
    Io(#[from] std::io::Error),
}

/// Highlighting settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HighlightSettings {
    /// Background opacity (clamped to `0.0..=1.0` by [`HighlightSettings::opacity`]).
    pub opacity: f32,
    /// Text color drawn over highlighted characters; blank disables the overlay.
    pub text_color: Option<String>,
    /// Per-grade color overrides.
    pub colors: BTreeMap<GradeKey, String>,
    /// Optional grade definitions resource. The bundled set is used when unset.
    pub definitions_path: Option<PathBuf>,
    /// Debounce delay in milliseconds.
    pub debounce_ms: u64,
}

impl Default for HighlightSettings {
    fn default() -> Self {
        Self {
            opacity: DEFAULT_OPACITY,
            text_color: Some(DEFAULT_TEXT_COLOR.to_string()),
            colors: BTreeMap::new(),
            definitions_path: None,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl HighlightSettings {
    /// Parse settings from YAML (or JSON).
    pub fn from_yaml_str(text: &str) -> Result<Self, SettingsError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load settings from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&text)
    }

    /// Load settings from a file, falling back to defaults on any error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!(
                    "Failed to load settings from {}: {}, using defaults",
                    path.display(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Opacity clamped to `0.0..=1.0` (`NaN` reads as the default).
    pub fn opacity(&self) -> f32 {
        if self.opacity.is_nan() {
            return DEFAULT_OPACITY;
        }
        self.opacity.clamp(0.0, 1.0)
    }

    /// Trimmed text color, or `None` when unset or blank.
    pub fn text_color(&self) -> Option<&str> {
        self.text_color
            .as_deref()
            .map(str::trim)
            .filter(|color| !color.is_empty())
    }

    /// Color for `grade`: a non-blank override, else `fallback`.
    pub fn color_for<'a>(&'a self, grade: GradeKey, fallback: &'a str) -> &'a str {
        self.colors
            .get(&grade)
            .map(|color| color.trim())
            .filter(|color| !color.is_empty())
            .unwrap_or(fallback)
    }

    /// Debounce delay.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Grade definitions selected by these settings.
    pub fn load_definitions(&self) -> GradeDefinitions {
        match &self.definitions_path {
            Some(path) => load_definitions(path),
            None => GradeDefinitions::builtin(),
        }
    }
}
