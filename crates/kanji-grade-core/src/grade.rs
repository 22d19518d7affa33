//! Grade keys, grade definitions, and per-grade visibility.
//!
//! A *grade* is the school year in which a kanji is taught (`g1`..`g6` for elementary school,
//! `g7` for junior high school), plus the reserved [`GradeKey::Other`] bucket for Han characters
//! that appear in none of the curated sets.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Identifier of a grade bucket.
///
/// The declaration order is the canonical order: `g1 < g2 < ... < g7 < other`. Everything that
/// iterates grades (index building, dispatch, persistence) uses this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradeKey {
    /// First year of elementary school.
    G1,
    /// Second year of elementary school.
    G2,
    /// Third year of elementary school.
    G3,
    /// Fourth year of elementary school.
    G4,
    /// Fifth year of elementary school.
    G5,
    /// Sixth year of elementary school.
    G6,
    /// Junior high school.
    G7,
    /// Han characters outside every explicit grade set.
    Other,
}

impl GradeKey {
    /// Number of grade keys, including [`GradeKey::Other`].
    pub const COUNT: usize = 8;

    /// Explicit grades (every key except [`GradeKey::Other`]), in canonical order.
    pub const BASE: [GradeKey; 7] = [
        GradeKey::G1,
        GradeKey::G2,
        GradeKey::G3,
        GradeKey::G4,
        GradeKey::G5,
        GradeKey::G6,
        GradeKey::G7,
    ];

    /// All grade keys, in canonical order.
    pub const ALL: [GradeKey; 8] = [
        GradeKey::G1,
        GradeKey::G2,
        GradeKey::G3,
        GradeKey::G4,
        GradeKey::G5,
        GradeKey::G6,
        GradeKey::G7,
        GradeKey::Other,
    ];

    /// Stable string identifier (`"g1"`, ..., `"other"`).
    pub fn as_str(self) -> &'static str {
        match self {
            GradeKey::G1 => "g1",
            GradeKey::G2 => "g2",
            GradeKey::G3 => "g3",
            GradeKey::G4 => "g4",
            GradeKey::G5 => "g5",
            GradeKey::G6 => "g6",
            GradeKey::G7 => "g7",
            GradeKey::Other => "other",
        }
    }

    /// Position of this key in [`GradeKey::ALL`].
    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// Returns `true` for the reserved `other` pseudo-grade.
    pub fn is_other(self) -> bool {
        self == GradeKey::Other
    }

    /// Built-in display label.
    pub fn default_label(self) -> &'static str {
        match self {
            GradeKey::G1 => "1年生の漢字",
            GradeKey::G2 => "2年生の漢字",
            GradeKey::G3 => "3年生の漢字",
            GradeKey::G4 => "4年生の漢字",
            GradeKey::G5 => "5年生の漢字",
            GradeKey::G6 => "6年生の漢字",
            GradeKey::G7 => "中学生の漢字",
            GradeKey::Other => "常用漢字外の漢字",
        }
    }

    /// Built-in short glyph used for icons.
    pub fn default_icon_text(self) -> &'static str {
        match self {
            GradeKey::G1 => "1",
            GradeKey::G2 => "2",
            GradeKey::G3 => "3",
            GradeKey::G4 => "4",
            GradeKey::G5 => "5",
            GradeKey::G6 => "6",
            GradeKey::G7 => "中",
            GradeKey::Other => "外",
        }
    }

    /// Built-in highlight color (`#rrggbb`).
    pub fn default_color(self) -> &'static str {
        match self {
            GradeKey::G1 => "#fffa99",
            GradeKey::G2 => "#ffd199",
            GradeKey::G3 => "#ff9999",
            GradeKey::G4 => "#99ffce",
            GradeKey::G5 => "#a399ff",
            GradeKey::G6 => "#d699ff",
            GradeKey::G7 => "#ff66ff",
            GradeKey::Other => "#ef4444",
        }
    }
}

impl fmt::Display for GradeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown grade identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown grade key '{0}'")]
pub struct UnknownGradeKey(pub String);

impl FromStr for GradeKey {
    type Err = UnknownGradeKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GradeKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownGradeKey(s.to_string()))
    }
}

/// Definition of a single grade bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeDefinition {
    /// Grade identifier.
    pub key: GradeKey,
    /// Display label.
    pub label: String,
    /// Short glyph shown on icons.
    pub icon_text: String,
    /// Highlight color (normally `#rrggbb`).
    pub color: String,
    /// Member characters. Always empty for [`GradeKey::Other`].
    pub characters: String,
}

impl GradeDefinition {
    /// Definition using the built-in label/icon/color for `key` and the given characters.
    pub fn with_defaults(key: GradeKey, characters: impl Into<String>) -> Self {
        let characters = if key.is_other() {
            String::new()
        } else {
            characters.into()
        };
        Self {
            key,
            label: key.default_label().to_string(),
            icon_text: key.default_icon_text().to_string(),
            color: key.default_color().to_string(),
            characters,
        }
    }
}

/// The set of configured grades. Missing keys mean the grade is disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GradeDefinitions {
    grades: BTreeMap<GradeKey, GradeDefinition>,
}

impl GradeDefinitions {
    /// Create an empty definition set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) a definition, keyed by `definition.key`.
    pub fn insert(&mut self, definition: GradeDefinition) {
        self.grades.insert(definition.key, definition);
    }

    /// Look up a grade's definition.
    pub fn get(&self, key: GradeKey) -> Option<&GradeDefinition> {
        self.grades.get(&key)
    }

    /// Whether `key` is defined.
    pub fn contains(&self, key: GradeKey) -> bool {
        self.grades.contains_key(&key)
    }

    /// Number of defined grades.
    pub fn len(&self) -> usize {
        self.grades.len()
    }

    /// Returns `true` if no grade is defined.
    pub fn is_empty(&self) -> bool {
        self.grades.is_empty()
    }

    /// Defined grade keys in canonical order (including `other` when defined).
    pub fn defined_keys(&self) -> impl Iterator<Item = GradeKey> + '_ {
        self.grades.keys().copied()
    }

    /// Defined explicit grade keys in canonical order.
    pub fn defined_base_keys(&self) -> impl Iterator<Item = GradeKey> + '_ {
        self.defined_keys().filter(|key| !key.is_other())
    }

    /// Whether at least one explicit grade is defined.
    pub fn has_explicit_grades(&self) -> bool {
        self.defined_base_keys().next().is_some()
    }

    /// Definitions in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &GradeDefinition> {
        self.grades.values()
    }

    /// Label for `key`, falling back to the key identifier when undefined.
    pub fn label_for(&self, key: GradeKey) -> &str {
        self.get(key)
            .map(|def| def.label.as_str())
            .unwrap_or_else(|| key.as_str())
    }

    /// Labels, icons and colors for every grade, with no member characters.
    pub fn labels_only() -> Self {
        let mut definitions = Self::new();
        for key in GradeKey::ALL {
            definitions.insert(GradeDefinition::with_defaults(key, ""));
        }
        definitions
    }
}

impl FromIterator<GradeDefinition> for GradeDefinitions {
    fn from_iter<T: IntoIterator<Item = GradeDefinition>>(iter: T) -> Self {
        let mut definitions = Self::new();
        for definition in iter {
            definitions.insert(definition);
        }
        definitions
    }
}

/// Per-grade visibility toggle (persisted by the host across sessions).
///
/// Visibility filters what is dispatched to the renderer; it never changes classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<GradeKey, bool>",
    into = "BTreeMap<GradeKey, bool>"
)]
pub struct GradeVisibility {
    flags: [bool; GradeKey::COUNT],
}

impl GradeVisibility {
    /// Every grade visible.
    pub fn all_enabled() -> Self {
        Self {
            flags: [true; GradeKey::COUNT],
        }
    }

    /// Exactly the selected grades visible.
    pub fn from_selection<I>(selection: I) -> Self
    where
        I: IntoIterator<Item = GradeKey>,
    {
        let mut visibility = Self {
            flags: [false; GradeKey::COUNT],
        };
        for key in selection {
            visibility.set(key, true);
        }
        visibility
    }

    /// Whether `key` is visible.
    pub fn is_enabled(&self, key: GradeKey) -> bool {
        self.flags[key.ordinal()]
    }

    /// Set the visibility of `key`.
    pub fn set(&mut self, key: GradeKey, enabled: bool) {
        self.flags[key.ordinal()] = enabled;
    }

    /// Visible grade keys in canonical order.
    pub fn enabled_keys(&self) -> impl Iterator<Item = GradeKey> + '_ {
        GradeKey::ALL
            .into_iter()
            .filter(|key| self.is_enabled(*key))
    }
}

impl Default for GradeVisibility {
    fn default() -> Self {
        Self::all_enabled()
    }
}

impl From<BTreeMap<GradeKey, bool>> for GradeVisibility {
    fn from(stored: BTreeMap<GradeKey, bool>) -> Self {
        let mut visibility = Self::all_enabled();
        for (key, enabled) in stored {
            visibility.set(key, enabled);
        }
        visibility
    }
}

impl From<GradeVisibility> for BTreeMap<GradeKey, bool> {
    fn from(visibility: GradeVisibility) -> Self {
        GradeKey::ALL
            .into_iter()
            .map(|key| (key, visibility.is_enabled(key)))
            .collect()
    }
}
