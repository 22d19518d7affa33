//! Status indicator for the grade under the cursor.

use kanji_grade_core::{GradeDefinitions, GradeKey};

/// Which button/icon variant the host should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonLabel {
    /// Highlighting is off for the active document (or there is none).
    #[default]
    Off,
    /// Highlighting is on, but the cursor is not on a classified kanji.
    Unknown,
    /// The cursor is on a kanji of this grade.
    Grade(GradeKey),
}

impl ButtonLabel {
    /// Stable identifier (`"off"`, `"unknown"`, or the grade key).
    pub fn as_str(self) -> &'static str {
        match self {
            ButtonLabel::Off => "off",
            ButtonLabel::Unknown => "unknown",
            ButtonLabel::Grade(grade) => grade.as_str(),
        }
    }
}

/// The cursor status shown by the host.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CursorStatus {
    /// Button variant.
    pub button: ButtonLabel,
    /// Grade label, when the cursor is on a classified kanji.
    pub label: Option<String>,
    /// Character under the cursor, when classified.
    pub character: Option<char>,
}

impl CursorStatus {
    /// Status for a document with highlighting off.
    pub fn off() -> Self {
        Self::default()
    }

    /// Status for an enabled document where the cursor is not on a classified kanji.
    pub fn unknown() -> Self {
        Self {
            button: ButtonLabel::Unknown,
            ..Self::default()
        }
    }

    /// Status for a classified character.
    pub fn classified(grade: GradeKey, character: char, definitions: &GradeDefinitions) -> Self {
        Self {
            button: ButtonLabel::Grade(grade),
            label: Some(definitions.label_for(grade).to_string()),
            character: Some(character),
        }
    }

    /// The classified grade, if any.
    pub fn grade(&self) -> Option<GradeKey> {
        match self.button {
            ButtonLabel::Grade(grade) => Some(grade),
            _ => None,
        }
    }

    /// Whether the indicator should be visible.
    pub fn is_visible(&self) -> bool {
        self.label.is_some()
    }

    /// Indicator text.
    pub fn text(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Indicator tooltip (`"<ch> は <label>"`).
    pub fn tooltip(&self) -> Option<String> {
        match (self.character, &self.label) {
            (Some(ch), Some(label)) => Some(format!("{ch} は {label}")),
            _ => None,
        }
    }
}
