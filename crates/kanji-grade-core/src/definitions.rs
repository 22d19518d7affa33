//! Loading [`GradeDefinitions`] from the JSON data resource.
//!
//! The resource has the shape:
//!
//! ```json
//! {
//!   "grades": [
//!     { "key": "g1", "label": "...", "iconText": "1", "color": "#fffa99", "characters": "一右雨..." }
//!   ]
//! }
//! ```
//!
//! Entries are decoded one by one, so a malformed entry only drops itself. Loading from a path
//! never fails: any error falls back to [`GradeDefinitions::builtin`].

use crate::error::DefinitionsError;
use crate::grade::{GradeDefinition, GradeDefinitions, GradeKey};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

/// Bundled definitions: the elementary-school kanji for `g1`..`g6`, plus `g7` and `other`
/// without member characters.
pub const BUILTIN_GRADES_JSON: &str = include_str!("../data/grades.json");

#[derive(Debug, Deserialize)]
struct DefinitionsDocument {
    grades: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGradeEntry {
    key: String,
    label: Option<String>,
    icon_text: Option<String>,
    color: Option<String>,
    characters: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl RawGradeEntry {
    fn into_definition(self, key: GradeKey) -> GradeDefinition {
        let mut definition =
            GradeDefinition::with_defaults(key, self.characters.unwrap_or_default());
        if let Some(label) = non_blank(self.label) {
            definition.label = label;
        }
        if let Some(icon_text) = non_blank(self.icon_text) {
            definition.icon_text = icon_text;
        }
        if let Some(color) = non_blank(self.color) {
            definition.color = color.trim().to_string();
        }
        definition
    }
}

impl GradeDefinitions {
    /// Parse definitions from the JSON resource format.
    ///
    /// Entries with the wrong shape or an unknown key are skipped with a warning. When a key
    /// appears more than once, the first entry wins.
    pub fn from_json_str(json: &str) -> Result<Self, DefinitionsError> {
        let document: DefinitionsDocument = serde_json::from_str(json)?;
        let mut definitions = GradeDefinitions::new();

        for (position, value) in document.grades.into_iter().enumerate() {
            let entry: RawGradeEntry = match serde_json::from_value(value) {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!("Skipping grade entry #{}: {}", position, err);
                    continue;
                }
            };

            let key = match entry.key.parse::<GradeKey>() {
                Ok(key) => key,
                Err(err) => {
                    tracing::warn!("Skipping grade entry #{}: {}", position, err);
                    continue;
                }
            };

            if definitions.contains(key) {
                tracing::warn!(
                    "Skipping grade entry #{}: duplicate key '{}' (first entry wins)",
                    position,
                    key
                );
                continue;
            }

            if key.is_other()
                && entry
                    .characters
                    .as_deref()
                    .is_some_and(|chars| !chars.is_empty())
            {
                tracing::warn!("Ignoring characters listed for the 'other' grade");
            }

            definitions.insert(entry.into_definition(key));
        }

        if definitions.is_empty() {
            return Err(DefinitionsError::Empty);
        }
        Ok(definitions)
    }

    /// The bundled definition set.
    pub fn builtin() -> Self {
        match Self::from_json_str(BUILTIN_GRADES_JSON) {
            Ok(definitions) => definitions,
            Err(err) => {
                tracing::warn!(
                    "Failed to parse bundled grade definitions: {}, using labels only",
                    err
                );
                Self::labels_only()
            }
        }
    }
}

/// Read and parse definitions from `path`.
pub fn try_load_definitions(path: impl AsRef<Path>) -> Result<GradeDefinitions, DefinitionsError> {
    let json = std::fs::read_to_string(path.as_ref())?;
    GradeDefinitions::from_json_str(&json)
}

/// Load definitions from `path`, falling back to [`GradeDefinitions::builtin`] on any error.
pub fn load_definitions(path: impl AsRef<Path>) -> GradeDefinitions {
    let path = path.as_ref();
    match try_load_definitions(path) {
        Ok(definitions) => {
            tracing::info!(
                "Loaded {} grade definitions from {}",
                definitions.len(),
                path.display()
            );
            definitions
        }
        Err(err) => {
            tracing::warn!(
                "Failed to load grade definitions from {}: {}, using built-in defaults",
                path.display(),
                err
            );
            GradeDefinitions::builtin()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_contains_elementary_grades() {
        let definitions = GradeDefinitions::builtin();
        assert_eq!(definitions.len(), GradeKey::COUNT);

        let counts: Vec<usize> = GradeKey::BASE
            .iter()
            .map(|key| definitions.get(*key).unwrap().characters.chars().count())
            .collect();
        assert_eq!(counts, vec![80, 160, 200, 202, 193, 191, 0]);
        assert!(definitions.get(GradeKey::Other).unwrap().characters.is_empty());
    }

    #[test]
    fn test_bad_entries_are_skipped_individually() {
        let json = r#"{
            "grades": [
                { "key": "g1", "characters": "一二" },
                { "key": "g9", "characters": "三" },
                { "key": "g2", "characters": 42 },
                "not an object",
                { "key": "other", "label": "外字" }
            ]
        }"#;
        let definitions = GradeDefinitions::from_json_str(json).unwrap();

        assert_eq!(
            definitions.defined_keys().collect::<Vec<_>>(),
            vec![GradeKey::G1, GradeKey::Other]
        );
        let g1 = definitions.get(GradeKey::G1).unwrap();
        assert_eq!(g1.characters, "一二");
        assert_eq!(g1.label, "1年生の漢字");
        assert_eq!(g1.color, "#fffa99");
        assert_eq!(definitions.label_for(GradeKey::Other), "外字");
    }

    #[test]
    fn test_duplicate_keys_keep_first_entry() {
        let json = r#"{ "grades": [
            { "key": "g3", "characters": "悪" },
            { "key": "g3", "characters": "安" }
        ] }"#;
        let definitions = GradeDefinitions::from_json_str(json).unwrap();
        assert_eq!(definitions.get(GradeKey::G3).unwrap().characters, "悪");
    }

    #[test]
    fn test_other_never_carries_characters() {
        let json = r#"{ "grades": [ { "key": "other", "characters": "亜" } ] }"#;
        let definitions = GradeDefinitions::from_json_str(json).unwrap();
        assert!(definitions.get(GradeKey::Other).unwrap().characters.is_empty());
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        assert!(matches!(
            GradeDefinitions::from_json_str("{ grades: "),
            Err(DefinitionsError::Json(_))
        ));
        assert!(matches!(
            GradeDefinitions::from_json_str(r#"{ "grades": [] }"#),
            Err(DefinitionsError::Empty)
        ));
    }

    #[test]
    fn test_load_missing_file_falls_back_to_builtin() {
        let definitions = load_definitions("/definitely/not/here/grades.json");
        assert_eq!(definitions, GradeDefinitions::builtin());
    }
}
