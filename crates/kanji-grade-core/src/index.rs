//! Character classification index.
//!
//! The index replaces per-grade character-class patterns with a single `char -> grade` table, so
//! classifying a character is one hash lookup regardless of how many grades are configured.

use crate::grade::{GradeDefinitions, GradeKey};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

static HAN_SCRIPT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\p{Han}$").expect("valid Han script pattern"));

/// Whether `ch` belongs to the Unicode Han script (covers every CJK extension block).
pub fn is_han(ch: char) -> bool {
    let mut buf = [0u8; 4];
    HAN_SCRIPT.is_match(ch.encode_utf8(&mut buf))
}

/// A character listed in more than one grade. The earlier grade (canonical order) keeps it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradeConflict {
    /// The duplicated character.
    pub character: char,
    /// Grade the character is classified as.
    pub kept: GradeKey,
    /// Grade whose listing was ignored.
    pub ignored: GradeKey,
}

/// Lookup tables derived from [`GradeDefinitions`].
///
/// Built in full by [`ClassificationIndex::build`] and never mutated afterwards; a definitions
/// change produces a new index.
#[derive(Debug, Clone, Default)]
pub struct ClassificationIndex {
    char_to_grade: HashMap<char, GradeKey>,
    known: HashSet<char>,
    explicit_grades: Vec<GradeKey>,
    other_active: bool,
    conflicts: Vec<GradeConflict>,
}

impl ClassificationIndex {
    /// Build the index from a definition set.
    ///
    /// Grades are visited in canonical order (`g1` first) and the first grade to list a
    /// character keeps it.
    pub fn build(definitions: &GradeDefinitions) -> Self {
        let mut char_to_grade = HashMap::new();
        let mut known = HashSet::new();
        let mut conflicts = Vec::new();

        for key in definitions.defined_base_keys() {
            let Some(definition) = definitions.get(key) else {
                continue;
            };
            for ch in definition.characters.chars() {
                known.insert(ch);
                match char_to_grade.get(&ch) {
                    None => {
                        char_to_grade.insert(ch, key);
                    }
                    Some(&kept) if kept != key => conflicts.push(GradeConflict {
                        character: ch,
                        kept,
                        ignored: key,
                    }),
                    Some(_) => {}
                }
            }
        }

        if !conflicts.is_empty() {
            tracing::warn!(
                "{} characters are listed in more than one grade; keeping the lowest grade",
                conflicts.len()
            );
            for conflict in &conflicts {
                tracing::debug!(
                    "'{}' kept in {}, ignored in {}",
                    conflict.character,
                    conflict.kept,
                    conflict.ignored
                );
            }
        }

        let other_active =
            definitions.contains(GradeKey::Other) && definitions.has_explicit_grades();

        tracing::debug!(
            "Built classification index: {} characters, other bucket {}",
            known.len(),
            if other_active { "active" } else { "inactive" }
        );

        Self {
            char_to_grade,
            known,
            explicit_grades: definitions.defined_base_keys().collect(),
            other_active,
            conflicts,
        }
    }

    /// Explicit grade of `ch`, if any.
    pub fn grade_of(&self, ch: char) -> Option<GradeKey> {
        self.char_to_grade.get(&ch).copied()
    }

    /// Whether `ch` is listed in any explicit grade.
    pub fn is_known(&self, ch: char) -> bool {
        self.known.contains(&ch)
    }

    /// Defined explicit grades, in canonical order.
    pub fn explicit_grades(&self) -> &[GradeKey] {
        &self.explicit_grades
    }

    /// Whether unlisted Han characters are classified as [`GradeKey::Other`].
    pub fn other_active(&self) -> bool {
        self.other_active
    }

    /// Classify a single character.
    ///
    /// Returns the explicit grade when listed; `Other` for an unlisted Han character while the
    /// `other` bucket is active; `None` for everything else (kana, Latin, punctuation, ...).
    pub fn classify(&self, ch: char) -> Option<GradeKey> {
        if let Some(grade) = self.grade_of(ch) {
            return Some(grade);
        }
        if self.other_active && !self.is_known(ch) && is_han(ch) {
            return Some(GradeKey::Other);
        }
        None
    }

    /// Number of distinct listed characters.
    pub fn known_len(&self) -> usize {
        self.known.len()
    }

    /// The set of listed characters.
    pub fn known_characters(&self) -> &HashSet<char> {
        &self.known
    }

    /// Number of distinct keys in the `char -> grade` table.
    pub fn mapped_len(&self) -> usize {
        self.char_to_grade.len()
    }

    /// Cross-grade duplicates found while building.
    pub fn conflicts(&self) -> &[GradeConflict] {
        &self.conflicts
    }
}
