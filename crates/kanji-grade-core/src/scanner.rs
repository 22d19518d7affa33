//! Document scanner: assigns every kanji in a document to a grade bucket.
//!
//! The scan is a single pass over each line with one [`ClassificationIndex::classify`] lookup
//! per character. Ranges are always one character wide and are emitted in document order.

use crate::document::DocumentText;
use crate::grade::{GradeKey, GradeVisibility};
use crate::index::ClassificationIndex;
use std::collections::BTreeMap;

/// A one-character highlight range (`start_column..end_column`, `end_column = start_column + 1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HighlightRange {
    /// Line index.
    pub line: usize,
    /// First highlighted column (chars).
    pub start_column: usize,
    /// Exclusive end column (chars).
    pub end_column: usize,
}

impl HighlightRange {
    /// Range covering the single character at `line:column`.
    pub fn at(line: usize, column: usize) -> Self {
        Self {
            line,
            start_column: column,
            end_column: column + 1,
        }
    }
}

/// Options controlling which buckets a scan fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Grades to collect. Characters of a disabled grade are skipped (they never fall through to
    /// `other`).
    pub visibility: GradeVisibility,
    /// Whether unlisted Han characters are collected into the `other` bucket.
    pub include_other: bool,
}

impl ScanOptions {
    /// Collect every grade; the `other` bucket follows the index.
    pub fn for_index(index: &ClassificationIndex) -> Self {
        Self {
            visibility: GradeVisibility::all_enabled(),
            include_other: index.other_active(),
        }
    }
}

/// Per-grade highlight ranges produced by one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PerGradeRangeSet {
    buckets: BTreeMap<GradeKey, Vec<HighlightRange>>,
}

impl PerGradeRangeSet {
    /// Create a set with an empty bucket for each of `grades`.
    pub fn with_grades<I>(grades: I) -> Self
    where
        I: IntoIterator<Item = GradeKey>,
    {
        Self {
            buckets: grades.into_iter().map(|key| (key, Vec::new())).collect(),
        }
    }

    /// Ranges of `grade` (empty when the grade has no bucket).
    pub fn get(&self, grade: GradeKey) -> &[HighlightRange] {
        self.buckets.get(&grade).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether this set has a bucket (possibly empty) for `grade`.
    pub fn has_bucket(&self, grade: GradeKey) -> bool {
        self.buckets.contains_key(&grade)
    }

    /// Buckets in canonical grade order.
    pub fn iter(&self) -> impl Iterator<Item = (GradeKey, &[HighlightRange])> {
        self.buckets
            .iter()
            .map(|(key, ranges)| (*key, ranges.as_slice()))
    }

    /// Grades that have a bucket, in canonical order.
    pub fn grades(&self) -> impl Iterator<Item = GradeKey> + '_ {
        self.buckets.keys().copied()
    }

    /// Total number of ranges across buckets.
    pub fn total(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    fn push(&mut self, grade: GradeKey, range: HighlightRange) {
        if let Some(bucket) = self.buckets.get_mut(&grade) {
            bucket.push(range);
        }
    }
}

/// Scan `lines` and bucket every classified character.
///
/// Buckets exist for every defined explicit grade enabled in `options`, plus `other` when
/// `options.include_other` is set and the index has an active `other` bucket.
pub fn scan<I, S>(lines: I, index: &ClassificationIndex, options: &ScanOptions) -> PerGradeRangeSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let include_other = options.include_other
        && index.other_active()
        && options.visibility.is_enabled(GradeKey::Other);
    let grades = index
        .explicit_grades()
        .iter()
        .copied()
        .filter(|key| options.visibility.is_enabled(*key))
        .chain(include_other.then_some(GradeKey::Other));
    let mut result = PerGradeRangeSet::with_grades(grades);

    for (line, text) in lines.into_iter().enumerate() {
        for (column, ch) in text.as_ref().chars().enumerate() {
            let Some(grade) = index.classify(ch) else {
                continue;
            };
            if grade.is_other() && !include_other {
                continue;
            }
            result.push(grade, HighlightRange::at(line, column));
        }
    }

    result
}

/// Scan a [`DocumentText`].
pub fn scan_document(
    document: &DocumentText,
    index: &ClassificationIndex,
    options: &ScanOptions,
) -> PerGradeRangeSet {
    scan(document.lines(), index, options)
}
