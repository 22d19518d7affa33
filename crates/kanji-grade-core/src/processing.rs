//! Highlight edits: the unit of work handed to the rendering layer.
//!
//! A scan result is turned into one [`HighlightEdit`] per grade. The renderer owns one handle per
//! grade and replaces (or clears) that handle's ranges wholesale, mirroring how a style layer is
//! replaced rather than patched.

use crate::grade::{GradeKey, GradeVisibility};
use crate::scanner::{HighlightRange, PerGradeRangeSet};

/// A change to the highlighting of one grade in one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HighlightEdit {
    /// Replace all ranges of `grade` with `ranges` (document order).
    ReplaceGrade {
        /// The grade being replaced.
        grade: GradeKey,
        /// The full set of ranges for the grade.
        ranges: Vec<HighlightRange>,
    },
    /// Remove all highlighting of `grade`.
    ClearGrade {
        /// The grade being cleared.
        grade: GradeKey,
    },
}

impl HighlightEdit {
    /// The grade this edit targets.
    pub fn grade(&self) -> GradeKey {
        match self {
            HighlightEdit::ReplaceGrade { grade, .. } | HighlightEdit::ClearGrade { grade } => {
                *grade
            }
        }
    }
}

/// Edits dispatching `ranges`, with every grade hidden by `visibility` cleared instead.
///
/// Visibility only filters dispatch; the scan result itself is left untouched.
pub fn edits_for_scan(
    ranges: &PerGradeRangeSet,
    visibility: &GradeVisibility,
) -> Vec<HighlightEdit> {
    ranges
        .iter()
        .map(|(grade, bucket)| {
            if visibility.is_enabled(grade) && !bucket.is_empty() {
                HighlightEdit::ReplaceGrade {
                    grade,
                    ranges: bucket.to_vec(),
                }
            } else {
                HighlightEdit::ClearGrade { grade }
            }
        })
        .collect()
}

/// Edits clearing every grade in `grades`.
pub fn clear_edits<I>(grades: I) -> Vec<HighlightEdit>
where
    I: IntoIterator<Item = GradeKey>,
{
    grades
        .into_iter()
        .map(|grade| HighlightEdit::ClearGrade { grade })
        .collect()
}
