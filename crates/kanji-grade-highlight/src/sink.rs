//! The rendering seam.
//!
//! The controller never draws anything itself: it hands [`HighlightEdit`]s, styles and cursor
//! status to a [`RenderSink`] implemented by the host.

use crate::controller::DocumentId;
use crate::status::CursorStatus;
use crate::style::GradeStyle;
use kanji_grade_core::{GradeKey, HighlightEdit, HighlightRange};
use std::collections::{BTreeMap, HashMap};

/// Host-side renderer.
///
/// Calls are infallible: a renderer that cannot apply an edit (e.g. a disposed handle) is in a
/// broken state the controller cannot repair.
pub trait RenderSink {
    /// Apply per-grade edits to `document`.
    fn apply(&mut self, document: &DocumentId, edits: Vec<HighlightEdit>);

    /// Recreate the per-grade rendering handles. Previously applied highlighting is discarded.
    fn rebuild_styles(&mut self, styles: &[GradeStyle]);

    /// Show the cursor status.
    fn update_status(&mut self, status: &CursorStatus) {
        let _ = status;
    }
}

/// A [`RenderSink`] that keeps everything in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    applied: HashMap<DocumentId, BTreeMap<GradeKey, Vec<HighlightRange>>>,
    styles: Vec<GradeStyle>,
    status: CursorStatus,
    apply_calls: usize,
    style_rebuilds: usize,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ranges currently applied for `grade` in `document`.
    pub fn ranges(&self, document: &DocumentId, grade: GradeKey) -> &[HighlightRange] {
        self.applied
            .get(document)
            .and_then(|grades| grades.get(&grade))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All grades with ranges applied in `document`.
    pub fn highlighted_grades(&self, document: &DocumentId) -> Vec<GradeKey> {
        self.applied
            .get(document)
            .map(|grades| grades.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Total number of ranges applied in `document`.
    pub fn total_ranges(&self, document: &DocumentId) -> usize {
        self.applied
            .get(document)
            .map(|grades| grades.values().map(Vec::len).sum())
            .unwrap_or(0)
    }

    /// Current styles.
    pub fn styles(&self) -> &[GradeStyle] {
        &self.styles
    }

    /// Style of `grade`, if one is installed.
    pub fn style(&self, grade: GradeKey) -> Option<&GradeStyle> {
        self.styles.iter().find(|style| style.grade == grade)
    }

    /// Last status pushed by the controller.
    pub fn status(&self) -> &CursorStatus {
        &self.status
    }

    /// Number of [`RenderSink::apply`] calls so far.
    pub fn apply_calls(&self) -> usize {
        self.apply_calls
    }

    /// Number of [`RenderSink::rebuild_styles`] calls so far.
    pub fn style_rebuilds(&self) -> usize {
        self.style_rebuilds
    }
}

impl RenderSink for MemorySink {
    fn apply(&mut self, document: &DocumentId, edits: Vec<HighlightEdit>) {
        self.apply_calls += 1;
        let grades = self.applied.entry(document.clone()).or_default();
        for edit in edits {
            match edit {
                HighlightEdit::ReplaceGrade { grade, ranges } if !ranges.is_empty() => {
                    grades.insert(grade, ranges);
                }
                other => {
                    grades.remove(&other.grade());
                }
            }
        }
        if grades.is_empty() {
            self.applied.remove(document);
        }
    }

    fn rebuild_styles(&mut self, styles: &[GradeStyle]) {
        self.style_rebuilds += 1;
        self.styles = styles.to_vec();
        self.applied.clear();
    }

    fn update_status(&mut self, status: &CursorStatus) {
        self.status = status.clone();
    }
}
