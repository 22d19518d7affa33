//! Grade lookup for the character under the cursor.
//!
//! Resolving a single position classifies one character; it never scans the document.

use crate::document::{DocumentText, Position};
use crate::grade::GradeKey;
use crate::index::ClassificationIndex;

/// Grade of the character at `position` in `lines`.
///
/// Out-of-range positions (past the last line, or at/after the end of a line) resolve to `None`.
pub fn resolve_at<S>(
    lines: &[S],
    position: Position,
    index: &ClassificationIndex,
) -> Option<GradeKey>
where
    S: AsRef<str>,
{
    let line = lines.get(position.line)?;
    let ch = line.as_ref().chars().nth(position.column)?;
    index.classify(ch)
}

/// Grade of the character at `position` in a [`DocumentText`].
pub fn resolve_in_document(
    document: &DocumentText,
    position: Position,
    index: &ClassificationIndex,
) -> Option<GradeKey> {
    document
        .char_at(position)
        .and_then(|ch| index.classify(ch))
}
