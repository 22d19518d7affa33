//! Line-addressable document text.
//!
//! Backed by a Rope, so edits and line access stay O(log N) for large files. All offsets and
//! columns are counted in Unicode scalar values (`char`).

use crate::error::DocumentError;
use ropey::Rope;

/// A logical position in a document (zero-based line and `char` column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    /// Line index.
    pub line: usize,
    /// Column, in chars from the start of the line.
    pub column: usize,
}

impl Position {
    /// Create a new position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A single text replacement expressed in character offsets.
///
/// Edits in a batch are applied in order; each offset refers to the document as it is when that
/// edit is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    /// Start char offset (inclusive).
    pub start: usize,
    /// End char offset (exclusive) of the replaced text.
    pub end: usize,
    /// Replacement text (may be empty).
    pub text: String,
}

impl TextEdit {
    /// Insert `text` at `offset`.
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self {
            start: offset,
            end: offset,
            text: text.into(),
        }
    }

    /// Delete `start..end`.
    pub fn delete(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            text: String::new(),
        }
    }

    /// Replace `start..end` with `text`.
    pub fn replace(start: usize, end: usize, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }
}

/// Document text with line access.
#[derive(Debug, Clone, Default)]
pub struct DocumentText {
    rope: Rope,
}

impl DocumentText {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from text.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Number of logical lines. `N` newlines yield `N + 1` lines.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Total number of chars.
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Text of `line` without its line terminator.
    pub fn line_text(&self, line: usize) -> Option<String> {
        if line >= self.rope.len_lines() {
            return None;
        }
        let mut text = self.rope.line(line).to_string();
        if text.ends_with('\n') {
            text.pop();
            if text.ends_with('\r') {
                text.pop();
            }
        }
        Some(text)
    }

    /// All lines, without terminators.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.line_count()).filter_map(|line| self.line_text(line))
    }

    /// The character at `position`, or `None` past the end of the line or document.
    pub fn char_at(&self, position: Position) -> Option<char> {
        if position.line >= self.rope.len_lines() {
            return None;
        }
        let line = self.rope.line(position.line);
        let mut len = line.len_chars();
        // Exclude the line terminator from addressable columns.
        if len > 0 && line.char(len - 1) == '\n' {
            len -= 1;
            if len > 0 && line.char(len - 1) == '\r' {
                len -= 1;
            }
        }
        (position.column < len).then(|| line.char(position.column))
    }

    /// Apply a single edit.
    pub fn apply_edit(&mut self, edit: &TextEdit) -> Result<(), DocumentError> {
        let len = self.rope.len_chars();
        if edit.start > edit.end || edit.end > len {
            return Err(DocumentError::EditOutOfBounds {
                start: edit.start,
                end: edit.end,
                len,
            });
        }
        if edit.start < edit.end {
            self.rope.remove(edit.start..edit.end);
        }
        if !edit.text.is_empty() {
            self.rope.insert(edit.start, &edit.text);
        }
        Ok(())
    }

    /// Apply edits in order. Stops at (and returns) the first invalid edit; edits before it
    /// remain applied.
    pub fn apply_edits<'a, I>(&mut self, edits: I) -> Result<(), DocumentError>
    where
        I: IntoIterator<Item = &'a TextEdit>,
    {
        for edit in edits {
            self.apply_edit(edit)?;
        }
        Ok(())
    }

    /// Replace the whole text.
    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
    }
}

impl std::fmt::Display for DocumentText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for chunk in self.rope.chunks() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_strip_terminators() {
        let doc = DocumentText::from_text("一二\r\n三\n");
        assert_eq!(doc.line_count(), 3);
        assert_eq!(doc.lines().collect::<Vec<_>>(), vec!["一二", "三", ""]);
    }

    #[test]
    fn test_lone_cr_stays_in_the_line() {
        let doc = DocumentText::from_text("一\r二\r");
        assert_eq!(doc.line_count(), 1);
        assert_eq!(doc.line_text(0).as_deref(), Some("一\r二\r"));
        assert_eq!(doc.char_at(Position::new(0, 3)), Some('\r'));
        assert_eq!(doc.line_text(0).map(|line| line.chars().count()), Some(4));
    }

    #[test]
    fn test_char_at_bounds() {
        let doc = DocumentText::from_text("一二\r\n三");
        assert_eq!(doc.char_at(Position::new(0, 1)), Some('二'));
        assert_eq!(doc.char_at(Position::new(0, 2)), None);
        assert_eq!(doc.char_at(Position::new(1, 0)), Some('三'));
        assert_eq!(doc.char_at(Position::new(1, 1)), None);
        assert_eq!(doc.char_at(Position::new(2, 0)), None);
    }

    #[test]
    fn test_apply_edits_in_order() {
        let mut doc = DocumentText::from_text("一二三");
        doc.apply_edits(&[TextEdit::replace(1, 2, "十"), TextEdit::insert(3, "\n四")])
            .unwrap();
        assert_eq!(doc.to_string(), "一十三\n四");
    }

    #[test]
    fn test_out_of_bounds_edit_is_rejected() {
        let mut doc = DocumentText::from_text("一");
        assert_eq!(
            doc.apply_edit(&TextEdit::delete(0, 5)),
            Err(DocumentError::EditOutOfBounds {
                start: 0,
                end: 5,
                len: 1
            })
        );
        assert_eq!(doc.to_string(), "一");
    }
}
