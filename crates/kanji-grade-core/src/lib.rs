#![warn(missing_docs)]
//! Kanji Grade Core - grade-level classification of Japanese kanji
//!
//! # Overview
//!
//! `kanji-grade-core` decides, for every character of a document, which school grade teaches it.
//! It is headless: it produces per-grade character ranges and leaves rendering to the host.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Highlight edits (per-grade dispatch)       │  ← Renderer-facing
//! ├─────────────────────────────────────────────┤
//! │  Scanner / Cursor resolver                  │  ← Per-document work
//! ├─────────────────────────────────────────────┤
//! │  Classification index (char -> grade)       │  ← O(1) lookup
//! ├─────────────────────────────────────────────┤
//! │  Grade definitions (JSON resource)          │  ← Data
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use kanji_grade_core::{
//!     ClassificationIndex, GradeDefinitions, GradeKey, HighlightRange, ScanOptions, scan,
//! };
//!
//! let definitions = GradeDefinitions::builtin();
//! let index = ClassificationIndex::build(&definitions);
//!
//! let ranges = scan(["山に登る"], &index, &ScanOptions::for_index(&index));
//! assert_eq!(ranges.get(GradeKey::G1), &[HighlightRange::at(0, 0)]);
//! assert_eq!(ranges.get(GradeKey::G3), &[HighlightRange::at(0, 2)]);
//! ```
//!
//! # Module Description
//!
//! - [`grade`] - grade keys, definitions, visibility
//! - [`definitions`] - JSON loader with built-in fallback
//! - [`index`] - `char -> grade` lookup and Han-script detection
//! - [`document`] - rope-backed document text and edits
//! - [`scanner`] - per-grade range computation
//! - [`cursor`] - grade under the cursor
//! - [`processing`] - highlight edits for the renderer
//!
//! # Unicode Support
//!
//! - Columns are Unicode scalar values (`char`), not bytes or UTF-16 code units
//! - `other` detection uses the Unicode `Script=Han` property, so CJK extension blocks are covered

pub mod cursor;
pub mod definitions;
pub mod document;
mod error;
pub mod grade;
pub mod index;
pub mod processing;
pub mod scanner;

pub use cursor::{resolve_at, resolve_in_document};
pub use definitions::{BUILTIN_GRADES_JSON, load_definitions, try_load_definitions};
pub use document::{DocumentText, Position, TextEdit};
pub use error::{DefinitionsError, DocumentError};
pub use grade::{GradeDefinition, GradeDefinitions, GradeKey, GradeVisibility, UnknownGradeKey};
pub use index::{ClassificationIndex, GradeConflict, is_han};
pub use processing::{HighlightEdit, clear_edits, edits_for_scan};
pub use scanner::{HighlightRange, PerGradeRangeSet, ScanOptions, scan, scan_document};
