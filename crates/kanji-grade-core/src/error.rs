use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced while loading grade definitions.
pub enum DefinitionsError {
    #[error("JSON parse error: {0}")]
    /// The resource is not a JSON object with a `grades` array.
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    /// Reading the resource failed.
    Io(#[from] std::io::Error),

    #[error("no valid grade entries")]
    /// The resource parsed, but every entry was rejected (or there were none).
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors produced while editing a [`DocumentText`](crate::DocumentText).
pub enum DocumentError {
    #[error("edit range {start}..{end} is out of bounds (document has {len} chars)")]
    /// An edit addressed characters past the end of the document, or had `start > end`.
    EditOutOfBounds {
        /// Edit start (char offset).
        start: usize,
        /// Edit end (char offset, exclusive).
        end: usize,
        /// Document length in chars at the time of the edit.
        len: usize,
    },
}
