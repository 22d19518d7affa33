//! Event-driven front end for [`HighlightController`].
//!
//! Hosts that prefer message passing send [`HighlightEvent`]s over a channel and let
//! [`HighlightController::run`] own the controller on a dedicated thread. The loop waits for the
//! next event or the debounce deadline, whichever comes first.

use crate::controller::{DocumentId, HighlightController};
use crate::settings::HighlightSettings;
use crate::sink::RenderSink;
use crate::visibility::VisibilityStore;
use kanji_grade_core::{GradeKey, Position, TextEdit};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Instant;

/// A host notification or user command.
#[derive(Debug, Clone)]
pub enum HighlightEvent {
    /// A document was opened.
    DocumentOpened {
        /// Document id.
        id: DocumentId,
        /// Full text.
        text: String,
    },
    /// A document was edited.
    DocumentEdited {
        /// Document id.
        id: DocumentId,
        /// Edits, applied in order.
        edits: Vec<TextEdit>,
    },
    /// A document was closed.
    DocumentClosed {
        /// Document id.
        id: DocumentId,
    },
    /// Focus moved to another document (or to none).
    ActiveDocumentChanged {
        /// New active document.
        id: Option<DocumentId>,
    },
    /// The cursor moved.
    SelectionChanged {
        /// Document id.
        id: DocumentId,
        /// Cursor position.
        position: Position,
    },
    /// Settings were edited.
    ConfigurationChanged {
        /// New settings.
        settings: HighlightSettings,
    },
    /// "Toggle highlighting for this file".
    ToggleFile {
        /// Document id.
        id: DocumentId,
    },
    /// "Choose visible grades": exactly these grades stay visible.
    SetGradeVisibility {
        /// Selected grades.
        grades: Vec<GradeKey>,
    },
    /// Deactivate and leave the loop.
    Shutdown,
}

impl<S, V> HighlightController<S, V>
where
    S: RenderSink,
    V: VisibilityStore,
{
    /// Dispatch one event. Returns `false` for [`HighlightEvent::Shutdown`].
    pub fn handle(&mut self, event: HighlightEvent, now: Instant) -> bool {
        match event {
            HighlightEvent::DocumentOpened { id, text } => self.on_document_opened(id, &text, now),
            HighlightEvent::DocumentEdited { id, edits } => {
                if let Err(err) = self.on_document_edited(&id, &edits, now) {
                    tracing::warn!("Rejected edit of {}: {}", id, err);
                }
            }
            HighlightEvent::DocumentClosed { id } => self.on_document_closed(&id),
            HighlightEvent::ActiveDocumentChanged { id } => {
                self.on_active_document_changed(id, now)
            }
            HighlightEvent::SelectionChanged { id, position } => {
                self.on_selection_changed(&id, position);
            }
            HighlightEvent::ConfigurationChanged { settings } => {
                self.on_configuration_changed(settings, now)
            }
            HighlightEvent::ToggleFile { id } => {
                self.toggle_file_enabled(&id, now);
            }
            HighlightEvent::SetGradeVisibility { grades } => self.set_grade_visibility(grades),
            HighlightEvent::Shutdown => return false,
        }
        true
    }

    /// Process events until [`HighlightEvent::Shutdown`] arrives or every sender is dropped,
    /// running debounced scans as their deadlines pass. Deactivates before returning.
    pub fn run(&mut self, events: &Receiver<HighlightEvent>) {
        loop {
            let received = match self.next_deadline() {
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    events.recv_timeout(remaining)
                }
                None => events.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };

            match received {
                Ok(event) => {
                    if !self.handle(event, Instant::now()) {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    self.tick(Instant::now());
                }
                Err(RecvTimeoutError::Disconnected) => {
                    tracing::debug!("Event channel closed");
                    break;
                }
            }
        }
        self.deactivate();
    }
}
