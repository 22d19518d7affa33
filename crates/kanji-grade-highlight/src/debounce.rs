//! Single-slot debounce timer.
//!
//! The timer holds at most one pending scan. Scheduling replaces (and thereby cancels) whatever
//! was pending, so a burst of edits results in a single scan once the burst goes quiet.

use crate::controller::DocumentId;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingScan {
    document: DocumentId,
    deadline: Instant,
}

/// A cancellable deferred scan.
#[derive(Debug, Clone)]
pub struct DebounceTimer {
    delay: Duration,
    pending: Option<PendingScan>,
}

impl DebounceTimer {
    /// Create a timer with the given quiet period.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Quiet period.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Change the quiet period. A pending scan keeps its deadline.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Schedule a scan of `document` at `now + delay`, replacing any pending scan.
    pub fn schedule(&mut self, document: DocumentId, now: Instant) {
        if let Some(previous) = &self.pending
            && previous.document != document
        {
            tracing::debug!("Cancelling pending scan of {}", previous.document);
        }
        self.pending = Some(PendingScan {
            document,
            deadline: now + self.delay,
        });
    }

    /// Cancel the pending scan, if any.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Cancel the pending scan if it targets `document`.
    pub fn cancel_for(&mut self, document: &DocumentId) {
        if self
            .pending
            .as_ref()
            .is_some_and(|pending| &pending.document == document)
        {
            self.pending = None;
        }
    }

    /// When the pending scan is due.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.deadline)
    }

    /// Document of the pending scan.
    pub fn pending_document(&self) -> Option<&DocumentId> {
        self.pending.as_ref().map(|pending| &pending.document)
    }

    /// Take the pending scan if its deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> Option<DocumentId> {
        match &self.pending {
            Some(pending) if pending.deadline <= now => self.take(),
            _ => None,
        }
    }

    /// Take the pending scan regardless of its deadline.
    pub fn take(&mut self) -> Option<DocumentId> {
        self.pending.take().map(|pending| pending.document)
    }
}
