//! Highlight controller.
//!
//! Owns every piece of mutable highlighting state (definitions, index, enabled documents, the
//! debounce timer) and turns host events into scans and [`RenderSink`] calls.
//!
//! # Per-document lifecycle
//!
//! ```text
//!  Off ──enable──▶ Pending ──scan──▶ Active
//!   ▲                 ▲                │
//!   │                 └──────edit──────┘
//!   └──────────────disable─────────────┘
//! ```
//!
//! Only the active document is ever scanned. Disabling clears highlighting synchronously; every
//! other change goes through the debounce timer.
//!
//! # Example
//!
//! ```rust
//! use kanji_grade_highlight::{
//!     DocumentId, HighlightController, HighlightSettings, MemorySink, MemoryVisibilityStore,
//! };
//! use kanji_grade_core::GradeKey;
//! use std::time::{Duration, Instant};
//!
//! let mut controller = HighlightController::activate(
//!     HighlightSettings::default(),
//!     MemorySink::new(),
//!     MemoryVisibilityStore::new(),
//! );
//! let doc = DocumentId::new("file:///notes.txt");
//! let t0 = Instant::now();
//!
//! controller.on_document_opened(doc.clone(), "山と川", t0);
//! controller.on_active_document_changed(Some(doc.clone()), t0);
//! controller.toggle_file_enabled(&doc, t0);
//! controller.tick(t0 + Duration::from_millis(100));
//!
//! assert_eq!(controller.sink().ranges(&doc, GradeKey::G1).len(), 2);
//! ```

use crate::debounce::DebounceTimer;
use crate::settings::HighlightSettings;
use crate::sink::RenderSink;
use crate::status::CursorStatus;
use crate::style::{GradeStyle, build_styles};
use crate::visibility::VisibilityStore;
use kanji_grade_core::{
    ClassificationIndex, DocumentError, DocumentText, GradeDefinitions, GradeKey,
    GradeVisibility, PerGradeRangeSet, Position, ScanOptions, TextEdit, clear_edits,
    edits_for_scan, resolve_in_document, scan_document,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Host-provided document identity (typically a URI).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(String);

impl DocumentId {
    /// Create an id from a URI or path string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The underlying string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Highlighting phase of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentPhase {
    /// Not opted in; nothing is highlighted.
    #[default]
    Off,
    /// Opted in; applied highlighting (if any) is stale and a scan is due.
    Pending,
    /// Opted in; applied highlighting matches the text.
    Active,
}

#[derive(Debug)]
struct DocumentEntry {
    text: DocumentText,
    phase: DocumentPhase,
    cursor: Position,
    last_scan: Option<PerGradeRangeSet>,
}

impl DocumentEntry {
    fn new(text: &str) -> Self {
        Self {
            text: DocumentText::from_text(text),
            phase: DocumentPhase::Off,
            cursor: Position::default(),
            last_scan: None,
        }
    }

    fn is_enabled(&self) -> bool {
        self.phase != DocumentPhase::Off
    }
}

/// Orchestrates per-document highlighting.
pub struct HighlightController<S, V> {
    settings: HighlightSettings,
    definitions: GradeDefinitions,
    index: Arc<ClassificationIndex>,
    styles: Vec<GradeStyle>,
    visibility: GradeVisibility,
    documents: HashMap<DocumentId, DocumentEntry>,
    active: Option<DocumentId>,
    timer: DebounceTimer,
    status: CursorStatus,
    scan_count: u64,
    sink: S,
    store: V,
}

impl<S, V> HighlightController<S, V>
where
    S: RenderSink,
    V: VisibilityStore,
{
    /// Build a controller: load definitions, build the index and styles, restore visibility.
    pub fn activate(settings: HighlightSettings, sink: S, store: V) -> Self {
        let definitions = settings.load_definitions();
        let visibility = match store.load() {
            Ok(Some(visibility)) => visibility,
            Ok(None) => GradeVisibility::all_enabled(),
            Err(err) => {
                tracing::warn!("Failed to restore grade visibility: {}, enabling all", err);
                GradeVisibility::all_enabled()
            }
        };

        let mut controller = Self {
            timer: DebounceTimer::new(settings.debounce()),
            index: Arc::new(ClassificationIndex::build(&definitions)),
            styles: build_styles(&definitions, &settings),
            settings,
            definitions,
            visibility,
            documents: HashMap::new(),
            active: None,
            status: CursorStatus::off(),
            scan_count: 0,
            sink,
            store,
        };
        controller.sink.rebuild_styles(&controller.styles);
        controller.sink.update_status(&controller.status);
        tracing::info!(
            "Kanji grade highlighting activated ({} grades, {} characters)",
            controller.definitions.len(),
            controller.index.known_len()
        );
        controller
    }

    /// Tear down: clear highlighting of every enabled document and forget all state.
    pub fn deactivate(&mut self) {
        self.timer.cancel();
        let grades: Vec<GradeKey> = self.definitions.defined_keys().collect();
        let mut enabled: Vec<DocumentId> = self
            .documents
            .iter()
            .filter(|(_, entry)| entry.is_enabled())
            .map(|(id, _)| id.clone())
            .collect();
        enabled.sort();
        for id in enabled {
            self.sink.apply(&id, clear_edits(grades.iter().copied()));
        }
        self.documents.clear();
        self.active = None;
        self.set_status(CursorStatus::off());
        tracing::info!("Kanji grade highlighting deactivated");
    }

    // ---- host events -------------------------------------------------------------------------

    /// A document was opened. New documents start with highlighting off.
    ///
    /// Reopening a tracked document replaces its text; an enabled, active document is rescanned.
    pub fn on_document_opened(&mut self, id: DocumentId, text: &str, now: Instant) {
        if !self.documents.contains_key(&id) {
            self.documents.insert(id, DocumentEntry::new(text));
            return;
        }
        let Some(entry) = self.documents.get_mut(&id) else {
            return;
        };
        tracing::debug!("Document {} reopened; replacing its text", id);
        entry.text.set_text(text);
        if !entry.is_enabled() {
            return;
        }
        entry.phase = DocumentPhase::Pending;

        if self.is_active(&id) {
            self.timer.schedule(id, now);
            self.refresh_status();
        }
    }

    /// A document's text changed.
    ///
    /// For an enabled, active document this (re)starts the debounce timer; only the scan
    /// scheduled by the last edit of a burst runs.
    pub fn on_document_edited(
        &mut self,
        id: &DocumentId,
        edits: &[TextEdit],
        now: Instant,
    ) -> Result<(), DocumentError> {
        let Some(entry) = self.documents.get_mut(id) else {
            tracing::debug!("Ignoring edit of unknown document {}", id);
            return Ok(());
        };
        entry.text.apply_edits(edits)?;
        if !entry.is_enabled() {
            return Ok(());
        }
        entry.phase = DocumentPhase::Pending;

        if self.is_active(id) {
            self.timer.schedule(id.clone(), now);
            self.refresh_status();
        }
        Ok(())
    }

    /// A document was closed. Its highlighting is released and its enabled state forgotten.
    pub fn on_document_closed(&mut self, id: &DocumentId) {
        let Some(entry) = self.documents.remove(id) else {
            return;
        };
        if entry.is_enabled() {
            self.clear_document(id);
        }
        self.timer.cancel_for(id);
        if self.is_active(id) {
            self.active = None;
            self.set_status(CursorStatus::off());
        }
    }

    /// The active document changed (`None` when no document has focus).
    pub fn on_active_document_changed(&mut self, id: Option<DocumentId>, now: Instant) {
        self.timer.cancel();
        self.active = id.filter(|id| self.documents.contains_key(id));

        let Some(active) = self.active.clone() else {
            self.set_status(CursorStatus::off());
            return;
        };

        let enabled = self
            .documents
            .get(&active)
            .is_some_and(DocumentEntry::is_enabled);
        if enabled {
            self.mark_pending(&active);
            self.timer.schedule(active, now);
        } else {
            self.clear_document(&active);
        }
        self.refresh_status();
    }

    /// The cursor moved in `id`. Returns the refreshed status.
    pub fn on_selection_changed(&mut self, id: &DocumentId, position: Position) -> &CursorStatus {
        if let Some(entry) = self.documents.get_mut(id) {
            entry.cursor = position;
        }
        if self.is_active(id) {
            self.refresh_status();
        }
        &self.status
    }

    /// Settings changed: reload definitions, rebuild the index and styles, rescan.
    pub fn on_configuration_changed(&mut self, settings: HighlightSettings, now: Instant) {
        let definitions = settings.load_definitions();
        let index = Arc::new(ClassificationIndex::build(&definitions));
        let styles = build_styles(&definitions, &settings);

        self.timer.set_delay(settings.debounce());
        self.settings = settings;
        self.definitions = definitions;
        self.index = index;
        self.styles = styles;
        self.sink.rebuild_styles(&self.styles);

        // Rebuilt handles start empty, so every enabled document needs a rescan.
        for entry in self.documents.values_mut() {
            entry.last_scan = None;
            if entry.is_enabled() {
                entry.phase = DocumentPhase::Pending;
            }
        }
        if let Some(active) = self.active.clone()
            && self.is_file_enabled(&active)
        {
            self.timer.schedule(active, now);
        }
        self.refresh_status();
        tracing::debug!("Configuration reloaded");
    }

    /// Toggle highlighting of `id`. Returns the new enabled state.
    pub fn toggle_file_enabled(&mut self, id: &DocumentId, now: Instant) -> bool {
        let Some(entry) = self.documents.get_mut(id) else {
            tracing::debug!("Cannot toggle unknown document {}", id);
            return false;
        };

        if entry.is_enabled() {
            entry.phase = DocumentPhase::Off;
            entry.last_scan = None;
            self.timer.cancel_for(id);
            self.clear_document(id);
            if self.is_active(id) {
                self.set_status(CursorStatus::off());
            }
            tracing::debug!("Highlighting off for {}", id);
            false
        } else {
            entry.phase = DocumentPhase::Pending;
            if self.is_active(id) {
                self.timer.schedule(id.clone(), now);
                self.refresh_status();
            }
            tracing::debug!("Highlighting on for {}", id);
            true
        }
    }

    /// Set which grades are visible (exactly `selection`), persist it, and re-dispatch the last
    /// scan of the active document without rescanning.
    pub fn set_grade_visibility<I>(&mut self, selection: I)
    where
        I: IntoIterator<Item = GradeKey>,
    {
        self.visibility = GradeVisibility::from_selection(selection);
        if let Err(err) = self.store.save(&self.visibility) {
            tracing::warn!("Failed to persist grade visibility: {}", err);
        }

        if let Some(active) = self.active.clone()
            && let Some(entry) = self.documents.get(&active)
            && let Some(ranges) = &entry.last_scan
        {
            let edits = edits_for_scan(ranges, &self.visibility);
            self.sink.apply(&active, edits);
        }
        self.refresh_status();
    }

    // ---- timer -------------------------------------------------------------------------------

    /// Run the pending scan if its deadline has passed. Returns `true` if a scan ran.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.timer.take_due(now) {
            Some(id) => self.run_scan(&id),
            None => false,
        }
    }

    /// Run the pending scan now, ignoring its deadline.
    pub fn flush(&mut self) -> bool {
        match self.timer.take() {
            Some(id) => self.run_scan(&id),
            None => false,
        }
    }

    /// When [`HighlightController::tick`] should next be called.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    // ---- queries -----------------------------------------------------------------------------

    /// Phase of `id` (`Off` for unknown documents).
    pub fn phase(&self, id: &DocumentId) -> DocumentPhase {
        self.documents
            .get(id)
            .map(|entry| entry.phase)
            .unwrap_or_default()
    }

    /// Whether `id` is opted in.
    pub fn is_file_enabled(&self, id: &DocumentId) -> bool {
        self.phase(id) != DocumentPhase::Off
    }

    /// The active document.
    pub fn active_document(&self) -> Option<&DocumentId> {
        self.active.as_ref()
    }

    /// Current text of `id`.
    pub fn document_text(&self, id: &DocumentId) -> Option<&DocumentText> {
        self.documents.get(id).map(|entry| &entry.text)
    }

    /// Last scan of `id`, before visibility filtering.
    pub fn last_scan(&self, id: &DocumentId) -> Option<&PerGradeRangeSet> {
        self.documents.get(id).and_then(|entry| entry.last_scan.as_ref())
    }

    /// Current cursor status.
    pub fn status(&self) -> &CursorStatus {
        &self.status
    }

    /// Current settings.
    pub fn settings(&self) -> &HighlightSettings {
        &self.settings
    }

    /// Current grade definitions.
    pub fn definitions(&self) -> &GradeDefinitions {
        &self.definitions
    }

    /// Current classification index.
    pub fn index(&self) -> &Arc<ClassificationIndex> {
        &self.index
    }

    /// Current styles.
    pub fn styles(&self) -> &[GradeStyle] {
        &self.styles
    }

    /// Current grade visibility.
    pub fn visibility(&self) -> &GradeVisibility {
        &self.visibility
    }

    /// Whether `grade` is both defined and visible.
    pub fn is_grade_enabled(&self, grade: GradeKey) -> bool {
        self.definitions.contains(grade) && self.visibility.is_enabled(grade)
    }

    /// Number of scans executed so far.
    pub fn scan_count(&self) -> u64 {
        self.scan_count
    }

    /// The rendering sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable access to the rendering sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// The visibility store.
    pub fn store(&self) -> &V {
        &self.store
    }

    // ---- internals ---------------------------------------------------------------------------

    fn is_active(&self, id: &DocumentId) -> bool {
        self.active.as_ref() == Some(id)
    }

    fn mark_pending(&mut self, id: &DocumentId) {
        if let Some(entry) = self.documents.get_mut(id)
            && entry.is_enabled()
        {
            entry.phase = DocumentPhase::Pending;
        }
    }

    fn run_scan(&mut self, id: &DocumentId) -> bool {
        if !self.is_active(id) {
            tracing::debug!("Dropping stale scan of {}: no longer active", id);
            return false;
        }
        let index = Arc::clone(&self.index);
        let Some(entry) = self.documents.get_mut(id) else {
            tracing::debug!("Dropping stale scan of {}: document closed", id);
            return false;
        };
        if !entry.is_enabled() {
            tracing::debug!("Dropping stale scan of {}: highlighting off", id);
            return false;
        }

        let ranges = scan_document(&entry.text, &index, &ScanOptions::for_index(&index));
        let edits = edits_for_scan(&ranges, &self.visibility);
        tracing::debug!(
            "Scanned {}: {} lines, {} highlighted characters",
            id,
            entry.text.line_count(),
            ranges.total()
        );
        entry.last_scan = Some(ranges);
        entry.phase = DocumentPhase::Active;
        self.scan_count += 1;

        self.sink.apply(id, edits);
        self.refresh_status();
        true
    }

    fn clear_document(&mut self, id: &DocumentId) {
        let grades: Vec<GradeKey> = self.definitions.defined_keys().collect();
        self.sink.apply(id, clear_edits(grades));
    }

    fn refresh_status(&mut self) {
        let status = self.compute_status();
        self.set_status(status);
    }

    fn compute_status(&self) -> CursorStatus {
        let Some(entry) = self.active.as_ref().and_then(|id| self.documents.get(id)) else {
            return CursorStatus::off();
        };
        if !entry.is_enabled() {
            return CursorStatus::off();
        }
        let grade = resolve_in_document(&entry.text, entry.cursor, &self.index);
        match (grade, entry.text.char_at(entry.cursor)) {
            (Some(grade), Some(ch)) if self.definitions.contains(grade) => {
                CursorStatus::classified(grade, ch, &self.definitions)
            }
            _ => CursorStatus::unknown(),
        }
    }

    fn set_status(&mut self, status: CursorStatus) {
        if self.status != status {
            self.status = status;
            self.sink.update_status(&self.status);
        }
    }
}
