#![warn(missing_docs)]
//! `kanji-grade-highlight` - debounced per-document highlighting on top of `kanji-grade-core`.
//!
//! This crate owns the stateful half of the highlighter: settings, styles, the per-file opt-in,
//! debounced rescans, persisted grade visibility and the cursor status. Rendering is delegated to
//! a host-implemented [`RenderSink`].

pub mod controller;
pub mod debounce;
pub mod event;
pub mod icons;
pub mod settings;
pub mod sink;
pub mod status;
pub mod style;
pub mod visibility;

pub use controller::{DocumentId, DocumentPhase, HighlightController};
pub use debounce::DebounceTimer;
pub use event::HighlightEvent;
pub use icons::{IconError, icon_svg, write_grade_icons};
pub use settings::{HighlightSettings, SettingsError};
pub use sink::{MemorySink, RenderSink};
pub use status::{ButtonLabel, CursorStatus};
pub use style::{GradeStyle, build_styles, hex_to_rgba, parse_hex_rgb};
pub use visibility::{
    JsonFileVisibilityStore, MemoryVisibilityStore, VisibilityError, VisibilityStore,
};
