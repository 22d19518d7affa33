//! Per-grade render styles derived from definitions and settings.

use crate::settings::HighlightSettings;
use kanji_grade_core::{GradeDefinitions, GradeKey};

/// Corner radius applied to every highlight.
pub const BORDER_RADIUS_PX: u8 = 3;

/// How one grade's highlighting is drawn. The renderer keeps one handle per style.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeStyle {
    /// Grade this style belongs to.
    pub grade: GradeKey,
    /// Background color, `rgba(r, g, b, a)` when the configured color is `#rrggbb`.
    pub background: String,
    /// Text color drawn over highlighted characters, if any.
    pub text_color: Option<String>,
    /// Corner radius in pixels.
    pub border_radius_px: u8,
}

/// Parse `#rrggbb` (the `#` is optional) into RGB components.
pub fn parse_hex_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.trim();
    let digits = digits.strip_prefix('#').unwrap_or(digits);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let n = u32::from_str_radix(digits, 16).ok()?;
    Some((((n >> 16) & 0xff) as u8, ((n >> 8) & 0xff) as u8, (n & 0xff) as u8))
}

/// `#rrggbb` -> `rgba(r, g, b, alpha)`. Anything else is returned unchanged.
pub fn hex_to_rgba(hex: &str, alpha: f32) -> String {
    match parse_hex_rgb(hex) {
        Some((r, g, b)) => format!("rgba({r}, {g}, {b}, {alpha})"),
        None => hex.to_string(),
    }
}

/// Build one style per defined grade, in canonical order.
pub fn build_styles(
    definitions: &GradeDefinitions,
    settings: &HighlightSettings,
) -> Vec<GradeStyle> {
    let opacity = settings.opacity();
    let text_color = settings.text_color().map(str::to_string);

    definitions
        .iter()
        .map(|def| GradeStyle {
            grade: def.key,
            background: hex_to_rgba(settings.color_for(def.key, &def.color), opacity),
            text_color: text_color.clone(),
            border_radius_px: BORDER_RADIUS_PX,
        })
        .collect()
}
