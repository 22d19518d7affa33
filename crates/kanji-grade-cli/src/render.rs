//! Terminal output.

use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
};
use kanji_grade_core::{DocumentText, GradeKey};
use kanji_grade_highlight::{DocumentId, GradeStyle, MemorySink, parse_hex_rgb};
use std::collections::HashMap;
use std::io::{self, Write};

/// Grade of every highlighted `(line, column)` in `document`.
pub fn highlight_map(
    sink: &MemorySink,
    document: &DocumentId,
) -> HashMap<(usize, usize), GradeKey> {
    let mut map = HashMap::new();
    for grade in sink.highlighted_grades(document) {
        for range in sink.ranges(document, grade) {
            for column in range.start_column..range.end_column {
                map.insert((range.line, column), grade);
            }
        }
    }
    map
}

/// Terminal colors for one grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalStyle {
    /// Background.
    pub background: Option<Color>,
    /// Foreground.
    pub foreground: Option<Color>,
}

/// Map each grade's colors onto terminal RGB colors.
///
/// `colors` holds the configured `#rrggbb` color per grade; the opacity in [`GradeStyle`] does not
/// apply on a terminal, so it is blended against white instead.
pub fn terminal_styles(
    styles: &[GradeStyle],
    colors: &HashMap<GradeKey, String>,
    opacity: f32,
) -> HashMap<GradeKey, TerminalStyle> {
    styles
        .iter()
        .map(|style| {
            let background = colors
                .get(&style.grade)
                .and_then(|hex| parse_hex_rgb(hex))
                .map(|rgb| blend_with_white(rgb, opacity));
            let foreground = style
                .text_color
                .as_deref()
                .and_then(parse_hex_rgb)
                .map(|(r, g, b)| Color::Rgb { r, g, b });
            (
                style.grade,
                TerminalStyle {
                    background,
                    foreground,
                },
            )
        })
        .collect()
}

fn blend_with_white((r, g, b): (u8, u8, u8), alpha: f32) -> Color {
    let mix = |c: u8| (f32::from(c) * alpha + 255.0 * (1.0 - alpha)).round() as u8;
    Color::Rgb {
        r: mix(r),
        g: mix(g),
        b: mix(b),
    }
}

/// Print `text` with every highlighted character colored.
pub fn print_highlighted<W: Write>(
    out: &mut W,
    text: &DocumentText,
    highlights: &HashMap<(usize, usize), GradeKey>,
    styles: &HashMap<GradeKey, TerminalStyle>,
) -> io::Result<()> {
    for (line, content) in text.lines().enumerate() {
        for (column, ch) in content.chars().enumerate() {
            let style = highlights
                .get(&(line, column))
                .and_then(|grade| styles.get(grade));
            match style {
                Some(style) => {
                    if let Some(bg) = style.background {
                        queue!(out, SetBackgroundColor(bg))?;
                    }
                    if let Some(fg) = style.foreground {
                        queue!(out, SetForegroundColor(fg))?;
                    }
                    queue!(out, Print(ch), ResetColor)?;
                }
                None => queue!(out, Print(ch))?,
            }
        }
        queue!(out, Print('\n'))?;
    }
    out.flush()
}
