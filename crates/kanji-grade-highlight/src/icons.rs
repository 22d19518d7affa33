//! Grade button icons (24×24 SVG).

use crate::settings::{DEFAULT_TEXT_COLOR, HighlightSettings};
use kanji_grade_core::{GradeDefinitions, GradeKey};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fill used for grades missing from the definitions.
pub const UNDEFINED_FILL: &str = "#cccccc";

#[derive(Debug, Error)]
/// Errors produced while writing icons.
pub enum IconError {
    #[error("Failed to write icon {path}: {source}")]
    /// Creating the directory or writing a file failed.
    Io {
        /// Target path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
}

/// Render one icon.
///
/// A single ASCII digit is drawn slightly larger than any other label so that `1`..`6` fill the
/// square like the two-character labels do.
pub fn icon_svg(fill: &str, text_color: &str, text: &str) -> String {
    let is_digit = text.len() == 1 && text.bytes().all(|b| b.is_ascii_digit());
    let (font_size, y) = if is_digit {
        ("26.6667", "21.7")
    } else {
        ("24", "20.625")
    };
    format!(
        concat!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 24 24\">\n",
            "  <rect width=\"24\" height=\"24\" rx=\"4.8\" fill=\"{fill}\"/>\n",
            "  <text x=\"12\" y=\"{y}\" font-family=\"sans-serif\" font-weight=\"700\" ",
            "font-size=\"{font_size}\" fill=\"{text_color}\" text-anchor=\"middle\">",
            "{text}</text>\n",
            "</svg>\n",
        ),
        fill = escape_xml(fill),
        y = y,
        font_size = font_size,
        text_color = escape_xml(text_color),
        text = escape_xml(text),
    )
}

/// File name of a grade's icon.
pub fn icon_file_name(grade: GradeKey) -> String {
    format!("button_{}.svg", grade)
}

/// Write `button_<grade>.svg` for every grade key into `dir`, creating it if needed.
///
/// Undefined grades get a grey icon labelled with their key.
pub fn write_grade_icons(
    dir: &Path,
    definitions: &GradeDefinitions,
    settings: &HighlightSettings,
) -> Result<Vec<PathBuf>, IconError> {
    fs::create_dir_all(dir).map_err(|source| IconError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let text_color = settings.text_color().unwrap_or(DEFAULT_TEXT_COLOR);

    let mut written = Vec::with_capacity(GradeKey::ALL.len());
    for grade in GradeKey::ALL {
        let svg = match definitions.get(grade) {
            Some(definition) => icon_svg(
                settings.color_for(grade, &definition.color),
                text_color,
                &definition.icon_text,
            ),
            None => icon_svg(UNDEFINED_FILL, text_color, grade.as_str()),
        };
        let path = dir.join(icon_file_name(grade));
        fs::write(&path, svg).map_err(|source| IconError::Io {
            path: path.clone(),
            source,
        })?;
        written.push(path);
    }

    tracing::debug!("Wrote {} grade icons to {}", written.len(), dir.display());
    Ok(written)
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use kanji_grade_core::GradeDefinition;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_digit_label_uses_large_font() {
        let svg = icon_svg("#ff0000", "#000000", "1");
        assert!(svg.contains("font-size=\"26.6667\""));
        assert!(svg.contains("y=\"21.7\""));
        assert!(svg.contains("rx=\"4.8\" fill=\"#ff0000\""));
        assert!(svg.contains(">1</text>"));
    }

    #[test]
    fn test_wide_label_uses_regular_font() {
        for text in ["中", "12", "他", "g7"] {
            let svg = icon_svg("#fff", "#000", text);
            assert!(svg.contains("font-size=\"24\""), "{text}");
            assert!(svg.contains("y=\"20.625\""), "{text}");
        }
    }

    #[test]
    fn test_label_is_escaped() {
        let svg = icon_svg("#fff", "#000", "<&>");
        assert!(svg.contains(">&lt;&amp;&gt;</text>"));
    }

    #[test]
    fn test_write_grade_icons_covers_every_key() {
        let dir = tempfile::tempdir().unwrap();
        let definitions: GradeDefinitions =
            [GradeDefinition::with_defaults(GradeKey::G1, "一")].into_iter().collect();
        let settings = HighlightSettings::default();

        let written = write_grade_icons(dir.path(), &definitions, &settings).unwrap();
        assert_eq!(written.len(), GradeKey::ALL.len());

        let g1 = fs::read_to_string(dir.path().join("button_g1.svg")).unwrap();
        assert!(g1.contains(GradeKey::G1.default_color()));

        let g2 = fs::read_to_string(dir.path().join("button_g2.svg")).unwrap();
        assert!(g2.contains(UNDEFINED_FILL));
        assert!(g2.contains(">g2</text>"));
    }
}
