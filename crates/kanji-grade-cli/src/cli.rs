//! Command-line arguments.

use clap::Parser;
use kanji_grade_core::{GradeKey, Position};
use std::path::PathBuf;

/// Color the kanji of text files by the school grade that teaches them
#[derive(Parser, Debug)]
#[command(name = "kanji-grade", version, about)]
pub struct CliArgs {
    /// Text files to highlight
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<PathBuf>,

    /// Settings file (YAML or JSON)
    #[arg(short, long, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Grade definitions file, overriding the settings
    #[arg(short, long, value_name = "FILE")]
    pub definitions: Option<PathBuf>,

    /// Comma-separated grades to show (g1..g7, other); all by default
    #[arg(short, long, value_delimiter = ',', value_name = "GRADES")]
    pub grades: Option<Vec<GradeKey>>,

    /// Print per-grade counts instead of the colored text
    #[arg(long)]
    pub summary: bool,

    /// Report the grade of the character at LINE:COLUMN (1-based)
    #[arg(long, value_name = "LINE:COLUMN", value_parser = parse_cursor)]
    pub cursor: Option<Position>,

    /// Write grade button icons into DIR
    #[arg(long, value_name = "DIR")]
    pub icons: Option<PathBuf>,
}

/// Parse a 1-based `LINE:COLUMN` into a zero-based [`Position`].
pub fn parse_cursor(value: &str) -> Result<Position, String> {
    let (line, column) = value
        .split_once(':')
        .ok_or_else(|| format!("expected LINE:COLUMN, got '{}'", value))?;
    let line: usize = line
        .trim()
        .parse()
        .map_err(|_| format!("invalid line '{}'", line))?;
    let column: usize = column
        .trim()
        .parse()
        .map_err(|_| format!("invalid column '{}'", column))?;
    if line == 0 || column == 0 {
        return Err("LINE and COLUMN start at 1".to_string());
    }
    Ok(Position::new(line - 1, column - 1))
}
