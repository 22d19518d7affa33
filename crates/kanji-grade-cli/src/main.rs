//! `kanji-grade` - color the kanji of text files by school grade.
//!
//! # Usage
//!
//! ```bash
//! kanji-grade notes.txt
//! kanji-grade --grades g1,g2,other --settings settings.yaml notes.txt
//! kanji-grade --summary --cursor 3:5 notes.txt
//! kanji-grade --icons media/ notes.txt
//! ```
//!
//! Logging follows `RUST_LOG` (default `warn`).

mod cli;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use cli::CliArgs;
use kanji_grade_core::{DocumentText, GradeKey, GradeVisibility};
use kanji_grade_highlight::{
    DocumentId, HighlightController, HighlightSettings, MemorySink, MemoryVisibilityStore,
    write_grade_icons,
};
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

type Controller = HighlightController<MemorySink, MemoryVisibilityStore>;

fn main() -> Result<()> {
    init_tracing();
    let args = CliArgs::parse();

    let mut settings = match &args.settings {
        Some(path) => HighlightSettings::load(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => HighlightSettings::default(),
    };
    if let Some(path) = &args.definitions {
        settings.definitions_path = Some(path.clone());
    }

    let store = match &args.grades {
        Some(grades) => MemoryVisibilityStore::with_visibility(GradeVisibility::from_selection(
            grades.iter().copied(),
        )),
        None => MemoryVisibilityStore::new(),
    };
    let mut controller = HighlightController::activate(settings, MemorySink::new(), store);

    if let Some(dir) = &args.icons {
        let written = write_grade_icons(dir, controller.definitions(), controller.settings())
            .context("Failed to write grade icons")?;
        eprintln!("Wrote {} icons to {}", written.len(), dir.display());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for path in &args.files {
        let document = highlight_file(&mut controller, path)?;
        if args.files.len() > 1 {
            writeln!(out, "==> {} <==", path.display())?;
        }
        if args.summary {
            print_summary(&mut out, &controller, &document)?;
        } else {
            print_document(&mut out, &controller, &document)?;
        }
        if let Some(position) = args.cursor {
            let status = controller.on_selection_changed(&document, position);
            let report = status.tooltip().unwrap_or_else(|| "-".to_string());
            writeln!(out, "{}:{}: {}", position.line + 1, position.column + 1, report)?;
        }
        controller.on_document_closed(&document);
    }

    controller.deactivate();
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .init();
}

/// Open `path` as the active, enabled document and scan it.
fn highlight_file(controller: &mut Controller, path: &Path) -> Result<DocumentId> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let document = DocumentId::new(path.display().to_string());
    let now = Instant::now();

    controller.on_document_opened(document.clone(), &text, now);
    controller.on_active_document_changed(Some(document.clone()), now);
    controller.toggle_file_enabled(&document, now);
    controller.flush();
    Ok(document)
}

fn print_document<W: Write>(
    out: &mut W,
    controller: &Controller,
    document: &DocumentId,
) -> Result<()> {
    let Some(text) = controller.document_text(document) else {
        return Ok(());
    };
    let colors: HashMap<GradeKey, String> = controller
        .definitions()
        .iter()
        .map(|def| {
            let color = controller.settings().color_for(def.key, &def.color);
            (def.key, color.to_string())
        })
        .collect();
    let styles =
        render::terminal_styles(controller.styles(), &colors, controller.settings().opacity());
    let highlights = render::highlight_map(controller.sink(), document);
    render::print_highlighted(out, text, &highlights, &styles)?;
    Ok(())
}

fn print_summary<W: Write>(
    out: &mut W,
    controller: &Controller,
    document: &DocumentId,
) -> Result<()> {
    let sink = controller.sink();
    let chars = controller
        .document_text(document)
        .map(DocumentText::char_count)
        .unwrap_or(0);
    writeln!(out, "{} chars", chars)?;
    for grade in GradeKey::ALL {
        if !controller.is_grade_enabled(grade) {
            continue;
        }
        let count = sink.ranges(document, grade).len();
        writeln!(
            out,
            "  {:<6} {:>6}  {}",
            grade.as_str(),
            count,
            controller.definitions().label_for(grade)
        )?;
    }
    Ok(())
}
