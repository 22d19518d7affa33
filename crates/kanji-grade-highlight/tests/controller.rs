use kanji_grade_core::{GradeKey, GradeVisibility, HighlightRange, Position, TextEdit};
use kanji_grade_highlight::{
    ButtonLabel, DocumentId, DocumentPhase, HighlightController, HighlightSettings,
    JsonFileVisibilityStore, MemorySink, MemoryVisibilityStore, VisibilityStore,
};
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;
use std::fs;
use std::time::{Duration, Instant};

type Controller = HighlightController<MemorySink, MemoryVisibilityStore>;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn controller() -> Controller {
    HighlightController::activate(
        HighlightSettings::default(),
        MemorySink::new(),
        MemoryVisibilityStore::new(),
    )
}

/// Open `text` as the active, enabled document and run the initial scan.
fn open_enabled(controller: &mut Controller, id: &str, text: &str, t0: Instant) -> DocumentId {
    let doc = DocumentId::new(id);
    controller.on_document_opened(doc.clone(), text, t0);
    controller.on_active_document_changed(Some(doc.clone()), t0);
    assert!(controller.toggle_file_enabled(&doc, t0));
    assert!(controller.tick(t0 + ms(1000)));
    doc
}

#[test]
fn test_initial_scan_highlights_by_grade() {
    let mut controller = controller();
    let t0 = Instant::now();
    let doc = open_enabled(&mut controller, "a", "山に登る\n漢字", t0);

    let sink = controller.sink();
    assert_eq!(
        sink.ranges(&doc, GradeKey::G1),
        &[HighlightRange::at(0, 0), HighlightRange::at(1, 1)]
    );
    assert_eq!(
        sink.ranges(&doc, GradeKey::G3),
        &[HighlightRange::at(0, 2), HighlightRange::at(1, 0)]
    );
    assert_eq!(controller.phase(&doc), DocumentPhase::Active);
    assert_eq!(controller.scan_count(), 1);
}

#[test]
fn test_edit_burst_runs_a_single_scan() {
    let mut controller = controller();
    let t0 = Instant::now();
    let doc = open_enabled(&mut controller, "a", "", t0);
    let scans_before = controller.scan_count();

    let mut now = t0 + ms(2000);
    for (offset, ch) in "山川海".chars().enumerate() {
        controller
            .on_document_edited(&doc, &[TextEdit::insert(offset, ch.to_string())], now)
            .unwrap();
        assert_eq!(controller.phase(&doc), DocumentPhase::Pending);
        now += ms(30);
        assert!(!controller.tick(now));
    }

    // Quiet period measured from the last edit.
    assert!(!controller.tick(now + ms(40)));
    assert!(controller.tick(now + ms(60)));
    assert_eq!(controller.scan_count(), scans_before + 1);
    assert_eq!(controller.sink().ranges(&doc, GradeKey::G1).len(), 2);
    assert_eq!(controller.sink().ranges(&doc, GradeKey::G2), &[HighlightRange::at(0, 2)]);
}

#[test]
fn test_disable_clears_immediately_and_cancels_pending_scan() {
    let mut controller = controller();
    let t0 = Instant::now();
    let doc = open_enabled(&mut controller, "a", "山", t0);
    controller
        .on_document_edited(&doc, &[TextEdit::insert(1, "川")], t0 + ms(2000))
        .unwrap();

    assert!(!controller.toggle_file_enabled(&doc, t0 + ms(2010)));
    assert_eq!(controller.sink().total_ranges(&doc), 0);
    assert_eq!(controller.phase(&doc), DocumentPhase::Off);
    assert_eq!(controller.next_deadline(), None);
    assert!(!controller.tick(t0 + ms(5000)));
    assert_eq!(controller.status().button, ButtonLabel::Off);
}

#[test]
fn test_edits_to_disabled_documents_do_not_schedule() {
    let mut controller = controller();
    let doc = DocumentId::new("a");
    let t0 = Instant::now();
    controller.on_document_opened(doc.clone(), "", t0);
    controller.on_active_document_changed(Some(doc.clone()), t0);
    controller
        .on_document_edited(&doc, &[TextEdit::insert(0, "山")], t0)
        .unwrap();

    assert_eq!(controller.next_deadline(), None);
    assert_eq!(controller.document_text(&doc).unwrap().to_string(), "山");
}

#[test]
fn test_visibility_change_redispatches_without_rescan() {
    let mut controller = controller();
    let t0 = Instant::now();
    let doc = open_enabled(&mut controller, "a", "山海", t0);
    let scans = controller.scan_count();

    controller.set_grade_visibility([GradeKey::G2]);
    assert_eq!(controller.scan_count(), scans);
    assert!(controller.sink().ranges(&doc, GradeKey::G1).is_empty());
    assert_eq!(controller.sink().ranges(&doc, GradeKey::G2), &[HighlightRange::at(0, 1)]);
    assert_eq!(
        controller.store().stored(),
        Some(&GradeVisibility::from_selection([GradeKey::G2]))
    );

    controller.set_grade_visibility(GradeKey::ALL);
    assert_eq!(controller.scan_count(), scans);
    assert_eq!(controller.sink().ranges(&doc, GradeKey::G1), &[HighlightRange::at(0, 0)]);
    assert!(controller.last_scan(&doc).is_some());
}

#[test]
fn test_visibility_is_restored_on_activation() {
    let hidden = GradeVisibility::from_selection([GradeKey::G3]);
    let mut controller = HighlightController::activate(
        HighlightSettings::default(),
        MemorySink::new(),
        MemoryVisibilityStore::with_visibility(hidden),
    );
    let t0 = Instant::now();
    let doc = DocumentId::new("a");
    controller.on_document_opened(doc.clone(), "山登", t0);
    controller.on_active_document_changed(Some(doc.clone()), t0);
    controller.toggle_file_enabled(&doc, t0);
    controller.flush();

    assert!(!controller.is_grade_enabled(GradeKey::G1));
    assert!(controller.sink().ranges(&doc, GradeKey::G1).is_empty());
    assert_eq!(controller.sink().ranges(&doc, GradeKey::G3), &[HighlightRange::at(0, 1)]);

    // The hidden grade is still classified; only its dispatch is suppressed.
    let scan = controller.last_scan(&doc).unwrap();
    assert_eq!(scan.get(GradeKey::G1), &[HighlightRange::at(0, 0)]);
    assert_eq!(scan.get(GradeKey::G3), &[HighlightRange::at(0, 1)]);
}

#[test]
fn test_visibility_persists_to_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state").join("visibility.json");

    let mut controller = HighlightController::activate(
        HighlightSettings::default(),
        MemorySink::new(),
        JsonFileVisibilityStore::new(&path),
    );
    controller.set_grade_visibility([GradeKey::G1, GradeKey::Other]);

    let reloaded = JsonFileVisibilityStore::new(&path).load().unwrap().unwrap();
    assert!(reloaded.is_enabled(GradeKey::G1));
    assert!(reloaded.is_enabled(GradeKey::Other));
    assert!(!reloaded.is_enabled(GradeKey::G2));
}

#[test]
fn test_only_the_active_document_is_scanned() {
    let mut controller = controller();
    let t0 = Instant::now();
    let a = open_enabled(&mut controller, "a", "山", t0);
    let b = DocumentId::new("b");
    controller.on_document_opened(b.clone(), "川", t0 + ms(2000));
    controller.on_active_document_changed(Some(b.clone()), t0 + ms(2000));
    controller.toggle_file_enabled(&b, t0 + ms(2000));

    // An edit to `a` while `b` is active is recorded but not scanned.
    controller
        .on_document_edited(&a, &[TextEdit::insert(1, "海")], t0 + ms(2010))
        .unwrap();
    assert_eq!(controller.phase(&a), DocumentPhase::Pending);

    assert!(controller.tick(t0 + ms(3000)));
    assert_eq!(controller.sink().ranges(&b, GradeKey::G1), &[HighlightRange::at(0, 0)]);
    assert!(controller.sink().ranges(&a, GradeKey::G2).is_empty());

    // Switching back rescans `a`.
    controller.on_active_document_changed(Some(a.clone()), t0 + ms(4000));
    assert!(controller.tick(t0 + ms(5000)));
    assert_eq!(controller.sink().ranges(&a, GradeKey::G2), &[HighlightRange::at(0, 1)]);
}

#[test]
fn test_switching_away_drops_pending_scan() {
    let mut controller = controller();
    let t0 = Instant::now();
    let a = open_enabled(&mut controller, "a", "", t0);
    let scans = controller.scan_count();
    controller
        .on_document_edited(&a, &[TextEdit::insert(0, "山")], t0 + ms(2000))
        .unwrap();

    let b = DocumentId::new("b");
    controller.on_document_opened(b.clone(), "川", t0 + ms(2010));
    controller.on_active_document_changed(Some(b), t0 + ms(2010));

    assert_eq!(controller.next_deadline(), None);
    assert!(!controller.tick(t0 + ms(9000)));
    assert_eq!(controller.scan_count(), scans);
}

#[test]
fn test_closing_forgets_enabled_state() {
    let mut controller = controller();
    let t0 = Instant::now();
    let doc = open_enabled(&mut controller, "a", "山", t0);

    assert_eq!(controller.sink().total_ranges(&doc), 1);

    controller.on_document_closed(&doc);
    assert!(!controller.is_file_enabled(&doc));
    assert_eq!(controller.sink().total_ranges(&doc), 0);
    assert_eq!(controller.active_document(), None);
    assert_eq!(controller.status().button, ButtonLabel::Off);

    controller.on_document_opened(doc.clone(), "山", t0 + ms(2000));
    assert_eq!(controller.phase(&doc), DocumentPhase::Off);
    assert_eq!(controller.sink().total_ranges(&doc), 0);
}

#[test]
fn test_closing_a_disabled_document_dispatches_nothing() {
    let mut controller = controller();
    let doc = DocumentId::new("a");
    let t0 = Instant::now();
    controller.on_document_opened(doc.clone(), "山", t0);
    let calls = controller.sink().apply_calls();

    controller.on_document_closed(&doc);
    assert_eq!(controller.sink().apply_calls(), calls);
}

#[test]
fn test_reopening_an_active_document_rescans_new_text() {
    let mut controller = controller();
    let t0 = Instant::now();
    let doc = open_enabled(&mut controller, "a", "山", t0);
    let scans = controller.scan_count();

    controller.on_document_opened(doc.clone(), "海", t0 + ms(2000));
    assert_eq!(controller.phase(&doc), DocumentPhase::Pending);
    assert!(controller.next_deadline().is_some());

    assert!(controller.tick(t0 + ms(3000)));
    assert_eq!(controller.scan_count(), scans + 1);
    assert_eq!(controller.phase(&doc), DocumentPhase::Active);
    assert!(controller.sink().ranges(&doc, GradeKey::G1).is_empty());
    assert_eq!(controller.sink().ranges(&doc, GradeKey::G2), &[HighlightRange::at(0, 0)]);
}

#[test]
fn test_reopening_an_inactive_document_waits_for_focus() {
    let mut controller = controller();
    let t0 = Instant::now();
    let a = open_enabled(&mut controller, "a", "山", t0);
    let b = DocumentId::new("b");
    controller.on_document_opened(b.clone(), "", t0 + ms(2000));
    controller.on_active_document_changed(Some(b), t0 + ms(2000));

    controller.on_document_opened(a.clone(), "海", t0 + ms(2010));
    assert_eq!(controller.phase(&a), DocumentPhase::Pending);
    assert_eq!(controller.next_deadline(), None);
}

#[test]
fn test_cursor_status_tracks_selection() {
    let mut controller = controller();
    let t0 = Instant::now();
    let doc = open_enabled(&mut controller, "a", "山に登る", t0);

    let status = controller.on_selection_changed(&doc, Position::new(0, 2)).clone();
    assert_eq!(status.grade(), Some(GradeKey::G3));
    assert_eq!(status.tooltip().as_deref(), Some("登 は 3年生の漢字"));
    assert_eq!(controller.sink().status(), &status);

    let status = controller.on_selection_changed(&doc, Position::new(0, 1));
    assert_eq!(status.button, ButtonLabel::Unknown);

    let status = controller.on_selection_changed(&doc, Position::new(0, 40));
    assert_eq!(status.button, ButtonLabel::Unknown);
}

#[test]
fn test_cursor_on_unlisted_kanji_reports_other() {
    let mut controller = controller();
    let t0 = Instant::now();
    let doc = open_enabled(&mut controller, "a", "鬱", t0);

    assert_eq!(controller.sink().ranges(&doc, GradeKey::Other), &[HighlightRange::at(0, 0)]);
    let status = controller.on_selection_changed(&doc, Position::new(0, 0));
    assert_eq!(status.grade(), Some(GradeKey::Other));
}

#[test]
fn test_configuration_change_rebuilds_and_rescans() {
    let dir = tempfile::tempdir().unwrap();
    let definitions = dir.path().join("grades.json");
    fs::write(
        &definitions,
        r#"{"grades":[{"key":"g1","characters":"海"},{"key":"other"}]}"#,
    )
    .unwrap();

    let mut controller = controller();
    let t0 = Instant::now();
    let doc = open_enabled(&mut controller, "a", "山海", t0);
    let rebuilds = controller.sink().style_rebuilds();

    let settings = HighlightSettings {
        definitions_path: Some(definitions),
        colors: BTreeMap::from([(GradeKey::G1, "#000080".to_string())]),
        debounce_ms: 10,
        ..HighlightSettings::default()
    };
    controller.on_configuration_changed(settings, t0 + ms(2000));

    assert_eq!(controller.sink().style_rebuilds(), rebuilds + 1);
    assert_eq!(controller.sink().styles().len(), 2);
    assert_eq!(
        controller.sink().style(GradeKey::G1).map(|style| style.background.as_str()),
        Some("rgba(0, 0, 128, 0.6)")
    );
    assert_eq!(controller.phase(&doc), DocumentPhase::Pending);

    assert!(controller.tick(t0 + ms(2010)));
    assert_eq!(controller.sink().ranges(&doc, GradeKey::G1), &[HighlightRange::at(0, 1)]);
    assert_eq!(controller.sink().ranges(&doc, GradeKey::Other), &[HighlightRange::at(0, 0)]);
    assert!(controller.sink().ranges(&doc, GradeKey::G2).is_empty());
}

#[test]
fn test_broken_definitions_fall_back_to_builtin() {
    let dir = tempfile::tempdir().unwrap();
    let definitions = dir.path().join("grades.json");
    fs::write(&definitions, "{ not json").unwrap();

    let settings = HighlightSettings {
        definitions_path: Some(definitions),
        ..HighlightSettings::default()
    };
    let controller = HighlightController::activate(
        settings,
        MemorySink::new(),
        MemoryVisibilityStore::new(),
    );
    assert_eq!(controller.definitions().len(), GradeKey::COUNT);
    assert_eq!(controller.index().grade_of('山'), Some(GradeKey::G1));
}

#[test]
fn test_deactivate_clears_enabled_documents() {
    let mut controller = controller();
    let t0 = Instant::now();
    let doc = open_enabled(&mut controller, "a", "山海", t0);
    assert_eq!(controller.sink().total_ranges(&doc), 2);

    controller.deactivate();
    assert_eq!(controller.sink().total_ranges(&doc), 0);
    assert_eq!(controller.active_document(), None);
    assert_eq!(controller.next_deadline(), None);
}
