//! Integration tests: editor session driving mm-core edits through the
//! store, undo stack, pointer and keyboard paths.

use mm_core::codec::deserialize;
use mm_core::id::NodeId;
use mm_editor::{ContentStatus, ExportArtifact, ExportFormat, MindMapEditor};
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;

const ROADMAP: &str = include_str!("fixtures/roadmap.json");

type Saves = Rc<RefCell<Vec<(String, bool)>>>;

fn session() -> (Saves, MindMapEditor<impl FnMut(&str, bool)>) {
    let saves: Saves = Rc::default();
    let sink = Rc::clone(&saves);
    let mut editor = MindMapEditor::new(move |text: &str, current: bool| {
        sink.borrow_mut().push((text.to_string(), current));
    });
    assert!(editor.receive_content(ROADMAP, ContentStatus::Idle));
    (saves, editor)
}

fn id(s: &str) -> NodeId {
    NodeId::intern(s)
}

fn plain_key<S: mm_editor::DocumentStore>(
    editor: &mut MindMapEditor<S>,
    key: &str,
) -> mm_editor::KeyOutcome {
    editor.handle_key(key, false, false, false, false)
}

// ─── Loading ────────────────────────────────────────────────────────────

#[test]
fn loading_never_saves() {
    let (saves, editor) = session();
    assert!(saves.borrow().is_empty());
    assert_eq!(editor.tree().len(), 4);
    assert!(!editor.can_undo());
}

#[test]
fn streaming_updates_overwrite_local_edits() {
    let (saves, mut editor) = session();
    assert!(editor.receive_content(ROADMAP, ContentStatus::Streaming));

    editor.add_child(id("q2"));
    assert_eq!(editor.tree().len(), 5);
    assert_eq!(saves.borrow().len(), 1);

    assert!(editor.receive_content(ROADMAP, ContentStatus::Streaming));
    assert_eq!(editor.tree(), &deserialize(ROADMAP));
    assert!(!editor.can_undo());
    assert_eq!(saves.borrow().len(), 1);
}

#[test]
fn foreign_root_id_survives_first_edit() {
    let saves: Saves = Rc::default();
    let sink = Rc::clone(&saves);
    let mut editor = MindMapEditor::new(move |text: &str, current: bool| {
        sink.borrow_mut().push((text.to_string(), current));
    });
    let generated = r#"{ "id": "central", "text": "Rust Learning", "x": 400, "y": 300,
        "children": [
            { "id": "n1", "text": "Ownership", "x": 550, "y": 300 },
            { "id": "n1", "text": "Traits", "x": 250, "y": 300 }
        ] }"#;
    assert!(editor.receive_content(generated, ContentStatus::Idle));
    assert_eq!(editor.tree().root().text, "Rust Learning");
    assert_eq!(editor.tree().len(), 3);

    assert!(editor.add_child(NodeId::root()).is_some());
    let saves = saves.borrow();
    assert_eq!(saves.len(), 1);
    let saved = &saves[0].0;
    assert!(saved.contains("Rust Learning"));
    assert!(saved.contains("Ownership"));
    assert!(saved.contains("Traits"));
    assert_eq!(deserialize(saved).len(), 4);
}

#[test]
fn reload_keeps_selection_only_when_node_survives() {
    let (_saves, mut editor) = session();
    editor.select(id("q1"));

    let without_q2 = mm_core::serialize(&deserialize(ROADMAP).delete_node(id("q2")));
    assert!(editor.receive_content(&without_q2, ContentStatus::Idle));
    assert_eq!(editor.selected(), Some(id("q1")));

    let without_q1 = mm_core::serialize(&deserialize(ROADMAP).delete_node(id("q1")));
    assert!(editor.receive_content(&without_q1, ContentStatus::Idle));
    assert_eq!(editor.selected(), None);
}

// ─── Pointer ────────────────────────────────────────────────────────────

#[test]
fn drag_commit_saves_once_and_undoes_in_one_step() {
    let (saves, mut editor) = session();

    assert!(editor.pointer_down(550.0, 300.0));
    assert_eq!(editor.selected(), Some(id("q1")));
    assert!(editor.is_dragging());

    for step in 1..=4 {
        let d = f64::from(step) * 5.0;
        assert!(editor.pointer_move(550.0 + d, 300.0 + d));
    }
    assert!(saves.borrow().is_empty());

    assert!(editor.pointer_up());
    assert_eq!(saves.borrow().len(), 1);
    let q1 = editor.tree().find(id("q1")).unwrap();
    assert_eq!(q1.position(), (570.0, 320.0));

    assert!(editor.undo());
    let q1 = editor.tree().find(id("q1")).unwrap();
    assert_eq!(q1.position(), (550.0, 300.0));
    assert!(!editor.can_undo());
    assert_eq!(saves.borrow().len(), 2);
}

#[test]
fn click_without_motion_records_nothing() {
    let (saves, mut editor) = session();
    editor.pointer_down(550.0, 300.0);
    assert!(!editor.pointer_up());
    assert!(saves.borrow().is_empty());
    assert!(!editor.can_undo());
}

#[test]
fn drag_back_to_start_saves_nothing() {
    let (saves, mut editor) = session();
    assert!(editor.pointer_down(550.0, 300.0));
    assert!(editor.pointer_move(620.0, 360.0));
    assert!(editor.pointer_move(550.0, 300.0));
    assert!(!editor.pointer_up());
    assert!(saves.borrow().is_empty());
    assert!(!editor.can_undo());
    assert_eq!(editor.tree(), &deserialize(ROADMAP));
}

#[test]
fn drag_keeps_grab_offset() {
    let (_saves, mut editor) = session();
    editor.pointer_down(560.0, 310.0);
    editor.pointer_move(600.0, 350.0);
    editor.pointer_up();
    let q1 = editor.tree().find(id("q1")).unwrap();
    assert_eq!(q1.position(), (590.0, 340.0));
}

#[test]
fn toggle_hit_collapses_subtree() {
    let (saves, mut editor) = session();
    assert!(editor.pointer_down(445.0, 300.0));
    assert!(editor.tree().root().collapsed);
    assert_eq!(editor.tree().flatten().len(), 1);
    assert!(!editor.is_dragging());
    assert_eq!(saves.borrow().len(), 1);
}

#[test]
fn background_click_clears_selection() {
    let (_saves, mut editor) = session();
    editor.select(id("q1"));
    assert!(editor.pointer_down(50.0, 50.0));
    assert_eq!(editor.selected(), None);
    assert!(!editor.pointer_down(50.0, 50.0));
}

#[test]
fn pointer_respects_viewport() {
    let (_saves, mut editor) = session();
    editor.viewport_mut().zoom = 2.0;
    // Surface (800, 600) maps to world (400, 300) at zoom 2.
    editor.pointer_down(800.0, 600.0);
    assert_eq!(editor.selected(), Some(NodeId::root()));
}

// ─── Keyboard ───────────────────────────────────────────────────────────

#[test]
fn tab_adds_child_and_delete_removes_it() {
    let (saves, mut editor) = session();
    assert_eq!(plain_key(&mut editor, "Tab").changed, false);

    editor.select(id("q2"));
    let out = plain_key(&mut editor, "Tab");
    assert!(out.handled && out.changed);
    let created = editor.selected().unwrap();
    assert_eq!(editor.tree().parent_of(created).unwrap().id, id("q2"));

    let out = plain_key(&mut editor, "Delete");
    assert!(out.changed);
    assert!(!editor.tree().contains(created));
    assert_eq!(editor.selected(), None);
    assert_eq!(saves.borrow().len(), 2);
}

#[test]
fn undo_redo_shortcuts() {
    let (_saves, mut editor) = session();
    editor.collapse_all();
    assert!(editor.handle_key("z", true, false, false, false).changed);
    assert!(!editor.tree().find(id("q1")).unwrap().collapsed);
    assert!(editor.handle_key("z", false, true, false, true).changed);
    assert!(editor.tree().find(id("q1")).unwrap().collapsed);

    assert!(plain_key(&mut editor, "e").changed);
    assert!(!editor.tree().find(id("q1")).unwrap().collapsed);
}

#[test]
fn zoom_shortcuts_clamp() {
    let (saves, mut editor) = session();
    for _ in 0..10 {
        editor.handle_key("=", true, false, false, false);
    }
    assert_eq!(editor.viewport().zoom, 3.0);
    for _ in 0..20 {
        editor.handle_key("-", false, false, false, true);
    }
    assert_eq!(editor.viewport().zoom, 0.3);
    editor.handle_key("0", true, false, false, false);
    assert_eq!(editor.viewport().zoom, 1.0);
    assert!(saves.borrow().is_empty());
}

// ─── Inline text editing ────────────────────────────────────────────────

#[test]
fn enter_commits_inline_edit() {
    let (saves, mut editor) = session();
    assert!(editor.double_click(550.0, 300.0));
    assert_eq!(editor.editing().unwrap().buffer, "Q1");

    editor.set_edit_text("First quarter");
    // Shortcuts are suspended while typing.
    assert!(!plain_key(&mut editor, "Tab").handled);

    assert!(plain_key(&mut editor, "Enter").changed);
    assert_eq!(editor.tree().find(id("q1")).unwrap().text, "First quarter");
    assert_eq!(saves.borrow().len(), 1);
}

#[test]
fn escape_cancels_inline_edit() {
    let (saves, mut editor) = session();
    editor.select(id("q1"));
    plain_key(&mut editor, "F2");
    editor.set_edit_text("discarded");
    let out = plain_key(&mut editor, "Escape");
    assert!(out.handled && !out.changed);
    assert!(editor.editing().is_none());
    assert_eq!(editor.tree().find(id("q1")).unwrap().text, "Q1");
    assert!(saves.borrow().is_empty());
}

#[test]
fn blur_commits_inline_edit() {
    let (_saves, mut editor) = session();
    editor.begin_edit(id("q2"));
    editor.set_edit_text("Later");
    assert!(editor.pointer_down(50.0, 50.0));
    assert_eq!(editor.tree().find(id("q2")).unwrap().text, "Later");
}

// ─── Export ─────────────────────────────────────────────────────────────

#[test]
fn svg_export_is_read_only() {
    let (saves, mut editor) = session();
    editor.select(id("q1"));
    let before = editor.tree().clone();

    let artifact = editor.export(ExportFormat::Svg).unwrap();
    assert_eq!(artifact.file_name(), "mindmap.svg");
    let ExportArtifact::Svg(svg) = artifact else {
        panic!("expected svg");
    };
    assert!(svg.contains("data-id=\"q1\""));
    assert!(svg.contains("#fbbf24"));
    assert!(editor.tree().same_tree(&before));
    assert!(saves.borrow().is_empty());
}

#[test]
fn png_export_has_signature() {
    let (_saves, editor) = session();
    let artifact = editor.export(ExportFormat::Png).unwrap();
    assert_eq!(artifact.mime_type(), "image/png");
    assert_eq!(&artifact.as_bytes()[..8], b"\x89PNG\r\n\x1a\n");
}
