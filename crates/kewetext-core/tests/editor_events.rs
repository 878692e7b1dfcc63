use kewetext_core::{
    Document, Editor, EditorConfig, EditorEvent, Highlight, Motion, Outcome, Position,
};
use kewetext_lang::{builtin_syntaxes, select_syntax};
use pretty_assertions::assert_eq;

fn c_editor(text: &str) -> Editor {
    let mut doc = Document::from_text(text, 8);
    doc.set_syntax(select_syntax(&builtin_syntaxes(), "main.c").cloned());
    Editor::with_document(doc, EditorConfig::default())
}

fn send(editor: &mut Editor, events: impl IntoIterator<Item = EditorEvent>) -> Vec<Outcome> {
    events
        .into_iter()
        .map(|event| editor.handle(event).unwrap())
        .collect()
}

fn type_str(editor: &mut Editor, text: &str) {
    send(editor, text.chars().map(EditorEvent::Insert));
}

#[test]
fn test_typing_block_comment_through_events() {
    let mut ed = c_editor("int a;\nint b;\nint c;\n");
    type_str(&mut ed, "/*");
    let open: Vec<bool> = ed.document().rows().iter().map(|r| r.open_comment()).collect();
    assert_eq!(open, vec![true, true, true]);

    send(
        &mut ed,
        [EditorEvent::Move(Motion::Down), EditorEvent::Move(Motion::End)],
    );
    type_str(&mut ed, "*/");
    let open: Vec<bool> = ed.document().rows().iter().map(|r| r.open_comment()).collect();
    assert_eq!(open, vec![true, false, false]);
    assert_eq!(ed.document().row(2).unwrap().highlight()[0], Highlight::Keyword2);
}

#[test]
fn test_visible_rows_show_selection_without_cursor_cell() {
    let mut ed = c_editor("abcdef\nxyz\n");
    send(&mut ed, [EditorEvent::Move(Motion::Right)]);
    send(&mut ed, std::iter::repeat_n(EditorEvent::Extend(Motion::Right), 3));

    let rows = ed.visible_rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].selected, vec![false, true, true, true, false, false]);
    assert!(rows[1].selected.iter().all(|s| !s));

    send(&mut ed, [EditorEvent::Cancel]);
    assert!(ed.visible_rows()[0].selected.iter().all(|s| !s));
}

#[test]
fn test_search_overlay_is_visible_until_cancel() {
    let mut ed = c_editor("int a;\nreturn a;\n");
    let outcomes = send(
        &mut ed,
        [
            EditorEvent::StartSearch,
            EditorEvent::SearchQuery("ret".to_string()),
        ],
    );
    assert!(matches!(outcomes[1], Outcome::Found(hit) if hit.row == 1));
    assert_eq!(ed.search_query(), Some("ret"));
    // The match row is scrolled to the top.
    let rows = ed.visible_rows();
    assert_eq!(rows[0].index, 1);
    assert_eq!(rows[0].highlight[..3].to_vec(), vec![Highlight::Match; 3]);

    send(&mut ed, [EditorEvent::Cancel]);
    assert_eq!(ed.cursor(), Position::new(0, 0));
    assert_eq!(
        ed.visible_rows()[1].highlight[..6].to_vec(),
        vec![Highlight::Keyword1; 6]
    );
}

#[test]
fn test_editing_during_search_accepts_position() {
    let mut ed = c_editor("alpha\nbeta\n");
    send(
        &mut ed,
        [
            EditorEvent::StartSearch,
            EditorEvent::SearchQuery("et".to_string()),
            EditorEvent::Insert('!'),
        ],
    );
    assert!(!ed.is_searching());
    assert_eq!(ed.document().to_text(), "alpha\nb!eta\n");
    assert!(!ed.search().has_overlay());
}

#[test]
fn test_saved_document_quits_immediately() {
    let mut ed = c_editor("x\n");
    type_str(&mut ed, "y");
    assert_eq!(
        ed.handle(EditorEvent::Quit).unwrap(),
        Outcome::QuitPending { remaining: 2 }
    );
    ed.document_mut().mark_saved();
    assert_eq!(ed.handle(EditorEvent::Quit).unwrap(), Outcome::Quit);
}

#[test]
fn test_horizontal_scroll_follows_cursor() {
    let mut ed = c_editor("\tabcdefghijklmnop\n");
    ed.set_screen_size(5, 10);
    send(&mut ed, [EditorEvent::Move(Motion::End)]);
    assert_eq!(ed.render_x(), 24);
    assert_eq!(ed.col_offset(), 15);
    let rows = ed.visible_rows();
    assert_eq!(rows[0].text, "hijklmnop");

    send(&mut ed, [EditorEvent::Move(Motion::Home)]);
    assert_eq!(ed.col_offset(), 0);
}

#[test]
fn test_replace_document_resets_state() {
    let mut ed = c_editor("one\ntwo\n");
    send(&mut ed, [EditorEvent::Move(Motion::Down), EditorEvent::Extend(Motion::End)]);
    ed.replace_document(Document::from_text("fresh\n", 4));
    assert_eq!(ed.cursor(), Position::default());
    assert!(!ed.selection().is_active());
    assert_eq!(ed.document().tab_stop(), 8);
    assert_eq!(ed.document().len(), 1);
}
