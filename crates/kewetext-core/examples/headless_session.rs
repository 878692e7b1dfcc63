//! Headless editing session
//!
//! Drives an `Editor` with events and prints what a front-end would draw.

use kewetext_core::{Document, Editor, EditorConfig, EditorEvent, Motion, Outcome};
use kewetext_lang::c_syntax;

fn print_rows(editor: &Editor) {
    for view in editor.visible_rows() {
        let marks: String = view
            .cells()
            .map(|(_, hl, selected)| if selected { '^' } else { hl_mark(hl) })
            .collect();
        println!("  {:>3} | {}", view.index + 1, view.text);
        println!("      | {marks}");
    }
}

fn hl_mark(hl: kewetext_core::Highlight) -> char {
    use kewetext_core::Highlight::*;
    match hl {
        Normal => ' ',
        Number => 'n',
        String => 's',
        Comment | MultilineComment => 'c',
        Keyword1 => 'k',
        Keyword2 => 't',
        Match => 'M',
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== kewetext headless session ===\n");

    let mut doc = Document::from_text("int main(void) {\n\treturn 0;\n}\n", 8);
    doc.set_syntax(Some(c_syntax()));
    let mut editor = Editor::with_document(doc, EditorConfig::default().with_auto_indent(true));
    editor.set_screen_size(10, 40);

    println!("1. Loaded document:");
    print_rows(&editor);

    println!("\n2. Open a comment on the first line:");
    editor.handle(EditorEvent::Move(Motion::End))?;
    for ch in " /* start".chars() {
        editor.handle(EditorEvent::Insert(ch))?;
    }
    print_rows(&editor);

    println!("\n3. Search for \"return\":");
    editor.handle(EditorEvent::StartSearch)?;
    if let Outcome::Found(hit) = editor.handle(EditorEvent::SearchQuery("return".into()))? {
        println!("  match at row {}, column {}", hit.row + 1, hit.column);
    }
    print_rows(&editor);
    editor.handle(EditorEvent::Cancel)?;

    println!("\n4. Select to the end of the line:");
    editor.handle(EditorEvent::Move(Motion::Home))?;
    editor.handle(EditorEvent::Extend(Motion::End))?;
    print_rows(&editor);

    println!("\n5. Quit with unsaved changes:");
    loop {
        match editor.handle(EditorEvent::Quit)? {
            Outcome::QuitPending { remaining } => println!("  {remaining} more to quit"),
            Outcome::Quit => break,
            _ => {}
        }
    }
    println!("  bye");

    Ok(())
}
