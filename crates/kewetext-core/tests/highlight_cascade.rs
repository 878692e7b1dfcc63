//! Multi-line comment continuation across rows.

use kewetext_core::{Document, Highlight};
use kewetext_lang::{CommentConfig, HighlightFlags, SyntaxDescriptor, c_syntax};
use pretty_assertions::assert_eq;

use Highlight::{Keyword1 as K1, Keyword2 as K2, MultilineComment as M, Normal as N};

fn syntax() -> SyntaxDescriptor {
    SyntaxDescriptor::new("test")
        .with_keywords(["still", "code|"])
        .with_comments(CommentConfig::line_and_block("//", "/*", "*/"))
        .with_flags(HighlightFlags::ALL)
}

fn doc(text: &str) -> Document {
    let mut doc = Document::from_text(text, 8);
    doc.set_syntax(Some(syntax()));
    doc
}

fn hl(doc: &Document, row: usize) -> Vec<Highlight> {
    doc.row(row).unwrap().highlight().to_vec()
}

fn open(doc: &Document) -> Vec<bool> {
    doc.rows().iter().map(|r| r.open_comment()).collect()
}

#[test]
fn test_comment_spans_three_rows() {
    let doc = doc("/* start\nstill open\nend */ code\n");

    assert_eq!(open(&doc), vec![true, true, false]);
    assert_eq!(hl(&doc, 0), vec![M; 8]);
    assert_eq!(hl(&doc, 1), vec![M; 10]);
    let mut row2 = vec![M; 6];
    row2.extend([N, K2, K2, K2, K2]);
    assert_eq!(hl(&doc, 2), row2);
}

#[test]
fn test_removing_opener_cascades_into_following_rows() {
    let mut doc = doc("/* start\nstill open\nend */ code\n");

    doc.delete_char(0, 0);
    // "* start" already has no opener.
    assert_eq!(open(&doc), vec![false, false, false]);
    doc.delete_char(0, 0);

    assert_eq!(doc.row(0).unwrap().chars(), " start");
    assert_eq!(open(&doc), vec![false, false, false]);
    assert_eq!(hl(&doc, 0), vec![N; 6]);
    assert_eq!(hl(&doc, 1), vec![K1, K1, K1, K1, K1, N, N, N, N, N]);
    assert_eq!(hl(&doc, 2), vec![N, N, N, N, N, N, N, K2, K2, K2, K2]);
}

#[test]
fn test_typing_opener_comments_out_rest_of_file() {
    let text: String = (0..200).map(|_| "still\n").collect();
    let mut doc = doc(&text);
    assert!(doc.rows().iter().all(|r| r.highlight() == [K1; 5]));

    doc.insert_char(10, 0, '/');
    doc.insert_char(10, 1, '*');
    assert!(doc.rows()[..10].iter().all(|r| !r.open_comment()));
    assert!(doc.rows()[10..].iter().all(|r| r.open_comment()));
    assert!(doc.rows()[11..].iter().all(|r| r.highlight() == [M; 5]));

    // Closing it again two rows further down limits the comment to those rows.
    doc.append_text(12, "*/");
    assert!(doc.rows()[10..=11].iter().all(|r| r.open_comment()));
    assert!(doc.rows()[12..].iter().all(|r| !r.open_comment()));
    assert_eq!(hl(&doc, 13), vec![K1; 5]);
    assert_eq!(hl(&doc, 199), vec![K1; 5]);
}

#[test]
fn test_row_structure_changes_carry_the_flag() {
    let mut doc = doc("/*\nstill\n*/\nstill\n");
    assert_eq!(open(&doc), vec![true, true, false, false]);

    // Joining the closer onto the row above keeps the comment closed where it was.
    doc.join_row_with_next(1);
    assert_eq!(doc.row(1).unwrap().chars(), "still*/");
    assert_eq!(open(&doc), vec![true, false, false]);
    assert_eq!(hl(&doc, 2), vec![K1; 5]);

    // Dropping the opener row uncovers the rest.
    doc.delete_row(0);
    assert_eq!(open(&doc), vec![false, false]);
    assert_eq!(hl(&doc, 0)[..5].to_vec(), vec![K1; 5]);

    // A new opener row above comments out the next row up to its closer.
    doc.insert_row(0, "x /*");
    assert_eq!(open(&doc), vec![true, false, false]);
    assert_eq!(hl(&doc, 1), vec![M; 7]);
    assert_eq!(hl(&doc, 2), vec![K1; 5]);
}

#[test]
fn test_syntax_switch_rehighlights_everything() {
    let mut doc = Document::from_text("int x = 1;\n/* a\nb */\n", 8);
    assert!(doc.rows().iter().all(|r| r.highlight().iter().all(|h| *h == N)));

    doc.set_syntax(Some(c_syntax()));
    assert_eq!(hl(&doc, 0)[..3].to_vec(), vec![K2; 3]);
    assert_eq!(hl(&doc, 0)[8], Highlight::Number);
    assert_eq!(open(&doc), vec![false, true, false]);

    doc.set_syntax(None);
    assert_eq!(open(&doc), vec![false, false, false]);
    assert!(doc.rows().iter().all(|r| r.highlight().iter().all(|h| *h == N)));
}

#[test]
fn test_tab_stop_change_keeps_highlight_aligned() {
    let mut doc = doc("\tstill /* x\n");
    doc.set_tab_stop(2);
    let row = doc.row(0).unwrap();
    assert_eq!(row.render(), "  still /* x");
    assert_eq!(row.highlight().len(), row.render_len());
    assert_eq!(row.highlight()[2..7].to_vec(), vec![K1; 5]);
    assert!(row.open_comment());
}
