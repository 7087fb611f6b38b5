use books::{Book, FillOutcome, Navigator, Paginator, Viewport};
use std::fs;
use std::io::Cursor;
use tempfile::TempDir;

// 10x3 viewport over "line NN\n" lines: three lines (24 bytes) per page,
// so page k starts at offset (k - 1) * 24 + 1.
fn numbered_lines(count: usize) -> String {
    (0..count).map(|i| format!("line {:02}\n", i)).collect()
}

fn navigator(text: &str) -> Navigator<Cursor<Vec<u8>>> {
    let viewport = Viewport::new(10, 3).expect("valid viewport");
    let book = Book::new(Cursor::new(text.as_bytes().to_vec()));
    Navigator::new(Paginator::new(book, viewport))
}

#[test]
fn test_next_and_previous_page() {
    let mut nav = navigator(&numbered_lines(20));

    nav.next_page().unwrap();
    nav.next_page().unwrap();
    nav.next_page().unwrap();
    assert_eq!(nav.current_page(), 3);
    assert_eq!(nav.page().start_offset(), 49);

    assert_eq!(nav.previous_page().unwrap(), 2);
    assert_eq!(nav.page().start_offset(), 25);
    assert_eq!(nav.page().text(), b"line 03\nline 04\nline 05\n");
}

#[test]
fn test_previous_page_from_first_page_stays() {
    let mut nav = navigator(&numbered_lines(20));
    nav.next_page().unwrap();

    assert_eq!(nav.previous_page().unwrap(), 1);
    assert_eq!(nav.page().text(), b"line 00\nline 01\nline 02\n");
    assert_eq!(nav.previous_page().unwrap(), 1);
}

#[test]
fn test_next_page_reports_end_of_book() {
    let mut nav = navigator(&numbered_lines(4));

    assert_eq!(nav.next_page().unwrap(), FillOutcome::Filled);
    assert!(!nav.is_at_end());
    assert_eq!(nav.next_page().unwrap(), FillOutcome::Exhausted);
    assert!(nav.is_at_end());
    assert_eq!(nav.page().text(), b"line 03\n");
}

#[test]
fn test_goto_page() {
    let mut nav = navigator(&numbered_lines(20));

    assert_eq!(nav.goto_page(5).unwrap(), 5);
    assert_eq!(nav.page().start_offset(), 97);
    assert_eq!(nav.page().text(), b"line 12\nline 13\nline 14\n");

    assert_eq!(nav.goto_page(2).unwrap(), 2);
    assert_eq!(nav.goto_page(0).unwrap(), 1);
}

#[test]
fn test_goto_page_past_end_clamps_to_last_page() {
    // 20 lines: pages 1-6 are full, page 7 holds the last two lines.
    let mut nav = navigator(&numbered_lines(20));
    assert_eq!(nav.goto_page(100).unwrap(), 7);
    assert_eq!(nav.page().text(), b"line 18\nline 19\n");

    // 18 lines end exactly on page 6; the blank page after it is skipped.
    let mut nav = navigator(&numbered_lines(18));
    assert_eq!(nav.goto_page(100).unwrap(), 6);
    assert_eq!(nav.page().text(), b"line 15\nline 16\nline 17\n");
}

#[test]
fn test_goto_byte_offset_round_trips_every_page() {
    let text = numbered_lines(20);
    let mut nav = navigator(&text);

    let mut starts = Vec::new();
    loop {
        let outcome = nav.next_page().unwrap();
        starts.push((nav.current_page(), nav.page().start_offset()));
        if outcome == FillOutcome::Exhausted {
            break;
        }
    }
    assert_eq!(starts.len(), 7);

    for (page, offset) in starts {
        assert_eq!(nav.goto_byte_offset(offset).unwrap(), page);
        assert_eq!(nav.page().start_offset(), offset);
    }
}

#[test]
fn test_goto_byte_offset_inside_a_page() {
    let mut nav = navigator(&numbered_lines(20));

    assert_eq!(nav.goto_byte_offset(30).unwrap(), 2);
    assert_eq!(nav.goto_byte_offset(48).unwrap(), 2);
    assert_eq!(nav.goto_byte_offset(49).unwrap(), 3);
}

#[test]
fn test_goto_byte_offset_at_first_page_start() {
    let mut nav = navigator(&numbered_lines(20));
    nav.goto_page(4).unwrap();

    assert_eq!(nav.goto_byte_offset(1).unwrap(), 1);
    assert_eq!(nav.goto_byte_offset(0).unwrap(), 1);
    assert_eq!(nav.page().start_offset(), 1);
}

#[test]
fn test_goto_byte_offset_past_end_clamps() {
    let mut nav = navigator(&numbered_lines(20));
    assert_eq!(nav.goto_byte_offset(10_000).unwrap(), 7);

    let mut nav = navigator(&numbered_lines(18));
    assert_eq!(nav.goto_byte_offset(10_000).unwrap(), 6);
}

#[test]
fn test_empty_book_stays_on_page_one() {
    let mut nav = navigator("");

    assert_eq!(nav.goto_page(3).unwrap(), 1);
    assert_eq!(nav.goto_byte_offset(42).unwrap(), 1);
    assert!(nav.page().is_empty());
}

#[test]
fn test_navigation_over_a_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("book.txt");
    fs::write(&path, numbered_lines(20)).unwrap();

    let book = Book::open(&path).expect("Failed to open book");
    let mut nav = Navigator::new(Paginator::new(book, Viewport::new(10, 3).unwrap()));

    nav.goto_page(6).unwrap();
    let offset = nav.page().start_offset();
    nav.previous_page().unwrap();
    assert_eq!(nav.current_page(), 5);

    assert_eq!(nav.goto_byte_offset(offset).unwrap(), 6);
    assert_eq!(nav.page().text(), b"line 15\nline 16\nline 17\n");
}

#[test]
fn test_open_missing_book_fails() {
    let temp_dir = TempDir::new().unwrap();
    assert!(Book::open(&temp_dir.path().join("missing.txt")).is_err());
}
