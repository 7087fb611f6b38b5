use books::search::{self, ScanOutcome, SearchState};
use books::{Book, Navigator, Paginator, Viewport};
use std::io::Cursor;

fn numbered_lines(count: usize) -> String {
    (0..count).map(|i| format!("line {:02}\n", i)).collect()
}

fn navigator(text: &str, width: usize, height: usize) -> Navigator<Cursor<Vec<u8>>> {
    let viewport = Viewport::new(width, height).expect("valid viewport");
    let book = Book::new(Cursor::new(text.as_bytes().to_vec()));
    Navigator::new(Paginator::new(book, viewport))
}

fn never_restart() -> bool {
    panic!("search should not reach the end of the book");
}

#[test]
fn test_find_on_first_page() {
    let mut nav = navigator("abcdefghij\nklmnopqrst\nuvwxyz", 10, 2);

    let found = search::find(&mut nav, b"klmno", 1, never_restart).unwrap();
    assert_eq!(found, Some(11));
    assert_eq!(nav.current_page(), 1);
}

#[test]
fn test_find_moves_to_matching_page() {
    let mut nav = navigator(&numbered_lines(20), 10, 3);
    nav.next_page().unwrap();

    let found = search::find(&mut nav, b"line 13", 1, never_restart).unwrap();
    assert_eq!(found, Some(8));
    assert_eq!(nav.current_page(), 5);
    assert_eq!(&nav.page().text()[8..15], b"line 13");
}

#[test]
fn test_find_matches_on_last_partial_page() {
    let mut nav = navigator(&numbered_lines(20), 10, 3);
    nav.next_page().unwrap();

    assert_eq!(
        search::scan(&mut nav, b"line 19").unwrap(),
        ScanOutcome::Found(8)
    );
    assert_eq!(nav.current_page(), 7);
}

#[test]
fn test_abandoned_search_restores_original_page() {
    let mut nav = navigator(&numbered_lines(20), 10, 3);
    nav.goto_page(3).unwrap();

    let found = search::find(&mut nav, b"nowhere", 3, || false).unwrap();
    assert_eq!(found, None);
    assert_eq!(nav.current_page(), 3);
    assert_eq!(nav.page().start_offset(), 49);
}

#[test]
fn test_restart_finds_phrase_before_starting_page() {
    let mut nav = navigator(&numbered_lines(20), 10, 3);
    nav.goto_page(5).unwrap();

    let mut asked = 0;
    let found = search::find(&mut nav, b"line 01", 5, || {
        asked += 1;
        true
    })
    .unwrap();

    assert_eq!(asked, 1);
    assert_eq!(found, Some(8));
    assert_eq!(nav.current_page(), 1);
}

#[test]
fn test_repeated_restarts_then_abandon() {
    let mut nav = navigator(&numbered_lines(20), 10, 3);
    nav.goto_page(2).unwrap();

    let mut asked = 0;
    let found = search::find(&mut nav, b"absent", 2, || {
        asked += 1;
        asked < 3
    })
    .unwrap();

    assert_eq!(asked, 3);
    assert_eq!(found, None);
    assert_eq!(nav.current_page(), 2);
}

#[test]
fn test_search_is_case_sensitive() {
    let mut nav = navigator(&numbered_lines(20), 10, 3);
    nav.next_page().unwrap();

    assert_eq!(
        search::scan(&mut nav, b"LINE 13").unwrap(),
        ScanOutcome::Exhausted
    );
    assert!(nav.is_at_end());
}

#[test]
fn test_search_state_highlight() {
    let mut state = SearchState::new("magic", 4);
    assert_eq!(state.original_page, 4);
    assert_eq!(state.highlight(), None);

    state.found = Some(10);
    assert_eq!(state.highlight(), Some(10..15));
}
