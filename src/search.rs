use crate::{error::BookError, navigator::Navigator, paginator::FillOutcome};
use memchr::memmem;
use std::io::{Read, Seek};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Match start, relative to the start of the current page's buffer.
    Found(usize),
    /// The stream ran out without a match.
    Exhausted,
}

/// A search in progress or just finished, as the reader displays it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    pub phrase: Vec<u8>,
    pub original_page: u64,
    /// Offset of the match in the current page; `None` means nothing to highlight.
    pub found: Option<usize>,
}

impl SearchState {
    pub fn new(phrase: impl Into<Vec<u8>>, original_page: u64) -> Self {
        Self {
            phrase: phrase.into(),
            original_page,
            found: None,
        }
    }

    /// The highlighted byte range within the page, if any.
    pub fn highlight(&self) -> Option<std::ops::Range<usize>> {
        self.found.map(|start| start..start + self.phrase.len())
    }
}

/// Turns pages forward from the current cursor until one contains `phrase`.
///
/// On a match the navigator stays on the matching page. The phrase must not be empty.
pub fn scan<R: Read + Seek>(
    navigator: &mut Navigator<R>,
    phrase: &[u8],
) -> Result<ScanOutcome, BookError> {
    let finder = memmem::Finder::new(phrase);
    loop {
        let outcome = navigator.next_page()?;
        if let Some(position) = finder.find(navigator.page().text()) {
            debug!(
                "Phrase found on page {} at {}",
                navigator.current_page(),
                position
            );
            return Ok(ScanOutcome::Found(position));
        }
        if outcome == FillOutcome::Exhausted {
            debug!("Phrase not found before end of book");
            return Ok(ScanOutcome::Exhausted);
        }
    }
}

/// Moves the cursor back to byte 0 so the next [`scan`] starts from the first page.
pub fn restart<R: Read + Seek>(navigator: &mut Navigator<R>) -> Result<(), BookError> {
    navigator.rewind()
}

/// Gives up and returns to the page the search started from.
pub fn abandon<R: Read + Seek>(
    navigator: &mut Navigator<R>,
    original_page: u64,
) -> Result<u64, BookError> {
    navigator.goto_page(original_page)
}

/// Searches forward for `phrase`, asking `restart_from_beginning` what to do each time the
/// book runs out.
///
/// Returns the match offset within the new current page, or `None` if the search was
/// abandoned, in which case the navigator is back on `original_page`.
pub fn find<R, F>(
    navigator: &mut Navigator<R>,
    phrase: &[u8],
    original_page: u64,
    mut restart_from_beginning: F,
) -> Result<Option<usize>, BookError>
where
    R: Read + Seek,
    F: FnMut() -> bool,
{
    info!(
        "Searching for {:?} from page {}",
        String::from_utf8_lossy(phrase),
        original_page
    );
    loop {
        match scan(navigator, phrase)? {
            ScanOutcome::Found(position) => return Ok(Some(position)),
            ScanOutcome::Exhausted if restart_from_beginning() => restart(navigator)?,
            ScanOutcome::Exhausted => {
                abandon(navigator, original_page)?;
                return Ok(None);
            }
        }
    }
}
