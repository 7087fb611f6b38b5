use crate::{
    error::BookError,
    paginator::{FillOutcome, Page, Paginator},
};
use std::io::{Read, Seek};
use tracing::debug;

/// Moves through a book page by page.
///
/// The stream can only be read forward or rewound to its start, so every backward move
/// rewinds and replays pagination up to the target page.
#[derive(Debug)]
pub struct Navigator<R> {
    paginator: Paginator<R>,
}

impl<R: Read + Seek> Navigator<R> {
    pub fn new(paginator: Paginator<R>) -> Self {
        Self { paginator }
    }

    pub fn paginator(&self) -> &Paginator<R> {
        &self.paginator
    }

    pub fn page(&self) -> &Page {
        self.paginator.page()
    }

    pub fn current_page(&self) -> u64 {
        self.paginator.page_number()
    }

    pub fn is_at_end(&self) -> bool {
        self.paginator.is_exhausted()
    }

    pub fn next_page(&mut self) -> Result<FillOutcome, BookError> {
        self.paginator.fill_page()
    }

    /// Steps back one page; page 1 stays on page 1.
    pub fn previous_page(&mut self) -> Result<u64, BookError> {
        let target = self.current_page().saturating_sub(1).max(1);
        self.settle_at(target)
    }

    /// Goes to page `n`, or to the last page if the book is shorter. Page 0 means page 1.
    pub fn goto_page(&mut self, n: u64) -> Result<u64, BookError> {
        self.settle_at(n.max(1))
    }

    /// Goes to the page containing `offset`, in the page start offset convention
    /// (stream position + 1) used by bookmarks.
    pub fn goto_byte_offset(&mut self, offset: u64) -> Result<u64, BookError> {
        self.paginator.reset()?;

        let target_page = loop {
            let outcome = self.paginator.fill_page()?;
            let page = self.paginator.page();
            if page.start_offset() == offset {
                break page.number();
            }
            if page.start_offset() > offset {
                break page.number().saturating_sub(1);
            }
            if outcome == FillOutcome::Exhausted {
                break page.number();
            }
        };

        debug!("Byte offset {} resolves to page {}", offset, target_page);
        self.settle_at(target_page.max(1))
    }

    /// Rewinds and fills pages until page `n` is current or the stream runs out.
    /// Returns the page landed on.
    pub(crate) fn settle_at(&mut self, n: u64) -> Result<u64, BookError> {
        self.replay(n)?;

        // Stopped on a blank page past the end: the real last page is the one before.
        if self.paginator.is_exhausted()
            && self.paginator.page().is_empty()
            && self.current_page() > 1
        {
            let last = self.current_page() - 1;
            self.replay(last)?;
        }

        debug!("Requested page {}, landed on page {}", n, self.current_page());
        Ok(self.current_page())
    }

    fn replay(&mut self, n: u64) -> Result<(), BookError> {
        self.paginator.reset()?;
        for _ in 0..n {
            if self.paginator.fill_page()? == FillOutcome::Exhausted {
                break;
            }
        }
        Ok(())
    }

    /// Rewinds to byte 0 without filling a page.
    pub fn rewind(&mut self) -> Result<(), BookError> {
        self.paginator.reset()
    }
}
