use crate::{
    book::Book,
    constants::{DEFAULT_HEIGHT, DEFAULT_WIDTH},
    error::BookError,
};
use std::{
    io::{Read, Seek},
    ops::Range,
};
use tracing::trace;

/// Size of the reading area in character cells. Fixed for a whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    width: usize,
    height: usize,
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Result<Self, BookError> {
        if width == 0 || height == 0 {
            return Err(BookError::InvalidViewport { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes a single page can hold, newlines included.
    pub fn capacity(&self) -> usize {
        self.width * self.height
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillOutcome {
    /// The page holds a full screen and the stream may continue.
    Filled,
    /// The stream ended before the page was complete.
    Exhausted,
}

/// Tracks line and column while bytes are laid out in a viewport.
///
/// A newline ends the current line. Any other byte arriving when the line already holds
/// `width` visible bytes starts a new line first, so a line of exactly `width` bytes
/// followed by a newline takes one line, not two.
#[derive(Debug)]
struct LineTracker {
    width: usize,
    line: usize,
    column: usize,
}

impl LineTracker {
    fn new(width: usize) -> Self {
        Self {
            width,
            line: 0,
            column: 0,
        }
    }

    fn wraps_before(&self, byte: u8) -> bool {
        byte != b'\n' && self.column == self.width
    }

    fn place(&mut self, byte: u8) {
        if byte == b'\n' {
            self.line += 1;
            self.column = 0;
            return;
        }
        if self.wraps_before(byte) {
            self.line += 1;
            self.column = 0;
        }
        self.column += 1;
    }
}

/// The visible text of one page.
#[derive(Debug, Clone)]
pub struct Page {
    bytes: Vec<u8>,
    len: usize,
    number: u64,
    start_offset: u64,
    viewport: Viewport,
}

impl Page {
    fn new(viewport: Viewport) -> Self {
        Self {
            bytes: vec![0; viewport.capacity()],
            len: 0,
            number: 0,
            start_offset: 0,
            viewport,
        }
    }

    fn clear(&mut self) {
        self.bytes.fill(0);
        self.len = 0;
    }

    fn push(&mut self, byte: u8) {
        self.bytes[self.len] = byte;
        self.len += 1;
    }

    /// 1-based page number; 0 before the first fill.
    pub fn number(&self) -> u64 {
        self.number
    }

    /// Stream position where the page began, plus one. This is the bookmark key.
    pub fn start_offset(&self) -> u64 {
        self.start_offset
    }

    /// Bytes read into this page.
    pub fn text(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// The whole fixed-size buffer, zero-padded past [`Page::text`].
    pub fn buffer(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Byte ranges of each rendered line within [`Page::text`], newlines excluded.
    ///
    /// Uses the same wrap rule as pagination, so the result never exceeds the viewport height.
    pub fn visual_lines(&self) -> Vec<Range<usize>> {
        let mut lines = Vec::with_capacity(self.viewport.height());
        let mut tracker = LineTracker::new(self.viewport.width());
        let mut start = 0;

        for (i, &byte) in self.text().iter().enumerate() {
            if byte == b'\n' {
                lines.push(start..i);
                start = i + 1;
            } else if tracker.wraps_before(byte) {
                lines.push(start..i);
                start = i;
            }
            tracker.place(byte);
        }
        if start < self.len {
            lines.push(start..self.len);
        }
        lines
    }
}

/// Turns a [`Book`] into pages, one fill at a time.
#[derive(Debug)]
pub struct Paginator<R> {
    book: Book<R>,
    viewport: Viewport,
    page: Page,
    exhausted: bool,
}

impl<R: Read + Seek> Paginator<R> {
    pub fn new(book: Book<R>, viewport: Viewport) -> Self {
        Self {
            book,
            viewport,
            page: Page::new(viewport),
            exhausted: false,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn page_number(&self) -> u64 {
        self.page.number
    }

    /// Whether the last fill hit end of stream.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Reads the next page from the book's cursor into the page buffer.
    ///
    /// The page counter and start offset advance even when the stream is already at its
    /// end; the resulting page is then empty and the outcome is [`FillOutcome::Exhausted`].
    pub fn fill_page(&mut self) -> Result<FillOutcome, BookError> {
        self.page.start_offset = self.book.position() + 1;
        self.page.number += 1;
        self.page.clear();
        self.exhausted = false;

        let height = self.viewport.height();
        let capacity = self.viewport.capacity();
        let mut tracker = LineTracker::new(self.viewport.width());

        while self.page.len < capacity {
            let Some(byte) = self.book.peek_byte()? else {
                self.exhausted = true;
                trace!(
                    "Page {} exhausted after {} bytes",
                    self.page.number, self.page.len
                );
                return Ok(FillOutcome::Exhausted);
            };

            // Wrapping into a line past the bottom: the byte belongs to the next page.
            if tracker.wraps_before(byte) && tracker.line + 1 == height {
                break;
            }

            self.book.consume_byte();
            self.page.push(byte);
            tracker.place(byte);

            if tracker.line == height {
                break;
            }
        }

        trace!(
            "Page {} filled: {} bytes from offset {}",
            self.page.number, self.page.len, self.page.start_offset
        );
        Ok(FillOutcome::Filled)
    }

    /// Rewinds the book to byte 0 and forgets the current page.
    pub fn reset(&mut self) -> Result<(), BookError> {
        self.book.rewind()?;
        self.page.clear();
        self.page.number = 0;
        self.page.start_offset = 0;
        self.exhausted = false;
        Ok(())
    }
}
