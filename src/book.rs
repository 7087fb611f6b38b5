use crate::error::BookError;
use std::{
    fs::File,
    io::{BufRead, BufReader, Read, Seek},
    path::Path,
};
use tracing::{debug, info};

/// A read-only byte stream with a cursor that only moves forward or back to the start.
///
/// Bytes are inspected with [`Book::peek_byte`] before they are taken with
/// [`Book::consume_byte`], so a page can stop in front of a byte without losing it.
#[derive(Debug)]
pub struct Book<R> {
    reader: BufReader<R>,
    position: u64,
}

impl Book<File> {
    pub fn open(path: &Path) -> Result<Self, BookError> {
        info!("Opening book: {:?}", path);
        let file = File::open(path)?;
        debug!("Book size: {} bytes", file.metadata()?.len());
        Ok(Self::new(file))
    }
}

impl<R: Read + Seek> Book<R> {
    pub fn new(inner: R) -> Self {
        Self {
            reader: BufReader::new(inner),
            position: 0,
        }
    }

    /// Returns the next byte without consuming it, or `None` at end of stream.
    pub fn peek_byte(&mut self) -> Result<Option<u8>, BookError> {
        let buf = self.reader.fill_buf()?;
        Ok(buf.first().copied())
    }

    /// Consumes the byte last returned by [`Book::peek_byte`].
    pub fn consume_byte(&mut self) {
        self.reader.consume(1);
        self.position += 1;
    }

    /// Number of bytes consumed since the last rewind.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn rewind(&mut self) -> Result<(), BookError> {
        self.reader.rewind()?;
        self.position = 0;
        Ok(())
    }
}
