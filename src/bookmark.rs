use crate::{
    constants::{BOOKMARK_DIR, BOOKMARK_EXTENSION, DATA_DIR},
    error::BookmarkError,
};
use chrono::{DateTime, Local, Utc};
use regex::Regex;
use std::{
    fmt, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::LazyLock,
};
use tracing::{debug, info, warn};

static RECORD: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"time=(-?\d+)\nlocation=(\d+)(?:\n|$)"));

/// A saved reading position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bookmark {
    /// Seconds since the Unix epoch.
    pub time: i64,
    /// Page start offset, as reported by [`crate::Page::start_offset`].
    pub location: u64,
}

impl Bookmark {
    pub fn now(location: u64) -> Self {
        Self {
            time: Utc::now().timestamp(),
            location,
        }
    }

    /// Save time in local time, for display.
    pub fn saved_at(&self) -> Option<DateTime<Local>> {
        DateTime::from_timestamp(self.time, 0).map(|utc| utc.with_timezone(&Local))
    }
}

impl fmt::Display for Bookmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "time={}\nlocation={}\n", self.time, self.location)
    }
}

/// Parses consecutive records from the start of `text`, stopping at the first one that
/// does not match.
pub fn parse_records(text: &str) -> Vec<Bookmark> {
    let mut bookmarks = Vec::new();
    let mut position = 0;

    let record = match RECORD.as_ref() {
        Ok(record) => record,
        Err(e) => {
            warn!("Bookmark record pattern failed to compile: {}", e);
            return bookmarks;
        }
    };

    while let Some(caps) = record.captures_at(text, position) {
        let Some(whole) = caps.get(0) else { break };
        if whole.start() != position {
            break;
        }
        let (Ok(time), Ok(location)) = (caps[1].parse::<i64>(), caps[2].parse::<u64>()) else {
            break;
        };
        bookmarks.push(Bookmark { time, location });
        position = whole.end();
    }

    if position < text.trim_end().len() {
        warn!(
            "Ignoring malformed bookmark data after {} record(s)",
            bookmarks.len()
        );
    }
    bookmarks
}

/// The bookmark file of one book. Newest bookmark first.
#[derive(Debug, Clone)]
pub struct BookmarkStore {
    path: PathBuf,
}

impl BookmarkStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.books/bookmarks/<file name>.bookmark` for the book at `book_path`.
    pub fn for_book(book_path: &Path) -> Result<Self, BookmarkError> {
        let home = dirs::home_dir().ok_or(BookmarkError::NoHomeDirectory)?;
        Ok(Self::in_home(&home, book_path))
    }

    /// `<home>/.books/bookmarks/<file name>.bookmark`.
    pub fn in_home(home: &Path, book_path: &Path) -> Self {
        let name = book_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "book".to_string());
        Self::new(
            home.join(DATA_DIR)
                .join(BOOKMARK_DIR)
                .join(format!("{}.{}", name, BOOKMARK_EXTENSION)),
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Vec<Bookmark>, BookmarkError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(BookmarkError::NotFound(self.path.clone()));
            }
            Err(e) => return Err(e.into()),
        };
        let bookmarks = parse_records(&text);
        debug!("Loaded {} bookmark(s) from {:?}", bookmarks.len(), self.path);
        Ok(bookmarks)
    }

    /// The bookmark at `index`, 0 being the most recent.
    pub fn get(&self, index: usize) -> Result<Option<Bookmark>, BookmarkError> {
        Ok(self.load()?.get(index).copied())
    }

    pub fn latest(&self) -> Result<Option<Bookmark>, BookmarkError> {
        self.get(0)
    }

    /// Records `location` with the current time, ahead of the existing bookmarks.
    pub fn save(&self, location: u64) -> Result<Bookmark, BookmarkError> {
        let bookmark = Bookmark::now(location);
        self.prepend(bookmark)?;
        Ok(bookmark)
    }

    pub fn prepend(&self, bookmark: Bookmark) -> Result<(), BookmarkError> {
        let existing = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, format!("{}{}", bookmark, existing))?;

        info!(
            "Saved bookmark at offset {} to {:?}",
            bookmark.location, self.path
        );
        Ok(())
    }
}
