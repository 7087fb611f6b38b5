pub mod book;
pub mod bookmark;
pub mod config;
pub mod constants;
pub mod error;
pub mod navigator;
pub mod paginator;
pub mod search;
pub mod ui;

pub use book::Book;
pub use bookmark::{Bookmark, BookmarkStore};
pub use config::ReaderConfig;
pub use error::{BookError, BookmarkError, ConfigError, UiError};
pub use navigator::Navigator;
pub use paginator::{FillOutcome, Page, Paginator, Viewport};
pub use search::{ScanOutcome, SearchState};
pub use ui::App;
