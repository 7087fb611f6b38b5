use std::{fmt, path::PathBuf};

#[derive(Debug)]
pub enum BookError {
    Io(std::io::Error),
    InvalidViewport { width: usize, height: usize },
}

impl fmt::Display for BookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookError::Io(err) => write!(f, "IO error: {}", err),
            BookError::InvalidViewport { width, height } => {
                write!(
                    f,
                    "Invalid reader size {}x{}: width and height must be at least 1",
                    width, height
                )
            }
        }
    }
}

impl std::error::Error for BookError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BookError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BookError {
    fn from(err: std::io::Error) -> Self {
        BookError::Io(err)
    }
}

#[derive(Debug)]
pub enum BookmarkError {
    Io(std::io::Error),
    NotFound(PathBuf),
    NoHomeDirectory,
}

impl fmt::Display for BookmarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookmarkError::Io(err) => write!(f, "Bookmark IO error: {}", err),
            BookmarkError::NotFound(path) => {
                write!(f, "No bookmarks found at {}", path.display())
            }
            BookmarkError::NoHomeDirectory => {
                write!(f, "Could not determine the home directory for bookmarks")
            }
        }
    }
}

impl std::error::Error for BookmarkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BookmarkError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BookmarkError {
    fn from(err: std::io::Error) -> Self {
        BookmarkError::Io(err)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "Config IO error: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

#[derive(Debug)]
pub enum UiError {
    Terminal(Box<dyn std::error::Error + Send + Sync>),
    Book(BookError),
    Bookmark(BookmarkError),
}

impl fmt::Display for UiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UiError::Terminal(err) => write!(f, "Terminal error: {}", err),
            UiError::Book(err) => write!(f, "Book error: {}", err),
            UiError::Bookmark(err) => write!(f, "Bookmark error: {}", err),
        }
    }
}

impl std::error::Error for UiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UiError::Terminal(err) => Some(err.as_ref()),
            UiError::Book(err) => Some(err),
            UiError::Bookmark(err) => Some(err),
        }
    }
}

impl From<BookError> for UiError {
    fn from(err: BookError) -> Self {
        UiError::Book(err)
    }
}

impl From<BookmarkError> for UiError {
    fn from(err: BookmarkError) -> Self {
        UiError::Bookmark(err)
    }
}

impl From<std::io::Error> for UiError {
    fn from(err: std::io::Error) -> Self {
        UiError::Terminal(Box::new(err))
    }
}
