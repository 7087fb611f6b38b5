// Viewport
pub const DEFAULT_WIDTH: usize = 70;
pub const DEFAULT_HEIGHT: usize = 28;

// Well-known locations under $HOME
pub const DATA_DIR: &str = ".books";
pub const CONFIG_FILE: &str = "config/config.cfg";
pub const BOOKMARK_DIR: &str = "bookmarks";
pub const BOOKMARK_EXTENSION: &str = "bookmark";

// UI
pub const MAX_COMMAND_LENGTH: usize = 80;
pub const READER_MARGIN: u16 = 2; // border plus one blank cell on each side
pub const BACKGROUND_PERIOD: usize = 8;
pub const BACKGROUND_STAGGER: usize = 4;
pub const BOOKMARK_PANE_WIDTH: u16 = 30;
pub const BOOKMARK_VISIBLE_ENTRIES: u16 = 7;
pub const RESTART_DIALOG_WIDTH: u16 = 24;
pub const RESTART_DIALOG_HEIGHT: u16 = 8;
