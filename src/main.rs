use books::ui::position_at_start;
use books::{App, Book, BookmarkStore, Navigator, Paginator, ReaderConfig};
use clap::{ArgAction, Parser};
use std::{
    fs::File,
    path::{Path, PathBuf},
    process,
    sync::Mutex,
};
use tracing::warn;

#[derive(Parser)]
#[command(name = "books")]
#[command(about = "A terminal reader for plain text files")]
#[command(disable_help_flag = true)]
struct Cli {
    book_file: PathBuf,

    /// Reader width in characters
    #[arg(short = 'w', long)]
    width: Option<usize>,

    /// Reader height in lines
    #[arg(short = 'h', long)]
    height: Option<usize>,

    /// Page to open at
    #[arg(short = 'p', long)]
    page: Option<u64>,

    /// Open at the most recent bookmark
    #[arg(short = 'b', long)]
    bookmark: bool,

    /// Config file (default: ~/.books/config/config.cfg)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write debug logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    #[allow(dead_code)]
    help: Option<bool>,
}

fn init_logging(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    if let Some(path) = &cli.log_file {
        init_logging(path).map_err(|e| format!("Failed to open log file: {}", e))?;
    }

    let config = match cli.config.clone().or_else(ReaderConfig::default_path) {
        Some(path) => ReaderConfig::load(&path)?,
        None => ReaderConfig::default(),
    };
    let viewport = config.resolve_viewport(cli.width, cli.height)?;

    let book =
        Book::open(&cli.book_file).map_err(|e| format!("Couldn't open book: {}", e))?;
    let bookmarks = match BookmarkStore::for_book(&cli.book_file) {
        Ok(store) => Some(store),
        Err(e) => {
            warn!("Bookmarks unavailable: {}", e);
            None
        }
    };
    let mut navigator = Navigator::new(Paginator::new(book, viewport));
    let notice = position_at_start(&mut navigator, bookmarks.as_ref(), cli.bookmark, cli.page)?;

    let mut app = App::new(navigator, bookmarks);
    if let Some(notice) = notice {
        app.set_status(notice);
    }

    app.run()
        .map_err(|e| -> Box<dyn std::error::Error> { Box::new(e) })?;

    Ok(())
}
