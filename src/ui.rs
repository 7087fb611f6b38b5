use crate::bookmark::{Bookmark, BookmarkStore};
use crate::constants::{
    BACKGROUND_PERIOD, BACKGROUND_STAGGER, BOOKMARK_PANE_WIDTH, BOOKMARK_VISIBLE_ENTRIES,
    MAX_COMMAND_LENGTH, READER_MARGIN, RESTART_DIALOG_HEIGHT, RESTART_DIALOG_WIDTH,
};
use crate::error::{BookmarkError, UiError};
use crate::navigator::Navigator;
use crate::paginator::{FillOutcome, Page};
use crate::search::{self, ScanOutcome, SearchState};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph},
};
use std::{
    io::{self, Read, Seek},
    ops::Range,
};
use tracing::{debug, info, warn};

const READER_BORDER: border::Set = border::Set {
    top_left: "#",
    top_right: "#",
    bottom_left: "#",
    bottom_right: "#",
    vertical_left: "|",
    vertical_right: "|",
    horizontal_top: "=",
    horizontal_bottom: "=",
};

const BADGE_BORDER: border::Set = border::Set {
    top_left: "=",
    top_right: "=",
    bottom_left: "=",
    bottom_right: "=",
    vertical_left: ":",
    vertical_right: ":",
    horizontal_top: "=",
    horizontal_bottom: "=",
};

const DIALOG_BORDER: border::Set = border::Set {
    top_left: "*",
    top_right: "*",
    bottom_left: "*",
    bottom_right: "*",
    vertical_left: "|",
    vertical_right: "|",
    horizontal_top: "=",
    horizontal_bottom: "=",
};

const PAGE_LABEL: &str = "Page #";

/// Number of decimal digits in `n`; 0 has one digit.
pub fn digit_count(n: u64) -> usize {
    n.checked_ilog10().map_or(1, |digits| digits as usize + 1)
}

/// What the bottom line is collecting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Command(String),
    Search(String),
}

#[derive(Debug)]
enum Overlay {
    None,
    Bookmarks {
        entries: Vec<Bookmark>,
        selected: usize,
    },
    NoBookmarks,
    SearchRestart,
}

/// Puts a freshly opened navigator on the first page to show: the latest bookmark when
/// `resume` is set and one exists, otherwise `page`, otherwise page 1.
///
/// Returns a message for the status line when the bookmark could not be used.
pub fn position_at_start<R: Read + Seek>(
    navigator: &mut Navigator<R>,
    bookmarks: Option<&BookmarkStore>,
    resume: bool,
    page: Option<u64>,
) -> Result<Option<String>, UiError> {
    let mut notice = None;
    let bookmark = match (resume, bookmarks) {
        (false, _) => None,
        (true, None) => {
            warn!("Cannot resume: {}", BookmarkError::NoHomeDirectory);
            notice = Some(format!(
                "ERROR: Couldn't open bookmarks: {}",
                BookmarkError::NoHomeDirectory
            ));
            None
        }
        (true, Some(store)) => match store.latest() {
            Ok(Some(bookmark)) => Some(bookmark),
            Ok(None) | Err(BookmarkError::NotFound(_)) => {
                warn!("No bookmark to resume from in {:?}", store.path());
                notice = Some("No bookmarks found".to_string());
                None
            }
            Err(e) => return Err(e.into()),
        },
    };

    if let Some(bookmark) = bookmark {
        let landed = navigator.goto_byte_offset(bookmark.location)?;
        info!(
            "Resuming at bookmark @ {} (page {})",
            bookmark.location, landed
        );
    } else if let Some(page) = page {
        navigator.goto_page(page)?;
    } else {
        navigator.next_page()?;
    }
    Ok(notice)
}

pub struct App<R> {
    navigator: Navigator<R>,
    bookmarks: Option<BookmarkStore>,
    input: InputMode,
    overlay: Overlay,
    search: Option<SearchState>,
    status: Option<String>,
    should_quit: bool,
    terminal: Option<Terminal<CrosstermBackend<io::Stdout>>>,
}

impl<R: Read + Seek> App<R> {
    /// Wraps a navigator that is already on the page to show first. Without a bookmark
    /// store, saving and browsing bookmarks report an error in the status line.
    pub fn new(navigator: Navigator<R>, bookmarks: Option<BookmarkStore>) -> Self {
        Self {
            navigator,
            bookmarks,
            input: InputMode::Normal,
            overlay: Overlay::None,
            search: None,
            status: None,
            should_quit: false,
            terminal: None,
        }
    }

    pub fn current_page(&self) -> u64 {
        self.navigator.current_page()
    }

    pub fn page(&self) -> &Page {
        self.navigator.page()
    }

    pub fn input_mode(&self) -> &InputMode {
        &self.input
    }

    pub fn search(&self) -> Option<&SearchState> {
        self.search.as_ref()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Index of the highlighted entry while the bookmark browser is open.
    pub fn selected_bookmark(&self) -> Option<usize> {
        match &self.overlay {
            Overlay::Bookmarks { selected, .. } => Some(*selected),
            _ => None,
        }
    }

    pub fn is_showing_no_bookmarks(&self) -> bool {
        matches!(self.overlay, Overlay::NoBookmarks)
    }

    pub fn is_asking_restart(&self) -> bool {
        matches!(self.overlay, Overlay::SearchRestart)
    }

    pub fn run(&mut self) -> Result<(), UiError> {
        self.setup_terminal()?;
        let result = self.event_loop();
        self.cleanup_terminal()?;
        result
    }

    fn event_loop(&mut self) -> Result<(), UiError> {
        while !self.should_quit {
            if let Some(terminal) = self.terminal.as_mut() {
                let page = self.navigator.page();
                let highlight = self.search.as_ref().and_then(SearchState::highlight);
                let overlay = &self.overlay;
                let input = &self.input;
                let status = self.status.as_deref();

                terminal.draw(|f| {
                    Self::draw_ui(f, page, highlight, overlay, input, status);
                })?;
            }

            if let Event::Key(key) = event::read()? {
                self.handle_key(key)?;
            }
        }
        Ok(())
    }

    fn setup_terminal(&mut self) -> Result<(), UiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        self.terminal = Some(terminal);
        Ok(())
    }

    fn cleanup_terminal(&mut self) -> Result<(), UiError> {
        if let Some(mut terminal) = self.terminal.take() {
            disable_raw_mode()?;
            execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
            terminal.show_cursor()?;
        }
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<(), UiError> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }
        if self.is_asking_restart() {
            return self.answer_restart(key);
        }
        match self.input {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::Command(_) | InputMode::Search(_) => self.handle_line_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Result<(), UiError> {
        if self.is_showing_no_bookmarks() {
            self.overlay = Overlay::None;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('n') | KeyCode::Right | KeyCode::PageDown => {
                if let Overlay::Bookmarks { entries, selected } = &mut self.overlay {
                    if *selected + 1 < entries.len() {
                        *selected += 1;
                    }
                } else {
                    self.next_page()?;
                }
            }
            KeyCode::Char('b') | KeyCode::Left | KeyCode::PageUp => {
                if let Overlay::Bookmarks { selected, .. } = &mut self.overlay {
                    *selected = selected.saturating_sub(1);
                } else {
                    self.previous_page()?;
                }
            }
            KeyCode::Char('g') => self.open_selected_bookmark()?,
            KeyCode::Char(':') => {
                self.status = None;
                self.input = InputMode::Command(String::new());
            }
            KeyCode::Char('/') => {
                self.status = None;
                self.close_bookmarks();
                self.input = InputMode::Search(String::new());
            }
            KeyCode::Esc => self.close_bookmarks(),
            _ => {}
        }
        Ok(())
    }

    fn handle_line_key(&mut self, key: KeyEvent) -> Result<(), UiError> {
        match key.code {
            KeyCode::Esc => self.input = InputMode::Normal,
            KeyCode::Enter => match std::mem::replace(&mut self.input, InputMode::Normal) {
                InputMode::Command(command) => self.execute_command(&command)?,
                InputMode::Search(phrase) => self.submit_search(&phrase)?,
                InputMode::Normal => {}
            },
            KeyCode::Backspace => {
                if let InputMode::Command(line) | InputMode::Search(line) = &mut self.input {
                    line.pop();
                }
            }
            KeyCode::Char(c) => {
                if let InputMode::Command(line) | InputMode::Search(line) = &mut self.input {
                    if line.chars().count() < MAX_COMMAND_LENGTH {
                        line.push(c);
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn execute_command(&mut self, command: &str) -> Result<(), UiError> {
        debug!("Command {:?}", command);
        match command.chars().next() {
            Some('g') if command.len() > 1 => {
                self.close_bookmarks();
                let argument = command[1..].trim();
                match argument.parse::<u64>() {
                    Ok(page) if page > 0 => self.goto_page(page)?,
                    _ => self.status = Some(format!("Not a page number: {}", argument)),
                }
            }
            Some('q') => self.should_quit = true,
            Some('s') => {
                self.close_bookmarks();
                self.save_bookmark();
            }
            Some('b') => self.toggle_bookmarks(),
            _ => self.close_bookmarks(),
        }
        Ok(())
    }

    fn next_page(&mut self) -> Result<(), UiError> {
        self.search = None;
        if self.navigator.is_at_end() {
            self.status = Some("End of book".to_string());
            return Ok(());
        }
        self.status = None;
        let outcome = self.navigator.next_page()?;
        if outcome == FillOutcome::Exhausted && self.navigator.page().is_empty() {
            // the previous page ended exactly at the end of the book
            let last = self.navigator.current_page().saturating_sub(1);
            self.navigator.goto_page(last)?;
            self.status = Some("End of book".to_string());
        }
        Ok(())
    }

    fn previous_page(&mut self) -> Result<(), UiError> {
        self.search = None;
        self.status = None;
        self.navigator.previous_page()?;
        Ok(())
    }

    fn goto_page(&mut self, page: u64) -> Result<(), UiError> {
        self.search = None;
        let landed = self.navigator.goto_page(page)?;
        self.status = (landed != page).then(|| format!("Book ends at page {}", landed));
        Ok(())
    }

    fn save_bookmark(&mut self) {
        let location = self.navigator.page().start_offset();
        let saved = self.bookmark_store().and_then(|store| store.save(location));
        self.status = Some(match saved {
            Ok(bookmark) => format!("Bookmark saved @ {}", bookmark.location),
            Err(e) => {
                warn!("Failed to save bookmark: {}", e);
                format!("ERROR: Couldn't save bookmark: {}", e)
            }
        });
    }

    fn toggle_bookmarks(&mut self) {
        if self.selected_bookmark().is_some() {
            self.close_bookmarks();
            return;
        }
        self.overlay = match self.bookmark_store().and_then(BookmarkStore::load) {
            Ok(entries) if !entries.is_empty() => Overlay::Bookmarks {
                entries,
                selected: 0,
            },
            Ok(_) | Err(BookmarkError::NotFound(_)) => Overlay::NoBookmarks,
            Err(e) => {
                warn!("Failed to read bookmarks: {}", e);
                self.status = Some(format!("ERROR: Couldn't open bookmarks: {}", e));
                Overlay::None
            }
        };
    }

    fn bookmark_store(&self) -> Result<&BookmarkStore, BookmarkError> {
        self.bookmarks
            .as_ref()
            .ok_or(BookmarkError::NoHomeDirectory)
    }

    fn close_bookmarks(&mut self) {
        if self.selected_bookmark().is_some() {
            self.overlay = Overlay::None;
        }
    }

    fn open_selected_bookmark(&mut self) -> Result<(), UiError> {
        let Overlay::Bookmarks { entries, selected } = &self.overlay else {
            return Ok(());
        };
        let Some(bookmark) = entries.get(*selected).copied() else {
            return Ok(());
        };
        self.overlay = Overlay::None;
        self.search = None;
        let page = self.navigator.goto_byte_offset(bookmark.location)?;
        info!("Opened bookmark @ {} on page {}", bookmark.location, page);
        Ok(())
    }

    fn submit_search(&mut self, phrase: &str) -> Result<(), UiError> {
        if phrase.is_empty() {
            return Ok(());
        }
        self.search = Some(SearchState::new(phrase, self.navigator.current_page()));
        self.continue_search()
    }

    fn continue_search(&mut self) -> Result<(), UiError> {
        let Some(state) = self.search.as_mut() else {
            return Ok(());
        };
        match search::scan(&mut self.navigator, &state.phrase)? {
            ScanOutcome::Found(position) => state.found = Some(position),
            ScanOutcome::Exhausted => {
                state.found = None;
                self.overlay = Overlay::SearchRestart;
            }
        }
        Ok(())
    }

    fn answer_restart(&mut self, key: KeyEvent) -> Result<(), UiError> {
        self.overlay = Overlay::None;
        if let KeyCode::Char('y' | 'Y') = key.code {
            search::restart(&mut self.navigator)?;
            return self.continue_search();
        }
        if let Some(state) = self.search.take() {
            search::abandon(&mut self.navigator, state.original_page)?;
        }
        Ok(())
    }

    fn draw_ui(
        f: &mut Frame,
        page: &Page,
        highlight: Option<Range<usize>>,
        overlay: &Overlay,
        input: &InputMode,
        status: Option<&str>,
    ) {
        let area = f.area();
        f.render_widget(Self::background(area), area);

        let reader_area = Self::reader_area(area, page);
        let reader = Block::default()
            .borders(Borders::ALL)
            .border_set(READER_BORDER)
            .padding(Padding::uniform(1));
        let text_area = reader.inner(reader_area);
        f.render_widget(Clear, reader_area);
        f.render_widget(reader, reader_area);
        f.render_widget(Paragraph::new(Self::page_lines(page, highlight)), text_area);

        Self::render_page_badge(f, area, page.number());

        match overlay {
            Overlay::None => {}
            Overlay::Bookmarks { entries, selected } => {
                Self::render_bookmarks(f, area, entries, *selected);
            }
            Overlay::NoBookmarks => Self::render_no_bookmarks(f, area),
            Overlay::SearchRestart => Self::render_restart_dialog(f, area),
        }

        Self::render_bottom_line(f, area, input, status);
    }

    fn background(area: Rect) -> Paragraph<'static> {
        let lines: Vec<Line> = (0..area.height as usize)
            .map(|row| {
                let stagger = (row % 2) * BACKGROUND_STAGGER;
                let pattern: String = (0..area.width as usize)
                    .map(|col| {
                        if (col + stagger) % BACKGROUND_PERIOD == 0 {
                            '~'
                        } else {
                            ' '
                        }
                    })
                    .collect();
                Line::from(pattern)
            })
            .collect();
        Paragraph::new(lines).style(Style::default().fg(Color::DarkGray))
    }

    fn reader_area(area: Rect, page: &Page) -> Rect {
        let viewport = page.viewport();
        let width = u16::try_from(viewport.width())
            .unwrap_or(u16::MAX)
            .saturating_add(2 * READER_MARGIN);
        let height = u16::try_from(viewport.height())
            .unwrap_or(u16::MAX)
            .saturating_add(2 * READER_MARGIN);
        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height.saturating_sub(height) / 2;
        Rect::new(x, y, width, height).intersection(area)
    }

    fn page_lines(page: &Page, highlight: Option<Range<usize>>) -> Vec<Line<'static>> {
        let text = page.text();
        let marked = Style::default().fg(Color::Black).bg(Color::Blue);

        page.visual_lines()
            .into_iter()
            .map(|line| {
                let Some(hit) = highlight.clone() else {
                    return Line::from(Self::printable(&text[line]));
                };
                let start = hit.start.clamp(line.start, line.end);
                let end = hit.end.clamp(start, line.end);
                if start == end {
                    return Line::from(Self::printable(&text[line]));
                }
                Line::from(vec![
                    Span::raw(Self::printable(&text[line.start..start])),
                    Span::styled(Self::printable(&text[start..end]), marked),
                    Span::raw(Self::printable(&text[end..line.end])),
                ])
            })
            .collect()
    }

    fn printable(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes)
            .chars()
            .map(|c| if c.is_control() { ' ' } else { c })
            .collect()
    }

    fn render_page_badge(f: &mut Frame, area: Rect, number: u64) {
        let width = (PAGE_LABEL.len() + digit_count(number) + 4) as u16;
        let badge_area = Rect::new(area.x + 1, area.y + 1, width, 3).intersection(area);
        let badge = Paragraph::new(format!("{}{}", PAGE_LABEL, number)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_set(BADGE_BORDER)
                .padding(Padding::horizontal(1)),
        );
        f.render_widget(Clear, badge_area);
        f.render_widget(badge, badge_area);
    }

    fn render_bookmarks(f: &mut Frame, area: Rect, entries: &[Bookmark], selected: usize) {
        let visible = (entries.len() as u16).min(BOOKMARK_VISIBLE_ENTRIES);
        let pane_area = Rect::new(
            area.right().saturating_sub(BOOKMARK_PANE_WIDTH),
            area.y,
            BOOKMARK_PANE_WIDTH,
            visible + 2,
        )
        .intersection(area);

        let items: Vec<ListItem> = entries
            .iter()
            .map(|bookmark| {
                let saved = bookmark
                    .saved_at()
                    .map(|time| time.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default();
                ListItem::new(Line::from(vec![
                    Span::raw(format!("@ {} ", bookmark.location)),
                    Span::styled(saved, Style::default().fg(Color::DarkGray)),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_set(DIALOG_BORDER)
                    .title("Bookmarks")
                    .title_alignment(Alignment::Center),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Blue)
                    .add_modifier(Modifier::BOLD),
            );

        let mut list_state = ListState::default();
        list_state.select(Some(selected));
        f.render_widget(Clear, pane_area);
        f.render_stateful_widget(list, pane_area, &mut list_state);
    }

    fn render_no_bookmarks(f: &mut Frame, area: Rect) {
        let popup_area = Rect::new(
            area.right().saturating_sub(BOOKMARK_PANE_WIDTH + 2),
            area.y + 2,
            BOOKMARK_PANE_WIDTH,
            3,
        )
        .intersection(area);
        let popup = Paragraph::new("Error: no bookmarks found")
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_set(DIALOG_BORDER),
            );
        f.render_widget(Clear, popup_area);
        f.render_widget(popup, popup_area);
    }

    fn render_restart_dialog(f: &mut Frame, area: Rect) {
        let x = area.x + area.width.saturating_sub(RESTART_DIALOG_WIDTH) / 2;
        let y = area.y + area.height.saturating_sub(RESTART_DIALOG_HEIGHT) / 2;
        let dialog_area =
            Rect::new(x, y, RESTART_DIALOG_WIDTH, RESTART_DIALOG_HEIGHT).intersection(area);

        let lines = vec![
            Line::from("Could not find"),
            Line::from("phrase entered."),
            Line::from("Restart from"),
            Line::from("beginning?"),
            Line::from(""),
            Line::from(Span::styled(
                "(Y/N)",
                Style::default().add_modifier(Modifier::BOLD),
            )),
        ];
        let dialog = Paragraph::new(lines).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_set(DIALOG_BORDER),
        );
        f.render_widget(Clear, dialog_area);
        f.render_widget(dialog, dialog_area);
    }

    fn render_bottom_line(f: &mut Frame, area: Rect, input: &InputMode, status: Option<&str>) {
        if area.height == 0 {
            return;
        }
        let line_area = Rect::new(area.x, area.bottom() - 1, area.width, 1);

        let (prompt, text) = match input {
            InputMode::Command(line) => (":", line.as_str()),
            InputMode::Search(line) => ("/", line.as_str()),
            InputMode::Normal => {
                let line = match status {
                    Some(message) => Line::from(Span::styled(
                        format!(" {}", message),
                        Style::default().fg(Color::Yellow),
                    )),
                    None => Line::from(Span::styled(
                        " n:next  b:back  /:search  :g<N>:goto  :s:save  :b:bookmarks  :q:quit",
                        Style::default().fg(Color::DarkGray),
                    )),
                };
                f.render_widget(Clear, line_area);
                f.render_widget(Paragraph::new(line), line_area);
                return;
            }
        };

        f.render_widget(Clear, line_area);
        f.render_widget(Paragraph::new(format!(" {}{}", prompt, text)), line_area);
        let cursor_x = line_area.x + 2 + text.chars().count() as u16;
        f.set_cursor_position((cursor_x.min(line_area.right().saturating_sub(1)), line_area.y));
    }
}
