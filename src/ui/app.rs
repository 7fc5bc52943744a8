use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use rusqlite::Connection;
use tracing::{debug, info};

use crate::config::{AppPaths, Theme};

use super::export::{ExportScreen, ExportStage};
use super::forms::{AddBookScreen, EditBookScreen};
use super::helpers::{key_hints, Palette};
use super::screens::{
    BackupScreen, BackupState, BookListScreen, DetailScreen, MenuScreen, ThemeScreen,
    UtilitiesScreen,
};
use super::tasks::{Command, Message, TaskQueue};
use super::views;

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;

/// Every screen the application can show. Exactly one is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    AddBook,
    ListBooks,
    BookDetail,
    EditBook,
    Utilities,
    Export,
    Backup,
    Theme,
}

/// What a screen asks the router to do after handling a message.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct Outcome {
    pub(crate) command: Option<Command>,
    pub(crate) screen: Option<Screen>,
    pub(crate) exit: bool,
}

impl Outcome {
    pub(crate) fn none() -> Self {
        Self::default()
    }

    pub(crate) fn go(screen: Screen) -> Self {
        Self {
            screen: Some(screen),
            ..Self::default()
        }
    }

    pub(crate) fn run(command: Command) -> Self {
        Self {
            command: Some(command),
            ..Self::default()
        }
    }

    pub(crate) fn quit() -> Self {
        Self {
            exit: true,
            ..Self::default()
        }
    }
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

impl StatusMessage {
    fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Info,
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Error,
        }
    }
}

/// The screen router: owns one instance of every screen plus the task queue
/// that holds the database handle.
pub struct App {
    screen: Screen,
    tasks: TaskQueue,
    theme: Theme,
    menu: MenuScreen,
    add: AddBookScreen,
    list: BookListScreen,
    detail: DetailScreen,
    edit: EditBookScreen,
    utilities: UtilitiesScreen,
    export: ExportScreen,
    backup: BackupScreen,
    themes: ThemeScreen,
}

impl App {
    pub fn new(conn: Connection, paths: AppPaths, theme: Theme) -> Self {
        let tasks = TaskQueue::new(conn, paths);
        let export = ExportScreen::new(tasks.paths());
        let mut app = Self {
            screen: Screen::Menu,
            tasks,
            theme,
            menu: MenuScreen::new(),
            add: AddBookScreen::new(),
            list: BookListScreen::new(),
            detail: DetailScreen::new(),
            edit: EditBookScreen::new(),
            utilities: UtilitiesScreen::new(),
            export,
            backup: BackupScreen::new(),
            themes: ThemeScreen::new(),
        };
        app.tasks.spawn(Command::CountBooks);
        app.drain();
        app
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Feed one key press through the router, then run whatever commands it
    /// queued. Returns `true` when the application should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.update(Message::Key(key)) {
            return true;
        }
        self.drain()
    }

    /// Close the database. Call once, after the terminal is restored.
    pub fn shutdown(self) -> Result<()> {
        info!("shutting down");
        self.tasks.close()
    }

    fn drain(&mut self) -> bool {
        let mut exit = false;
        while let Some(message) = self.tasks.next_completion() {
            exit |= self.update(message);
        }
        exit
    }

    fn update(&mut self, message: Message) -> bool {
        match message {
            Message::Key(key) => {
                if is_hard_quit(&key) {
                    debug!("hard quit");
                    return true;
                }
                if is_soft_quit(&key) && !self.is_data_entry() {
                    debug!(screen = ?self.screen, "soft quit");
                    return true;
                }
                let outcome = self.dispatch_key(key);
                self.apply(outcome)
            }
            Message::Saved(result) => {
                let outcome = self.add.on_saved(result);
                self.apply(outcome)
            }
            Message::Updated(result) => {
                let succeeded = result.is_ok();
                let outcome = self.edit.on_updated(result);
                let exit = self.apply(outcome);
                if succeeded {
                    self.detail.mark_updated();
                }
                exit
            }
            Message::Deleted(result) => {
                let succeeded = result.is_ok();
                let outcome = self.detail.on_deleted(result);
                let exit = self.apply(outcome);
                if succeeded {
                    self.list.mark_deleted();
                }
                exit
            }
            Message::Loaded(result) => {
                let outcome = self.list.on_loaded(result);
                self.apply(outcome)
            }
            Message::Counted(result) => {
                self.menu.on_counted(result);
                false
            }
            Message::Exported(result) => {
                let outcome = self.export.on_exported(result);
                self.apply(outcome)
            }
            Message::BackedUp(result) => {
                let outcome = self.backup.on_backed_up(result);
                self.apply(outcome)
            }
            Message::ThemeSaved(result) => {
                let outcome = self.themes.on_theme_saved(&result);
                if let Ok(theme) = result {
                    self.theme = theme;
                }
                self.apply(outcome)
            }
        }
    }

    fn dispatch_key(&mut self, key: KeyEvent) -> Outcome {
        match self.screen {
            Screen::Menu => self.menu.handle_key(key),
            Screen::AddBook => self.add.handle_key(key),
            Screen::ListBooks => self.list.handle_key(key),
            Screen::BookDetail => self.detail.handle_key(key),
            Screen::EditBook => self.edit.handle_key(key),
            Screen::Utilities => self.utilities.handle_key(key),
            Screen::Export => self.export.handle_key(key),
            Screen::Backup => self.backup.handle_key(key),
            Screen::Theme => self.themes.handle_key(key),
        }
    }

    fn apply(&mut self, outcome: Outcome) -> bool {
        if let Some(command) = outcome.command {
            self.tasks.spawn(command);
        }
        if let Some(next) = outcome.screen {
            if next != self.screen {
                self.switch_to(next);
            }
        }
        outcome.exit
    }

    fn switch_to(&mut self, next: Screen) {
        let previous = self.screen;
        debug!(from = ?previous, to = ?next, "switching screen");

        match next {
            Screen::Menu => self.tasks.spawn(Command::CountBooks),
            Screen::AddBook => self.add.reset(),
            Screen::ListBooks => {
                self.list.clear_deleted();
                self.tasks.spawn(Command::LoadBooks);
            }
            Screen::BookDetail => {
                if previous == Screen::EditBook {
                    if let Some(book) = self.edit.book().cloned() {
                        self.list.replace_book(&book);
                        self.detail.set_book(Some(book));
                    }
                } else {
                    self.detail.set_book(self.list.current_book().cloned());
                }
            }
            Screen::EditBook => {
                if let Some(book) = self.detail.book().cloned() {
                    self.edit.set_book(book);
                }
            }
            Screen::Utilities => {}
            Screen::Export => self.export.reset(),
            Screen::Backup => {
                let command = self.backup.start();
                self.tasks.spawn(command);
            }
            Screen::Theme => self.themes.reset(&self.theme),
        }

        self.screen = next;
    }

    /// Screens holding in-progress text, where a bare `q` is input.
    fn is_data_entry(&self) -> bool {
        match self.screen {
            Screen::AddBook | Screen::EditBook => true,
            Screen::Export => self.export.is_data_entry(),
            _ => false,
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);
        let palette = Palette::from_theme(&self.theme);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match self.screen {
            Screen::Menu => views::draw_menu(frame, content_area, &self.menu, &palette),
            Screen::AddBook => {
                views::draw_book_form(frame, content_area, "Add New Book", &self.add.form, &palette)
            }
            Screen::ListBooks => views::draw_book_list(frame, content_area, &self.list, &palette),
            Screen::BookDetail => views::draw_detail(frame, content_area, &self.detail, &palette),
            Screen::EditBook => {
                views::draw_book_form(frame, content_area, "Edit Book", &self.edit.form, &palette)
            }
            Screen::Utilities => {
                views::draw_utilities(frame, content_area, &self.utilities, &palette)
            }
            Screen::Export => views::draw_export(frame, content_area, &self.export, &palette),
            Screen::Backup => views::draw_backup(frame, content_area, &self.backup, &palette),
            Screen::Theme => views::draw_themes(frame, content_area, &self.themes, &palette),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area, &palette);
        }
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = self.status() {
            Line::from(vec![Span::styled(status.text, status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions(palette);

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn status(&self) -> Option<StatusMessage> {
        match self.screen {
            Screen::AddBook => match (&self.add.form.error, self.add.form.saved) {
                (Some(error), _) => Some(StatusMessage::error(error.clone())),
                (None, true) => Some(StatusMessage::info("Book saved! Ready for the next one.")),
                (None, false) => None,
            },
            Screen::EditBook => self.edit.form.error.clone().map(StatusMessage::error),
            Screen::ListBooks => match (&self.list.error, self.list.deleted) {
                (Some(error), _) => Some(StatusMessage::error(error.clone())),
                (None, true) => Some(StatusMessage::info("Book deleted.")),
                (None, false) => None,
            },
            Screen::BookDetail => match (&self.detail.error, self.detail.updated) {
                (Some(error), _) => Some(StatusMessage::error(error.clone())),
                (None, true) => Some(StatusMessage::info("Book updated.")),
                (None, false) => None,
            },
            Screen::Export => self.export.error.clone().map(StatusMessage::error),
            Screen::Theme => self.themes.error.clone().map(StatusMessage::error),
            Screen::Menu => self.menu.error.clone().map(StatusMessage::error),
            Screen::Utilities | Screen::Backup => None,
        }
    }

    fn footer_instructions(&self, palette: &Palette) -> Line<'static> {
        let hints: &[(&str, &str)] = match self.screen {
            Screen::Menu => &[("↑↓", "Navigate"), ("Enter", "Select"), ("q", "Quit")],
            Screen::AddBook | Screen::EditBook => &[
                ("Tab/↓", "Next"),
                ("Shift+Tab/↑", "Previous"),
                ("←→", "Type"),
                ("Ctrl+J", "Newline"),
                ("Esc", "Cancel"),
            ],
            Screen::ListBooks => &[
                ("↑↓", "Navigate"),
                ("Enter", "View"),
                ("Esc", "Back"),
                ("q", "Quit"),
            ],
            Screen::BookDetail | Screen::Utilities => {
                &[("↑↓", "Navigate"), ("Enter", "Select"), ("Esc", "Back")]
            }
            Screen::Export => match self.export.stage() {
                ExportStage::PathInput => {
                    &[("Tab", "Next"), ("Enter", "Continue"), ("Esc", "Back")]
                }
                ExportStage::FormatSelection => {
                    &[("↑↓", "Navigate"), ("Enter", "Select"), ("Esc", "Back")]
                }
                ExportStage::Exporting => &[],
                ExportStage::ShowResult => &[("Enter", "Continue")],
            },
            Screen::Backup => match self.backup.state {
                BackupState::Running => &[],
                BackupState::Done(_) | BackupState::Failed(_) => &[("Enter", "Continue")],
            },
            Screen::Theme => &[("↑↓", "Navigate"), ("Enter", "Apply"), ("Esc", "Back")],
        };
        key_hints(palette, hints)
    }
}

fn is_hard_quit(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

fn is_soft_quit(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('q')
        && !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;
    use crate::db::{open_database, save_book};
    use crate::models::{Book, BookDraft, BookType};
    use crate::ui::export::ExportStage;
    use crate::ui::forms::BookSlot;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_key(key(code))
    }

    fn type_str(app: &mut App, text: &str) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch));
        }
    }

    fn app_with(seed: &[BookDraft]) -> (tempfile::TempDir, App) {
        let tmp = tempfile::tempdir().unwrap();
        let paths = AppPaths::new(tmp.path().to_path_buf(), tmp.path().join(".libros"));
        paths.ensure_data_dir().unwrap();
        let conn = open_database(&paths.database).unwrap();
        for draft in seed {
            save_book(&conn, draft).unwrap();
        }
        (tmp, App::new(conn, paths, Theme::default()))
    }

    fn stored_books(app: &mut App) -> Vec<Book> {
        app.tasks.spawn(Command::LoadBooks);
        match app.tasks.next_completion() {
            Some(Message::Loaded(Ok(books))) => books,
            other => panic!("unexpected {other:?}"),
        }
    }

    fn open_detail(app: &mut App) {
        press(app, KeyCode::Down);
        press(app, KeyCode::Enter);
        assert_eq!(app.screen(), Screen::ListBooks);
        press(app, KeyCode::Enter);
        assert_eq!(app.screen(), Screen::BookDetail);
    }

    fn draft(title: &str) -> BookDraft {
        BookDraft::new(title, "Author", BookType::Paperback, "")
    }

    #[test]
    fn adding_a_book_stores_trimmed_values() {
        let (_tmp, mut app) = app_with(&[]);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen(), Screen::AddBook);

        type_str(&mut app, "Dune");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "Frank Herbert");
        press(&mut app, KeyCode::Down);
        for _ in 0..3 {
            press(&mut app, KeyCode::Right);
        }
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.add.form.focused_slot(), BookSlot::Submit);
        press(&mut app, KeyCode::Enter);

        assert!(app.add.form.saved);
        assert_eq!(app.add.form.focused_slot(), BookSlot::Title);
        assert_eq!(app.screen(), Screen::AddBook);

        let books = stored_books(&mut app);
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "Dune");
        assert_eq!(books[0].author, "Frank Herbert");
        assert_eq!(books[0].book_type, BookType::Digital);
        assert_eq!(books[0].notes, "");
        assert_eq!(books[0].created_at, books[0].updated_at);
    }

    #[test]
    fn whitespace_title_is_rejected() {
        let (_tmp, mut app) = app_with(&[]);
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "   ");
        press(&mut app, KeyCode::Down);
        type_str(&mut app, "Someone");
        for _ in 0..3 {
            press(&mut app, KeyCode::Down);
        }
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.add.form.error.as_deref(), Some("title is required"));
        assert_eq!(app.add.form.focused_slot(), BookSlot::Submit);
        assert!(stored_books(&mut app).is_empty());

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen(), Screen::Menu);
        assert_eq!(app.menu.count(), 0);
    }

    #[test]
    fn menu_refreshes_count_on_return() {
        let (_tmp, mut app) = app_with(&[]);
        assert_eq!(app.menu.items().len(), 3);
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "T");
        press(&mut app, KeyCode::Down);
        type_str(&mut app, "A");
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.add.form.focused_slot(), BookSlot::Submit);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.menu.count(), 1);
        assert_eq!(app.menu.items().len(), 5);
    }

    #[test]
    fn cancelled_edit_leaves_store_untouched() {
        let (_tmp, mut app) = app_with(&[draft("A")]);
        open_detail(&mut app);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen(), Screen::EditBook);
        assert_eq!(app.edit.form.title.value(), "A");

        press(&mut app, KeyCode::Backspace);
        type_str(&mut app, "B");
        press(&mut app, KeyCode::Esc);

        assert_eq!(app.screen(), Screen::BookDetail);
        assert_eq!(app.detail.book().map(|b| b.title.as_str()), Some("A"));
        assert!(!app.detail.updated);
        assert_eq!(stored_books(&mut app)[0].title, "A");
    }

    #[test]
    fn submitted_edit_updates_detail_and_list() {
        let (_tmp, mut app) = app_with(&[draft("A")]);
        open_detail(&mut app);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Backspace);
        type_str(&mut app, "B ");
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.screen(), Screen::BookDetail);
        assert!(app.detail.updated);
        assert_eq!(app.detail.book().map(|b| b.title.as_str()), Some("B"));
        assert_eq!(app.list.current_book().map(|b| b.title.as_str()), Some("B"));
        assert_eq!(stored_books(&mut app)[0].title, "B");
    }

    #[test]
    fn deleting_returns_to_reloaded_list() {
        let (_tmp, mut app) = app_with(&[draft("A"), draft("B")]);
        open_detail(&mut app);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.screen(), Screen::ListBooks);
        assert!(app.list.deleted);
        assert_eq!(app.list.books().len(), 1);
        assert_eq!(stored_books(&mut app).len(), 1);
    }

    fn drop_books_table(app: &App) {
        app.tasks
            .connection()
            .execute_batch("DROP TABLE books")
            .unwrap();
    }

    fn is_storage_error(error: &Option<String>) -> bool {
        error
            .as_deref()
            .is_some_and(|e| e.starts_with("storage error"))
    }

    #[test]
    fn failed_save_keeps_the_form_and_reports() {
        let (_tmp, mut app) = app_with(&[]);
        press(&mut app, KeyCode::Enter);
        drop_books_table(&app);

        type_str(&mut app, "Dune");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "Frank Herbert");
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.add.form.focused_slot(), BookSlot::Submit);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.screen(), Screen::AddBook);
        assert!(is_storage_error(&app.add.form.error));
        assert!(!app.add.form.saved);
        assert_eq!(app.add.form.title.value(), "Dune");
        assert_eq!(app.status().map(|s| s.text), app.add.form.error.clone());
    }

    #[test]
    fn failed_update_stays_on_edit() {
        let (_tmp, mut app) = app_with(&[draft("A")]);
        open_detail(&mut app);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Backspace);
        type_str(&mut app, "B");
        press(&mut app, KeyCode::BackTab);
        drop_books_table(&app);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.screen(), Screen::EditBook);
        assert!(is_storage_error(&app.edit.form.error));
        assert!(!app.detail.updated);
        assert_eq!(app.detail.book().map(|b| b.title.as_str()), Some("A"));
    }

    #[test]
    fn failed_delete_stays_on_detail() {
        let (_tmp, mut app) = app_with(&[draft("A")]);
        open_detail(&mut app);
        drop_books_table(&app);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.screen(), Screen::BookDetail);
        assert!(is_storage_error(&app.detail.error));
        assert!(app.detail.book().is_some());
        assert!(!app.list.deleted);
    }

    #[test]
    fn failed_load_shows_on_list() {
        let (_tmp, mut app) = app_with(&[draft("A")]);
        drop_books_table(&app);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.screen(), Screen::ListBooks);
        assert!(is_storage_error(&app.list.error));
        assert!(app.list.books().is_empty());
    }

    #[test]
    fn failed_count_shows_on_menu() {
        let (_tmp, mut app) = app_with(&[draft("A"), draft("B")]);
        assert_eq!(app.menu.items().len(), 5);
        press(&mut app, KeyCode::Enter);
        drop_books_table(&app);
        press(&mut app, KeyCode::Esc);

        assert_eq!(app.screen(), Screen::Menu);
        assert!(is_storage_error(&app.menu.error));
        assert_eq!(app.menu.items().len(), 5);
        let status = app.status().map(|s| s.text);
        assert_eq!(status, app.menu.error.clone());
    }

    #[test]
    fn soft_quit_is_text_inside_forms() {
        let (_tmp, mut app) = app_with(&[]);
        press(&mut app, KeyCode::Enter);
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.add.form.title.value(), "q");

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(app.handle_key(ctrl_c));
    }

    #[test]
    fn soft_quit_exits_from_menu() {
        let (_tmp, mut app) = app_with(&[]);
        assert!(press(&mut app, KeyCode::Char('q')));
        app.shutdown().unwrap();
    }

    #[test]
    fn theme_choice_is_applied_and_saved() {
        let (tmp, mut app) = app_with(&[]);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen(), Screen::Theme);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.screen(), Screen::Menu);
        assert_eq!(app.theme().name, "Peach Red");
        let saved = load_config(&tmp.path().join(".libros").join("theme.toml")).unwrap();
        assert_eq!(saved.theme.name, "Peach Red");
    }

    #[test]
    fn export_writes_json_to_default_dir() {
        let (tmp, mut app) = app_with(&[draft("A")]);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen(), Screen::Utilities);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen(), Screen::Export);

        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.export.path.value(), "q");
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.export.stage(), ExportStage::FormatSelection);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.export.stage(), ExportStage::ShowResult);
        let expected = tmp.path().join(".libros").join("exports").join("books.json");
        assert_eq!(app.export.result, Some(Ok(expected.clone())));
        assert!(expected.exists());
    }

    #[test]
    fn backup_runs_on_entry() {
        let (tmp, mut app) = app_with(&[draft("A")]);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.screen(), Screen::Backup);
        let backup = tmp.path().join(".libros").join("books.db.bak");
        assert_eq!(app.backup.state, BackupState::Done(backup.clone()));
        assert!(backup.exists());
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen(), Screen::Utilities);
    }
}
