use std::path::PathBuf;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::config::Theme;
use crate::error::StoreError;
use crate::models::Book;

use super::app::{Outcome, Screen};
use super::helpers::{surface_error, surface_store_error};
use super::tasks::Command;

/// Books shown per page on the list screen.
pub(crate) const BOOKS_PER_PAGE: usize = 3;

/// Move `selected` by one within `0..len`, stopping at either end.
fn step_clamped(selected: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        0
    } else if forward {
        (selected + 1).min(len - 1)
    } else {
        selected.saturating_sub(1)
    }
}

fn is_up(code: KeyCode) -> bool {
    matches!(code, KeyCode::Up | KeyCode::Char('k'))
}

fn is_down(code: KeyCode) -> bool {
    matches!(code, KeyCode::Down | KeyCode::Char('j'))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MenuItem {
    AddBook,
    ViewBooks,
    Utilities,
    Theme,
    Quit,
}

impl MenuItem {
    pub(crate) fn label(self) -> &'static str {
        match self {
            MenuItem::AddBook => "Add Book",
            MenuItem::ViewBooks => "View Books",
            MenuItem::Utilities => "Utilities",
            MenuItem::Theme => "Theme",
            MenuItem::Quit => "Quit",
        }
    }

    /// Entries that only make sense once the library holds something.
    fn needs_books(self) -> bool {
        matches!(self, MenuItem::ViewBooks | MenuItem::Utilities)
    }
}

const MENU_ITEMS: [MenuItem; 5] = [
    MenuItem::AddBook,
    MenuItem::ViewBooks,
    MenuItem::Utilities,
    MenuItem::Theme,
    MenuItem::Quit,
];

/// Main menu. Its entries depend on the current book count.
#[derive(Debug, Clone)]
pub(crate) struct MenuScreen {
    items: Vec<MenuItem>,
    selected: usize,
    count: usize,
    pub(crate) error: Option<String>,
}

impl MenuScreen {
    pub(crate) fn new() -> Self {
        let mut menu = Self {
            items: Vec::new(),
            selected: 0,
            count: 0,
            error: None,
        };
        menu.set_count(0);
        menu
    }

    pub(crate) fn set_count(&mut self, count: usize) {
        self.count = count;
        self.items = MENU_ITEMS
            .iter()
            .copied()
            .filter(|item| count > 0 || !item.needs_books())
            .collect();
        self.selected = self.selected.min(self.items.len().saturating_sub(1));
    }

    pub(crate) fn count(&self) -> usize {
        self.count
    }

    /// A failed count keeps the previous entries and reports the error.
    pub(crate) fn on_counted(&mut self, result: Result<usize, StoreError>) {
        match result {
            Ok(count) => {
                self.set_count(count);
                self.error = None;
            }
            Err(err) => self.error = Some(surface_store_error(&err)),
        }
    }

    pub(crate) fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub(crate) fn selected(&self) -> usize {
        self.selected
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> Outcome {
        match key.code {
            code if is_up(code) => {
                self.selected = step_clamped(self.selected, self.items.len(), false);
                Outcome::none()
            }
            code if is_down(code) => {
                self.selected = step_clamped(self.selected, self.items.len(), true);
                Outcome::none()
            }
            KeyCode::Enter => match self.items.get(self.selected) {
                Some(MenuItem::AddBook) => Outcome::go(Screen::AddBook),
                Some(MenuItem::ViewBooks) => Outcome::go(Screen::ListBooks),
                Some(MenuItem::Utilities) => Outcome::go(Screen::Utilities),
                Some(MenuItem::Theme) => Outcome::go(Screen::Theme),
                Some(MenuItem::Quit) => Outcome::quit(),
                None => Outcome::none(),
            },
            _ => Outcome::none(),
        }
    }
}

/// Paged list of every book, newest first.
#[derive(Debug, Clone, Default)]
pub(crate) struct BookListScreen {
    books: Vec<Book>,
    selected: usize,
    offset: usize,
    pub(crate) error: Option<String>,
    pub(crate) deleted: bool,
}

impl BookListScreen {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn books(&self) -> &[Book] {
        &self.books
    }

    pub(crate) fn selected(&self) -> usize {
        self.selected
    }

    #[cfg(test)]
    pub(crate) fn offset(&self) -> usize {
        self.offset
    }

    /// The window of books currently on screen, with their absolute indices.
    pub(crate) fn visible(&self) -> impl Iterator<Item = (usize, &Book)> {
        self.books
            .iter()
            .enumerate()
            .skip(self.offset)
            .take(BOOKS_PER_PAGE)
    }

    /// One-based page of the top visible row and the total page count.
    pub(crate) fn page(&self) -> (usize, usize) {
        let total = self.books.len().div_ceil(BOOKS_PER_PAGE).max(1);
        (self.offset / BOOKS_PER_PAGE + 1, total)
    }

    pub(crate) fn current_book(&self) -> Option<&Book> {
        self.books.get(self.selected)
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> Outcome {
        match key.code {
            code if is_up(code) => {
                self.selected = step_clamped(self.selected, self.books.len(), false);
                if self.selected < self.offset {
                    self.offset = self.selected;
                }
                Outcome::none()
            }
            code if is_down(code) => {
                self.selected = step_clamped(self.selected, self.books.len(), true);
                if self.selected >= self.offset + BOOKS_PER_PAGE {
                    self.offset = self.selected + 1 - BOOKS_PER_PAGE;
                }
                Outcome::none()
            }
            KeyCode::Enter => {
                if self.current_book().is_some() {
                    Outcome::go(Screen::BookDetail)
                } else {
                    Outcome::none()
                }
            }
            KeyCode::Esc => Outcome::go(Screen::Menu),
            _ => Outcome::none(),
        }
    }

    pub(crate) fn on_loaded(&mut self, result: Result<Vec<Book>, StoreError>) -> Outcome {
        match result {
            Ok(books) => {
                self.books = books;
                self.error = None;
                self.clamp();
            }
            Err(err) => self.error = Some(surface_store_error(&err)),
        }
        Outcome::none()
    }

    /// Swap in a fresher copy of a record, matched by id.
    pub(crate) fn replace_book(&mut self, book: &Book) {
        if let Some(slot) = self.books.iter_mut().find(|existing| existing.id == book.id) {
            *slot = book.clone();
        }
    }

    pub(crate) fn mark_deleted(&mut self) {
        self.deleted = true;
    }

    pub(crate) fn clear_deleted(&mut self) {
        self.deleted = false;
    }

    fn clamp(&mut self) {
        self.selected = self.selected.min(self.books.len().saturating_sub(1));
        self.offset = self
            .offset
            .min(self.books.len().saturating_sub(BOOKS_PER_PAGE));
        if self.selected < self.offset {
            self.offset = self.selected;
        }
        if self.selected >= self.offset + BOOKS_PER_PAGE {
            self.offset = self.selected + 1 - BOOKS_PER_PAGE;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DetailAction {
    Edit,
    Delete,
    Back,
}

impl DetailAction {
    pub(crate) const ALL: [DetailAction; 3] =
        [DetailAction::Edit, DetailAction::Delete, DetailAction::Back];

    pub(crate) fn label(self) -> &'static str {
        match self {
            DetailAction::Edit => "Edit Book",
            DetailAction::Delete => "Delete Book",
            DetailAction::Back => "Back to List",
        }
    }
}

/// Read view of one book plus its actions.
#[derive(Debug, Clone, Default)]
pub(crate) struct DetailScreen {
    book: Option<Book>,
    selected: usize,
    pub(crate) error: Option<String>,
    pub(crate) updated: bool,
    deleting: bool,
}

impl DetailScreen {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_book(&mut self, book: Option<Book>) {
        self.book = book;
        self.selected = 0;
        self.error = None;
        self.updated = false;
        self.deleting = false;
    }

    pub(crate) fn book(&self) -> Option<&Book> {
        self.book.as_ref()
    }

    pub(crate) fn selected(&self) -> usize {
        self.selected
    }

    pub(crate) fn mark_updated(&mut self) {
        self.updated = true;
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> Outcome {
        match key.code {
            code if is_up(code) => {
                self.selected = step_clamped(self.selected, DetailAction::ALL.len(), false);
                Outcome::none()
            }
            code if is_down(code) => {
                self.selected = step_clamped(self.selected, DetailAction::ALL.len(), true);
                Outcome::none()
            }
            KeyCode::Enter => match DetailAction::ALL[self.selected] {
                DetailAction::Edit if self.book.is_some() => Outcome::go(Screen::EditBook),
                DetailAction::Delete => match &self.book {
                    Some(book) if !self.deleting => {
                        self.deleting = true;
                        self.error = None;
                        Outcome::run(Command::DeleteBook(book.id))
                    }
                    _ => Outcome::none(),
                },
                DetailAction::Back => Outcome::go(Screen::ListBooks),
                DetailAction::Edit => Outcome::none(),
            },
            KeyCode::Esc => Outcome::go(Screen::ListBooks),
            _ => Outcome::none(),
        }
    }

    pub(crate) fn on_deleted(&mut self, result: Result<i64, StoreError>) -> Outcome {
        self.deleting = false;
        match result {
            Ok(_) => {
                self.book = None;
                Outcome::go(Screen::ListBooks)
            }
            Err(err) => {
                self.error = Some(surface_store_error(&err));
                Outcome::none()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UtilityItem {
    Export,
    Backup,
    Back,
}

impl UtilityItem {
    pub(crate) const ALL: [UtilityItem; 3] =
        [UtilityItem::Export, UtilityItem::Backup, UtilityItem::Back];

    pub(crate) fn label(self) -> &'static str {
        match self {
            UtilityItem::Export => "Export Data",
            UtilityItem::Backup => "Backup Database",
            UtilityItem::Back => "Back to Main Menu",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct UtilitiesScreen {
    selected: usize,
}

impl UtilitiesScreen {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn selected(&self) -> usize {
        self.selected
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> Outcome {
        match key.code {
            code if is_up(code) => {
                self.selected = step_clamped(self.selected, UtilityItem::ALL.len(), false);
                Outcome::none()
            }
            code if is_down(code) => {
                self.selected = step_clamped(self.selected, UtilityItem::ALL.len(), true);
                Outcome::none()
            }
            KeyCode::Enter => match UtilityItem::ALL[self.selected] {
                UtilityItem::Export => Outcome::go(Screen::Export),
                UtilityItem::Backup => Outcome::go(Screen::Backup),
                UtilityItem::Back => Outcome::go(Screen::Menu),
            },
            KeyCode::Esc => Outcome::go(Screen::Menu),
            _ => Outcome::none(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BackupState {
    Running,
    Done(PathBuf),
    Failed(String),
}

#[derive(Debug, Clone)]
pub(crate) struct BackupScreen {
    pub(crate) state: BackupState,
}

impl BackupScreen {
    pub(crate) fn new() -> Self {
        Self {
            state: BackupState::Running,
        }
    }

    /// Reset to the running state and hand back the command to dispatch.
    pub(crate) fn start(&mut self) -> Command {
        self.state = BackupState::Running;
        Command::Backup
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> Outcome {
        if self.state == BackupState::Running {
            return Outcome::none();
        }
        match key.code {
            KeyCode::Enter | KeyCode::Esc => Outcome::go(Screen::Utilities),
            _ => Outcome::none(),
        }
    }

    pub(crate) fn on_backed_up(&mut self, result: Result<PathBuf>) -> Outcome {
        self.state = match result {
            Ok(path) => BackupState::Done(path),
            Err(err) => BackupState::Failed(surface_error(&err)),
        };
        Outcome::none()
    }
}

/// Theme picker. The choice is applied once it has been saved.
#[derive(Debug, Clone)]
pub(crate) struct ThemeScreen {
    themes: Vec<Theme>,
    selected: usize,
    pub(crate) error: Option<String>,
    saving: bool,
}

impl ThemeScreen {
    pub(crate) fn new() -> Self {
        Self {
            themes: Theme::all(),
            selected: 0,
            error: None,
            saving: false,
        }
    }

    /// Preselect `current` (by name) and clear any previous error.
    pub(crate) fn reset(&mut self, current: &Theme) {
        self.selected = self
            .themes
            .iter()
            .position(|theme| theme.name == current.name)
            .unwrap_or(0);
        self.error = None;
        self.saving = false;
    }

    pub(crate) fn themes(&self) -> &[Theme] {
        &self.themes
    }

    pub(crate) fn selected(&self) -> usize {
        self.selected
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> Outcome {
        match key.code {
            code if is_up(code) => {
                self.selected = step_clamped(self.selected, self.themes.len(), false);
                Outcome::none()
            }
            code if is_down(code) => {
                self.selected = step_clamped(self.selected, self.themes.len(), true);
                Outcome::none()
            }
            KeyCode::Enter if !self.saving => match self.themes.get(self.selected) {
                Some(theme) => {
                    self.saving = true;
                    Outcome::run(Command::SaveTheme(theme.clone()))
                }
                None => Outcome::none(),
            },
            KeyCode::Esc => Outcome::go(Screen::Menu),
            _ => Outcome::none(),
        }
    }

    pub(crate) fn on_theme_saved(&mut self, result: &Result<Theme>) -> Outcome {
        self.saving = false;
        match result {
            Ok(_) => {
                self.error = None;
                Outcome::go(Screen::Menu)
            }
            Err(err) => {
                self.error = Some(surface_error(err));
                Outcome::none()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookType;
    use anyhow::anyhow;
    use chrono::Utc;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn books(n: i64) -> Vec<Book> {
        let now = Utc::now();
        (1..=n)
            .map(|id| Book {
                id,
                title: format!("Book {id}"),
                author: "Someone".into(),
                book_type: BookType::Paperback,
                notes: String::new(),
                created_at: now,
                updated_at: now,
            })
            .collect()
    }

    #[test]
    fn empty_library_hides_list_entries() {
        let mut menu = MenuScreen::new();
        assert_eq!(
            menu.items(),
            &[MenuItem::AddBook, MenuItem::Theme, MenuItem::Quit]
        );
        menu.set_count(2);
        assert_eq!(menu.items().len(), 5);
    }

    #[test]
    fn menu_selection_clamps_when_items_shrink() {
        let mut menu = MenuScreen::new();
        menu.set_count(1);
        for _ in 0..10 {
            menu.handle_key(key(KeyCode::Char('j')));
        }
        assert_eq!(menu.selected(), 4);
        menu.set_count(0);
        assert_eq!(menu.selected(), 2);
        assert!(menu.handle_key(key(KeyCode::Enter)).exit);
    }

    #[test]
    fn menu_navigation_does_not_wrap() {
        let mut menu = MenuScreen::new();
        menu.handle_key(key(KeyCode::Up));
        assert_eq!(menu.selected(), 0);
        assert_eq!(
            menu.handle_key(key(KeyCode::Enter)).screen,
            Some(Screen::AddBook)
        );
    }

    #[test]
    fn failed_count_keeps_entries_and_reports() {
        let mut menu = MenuScreen::new();
        menu.on_counted(Ok(3));
        assert_eq!(menu.items().len(), 5);

        menu.on_counted(Err(StoreError::from(rusqlite::Error::InvalidQuery)));
        assert_eq!(menu.count(), 3);
        assert_eq!(menu.items().len(), 5);
        assert!(menu
            .error
            .as_deref()
            .is_some_and(|e| e.starts_with("storage error")));

        menu.on_counted(Ok(0));
        assert_eq!(menu.error, None);
        assert_eq!(menu.items().len(), 3);
    }

    #[test]
    fn page_follows_the_top_visible_row() {
        let mut list = BookListScreen::new();
        list.on_loaded(Ok(books(7)));
        assert_eq!(list.page(), (1, 3));

        for _ in 0..4 {
            list.handle_key(key(KeyCode::Down));
        }
        // rows 2..=4 on screen while the selection sits on row 4
        assert_eq!((list.selected(), list.offset()), (4, 2));
        assert_eq!(list.page(), (1, 3));

        for _ in 0..2 {
            list.handle_key(key(KeyCode::Down));
        }
        assert_eq!(list.offset(), 4);
        assert_eq!(list.page(), (2, 3));
    }

    #[test]
    fn list_scrolls_only_when_leaving_window() {
        let mut list = BookListScreen::new();
        list.on_loaded(Ok(books(7)));

        list.handle_key(key(KeyCode::Down));
        list.handle_key(key(KeyCode::Down));
        assert_eq!((list.selected(), list.offset()), (2, 0));
        list.handle_key(key(KeyCode::Down));
        assert_eq!((list.selected(), list.offset()), (3, 1));

        for _ in 0..10 {
            list.handle_key(key(KeyCode::Down));
        }
        assert_eq!((list.selected(), list.offset()), (6, 4));
        assert_eq!(list.page(), (2, 3));

        list.handle_key(key(KeyCode::Up));
        list.handle_key(key(KeyCode::Up));
        assert_eq!((list.selected(), list.offset()), (4, 4));
        list.handle_key(key(KeyCode::Up));
        assert_eq!((list.selected(), list.offset()), (3, 3));
        assert_eq!(list.visible().count(), BOOKS_PER_PAGE);
    }

    #[test]
    fn list_enter_requires_a_book() {
        let mut list = BookListScreen::new();
        assert_eq!(list.handle_key(key(KeyCode::Enter)), Outcome::none());
        list.on_loaded(Ok(books(1)));
        assert_eq!(
            list.handle_key(key(KeyCode::Enter)).screen,
            Some(Screen::BookDetail)
        );
        assert_eq!(list.current_book().map(|b| b.id), Some(1));
    }

    #[test]
    fn reload_after_delete_clamps_selection() {
        let mut list = BookListScreen::new();
        list.on_loaded(Ok(books(4)));
        for _ in 0..3 {
            list.handle_key(key(KeyCode::Down));
        }
        list.on_loaded(Ok(books(3)));
        assert_eq!(list.selected(), 2);
        assert_eq!(list.offset(), 0);
    }

    #[test]
    fn detail_delete_dispatches_once() {
        let mut detail = DetailScreen::new();
        detail.set_book(books(1).pop());
        detail.handle_key(key(KeyCode::Down));
        assert_eq!(
            detail.handle_key(key(KeyCode::Enter)).command,
            Some(Command::DeleteBook(1))
        );
        assert_eq!(detail.handle_key(key(KeyCode::Enter)), Outcome::none());

        let outcome = detail.on_deleted(Ok(1));
        assert_eq!(outcome.screen, Some(Screen::ListBooks));
        assert!(detail.book().is_none());
    }

    #[test]
    fn detail_actions_clamp() {
        let mut detail = DetailScreen::new();
        detail.set_book(books(1).pop());
        for _ in 0..5 {
            detail.handle_key(key(KeyCode::Down));
        }
        assert_eq!(detail.selected(), 2);
        assert_eq!(
            detail.handle_key(key(KeyCode::Enter)).screen,
            Some(Screen::ListBooks)
        );
    }

    #[test]
    fn backup_ignores_keys_while_running() {
        let mut backup = BackupScreen::new();
        assert_eq!(backup.start(), Command::Backup);
        assert_eq!(backup.handle_key(key(KeyCode::Enter)), Outcome::none());

        backup.on_backed_up(Err(anyhow!("disk full")));
        assert_eq!(backup.state, BackupState::Failed("disk full".into()));
        assert_eq!(
            backup.handle_key(key(KeyCode::Esc)).screen,
            Some(Screen::Utilities)
        );
    }

    #[test]
    fn theme_screen_preselects_current() {
        let mut screen = ThemeScreen::new();
        screen.reset(&Theme::by_name("Surimi Orange"));
        assert_eq!(screen.selected(), 2);

        let outcome = screen.handle_key(key(KeyCode::Enter));
        assert_eq!(
            outcome.command,
            Some(Command::SaveTheme(Theme::by_name("Surimi Orange")))
        );
        let saved = Ok(Theme::by_name("Surimi Orange"));
        assert_eq!(screen.on_theme_saved(&saved).screen, Some(Screen::Menu));
    }
}
