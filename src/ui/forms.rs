//! Focus handling for the data-entry screens. A form is an ordered ring of
//! slots (text fields, a cyclic type selector, a notes area and a submit
//! action); exactly one slot is focused and navigation wraps around.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::error::StoreError;
use crate::models::{Book, BookDraft, BookType};
use crate::validation::{AUTHOR_MAX_LENGTH, NOTES_MAX_LENGTH, TITLE_MAX_LENGTH};

use super::app::{Outcome, Screen};
use super::helpers::surface_store_error;
use super::input::{TextArea, TextInput};
use super::tasks::Command;

/// Display width of the notes area before it wraps.
pub(crate) const NOTES_WIDTH: usize = 50;

/// Index of the focused slot in a ring of `len` slots. Moving past either
/// end wraps to the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FocusRing {
    index: usize,
    len: usize,
}

impl FocusRing {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            index: 0,
            len: len.max(1),
        }
    }

    pub(crate) fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn next(&mut self) {
        self.index = (self.index + 1) % self.len;
    }

    pub(crate) fn prev(&mut self) {
        self.index = (self.index + self.len - 1) % self.len;
    }

    pub(crate) fn reset(&mut self) {
        self.index = 0;
    }

    pub(crate) fn is_last(&self) -> bool {
        self.index == self.len - 1
    }
}

/// A fixed set of mutually exclusive choices, stepped with wraparound.
#[derive(Debug, Clone)]
pub(crate) struct ChoiceSelector<T> {
    choices: Vec<T>,
    index: usize,
}

impl<T: Copy + PartialEq> ChoiceSelector<T> {
    pub(crate) fn new(choices: Vec<T>) -> Self {
        Self { choices, index: 0 }
    }

    pub(crate) fn choices(&self) -> &[T] {
        &self.choices
    }

    pub(crate) fn index(&self) -> usize {
        self.index
    }

    /// Currently chosen value, if the selector has any choices at all.
    pub(crate) fn selected(&self) -> Option<T> {
        self.choices.get(self.index).copied()
    }

    pub(crate) fn next(&mut self) {
        if !self.choices.is_empty() {
            self.index = (self.index + 1) % self.choices.len();
        }
    }

    pub(crate) fn prev(&mut self) {
        if !self.choices.is_empty() {
            self.index = (self.index + self.choices.len() - 1) % self.choices.len();
        }
    }

    /// Point at `value` when present; otherwise leave the selection alone.
    pub(crate) fn select(&mut self, value: T) {
        if let Some(pos) = self.choices.iter().position(|choice| *choice == value) {
            self.index = pos;
        }
    }

    pub(crate) fn reset(&mut self) {
        self.index = 0;
    }
}

/// Slots of the book form, in focus order. Submit is always last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BookSlot {
    Title,
    Author,
    Type,
    Notes,
    Submit,
}

pub(crate) const BOOK_SLOTS: [BookSlot; 5] = [
    BookSlot::Title,
    BookSlot::Author,
    BookSlot::Type,
    BookSlot::Notes,
    BookSlot::Submit,
];

/// Which screen the form backs. On the add screen Tab/Shift+Tab step the
/// type selector while it is focused; on the edit screen they always move
/// focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormKind {
    Add,
    Edit,
}

/// What a key press asks of the owning screen.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FormEvent {
    None,
    Submit(BookDraft),
    Cancel,
}

/// Field values plus focus state for adding or editing one book.
#[derive(Debug, Clone)]
pub(crate) struct BookForm {
    kind: FormKind,
    pub(crate) title: TextInput,
    pub(crate) author: TextInput,
    pub(crate) book_type: ChoiceSelector<BookType>,
    pub(crate) notes: TextArea,
    focus: FocusRing,
    pub(crate) error: Option<String>,
    pub(crate) saved: bool,
    submitting: bool,
}

impl BookForm {
    pub(crate) fn new(kind: FormKind) -> Self {
        let mut form = Self {
            kind,
            title: TextInput::new("Enter book title", TITLE_MAX_LENGTH),
            author: TextInput::new("Enter author name", AUTHOR_MAX_LENGTH),
            book_type: ChoiceSelector::new(BookType::ALL.to_vec()),
            notes: TextArea::new(
                "Notes about this book (optional)...",
                NOTES_MAX_LENGTH,
                NOTES_WIDTH,
            ),
            focus: FocusRing::new(BOOK_SLOTS.len()),
            error: None,
            saved: false,
            submitting: false,
        };
        form.sync_focus();
        form
    }

    /// Blank every field and put focus back on the title.
    pub(crate) fn clear(&mut self) {
        self.title.set_value("");
        self.author.set_value("");
        self.notes.set_value("");
        self.book_type.reset();
        self.focus.reset();
        self.error = None;
        self.saved = false;
        self.submitting = false;
        self.sync_focus();
    }

    /// Load an existing record's values, focus on the title.
    pub(crate) fn fill(&mut self, draft: &BookDraft) {
        self.clear();
        self.title.set_value(&draft.title);
        self.author.set_value(&draft.author);
        self.notes.set_value(&draft.notes);
        self.book_type.select(draft.book_type);
        self.sync_focus();
    }

    pub(crate) fn focused_slot(&self) -> BookSlot {
        BOOK_SLOTS[self.focus.index()]
    }

    pub(crate) fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Snapshot of the current values. Nothing is trimmed here; the store
    /// does that.
    pub(crate) fn draft(&self) -> BookDraft {
        BookDraft {
            title: self.title.value(),
            author: self.author.value(),
            book_type: self.book_type.selected().unwrap_or_default(),
            notes: self.notes.value(),
        }
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> FormEvent {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        let slot = self.focused_slot();

        match key.code {
            KeyCode::Esc => {
                self.error = None;
                self.saved = false;
                self.submitting = false;
                FormEvent::Cancel
            }
            KeyCode::Char('a') if ctrl => {
                self.cursor_to_start();
                FormEvent::None
            }
            KeyCode::Char('e') if ctrl => {
                self.cursor_to_end();
                FormEvent::None
            }
            KeyCode::Enter if self.focus.is_last() => {
                if self.submitting {
                    return FormEvent::None;
                }
                self.submitting = true;
                self.error = None;
                self.saved = false;
                FormEvent::Submit(self.draft())
            }
            KeyCode::Tab if slot == BookSlot::Type && self.kind == FormKind::Add => {
                self.book_type.next();
                FormEvent::None
            }
            KeyCode::BackTab if slot == BookSlot::Type && self.kind == FormKind::Add => {
                self.book_type.prev();
                FormEvent::None
            }
            KeyCode::Right if slot == BookSlot::Type => {
                self.book_type.next();
                FormEvent::None
            }
            KeyCode::Left if slot == BookSlot::Type => {
                self.book_type.prev();
                FormEvent::None
            }
            KeyCode::Up | KeyCode::BackTab => {
                self.focus.prev();
                self.sync_focus();
                FormEvent::None
            }
            KeyCode::Enter if !alt => {
                self.focus.next();
                self.sync_focus();
                FormEvent::None
            }
            KeyCode::Down | KeyCode::Tab => {
                self.focus.next();
                self.sync_focus();
                FormEvent::None
            }
            _ => {
                let changed = match slot {
                    BookSlot::Title => self.title.apply_key(key),
                    BookSlot::Author => self.author.apply_key(key),
                    BookSlot::Notes => self.notes.apply_key(key),
                    BookSlot::Type | BookSlot::Submit => false,
                };
                if changed {
                    self.error = None;
                }
                FormEvent::None
            }
        }
    }

    /// Record the result of a submit. On failure the values and focus stay
    /// put so the user can correct and resubmit.
    pub(crate) fn finish_submit(&mut self, error: Option<String>) {
        self.submitting = false;
        match error {
            Some(message) => {
                self.error = Some(message);
                self.saved = false;
            }
            None => {
                self.error = None;
                self.saved = true;
            }
        }
    }

    fn cursor_to_start(&mut self) {
        match self.focused_slot() {
            BookSlot::Title => self.title.cursor_to_start(),
            BookSlot::Author => self.author.cursor_to_start(),
            BookSlot::Notes => self.notes.cursor_to_start(),
            BookSlot::Type | BookSlot::Submit => {}
        }
    }

    fn cursor_to_end(&mut self) {
        match self.focused_slot() {
            BookSlot::Title => self.title.cursor_to_end(),
            BookSlot::Author => self.author.cursor_to_end(),
            BookSlot::Notes => self.notes.cursor_to_end(),
            BookSlot::Type | BookSlot::Submit => {}
        }
    }

    /// Focus the text slot under the ring (cursor at end) and blur the rest.
    fn sync_focus(&mut self) {
        let slot = self.focused_slot();

        if slot == BookSlot::Title {
            self.title.focus();
            self.title.cursor_to_end();
        } else {
            self.title.blur();
        }

        if slot == BookSlot::Author {
            self.author.focus();
            self.author.cursor_to_end();
        } else {
            self.author.blur();
        }

        if slot == BookSlot::Notes {
            self.notes.focus();
            self.notes.cursor_to_end();
        } else {
            self.notes.blur();
        }
    }
}

/// The "Add New Book" screen: stays open after each save, ready for the
/// next entry.
#[derive(Debug, Clone)]
pub(crate) struct AddBookScreen {
    pub(crate) form: BookForm,
}

impl AddBookScreen {
    pub(crate) fn new() -> Self {
        Self {
            form: BookForm::new(FormKind::Add),
        }
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> Outcome {
        match self.form.handle_key(key) {
            FormEvent::None => Outcome::none(),
            FormEvent::Submit(draft) => Outcome::run(Command::SaveBook(draft)),
            FormEvent::Cancel => Outcome::go(Screen::Menu),
        }
    }

    pub(crate) fn on_saved(&mut self, result: Result<i64, StoreError>) -> Outcome {
        match result {
            Ok(_) => {
                self.form.clear();
                self.form.finish_submit(None);
            }
            Err(err) => self.form.finish_submit(Some(surface_store_error(&err))),
        }
        Outcome::none()
    }

    pub(crate) fn reset(&mut self) {
        self.form.clear();
    }
}

/// The "Edit Book" screen. Holds its own copy of the record being edited;
/// the copy only changes once the store confirms the update.
#[derive(Debug, Clone)]
pub(crate) struct EditBookScreen {
    pub(crate) form: BookForm,
    book: Option<Book>,
}

impl EditBookScreen {
    pub(crate) fn new() -> Self {
        Self {
            form: BookForm::new(FormKind::Edit),
            book: None,
        }
    }

    pub(crate) fn set_book(&mut self, book: Book) {
        self.form.fill(&BookDraft::from_book(&book));
        self.book = Some(book);
    }

    pub(crate) fn book(&self) -> Option<&Book> {
        self.book.as_ref()
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> Outcome {
        match self.form.handle_key(key) {
            FormEvent::None => Outcome::none(),
            FormEvent::Submit(draft) => match &self.book {
                Some(book) => Outcome::run(Command::UpdateBook { id: book.id, draft }),
                None => {
                    self.form.finish_submit(Some("No book selected.".to_string()));
                    Outcome::none()
                }
            },
            FormEvent::Cancel => Outcome::go(Screen::BookDetail),
        }
    }

    pub(crate) fn on_updated(&mut self, result: Result<BookDraft, StoreError>) -> Outcome {
        match result {
            Ok(clean) => {
                self.form.finish_submit(None);
                if let Some(book) = self.book.as_mut() {
                    book.apply_draft(&clean);
                }
                Outcome::go(Screen::BookDetail)
            }
            Err(err) => {
                self.form.finish_submit(Some(surface_store_error(&err)));
                Outcome::none()
            }
        }
    }
}
