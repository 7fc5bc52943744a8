//! Domain models that mirror the `books` table and get passed throughout the
//! TUI. These types stay light-weight data holders so other layers can focus
//! on presentation and persistence logic.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::UnknownBookType;

/// Physical or digital format of a book. Stored as lowercase text in the
/// `type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookType {
    #[default]
    Paperback,
    Hardback,
    Audio,
    Digital,
}

impl BookType {
    /// Every format in the order the type selector offers them.
    pub const ALL: [BookType; 4] = [
        BookType::Paperback,
        BookType::Hardback,
        BookType::Audio,
        BookType::Digital,
    ];

    /// Value written to the database and to exports.
    pub fn as_str(self) -> &'static str {
        match self {
            BookType::Paperback => "paperback",
            BookType::Hardback => "hardback",
            BookType::Audio => "audio",
            BookType::Digital => "digital",
        }
    }

    /// Capitalized name shown in the UI and the Markdown export.
    pub fn label(self) -> &'static str {
        match self {
            BookType::Paperback => "Paperback",
            BookType::Hardback => "Hardback",
            BookType::Audio => "Audio",
            BookType::Digital => "Digital",
        }
    }
}

impl fmt::Display for BookType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookType {
    type Err = UnknownBookType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paperback" => Ok(BookType::Paperback),
            "hardback" => Ok(BookType::Hardback),
            "audio" => Ok(BookType::Audio),
            "digital" => Ok(BookType::Digital),
            _ => Err(UnknownBookType(s.to_string())),
        }
    }
}

/// A persisted book record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Primary key assigned by SQLite. Never changes after insert.
    pub id: i64,
    pub title: String,
    pub author: String,
    #[serde(rename = "type")]
    pub book_type: BookType,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    /// Refreshed on every successful update, so never earlier than
    /// `created_at`.
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Copy the editable fields of a draft onto this record.
    pub fn apply_draft(&mut self, draft: &BookDraft) {
        self.title = draft.title.clone();
        self.author = draft.author.clone();
        self.book_type = draft.book_type;
        self.notes = draft.notes.clone();
    }
}

/// The mutable subset of a book as typed into a form. Drafts are snapshots:
/// the form keeps editing its own values while a draft is in flight.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub book_type: BookType,
    pub notes: String,
}

impl BookDraft {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        book_type: BookType,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            book_type,
            notes: notes.into(),
        }
    }

    /// Seed a draft from an existing record, as the edit form does.
    pub fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            book_type: book.book_type,
            notes: book.notes.clone(),
        }
    }
}
