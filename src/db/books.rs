use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use tracing::{info, warn};

use crate::error::StoreError;
use crate::models::{Book, BookDraft, BookType};

/// Insert a new book after trimming and validating the draft. Both
/// timestamps are set to the same instant. Returns the assigned id.
pub fn save_book(conn: &Connection, draft: &BookDraft) -> Result<i64, StoreError> {
    let clean = draft.validated()?;
    let now = Utc::now();

    conn.execute(
        "INSERT INTO books (title, author, type, notes, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
        params![
            clean.title,
            clean.author,
            clean.book_type.as_str(),
            clean.notes,
            now
        ],
    )?;

    let id = conn.last_insert_rowid();
    info!(id, title = %clean.title, "saved book");
    Ok(id)
}

/// Every book, newest first. Ties on `created_at` fall back to the id so
/// the order stays deterministic.
pub fn load_books(conn: &Connection) -> Result<Vec<Book>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, title, author, type, notes, created_at, updated_at
         FROM books
         ORDER BY created_at DESC, id DESC",
    )?;

    let books = stmt
        .query_map([], book_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(books)
}

/// Overwrite the editable fields of a book and refresh `updated_at`.
///
/// An id with no matching row is not an error: nothing changes and the call
/// succeeds, which is logged so the case stays visible.
pub fn update_book(conn: &Connection, id: i64, draft: &BookDraft) -> Result<(), StoreError> {
    let clean = draft.validated()?;
    let updated = conn.execute(
        "UPDATE books
         SET title = ?1, author = ?2, type = ?3, notes = ?4, updated_at = ?5
         WHERE id = ?6",
        params![
            clean.title,
            clean.author,
            clean.book_type.as_str(),
            clean.notes,
            Utc::now(),
            id
        ],
    )?;

    if updated == 0 {
        warn!(id, "update matched no book");
    } else {
        info!(id, "updated book");
    }
    Ok(())
}

/// Hard-delete a book. Like updates, a missing id succeeds silently.
pub fn delete_book(conn: &Connection, id: i64) -> Result<(), StoreError> {
    let deleted = conn.execute("DELETE FROM books WHERE id = ?1", params![id])?;

    if deleted == 0 {
        warn!(id, "delete matched no book");
    } else {
        info!(id, "deleted book");
    }
    Ok(())
}

/// Total number of stored books.
pub fn count_books(conn: &Connection) -> Result<usize, StoreError> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0))?;
    Ok(usize::try_from(count).unwrap_or(0))
}

fn book_from_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    let raw_type: Option<String> = row.get(3)?;
    let book_type = match raw_type.as_deref() {
        None | Some("") => BookType::default(),
        Some(value) => value.parse().unwrap_or_else(|err| {
            warn!(%err, "falling back to paperback");
            BookType::default()
        }),
    };

    let created_at: DateTime<Utc> = row.get(5)?;
    let updated_at: Option<DateTime<Utc>> = row.get(6)?;

    Ok(Book {
        id: row.get(0)?,
        title: row.get(1)?,
        author: row.get(2)?,
        book_type,
        notes: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        created_at,
        updated_at: updated_at.unwrap_or(created_at),
    })
}
