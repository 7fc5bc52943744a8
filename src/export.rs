//! File outputs: JSON and Markdown exports of the collection, and a raw copy
//! of the SQLite file. None of these touch the database connection; callers
//! hand in already-loaded books.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::format::format_date;
use crate::models::Book;

pub const JSON_FILE_NAME: &str = "books.json";
pub const MARKDOWN_FILE_NAME: &str = "books.md";

/// Output formats offered on the export screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Markdown,
}

impl ExportFormat {
    pub fn file_name(self) -> &'static str {
        match self {
            ExportFormat::Json => JSON_FILE_NAME,
            ExportFormat::Markdown => MARKDOWN_FILE_NAME,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Json => "JSON",
            ExportFormat::Markdown => "Markdown",
        }
    }
}

#[derive(Serialize)]
struct ExportDocument<'a> {
    export_date: DateTime<Utc>,
    total_books: usize,
    books: &'a [Book],
}

/// Write `books` into `dir` using `format`, returning the file written.
pub fn export_books(books: &[Book], dir: &Path, format: ExportFormat) -> Result<PathBuf> {
    let path = dir.join(format.file_name());
    match format {
        ExportFormat::Json => export_json(books, &path)?,
        ExportFormat::Markdown => export_markdown(books, &path)?,
    }
    info!(path = %path.display(), count = books.len(), format = format.label(), "exported books");
    Ok(path)
}

pub fn export_json(books: &[Book], path: &Path) -> Result<()> {
    let document = ExportDocument {
        export_date: Utc::now(),
        total_books: books.len(),
        books,
    };
    let json =
        serde_json::to_string_pretty(&document).context("failed to serialize books to JSON")?;
    write_file(path, json.as_bytes()).context("failed to write JSON file")
}

pub fn export_markdown(books: &[Book], path: &Path) -> Result<()> {
    let markdown = render_markdown(books, &Utc::now());
    write_file(path, markdown.as_bytes()).context("failed to write markdown file")
}

/// Build the Markdown document. Separated from the file write so the layout
/// can be checked without touching disk.
pub fn render_markdown(books: &[Book], exported_at: &DateTime<Utc>) -> String {
    let mut md = String::from("# Book Collection Export\n\n");
    let _ = writeln!(md, "**Export Date:** {}  ", format_date(exported_at));
    let _ = writeln!(md, "**Total Books:** {}  \n", books.len());

    for (i, book) in books.iter().enumerate() {
        let _ = writeln!(md, "## {}. {}\n", i + 1, book.title);
        let _ = writeln!(md, "**Author:** {}  ", book.author);
        let _ = writeln!(md, "**Type:** {}  ", book.book_type.label());
        let _ = writeln!(md, "**Created:** {}  ", format_date(&book.created_at));
        let _ = writeln!(md, "**Updated:** {}  ", format_date(&book.updated_at));
        if !book.notes.is_empty() {
            let _ = writeln!(md, "\n**Notes:**  \n{}", book.notes);
        }
        md.push_str("\n---\n\n");
    }

    md
}

/// Copy the database file byte-for-byte to `dest`.
pub fn backup_database(source: &Path, dest: &Path) -> Result<()> {
    let bytes = fs::read(source)
        .with_context(|| format!("failed to read source database {}", source.display()))?;
    write_file(dest, &bytes).context("failed to write backup file")?;
    info!(dest = %dest.display(), bytes = bytes.len(), "backed up database");
    Ok(())
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create directory")?;
    }
    fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookType;
    use chrono::TimeZone;

    fn sample() -> Vec<Book> {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let updated = Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap();
        vec![
            Book {
                id: 2,
                title: "Dune".into(),
                author: "Frank Herbert".into(),
                book_type: BookType::Digital,
                notes: "Spice *must* flow".into(),
                created_at: created,
                updated_at: updated,
            },
            Book {
                id: 1,
                title: "Emma".into(),
                author: "Jane Austen".into(),
                book_type: BookType::Paperback,
                notes: String::new(),
                created_at: created,
                updated_at: created,
            },
        ]
    }

    #[test]
    fn json_export_includes_every_book_verbatim() {
        let tmp = tempfile::tempdir().unwrap();
        let path = export_books(&sample(), tmp.path(), ExportFormat::Json).unwrap();
        assert_eq!(path, tmp.path().join(JSON_FILE_NAME));

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["total_books"], 2);
        assert!(value["export_date"].is_string());
        assert_eq!(value["books"][0]["title"], "Dune");
        assert_eq!(value["books"][0]["notes"], "Spice *must* flow");
        assert_eq!(value["books"][0]["type"], "digital");
        assert_eq!(value["books"][1]["author"], "Jane Austen");
    }

    #[test]
    fn markdown_has_one_section_per_book() {
        let exported = Utc.with_ymd_and_hms(2024, 6, 3, 0, 0, 0).unwrap();
        let md = render_markdown(&sample(), &exported);

        assert!(md.starts_with("# Book Collection Export\n\n"));
        assert!(md.contains("**Export Date:** June 3rd, 2024  \n"));
        assert!(md.contains("**Total Books:** 2  \n"));
        assert!(md.contains("## 1. Dune\n"));
        assert!(md.contains("## 2. Emma\n"));
        assert!(md.contains("**Type:** Digital  \n"));
        assert!(md.contains("**Updated:** May 2nd, 2024  \n"));
        assert!(md.contains("**Notes:**  \nSpice *must* flow\n"));
        assert_eq!(md.matches("\n---\n").count(), 2);
        assert_eq!(md.matches("**Notes:**").count(), 1);
    }

    #[test]
    fn markdown_export_writes_into_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("exports");
        let path = export_books(&sample(), &dir, ExportFormat::Markdown).unwrap();
        assert!(fs::read_to_string(path).unwrap().contains("## 1. Dune"));
    }

    #[test]
    fn backup_is_byte_identical() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("books.db");
        let dest = tmp.path().join("books.db.bak");
        fs::write(&source, [0u8, 1, 2, 255, 42]).unwrap();

        backup_database(&source, &dest).unwrap();

        assert_eq!(fs::read(&dest).unwrap(), fs::read(&source).unwrap());
    }

    #[test]
    fn backup_of_missing_source_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let err = backup_database(&tmp.path().join("absent.db"), &tmp.path().join("x.bak"))
            .unwrap_err();
        assert!(err.to_string().contains("failed to read source database"));
    }
}
