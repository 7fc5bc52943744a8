//! Input normalization shared by every write path. Lengths are counted in
//! characters, not bytes, so accented titles get the same budget as ASCII
//! ones.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

use crate::error::ValidationError;
use crate::models::BookDraft;

pub const TITLE_MAX_LENGTH: usize = 255;
pub const AUTHOR_MAX_LENGTH: usize = 255;
pub const NOTES_MAX_LENGTH: usize = 1000;

/// Trim a required field and enforce its maximum length.
pub fn required_field(
    value: &str,
    field: &'static str,
    max: usize,
) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required { field });
    }
    if trimmed.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_string())
}

/// Trim an optional field and enforce its maximum length. Empty is fine.
pub fn optional_field(
    value: &str,
    field: &'static str,
    max: usize,
) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_string())
}

impl BookDraft {
    /// Return a trimmed copy of the draft, or the first rule it breaks.
    /// Title is checked before author, author before notes.
    pub fn validated(&self) -> Result<BookDraft, ValidationError> {
        Ok(BookDraft {
            title: required_field(&self.title, "title", TITLE_MAX_LENGTH)?,
            author: required_field(&self.author, "author", AUTHOR_MAX_LENGTH)?,
            book_type: self.book_type,
            notes: optional_field(&self.notes, "notes", NOTES_MAX_LENGTH)?,
        })
    }
}

/// Turn the text typed into the export screen into a usable directory.
///
/// An empty entry selects `default_dir`. Anything else must be absolute
/// (`/...`) or home-relative (`~...`), must already exist, and must accept a
/// scratch file.
pub fn resolve_export_dir(input: &str, default_dir: &Path, home: &Path) -> Result<PathBuf> {
    let raw = input.trim();
    if raw.is_empty() {
        return Ok(default_dir.to_path_buf());
    }

    let path = if let Some(rest) = raw.strip_prefix('~') {
        home.join(rest.trim_start_matches('/'))
    } else if raw.starts_with('/') {
        PathBuf::from(raw)
    } else {
        return Err(anyhow!(
            "Please enter an absolute path (starting with / or ~)"
        ));
    };

    if !path.is_dir() {
        return Err(anyhow!("Directory does not exist: {}", path.display()));
    }

    let scratch = path.join(".libros_test");
    fs::write(&scratch, b"")
        .with_context(|| format!("Directory is not writable: {}", path.display()))?;
    fs::remove_file(&scratch).context("failed to remove scratch file")?;

    Ok(path)
}
