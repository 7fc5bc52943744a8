//! Error types surfaced by the record store. Validation problems are kept
//! apart from storage failures so the UI can tell "fix your input" from
//! "something went wrong on disk".

use thiserror::Error;

/// Rejected input, detected before any write reaches SQLite.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} exceeds maximum length of {max} characters")]
    TooLong { field: &'static str, max: usize },
}

/// A stored or typed `type` value that is not one of the known formats.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown book type '{0}'")]
pub struct UnknownBookType(pub String);

/// Failure of a record store operation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl StoreError {
    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookType;

    #[test]
    fn unknown_book_type_names_the_value() {
        let err = "scroll".parse::<BookType>().unwrap_err();
        assert_eq!(err, UnknownBookType("scroll".into()));
        assert_eq!(err.to_string(), "unknown book type 'scroll'");
    }

    #[test]
    fn storage_errors_are_not_validation() {
        let err = StoreError::from(rusqlite::Error::QueryReturnedNoRows);
        assert!(!err.is_validation());
        assert!(err.to_string().starts_with("storage error: "));
    }
}
