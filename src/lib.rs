//! Core library surface for the Libros book tracker.
//!
//! The binary wires these pieces together; everything below the UI is plain
//! functions over a `rusqlite::Connection` and can be used on its own.
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod format;
pub mod logging;
pub mod models;
pub mod ui;
pub mod validation;

pub use config::{load_config, AppPaths, Config, Theme};
pub use db::{
    close_database, count_books, delete_book, load_books, open_database, save_book, update_book,
};
pub use error::{StoreError, UnknownBookType, ValidationError};
pub use logging::init_logging;
pub use models::{Book, BookDraft, BookType};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
