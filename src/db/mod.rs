//! Persistence module split across logical submodules.

mod books;
mod connection;

pub use books::{count_books, delete_book, load_books, save_book, update_book};
pub use connection::{close_database, ensure_schema, open_database};
