//! Deferred work and its results. Screens never touch the database; they
//! return a [`Command`] and later receive the matching [`Message`]. The
//! queue runs one command at a time on the event-loop thread, so every
//! command completes before the next key is read.

use std::collections::VecDeque;
use std::path::PathBuf;

use anyhow::Result;
use crossterm::event::KeyEvent;
use rusqlite::Connection;
use tracing::{debug, error};

use crate::config::{update_theme, AppPaths, Theme};
use crate::db::{
    close_database, count_books, delete_book, load_books, save_book, update_book,
};
use crate::error::StoreError;
use crate::export::{backup_database, export_books, ExportFormat};
use crate::models::{Book, BookDraft};

/// A request for work the UI cannot do inline. Each variant carries a
/// snapshot of the values it needs.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Command {
    SaveBook(BookDraft),
    UpdateBook { id: i64, draft: BookDraft },
    DeleteBook(i64),
    LoadBooks,
    CountBooks,
    Export { dir: PathBuf, format: ExportFormat },
    Backup,
    SaveTheme(Theme),
}

/// Everything the router reacts to: key presses and command completions.
#[derive(Debug)]
pub(crate) enum Message {
    Key(KeyEvent),
    Saved(Result<i64, StoreError>),
    /// Carries the trimmed values that were written.
    Updated(Result<BookDraft, StoreError>),
    Deleted(Result<i64, StoreError>),
    Loaded(Result<Vec<Book>, StoreError>),
    Counted(Result<usize, StoreError>),
    Exported(Result<PathBuf>),
    BackedUp(Result<PathBuf>),
    ThemeSaved(Result<Theme>),
}

/// Owns the long-lived database handle and the commands waiting to run.
pub(crate) struct TaskQueue {
    conn: Connection,
    paths: AppPaths,
    pending: VecDeque<Command>,
}

impl TaskQueue {
    pub(crate) fn new(conn: Connection, paths: AppPaths) -> Self {
        Self {
            conn,
            paths,
            pending: VecDeque::new(),
        }
    }

    pub(crate) fn spawn(&mut self, command: Command) {
        debug!(?command, "queued command");
        self.pending.push_back(command);
    }

    /// Run the oldest pending command and return its completion message.
    pub(crate) fn next_completion(&mut self) -> Option<Message> {
        let command = self.pending.pop_front()?;
        Some(self.execute(command))
    }

    pub(crate) fn paths(&self) -> &AppPaths {
        &self.paths
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Close the database. Pending commands are dropped.
    pub(crate) fn close(self) -> Result<()> {
        if !self.pending.is_empty() {
            debug!(dropped = self.pending.len(), "closing with pending commands");
        }
        close_database(self.conn)
    }

    fn execute(&self, command: Command) -> Message {
        let message = match command {
            Command::SaveBook(draft) => Message::Saved(save_book(&self.conn, &draft)),
            Command::UpdateBook { id, draft } => Message::Updated(
                draft
                    .validated()
                    .map_err(StoreError::from)
                    .and_then(|clean| update_book(&self.conn, id, &clean).map(|()| clean)),
            ),
            Command::DeleteBook(id) => Message::Deleted(delete_book(&self.conn, id).map(|()| id)),
            Command::LoadBooks => Message::Loaded(load_books(&self.conn)),
            Command::CountBooks => Message::Counted(count_books(&self.conn)),
            Command::Export { dir, format } => Message::Exported(
                load_books(&self.conn)
                    .map_err(anyhow::Error::from)
                    .and_then(|books| export_books(&books, &dir, format)),
            ),
            Command::Backup => Message::BackedUp(
                backup_database(&self.paths.database, &self.paths.backup)
                    .map(|()| self.paths.backup.clone()),
            ),
            Command::SaveTheme(theme) => {
                Message::ThemeSaved(update_theme(&self.paths.config, &theme).map(|()| theme))
            }
        };
        log_failure(&message);
        message
    }
}

fn log_failure(message: &Message) {
    match message {
        Message::Saved(Err(err))
        | Message::Updated(Err(err))
        | Message::Deleted(Err(err))
        | Message::Counted(Err(err))
        | Message::Loaded(Err(err)) => error!(%err, "store command failed"),
        Message::Exported(Err(err)) | Message::BackedUp(Err(err)) | Message::ThemeSaved(Err(err)) => {
            error!(err = %format!("{err:#}"), "file command failed")
        }
        _ => {}
    }
}
