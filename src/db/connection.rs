use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use rusqlite::{Connection, Error as SqlError};
use tracing::{debug, info};

/// Open (creating if necessary) the SQLite file at `path`, run the lazy
/// schema setup, and return a live connection.
pub fn open_database(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create data directory")?;
    }

    let conn = Connection::open(path).context("failed to open SQLite database")?;
    ensure_schema(&conn)?;
    info!(path = %path.display(), "opened book database");
    Ok(conn)
}

/// Create the `books` table and apply additive migrations. Safe to run on
/// every start.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            author TEXT NOT NULL,
            type TEXT NOT NULL DEFAULT 'paperback',
            notes TEXT,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("failed to create books table")?;

    // Tables created before book formats existed lack `type`. SQLite has no
    // ADD COLUMN IF NOT EXISTS, so the duplicate-column failure means the
    // migration already ran.
    match conn.execute(
        "ALTER TABLE books ADD COLUMN type TEXT NOT NULL DEFAULT 'paperback'",
        [],
    ) {
        Ok(_) => info!("added type column to books table"),
        Err(err) if is_duplicate_column(&err) => debug!("type column already present"),
        Err(err) => return Err(err).context("failed to migrate books table"),
    }

    Ok(())
}

/// Close the connection, surfacing any error SQLite reports on shutdown.
pub fn close_database(conn: Connection) -> Result<()> {
    conn.close()
        .map_err(|(_, err)| anyhow!(err))
        .context("failed to close SQLite database")?;
    info!("closed book database");
    Ok(())
}

fn is_duplicate_column(err: &SqlError) -> bool {
    match err {
        SqlError::SqliteFailure(_, Some(message)) => message.contains("duplicate column name"),
        _ => false,
    }
}
