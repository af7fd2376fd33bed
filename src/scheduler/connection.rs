//! Connection handling for the collection database.

use std::path::Path;

use anyhow::{bail, Context, Result};
use rusqlite::{Connection, OpenFlags};

/// Open the collection file read-write and run lazy migrations. The
/// file is never created here: a missing collection is a user-facing
/// diagnostic, and a locked one usually means a desktop application
/// still holds the handle.
pub fn open_collection(path: &Path) -> Result<Connection> {
    if !path.exists() {
        bail!("collection database not found at {}", path.display());
    }

    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_WRITE)
        .with_context(|| {
            format!(
                "could not open collection at {} (is the desktop app still running?)",
                path.display()
            )
        })?;
    conn.execute("PRAGMA foreign_keys = ON", [])
        .context("failed to enable foreign keys")?;

    ensure_schema(&conn)?;
    Ok(conn)
}

/// Idempotent migrations, run on every open so older collection files
/// pick up new tables without a separate migration step.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS cards (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            front TEXT NOT NULL,
            back TEXT NOT NULL,
            status INTEGER NOT NULL DEFAULT 0,
            interval_days INTEGER NOT NULL DEFAULT 0,
            ease_factor REAL NOT NULL DEFAULT 2.5,
            review_count INTEGER NOT NULL DEFAULT 0,
            due_at INTEGER NOT NULL DEFAULT 0
        )",
        [],
    )
    .context("failed to create cards table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS revlog (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            card_id INTEGER NOT NULL,
            grade INTEGER NOT NULL,
            interval_days INTEGER NOT NULL,
            ease_factor REAL NOT NULL,
            reviewed_at INTEGER NOT NULL,
            FOREIGN KEY(card_id) REFERENCES cards(id) ON DELETE CASCADE
        )",
        [],
    )
    .context("failed to create revlog table")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_cards_due_at ON cards(due_at)",
        [],
    )
    .context("failed to create due index")?;

    Ok(())
}
