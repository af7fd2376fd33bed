//! The seam to the scheduling collaborator. The review session only
//! ever talks to the [`Scheduler`] trait; the SQLite-backed
//! implementation lives in [`collection`] and stays as thin as the
//! front-end's needs allow.

pub mod algorithm;
mod collection;
mod connection;

use anyhow::Result;

use crate::models::{Card, DueCounts, Grade};

pub use collection::SqliteCollection;
pub use connection::{ensure_schema, open_collection};

/// Operations the review session consumes. `close`/`reopen` exist
/// because the add sub-flow must release the collection handle while
/// the external deck CLI mutates the database underneath.
pub trait Scheduler {
    /// Next due card, or `None` when the session is complete.
    fn next_card(&mut self) -> Result<Option<Card>>;

    /// Current partition of due cards.
    fn due_counts(&mut self) -> Result<DueCounts>;

    /// Human label for the interval a grade would produce.
    fn preview_interval(&mut self, card_id: i64, grade: Grade) -> Result<String>;

    /// Record a grade and reschedule the card.
    fn answer(&mut self, card_id: i64, grade: Grade) -> Result<()>;

    /// Release the underlying handle. Closing an already-closed
    /// scheduler is a no-op.
    fn close(&mut self) -> Result<()>;

    /// Re-acquire the handle after a `close`.
    fn reopen(&mut self) -> Result<()>;
}
