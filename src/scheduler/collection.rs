//! SQLite-backed implementation of the [`Scheduler`] seam.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use super::algorithm::{next_review, preview_label, CardState, CardStatus};
use super::connection::open_collection;
use super::Scheduler;
use crate::models::{Card, DueCounts, Grade};

/// Live handle on the collection database. The connection is held for
/// the duration of a session and released exactly once on every exit
/// path; the add sub-flow closes and reopens it around the external
/// CLI invocation.
pub struct SqliteCollection {
    path: PathBuf,
    conn: Option<Connection>,
}

impl SqliteCollection {
    /// Open the collection at `path`. Fails with a diagnostic when the
    /// file is missing or another process holds the database lock.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let conn = open_collection(&path)?;
        Ok(Self {
            path,
            conn: Some(conn),
        })
    }

    fn conn(&self) -> Result<&Connection> {
        self.conn
            .as_ref()
            .ok_or_else(|| anyhow!("collection handle is closed"))
    }

    /// Load the scheduling state for one card, surfacing an explicit
    /// error when the row has disappeared underneath us.
    fn card_state(&self, card_id: i64) -> Result<CardState> {
        let state = self
            .conn()?
            .query_row(
                "SELECT status, interval_days, ease_factor, review_count
                 FROM cards WHERE id = ?1",
                params![card_id],
                |row| {
                    Ok(CardState {
                        status: CardStatus::from_db(row.get(0)?),
                        interval_days: row.get(1)?,
                        ease_factor: row.get(2)?,
                        review_count: row.get(3)?,
                    })
                },
            )
            .optional()
            .context("failed to load card state")?;

        state.ok_or_else(|| anyhow!("card {card_id} not found in collection"))
    }
}

impl Scheduler for SqliteCollection {
    fn next_card(&mut self) -> Result<Option<Card>> {
        let now = Utc::now().timestamp();
        let card = self
            .conn()?
            .query_row(
                "SELECT id, front, back FROM cards
                 WHERE due_at <= ?1
                 ORDER BY due_at, id
                 LIMIT 1",
                params![now],
                |row| {
                    Ok(Card {
                        id: row.get(0)?,
                        front: row.get(1)?,
                        back: row.get(2)?,
                    })
                },
            )
            .optional()
            .context("failed to query next due card")?;

        Ok(card)
    }

    fn due_counts(&mut self) -> Result<DueCounts> {
        let now = Utc::now().timestamp();
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT status, COUNT(*) FROM cards
                 WHERE due_at <= ?1
                 GROUP BY status",
            )
            .context("failed to prepare due count query")?;

        let mut counts = DueCounts::default();
        let mut rows = stmt
            .query(params![now])
            .context("failed to execute due count query")?;
        while let Some(row) = rows.next().context("failed to fetch due count row")? {
            let status: i64 = row.get(0).context("failed to read status")?;
            let count: u32 = row.get(1).context("failed to read count")?;
            match CardStatus::from_db(status) {
                CardStatus::New => counts.new += count,
                CardStatus::Learning | CardStatus::Relearning => counts.learning += count,
                CardStatus::Review => counts.review += count,
            }
        }

        Ok(counts)
    }

    fn preview_interval(&mut self, card_id: i64, grade: Grade) -> Result<String> {
        let state = self.card_state(card_id)?;
        Ok(preview_label(&state, grade))
    }

    fn answer(&mut self, card_id: i64, grade: Grade) -> Result<()> {
        let state = self.card_state(card_id)?;
        let now = Utc::now();
        let result = next_review(&state, grade, now);

        let conn = self.conn()?;
        let updated = conn
            .execute(
                "UPDATE cards
                 SET status = ?1, interval_days = ?2, ease_factor = ?3,
                     review_count = review_count + 1, due_at = ?4
                 WHERE id = ?5",
                params![
                    result.status.to_db(),
                    result.interval_days,
                    result.ease_factor,
                    result.due_at.timestamp(),
                    card_id
                ],
            )
            .context("failed to reschedule card")?;
        if updated == 0 {
            return Err(anyhow!("card {card_id} not found in collection"));
        }

        conn.execute(
            "INSERT INTO revlog (card_id, grade, interval_days, ease_factor, reviewed_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                card_id,
                match grade {
                    Grade::Again => 1,
                    Grade::Good => 3,
                },
                result.interval_days,
                result.ease_factor,
                now.timestamp()
            ],
        )
        .context("failed to record review")?;

        log::debug!(
            "answered card {card_id} with {} -> due {}",
            grade.label(),
            result.due_at
        );
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            conn.close()
                .map_err(|(_, err)| err)
                .context("failed to close collection")?;
            log::debug!("collection closed");
        }
        Ok(())
    }

    fn reopen(&mut self) -> Result<()> {
        if self.conn.is_none() {
            self.conn = Some(open_collection(&self.path)?);
            log::debug!("collection reopened");
        }
        Ok(())
    }
}
