//! Domain models shared between the review session, the definition
//! client, and the persistence layer. These stay light-weight data
//! holders so other layers can focus on presentation and scheduling
//! logic.

use serde::Deserialize;

/// A front/back flashcard pulled from the scheduler for display. The
/// session never mutates a card directly; the only write-back is the
/// grade signal sent through the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    /// Primary key from the collection database. Display flows still
    /// carry it because grading bubbles the id back to the scheduler.
    pub id: i64,
    /// Question side, stored with inline markup.
    pub front: String,
    /// Answer side, stored with inline markup.
    pub back: String,
}

/// Cards currently eligible for review, partitioned the way the
/// scheduler buckets them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DueCounts {
    pub new: u32,
    pub learning: u32,
    pub review: u32,
}

impl DueCounts {
    /// Total shown in the card frame next to the front text.
    pub fn total(&self) -> u32 {
        self.new + self.learning + self.review
    }
}

/// Review outcome fed back to the scheduler to compute the next
/// interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    Again,
    Good,
}

impl Grade {
    /// Label shown on the grade menu option.
    pub fn label(&self) -> &'static str {
        match self {
            Grade::Again => "Again",
            Grade::Good => "Good",
        }
    }
}

/// One definition returned by the remote service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Meaning {
    #[serde(default)]
    pub meaning: String,
    #[serde(default)]
    pub example: Option<String>,
}

/// The ephemeral pronunciation + meanings payload for a word. Held only
/// long enough to preview and either accept or discard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Suggestion {
    pub pronunciation: Option<String>,
    pub meanings: Vec<Meaning>,
}
