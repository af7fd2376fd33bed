//! Interval calculation for the two-grade review scale.
//!
//! `Again` sends the card back through a short re-learning step and
//! decays its ease factor; `Good` walks the SM-2 ladder: one day, six
//! days, then `interval x ease` for every later review.

use chrono::{DateTime, Duration, Utc};

use crate::models::Grade;

/// Minimum ease factor allowed.
const MIN_EASE_FACTOR: f64 = 1.3;
/// Ease penalty applied by an `Again` grade.
const AGAIN_EASE_PENALTY: f64 = 0.2;
/// Delay before an `Again` card comes back, in minutes.
const RELEARN_STEP_MINUTES: i64 = 10;
/// Interval after the first successful review, in days.
const FIRST_INTERVAL_DAYS: i64 = 1;
/// Interval after the second successful review, in days.
const SECOND_INTERVAL_DAYS: i64 = 6;

/// Where a card sits in the learning process. Stored as an integer in
/// the `cards.status` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardStatus {
    /// Never reviewed.
    New,
    /// In the initial learning phase.
    Learning,
    /// Regular spaced review.
    Review,
    /// Failed out of review and re-learning.
    Relearning,
}

impl CardStatus {
    pub fn from_db(value: i64) -> Self {
        match value {
            1 => CardStatus::Learning,
            2 => CardStatus::Review,
            3 => CardStatus::Relearning,
            _ => CardStatus::New,
        }
    }

    pub fn to_db(self) -> i64 {
        match self {
            CardStatus::New => 0,
            CardStatus::Learning => 1,
            CardStatus::Review => 2,
            CardStatus::Relearning => 3,
        }
    }
}

/// Scheduling state for one card, mirroring the `cards` row.
#[derive(Debug, Clone)]
pub struct CardState {
    pub status: CardStatus,
    /// Current interval in days. Zero until the first successful
    /// review.
    pub interval_days: i64,
    pub ease_factor: f64,
    /// Total number of recorded reviews.
    pub review_count: i64,
}

impl Default for CardState {
    fn default() -> Self {
        Self {
            status: CardStatus::New,
            interval_days: 0,
            ease_factor: 2.5,
            review_count: 0,
        }
    }
}

/// Result of grading a card: the state to write back plus the next due
/// date.
#[derive(Debug, Clone)]
pub struct ReviewResult {
    pub status: CardStatus,
    pub interval_days: i64,
    pub ease_factor: f64,
    pub due_at: DateTime<Utc>,
}

/// Compute the state a grade produces. `now` is passed in so results
/// are reproducible under test.
pub fn next_review(state: &CardState, grade: Grade, now: DateTime<Utc>) -> ReviewResult {
    match grade {
        Grade::Again => {
            let status = if state.status == CardStatus::Review {
                CardStatus::Relearning
            } else {
                CardStatus::Learning
            };
            ReviewResult {
                status,
                interval_days: 0,
                ease_factor: (state.ease_factor - AGAIN_EASE_PENALTY).max(MIN_EASE_FACTOR),
                due_at: now + Duration::minutes(RELEARN_STEP_MINUTES),
            }
        }
        Grade::Good => {
            let (interval_days, status) = match state.review_count {
                0 => (FIRST_INTERVAL_DAYS, CardStatus::Learning),
                1 => (SECOND_INTERVAL_DAYS, CardStatus::Review),
                _ => {
                    let grown = (state.interval_days.max(FIRST_INTERVAL_DAYS) as f64
                        * state.ease_factor)
                        .round() as i64;
                    (grown, CardStatus::Review)
                }
            };
            ReviewResult {
                status,
                interval_days,
                // Good leaves the ease factor untouched.
                ease_factor: state.ease_factor,
                due_at: now + Duration::days(interval_days),
            }
        }
    }
}

/// Human label for the interval a grade would produce, shown on the
/// grade menu.
pub fn preview_label(state: &CardState, grade: Grade) -> String {
    match grade {
        Grade::Again => format!("{}m", RELEARN_STEP_MINUTES),
        Grade::Good => {
            let result = next_review(state, grade, Utc::now());
            format_interval(result.interval_days)
        }
    }
}

/// Format an interval in days as a compact human-readable string.
pub fn format_interval(days: i64) -> String {
    if days == 0 {
        "now".to_string()
    } else if days < 7 {
        format!("{}d", days)
    } else if days < 30 {
        format!("{}w", days / 7)
    } else if days < 365 {
        format!("{}mo", days / 30)
    } else {
        format!("{}y", days / 365)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn first_good_review_gives_one_day() {
        let state = CardState::default();
        let result = next_review(&state, Grade::Good, now());

        assert_eq!(result.interval_days, 1);
        assert_eq!(result.status, CardStatus::Learning);
    }

    #[test]
    fn second_good_review_gives_six_days() {
        let state = CardState {
            review_count: 1,
            interval_days: 1,
            ..CardState::default()
        };
        let result = next_review(&state, Grade::Good, now());

        assert_eq!(result.interval_days, 6);
        assert_eq!(result.status, CardStatus::Review);
    }

    #[test]
    fn later_good_reviews_multiply_by_ease() {
        let state = CardState {
            review_count: 5,
            interval_days: 10,
            ease_factor: 2.5,
            status: CardStatus::Review,
        };
        let result = next_review(&state, Grade::Good, now());

        assert_eq!(result.interval_days, 25);
        assert_eq!(result.status, CardStatus::Review);
    }

    #[test]
    fn again_resets_review_card_to_relearning() {
        let state = CardState {
            review_count: 5,
            interval_days: 30,
            status: CardStatus::Review,
            ..CardState::default()
        };
        let at = now();
        let result = next_review(&state, Grade::Again, at);

        assert_eq!(result.status, CardStatus::Relearning);
        assert_eq!(result.interval_days, 0);
        assert_eq!(result.due_at, at + Duration::minutes(10));
    }

    #[test]
    fn ease_factor_never_drops_below_minimum() {
        let mut state = CardState {
            ease_factor: 1.4,
            review_count: 5,
            interval_days: 10,
            status: CardStatus::Review,
        };

        let result = next_review(&state, Grade::Again, now());
        assert!(result.ease_factor >= MIN_EASE_FACTOR);

        state.ease_factor = result.ease_factor;
        let result = next_review(&state, Grade::Again, now());
        assert!(result.ease_factor >= MIN_EASE_FACTOR);
    }

    #[test]
    fn preview_labels_match_grades() {
        let state = CardState::default();
        assert_eq!(preview_label(&state, Grade::Again), "10m");
        assert_eq!(preview_label(&state, Grade::Good), "1d");
    }

    #[test]
    fn interval_formatting() {
        assert_eq!(format_interval(0), "now");
        assert_eq!(format_interval(1), "1d");
        assert_eq!(format_interval(5), "5d");
        assert_eq!(format_interval(7), "1w");
        assert_eq!(format_interval(14), "2w");
        assert_eq!(format_interval(30), "1mo");
        assert_eq!(format_interval(90), "3mo");
        assert_eq!(format_interval(365), "1y");
        assert_eq!(format_interval(730), "2y");
    }
}
