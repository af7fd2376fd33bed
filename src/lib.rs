//! Core library surface for the flashcard study helper.
//!
//! The public modules exposed here keep the API intentionally small so
//! the `bin` target as well as the tests can reuse the same pieces:
//! the scheduler seam, the definition client, the external deck CLI
//! wrapper, and the terminal front-end.

pub mod add;
pub mod api;
pub mod config;
pub mod deck_cli;
pub mod models;
pub mod scheduler;
pub mod ui;

/// Runtime settings resolved once in `main` and passed into each
/// component.
pub use config::Config;

/// The primary domain types other layers manipulate.
pub use models::{Card, DueCounts, Grade, Meaning, Suggestion};

/// The scheduling seam and its SQLite-backed implementation.
pub use scheduler::{Scheduler, SqliteCollection};
