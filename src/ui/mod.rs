//! Terminal front-end split into pure rendering helpers, the review
//! session state machine, and the crossterm-backed plumbing.

pub mod render;
pub mod session;
pub mod terminal;

pub use session::{run_session, SessionOutcome};
pub use terminal::TerminalUi;
