//! The terminal review session: pull due cards from the scheduler,
//! reveal, grade, and hand off to the add sub-flow when requested.
//!
//! The loop is generic over the [`Scheduler`] seam and the
//! [`SessionUi`] prompt seam, so the state logic runs under test
//! without a TTY. Implicit states per card: awaiting-reveal →
//! awaiting-grade → (add sub-flow) → next card; done when nothing is
//! due.

use anyhow::Result;

use super::render::{card_frame, markup_to_ansi};
use super::terminal::Key;
use crate::models::Grade;
use crate::scheduler::Scheduler;

/// Menu position of the `Good` grade, preselected like the desktop
/// reviewer preselects its default answer.
const DEFAULT_ACTION: usize = 1;

/// How a finished session ended. The caller runs the synchronization
/// side effect in either case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Every due card was reviewed.
    Completed,
    /// The user quit mid-session.
    Quit,
}

/// Prompt seam between the session loop and the terminal. The
/// production implementation lives in [`super::terminal::TerminalUi`].
pub trait SessionUi {
    fn show_card_front(&mut self, frame: &str) -> Result<()>;

    /// Block until the user reveals the back (`true`) or quits
    /// (`false`).
    fn confirm_reveal(&mut self) -> Result<bool>;

    fn show_card_back(&mut self, frame: &str, body: &str) -> Result<()>;

    /// Run the arrow-navigated menu. Returns the committed option
    /// index, or `None` when the user quits instead.
    fn pick_action(&mut self, labels: &[String], default: usize) -> Result<Option<usize>>;

    /// Prompt for the word to add. `None` skips the sub-flow.
    fn read_new_word(&mut self) -> Result<Option<String>>;

    fn show_completion(&mut self) -> Result<()>;
}

/// Single-row selection state for the grade menu: an index plus a
/// committed flag, driven by key events.
#[derive(Debug)]
pub struct GradeMenu {
    len: usize,
    index: usize,
    committed: bool,
}

/// Result of feeding one key to the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuStep {
    Continue,
    Committed(usize),
    Quit,
}

impl GradeMenu {
    pub fn new(len: usize, default: usize) -> Self {
        Self {
            len,
            index: default.min(len.saturating_sub(1)),
            committed: false,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_committed(&self) -> bool {
        self.committed
    }

    pub fn handle(&mut self, key: Key) -> MenuStep {
        match key {
            Key::Left => {
                self.index = self.index.saturating_sub(1);
                MenuStep::Continue
            }
            Key::Right => {
                if self.index + 1 < self.len {
                    self.index += 1;
                }
                MenuStep::Continue
            }
            Key::Enter => {
                self.committed = true;
                MenuStep::Committed(self.index)
            }
            Key::Quit => MenuStep::Quit,
            Key::Other => MenuStep::Continue,
        }
    }
}

/// Drive the review loop to completion or quit. The scheduler handle
/// is closed exactly once on every exit path, including errors; the
/// add sub-flow's close/reopen pair happens inside the loop.
pub fn run_session<S, U, F>(
    scheduler: &mut S,
    ui: &mut U,
    mut add_word: F,
) -> Result<SessionOutcome>
where
    S: Scheduler,
    U: SessionUi,
    F: FnMut(&str) -> Result<()>,
{
    let result = drive(scheduler, ui, &mut add_word);
    let closed = scheduler.close();
    let outcome = result?;
    closed?;
    Ok(outcome)
}

fn drive<S, U, F>(scheduler: &mut S, ui: &mut U, add_word: &mut F) -> Result<SessionOutcome>
where
    S: Scheduler,
    U: SessionUi,
    F: FnMut(&str) -> Result<()>,
{
    loop {
        let card = match scheduler.next_card()? {
            Some(card) => card,
            None => {
                ui.show_completion()?;
                return Ok(SessionOutcome::Completed);
            }
        };

        let due_total = scheduler.due_counts()?.total();
        let frame = card_frame(&card.front, due_total);

        ui.show_card_front(&frame)?;
        if !ui.confirm_reveal()? {
            return Ok(SessionOutcome::Quit);
        }

        ui.show_card_back(&frame, &markup_to_ansi(&card.back))?;

        let labels = vec![
            format!(
                "{} ({})",
                Grade::Again.label(),
                scheduler.preview_interval(card.id, Grade::Again)?
            ),
            format!(
                "{} ({})",
                Grade::Good.label(),
                scheduler.preview_interval(card.id, Grade::Good)?
            ),
            "Add".to_string(),
        ];

        match ui.pick_action(&labels, DEFAULT_ACTION)? {
            None => return Ok(SessionOutcome::Quit),
            Some(0) => scheduler.answer(card.id, Grade::Again)?,
            Some(1) => scheduler.answer(card.id, Grade::Good)?,
            Some(_) => {
                // The external CLI needs the collection handle released
                // while it writes; the word prompt happens in between.
                scheduler.close()?;
                if let Some(word) = ui.read_new_word()? {
                    add_word(&word)?;
                }
                scheduler.reopen()?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::models::{Card, DueCounts};

    #[derive(Default)]
    struct MockScheduler {
        cards: VecDeque<Card>,
        answered: Vec<(i64, Grade)>,
        close_count: usize,
        reopen_count: usize,
    }

    impl MockScheduler {
        fn with_cards(cards: Vec<Card>) -> Self {
            Self {
                cards: cards.into(),
                ..Self::default()
            }
        }
    }

    impl Scheduler for MockScheduler {
        fn next_card(&mut self) -> Result<Option<Card>> {
            Ok(self.cards.front().cloned())
        }

        fn due_counts(&mut self) -> Result<DueCounts> {
            Ok(DueCounts {
                new: self.cards.len() as u32,
                learning: 0,
                review: 0,
            })
        }

        fn preview_interval(&mut self, _card_id: i64, grade: Grade) -> Result<String> {
            Ok(match grade {
                Grade::Again => "10m".to_string(),
                Grade::Good => "1d".to_string(),
            })
        }

        fn answer(&mut self, card_id: i64, grade: Grade) -> Result<()> {
            self.answered.push((card_id, grade));
            self.cards.pop_front();
            Ok(())
        }

        fn close(&mut self) -> Result<()> {
            self.close_count += 1;
            Ok(())
        }

        fn reopen(&mut self) -> Result<()> {
            self.reopen_count += 1;
            Ok(())
        }
    }

    /// Scripted prompt seam: queued responses in, rendered output
    /// recorded for assertions.
    #[derive(Default)]
    struct ScriptedUi {
        reveals: VecDeque<bool>,
        picks: VecDeque<Option<usize>>,
        words: VecDeque<Option<String>>,
        fronts: Vec<String>,
        backs: Vec<String>,
        completions: usize,
    }

    impl SessionUi for ScriptedUi {
        fn show_card_front(&mut self, frame: &str) -> Result<()> {
            self.fronts.push(frame.to_string());
            Ok(())
        }

        fn confirm_reveal(&mut self) -> Result<bool> {
            Ok(self.reveals.pop_front().unwrap_or(false))
        }

        fn show_card_back(&mut self, _frame: &str, body: &str) -> Result<()> {
            self.backs.push(body.to_string());
            Ok(())
        }

        fn pick_action(&mut self, labels: &[String], default: usize) -> Result<Option<usize>> {
            assert_eq!(labels.len(), 3);
            assert_eq!(default, 1);
            Ok(self.picks.pop_front().unwrap_or(None))
        }

        fn read_new_word(&mut self) -> Result<Option<String>> {
            Ok(self.words.pop_front().unwrap_or(None))
        }

        fn show_completion(&mut self) -> Result<()> {
            self.completions += 1;
            Ok(())
        }
    }

    fn card(id: i64) -> Card {
        Card {
            id,
            front: format!("front {id}"),
            back: format!("<b>back {id}</b>"),
        }
    }

    #[test]
    fn empty_collection_completes_without_rendering() {
        let mut scheduler = MockScheduler::default();
        let mut ui = ScriptedUi::default();

        let outcome = run_session(&mut scheduler, &mut ui, |_| Ok(())).unwrap();

        assert_eq!(outcome, SessionOutcome::Completed);
        assert!(ui.fronts.is_empty());
        assert_eq!(ui.completions, 1);
        assert_eq!(scheduler.close_count, 1);
    }

    #[test]
    fn quit_at_first_prompt_closes_exactly_once() {
        let mut scheduler = MockScheduler::with_cards(vec![card(1)]);
        let mut ui = ScriptedUi {
            reveals: VecDeque::from([false]),
            ..ScriptedUi::default()
        };

        let outcome = run_session(&mut scheduler, &mut ui, |_| Ok(())).unwrap();

        assert_eq!(outcome, SessionOutcome::Quit);
        assert_eq!(scheduler.close_count, 1);
        assert!(scheduler.answered.is_empty());
        assert!(ui.backs.is_empty());
    }

    #[test]
    fn grading_advances_to_completion() {
        let mut scheduler = MockScheduler::with_cards(vec![card(1), card(2)]);
        let mut ui = ScriptedUi {
            reveals: VecDeque::from([true, true]),
            picks: VecDeque::from([Some(1), Some(0)]),
            ..ScriptedUi::default()
        };

        let outcome = run_session(&mut scheduler, &mut ui, |_| Ok(())).unwrap();

        assert_eq!(outcome, SessionOutcome::Completed);
        assert_eq!(
            scheduler.answered,
            vec![(1, Grade::Good), (2, Grade::Again)]
        );
        // Back text went through markup conversion.
        assert!(ui.backs[0].contains("\x1b[1mback 1\x1b[22m"));
        assert_eq!(scheduler.close_count, 1);
    }

    #[test]
    fn quitting_at_grade_menu_stops_the_loop() {
        let mut scheduler = MockScheduler::with_cards(vec![card(1)]);
        let mut ui = ScriptedUi {
            reveals: VecDeque::from([true]),
            picks: VecDeque::from([None]),
            ..ScriptedUi::default()
        };

        let outcome = run_session(&mut scheduler, &mut ui, |_| Ok(())).unwrap();

        assert_eq!(outcome, SessionOutcome::Quit);
        assert!(scheduler.answered.is_empty());
        assert_eq!(scheduler.close_count, 1);
    }

    #[test]
    fn add_action_suspends_the_scheduler_around_the_flow() {
        let mut scheduler = MockScheduler::with_cards(vec![card(1)]);
        let mut ui = ScriptedUi {
            reveals: VecDeque::from([true, false]),
            picks: VecDeque::from([Some(2)]),
            words: VecDeque::from([Some("lucid".to_string())]),
            ..ScriptedUi::default()
        };

        let mut added = Vec::new();
        let outcome = run_session(&mut scheduler, &mut ui, |word| {
            added.push(word.to_string());
            Ok(())
        })
        .unwrap();

        // The card was not graded, so the next round shows it again and
        // the scripted quit ends the session.
        assert_eq!(outcome, SessionOutcome::Quit);
        assert_eq!(added, vec!["lucid"]);
        assert_eq!(scheduler.reopen_count, 1);
        // One close around the add flow, one on session teardown.
        assert_eq!(scheduler.close_count, 2);
    }

    #[test]
    fn empty_word_skips_the_add_flow() {
        let mut scheduler = MockScheduler::with_cards(vec![card(1)]);
        let mut ui = ScriptedUi {
            reveals: VecDeque::from([true, false]),
            picks: VecDeque::from([Some(2)]),
            words: VecDeque::from([None]),
            ..ScriptedUi::default()
        };

        let mut added = Vec::new();
        run_session(&mut scheduler, &mut ui, |word| {
            added.push(word.to_string());
            Ok(())
        })
        .unwrap();

        assert!(added.is_empty());
        assert_eq!(scheduler.reopen_count, 1);
    }

    #[test]
    fn menu_navigation_clamps_and_commits() {
        let mut menu = GradeMenu::new(3, 1);
        assert_eq!(menu.index(), 1);

        assert_eq!(menu.handle(Key::Left), MenuStep::Continue);
        assert_eq!(menu.index(), 0);
        assert_eq!(menu.handle(Key::Left), MenuStep::Continue);
        assert_eq!(menu.index(), 0);

        assert_eq!(menu.handle(Key::Right), MenuStep::Continue);
        assert_eq!(menu.handle(Key::Right), MenuStep::Continue);
        assert_eq!(menu.handle(Key::Right), MenuStep::Continue);
        assert_eq!(menu.index(), 2);

        assert_eq!(menu.handle(Key::Other), MenuStep::Continue);
        assert!(!menu.is_committed());

        assert_eq!(menu.handle(Key::Enter), MenuStep::Committed(2));
        assert!(menu.is_committed());
    }

    #[test]
    fn menu_quit_leaves_state_uncommitted() {
        let mut menu = GradeMenu::new(2, 0);
        assert_eq!(menu.handle(Key::Quit), MenuStep::Quit);
        assert!(!menu.is_committed());
    }
}
