//! Terminal plumbing for the review session: raw-mode and cursor
//! guards, single-key reads, and the terminal-backed implementation of
//! the session prompt seam.

use std::io::{self, Write};

use anyhow::{Context, Result};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType};
use dialoguer::Input;

use super::render::RESET;
use super::session::{GradeMenu, MenuStep, SessionUi};

/// Background + foreground codes for the highlighted menu option.
const HIGHLIGHT: &str = "\x1b[44;97m";

/// Keys the session distinguishes. Everything else maps to
/// [`Key::Other`] and is ignored by the prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Left,
    Right,
    Quit,
    Other,
}

/// Raw mode scoped to a single key read. Dropping the guard restores
/// cooked mode on every path, including unwinding.
struct RawModeGuard;

impl RawModeGuard {
    fn new() -> Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// Hidden cursor scoped to the grade menu. Restored on drop.
struct HiddenCursor;

impl HiddenCursor {
    fn new() -> Result<Self> {
        execute!(io::stdout(), Hide).context("failed to hide cursor")?;
        Ok(Self)
    }
}

impl Drop for HiddenCursor {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show);
    }
}

/// Block for one key press. Raw mode is held only for the duration of
/// the read, so regular prints elsewhere keep their line discipline.
/// Ctrl-C arrives as a key event under raw mode and maps to
/// [`Key::Quit`].
pub fn read_key() -> Result<Key> {
    let _raw = RawModeGuard::new()?;
    loop {
        if let Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            ..
        }) = event::read().context("failed to read key event")?
        {
            if kind != KeyEventKind::Press {
                continue;
            }
            if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
                return Ok(Key::Quit);
            }
            return Ok(match code {
                KeyCode::Enter => Key::Enter,
                KeyCode::Left => Key::Left,
                KeyCode::Right => Key::Right,
                KeyCode::Char('q') | KeyCode::Esc => Key::Quit,
                _ => Key::Other,
            });
        }
    }
}

fn clear_screen() -> Result<()> {
    execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0)).context("failed to clear screen")
}

/// Terminal-backed prompts for the review session.
pub struct TerminalUi;

impl SessionUi for TerminalUi {
    fn show_card_front(&mut self, frame: &str) -> Result<()> {
        clear_screen()?;
        println!("{frame}");
        println!("\n(Press Enter to show answer, q to quit)");
        Ok(())
    }

    fn confirm_reveal(&mut self) -> Result<bool> {
        loop {
            match read_key()? {
                Key::Enter => return Ok(true),
                Key::Quit => return Ok(false),
                _ => {}
            }
        }
    }

    fn show_card_back(&mut self, frame: &str, body: &str) -> Result<()> {
        clear_screen()?;
        println!("{frame}");
        println!();
        println!("{body}");
        println!();
        Ok(())
    }

    fn pick_action(&mut self, labels: &[String], default: usize) -> Result<Option<usize>> {
        let _cursor = HiddenCursor::new()?;
        let mut menu = GradeMenu::new(labels.len(), default);

        loop {
            let line = labels
                .iter()
                .enumerate()
                .map(|(i, label)| {
                    if i == menu.index() {
                        format!("{HIGHLIGHT} {label} {RESET}")
                    } else {
                        format!(" {label} ")
                    }
                })
                .collect::<Vec<_>>()
                .join("  ");
            print!("\r{line}");
            io::stdout().flush().context("failed to flush menu line")?;

            match menu.handle(read_key()?) {
                MenuStep::Continue => {}
                MenuStep::Committed(index) => {
                    println!();
                    return Ok(Some(index));
                }
                MenuStep::Quit => {
                    println!();
                    return Ok(None);
                }
            }
        }
    }

    fn read_new_word(&mut self) -> Result<Option<String>> {
        let word: String = match Input::new()
            .with_prompt("Word to add")
            .allow_empty(true)
            .interact_text()
        {
            Ok(word) => word,
            // An interrupted prompt skips the add, mirroring a quit at
            // the word stage rather than aborting the session.
            Err(_) => return Ok(None),
        };
        let word = word.trim().to_string();
        Ok(if word.is_empty() { None } else { Some(word) })
    }

    fn show_completion(&mut self) -> Result<()> {
        println!("\nNo more cards due. Great job.");
        Ok(())
    }
}
