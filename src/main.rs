//! Binary entry point: resolve configuration from the environment,
//! pick the mode from the CLI surface, and either drive the review
//! session or run the standalone fetch-and-add flow.

use anyhow::{bail, Result};
use clap::Parser;

use flashcard_study_helper::deck_cli::DeckCli;
use flashcard_study_helper::ui::{run_session, TerminalUi};
use flashcard_study_helper::{add, Config, SqliteCollection};

#[derive(Parser)]
#[command(version, about = "Review due flashcards, or add AI-generated word cards.")]
struct Cli {
    /// Review due cards (the default when no mode is given).
    #[arg(long, conflicts_with = "add")]
    study: bool,

    /// Fetch definitions for WORD and add it as a new card.
    #[arg(long, value_name = "WORD")]
    add: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.add {
        Some(word) => {
            let word = word.trim().to_string();
            if word.is_empty() {
                bail!("please provide a non-empty word for --add");
            }
            add::run(&config, &word, true)
        }
        None => {
            if cli.study {
                log::debug!("explicit --study flag");
            }
            study(&config)
        }
    }
}

/// Open the collection, run the review session, and synchronize on the
/// way out regardless of how the session ended.
fn study(config: &Config) -> Result<()> {
    let mut collection = SqliteCollection::open(&config.collection_path)?;
    let mut ui = TerminalUi;

    let outcome = run_session(&mut collection, &mut ui, |word| {
        add::run(config, word, false)
    })?;
    log::info!("review session ended: {outcome:?}");

    DeckCli::new(&config.deck_cli).sync()
}
