//! The definition fetch-and-add flow: ask the remote service for a
//! word's definitions, preview them, and on acceptance hand the new
//! card to the external deck CLI.

use anyhow::Result;
use dialoguer::Confirm;

use crate::api::DefinitionClient;
use crate::config::Config;
use crate::deck_cli::DeckCli;
use crate::models::Suggestion;
use crate::ui::render::{build_card_html, RESET};

const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const ITALIC: &str = "\x1b[3m";
const CYAN: &str = "\x1b[36m";

/// Fetch, preview, confirm, insert. `sync` is false when the flow runs
/// inside a review session (the session syncs once on teardown) and
/// true for the standalone `--add` command.
pub fn run(config: &Config, word: &str, sync: bool) -> Result<()> {
    let api_key = config.require_api_key()?;
    let client = DefinitionClient::new(&config.api_url, api_key, config.api_timeout)?;
    let suggestion = client.fetch(word)?;

    print!("{}", render_suggestion(word, &suggestion));

    let accepted = Confirm::new()
        .with_prompt("Add to collection?")
        .default(true)
        .interact()
        // An interrupted prompt declines rather than aborting.
        .unwrap_or(false);
    if !accepted {
        println!("Skipped.");
        return Ok(());
    }

    let html = build_card_html(
        &suggestion.meanings,
        suggestion.pronunciation.as_deref(),
    );
    let deck = DeckCli::new(&config.deck_cli);
    deck.add_card(word, &html)?;
    if sync {
        deck.sync()?;
    }

    Ok(())
}

/// Render the suggestion preview: the word in bold, the pronunciation
/// muted beneath it when present, then the numbered meanings with
/// their quoted examples.
fn render_suggestion(word: &str, suggestion: &Suggestion) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(&format!("{BOLD}{CYAN}{word}{RESET}\n"));
    if let Some(pronunciation) = &suggestion.pronunciation {
        out.push_str(&format!("{DIM}{pronunciation}{RESET}\n"));
    }
    out.push_str(&format!("{DIM}{}{RESET}\n", "─".repeat(36)));

    for (index, meaning) in suggestion.meanings.iter().enumerate() {
        out.push_str(&format!("{BOLD}{}.{RESET} {}\n", index + 1, meaning.meaning));
        if let Some(example) = meaning.example.as_deref().filter(|e| !e.is_empty()) {
            out.push_str(&format!("   {DIM}{ITALIC}\"{example}\"{RESET}\n"));
        }
        out.push('\n');
    }

    out
}
