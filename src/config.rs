//! Environment-derived configuration, resolved once in `main` and
//! passed into each component explicitly.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Result};
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application
/// data when no explicit collection path is configured.
const DATA_DIR_NAME: &str = ".flashcard-study-helper";
/// SQLite file name stored inside the application data directory.
const COLLECTION_FILE_NAME: &str = "collection.sqlite3";

/// Hosted definition-generation endpoint used when no override is set.
const DEFAULT_API_URL: &str = "https://anki-new-card.vercel.app/api/gemini";
/// External deck-management CLI invoked for card insertion and sync.
const DEFAULT_DECK_CLI: &str = "apy";
/// Fixed timeout applied to every definition request.
const API_TIMEOUT: Duration = Duration::from_secs(15);

/// Runtime settings for both the review session and the add flow.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the collection database. Missing files are diagnosed at
    /// open time, not here.
    pub collection_path: PathBuf,
    /// API key for the remote definition service. Only the add flow
    /// requires it.
    pub api_key: Option<String>,
    /// Definition endpoint URL.
    pub api_url: String,
    /// Program name (or path) of the external deck CLI.
    pub deck_cli: String,
    /// Timeout for definition requests.
    pub api_timeout: Duration,
}

impl Config {
    /// Resolve settings from the environment, falling back to the
    /// platform default collection location. Each mode validates only
    /// the settings it actually needs, so a missing API key does not
    /// prevent studying.
    pub fn from_env() -> Result<Self> {
        let collection_path = match env::var_os("FLASHCARDS_COLLECTION_PATH") {
            Some(path) => PathBuf::from(path),
            None => default_collection_path()?,
        };

        let api_key = env::var("FLASHCARDS_API_KEY").ok().filter(|k| !k.is_empty());
        let api_url =
            env::var("FLASHCARDS_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let deck_cli =
            env::var("FLASHCARDS_DECK_CLI").unwrap_or_else(|_| DEFAULT_DECK_CLI.to_string());

        log::debug!(
            "config: collection={} api_url={} deck_cli={}",
            collection_path.display(),
            api_url,
            deck_cli
        );

        Ok(Self {
            collection_path,
            api_key,
            api_url,
            deck_cli,
            api_timeout: API_TIMEOUT,
        })
    }

    /// The API key, or a diagnostic telling the user which variable to
    /// set. Called by the add flow right before the first request.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| anyhow!("FLASHCARDS_API_KEY environment variable is not set"))
    }
}

/// Resolve the default collection path inside the user's home.
fn default_collection_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs
        .home_dir()
        .join(DATA_DIR_NAME)
        .join(COLLECTION_FILE_NAME))
}
