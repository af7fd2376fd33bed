//! Invocations of the external deck-management CLI, which owns card
//! insertion and collection synchronization. Calls block until the
//! subprocess exits; nothing is retried.

use std::io;
use std::process::Command;

use anyhow::{bail, Context, Result};

/// Wrapper around the external CLI binary (`apy` by default). The
/// program name comes from configuration so an absolute path works
/// too.
pub struct DeckCli {
    program: String,
}

impl DeckCli {
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
        }
    }

    /// Add a new card with the given word as the front and an HTML
    /// fragment as the back.
    pub fn add_card(&self, word: &str, html: &str) -> Result<()> {
        self.run(&["add-single", word, html])
    }

    /// Synchronize the collection with its remote.
    pub fn sync(&self) -> Result<()> {
        self.run(&["sync"])
    }

    fn run(&self, args: &[&str]) -> Result<()> {
        log::info!("running {} {}", self.program, args.join(" "));
        let status = Command::new(&self.program).args(args).status();

        match status {
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                bail!(
                    "'{}' command not found. Install it or add it to PATH.",
                    self.program
                )
            }
            Err(err) => {
                Err(err).with_context(|| format!("failed to run '{}'", self.program))
            }
            Ok(status) if !status.success() => {
                let exit = status
                    .code()
                    .map(|code| code.to_string())
                    .unwrap_or_else(|| "signal".to_string());
                bail!("'{} {}' failed (exit {exit})", self.program, args.join(" "))
            }
            Ok(_) => Ok(()),
        }
    }
}
