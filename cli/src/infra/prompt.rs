//! Terminal prompts via `dialoguer`.

use std::io::IsTerminal;

use anyhow::{Context, Result};

use crate::application::ports::UserPrompt;

/// Production `UserPrompt`. Never prompts when `non_interactive` is set or
/// stdin is not a terminal.
pub struct TerminalPrompt {
    non_interactive: bool,
}

impl TerminalPrompt {
    #[must_use]
    pub fn new(non_interactive: bool) -> Self {
        Self { non_interactive }
    }
}

impl UserPrompt for TerminalPrompt {
    fn is_interactive(&self) -> bool {
        !self.non_interactive && std::io::stdin().is_terminal()
    }

    fn password(&self, prompt: &str) -> Result<String> {
        dialoguer::Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()
            .context("reading password from terminal")
    }

    fn input(&self, prompt: &str) -> Result<String> {
        dialoguer::Input::<String>::new()
            .with_prompt(prompt)
            .interact_text()
            .context("reading input from terminal")
    }
}
