// src/cli/prompt.rs
use anyhow::{Context, Result};
use dialoguer::{theme::ColorfulTheme, Confirm, Password};

/// Interactive questions asked by commands.
pub trait Prompter {
    fn confirm(&mut self, message: &str) -> Result<bool>;
    fn password(&mut self, prompt: &str) -> Result<String>;
}

#[derive(Default)]
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl Prompter for TerminalPrompter {
    fn confirm(&mut self, message: &str) -> Result<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt(message)
            .default(false)
            .interact()
            .context("Failed to read confirmation")
    }

    fn password(&mut self, prompt: &str) -> Result<String> {
        Password::with_theme(&self.theme)
            .with_prompt(prompt)
            .interact()
            .context("Failed to read password")
    }
}
