//! Operator prompts for the CLI.
//!
//! Interactive terminals get `dialoguer` prompts; piped stdin falls back to
//! the core line prompter so sessions can be scripted.

use dialoguer::{Confirm, Input, theme::ColorfulTheme};
use docfill_core::engine::{LinePrompter, PromptError, Prompter};
use std::io::{self, IsTerminal};

/// [`Prompter`] backed by `dialoguer`.
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self { theme: ColorfulTheme::default() }
    }
}

impl Prompter for TerminalPrompter {
    fn read_line(&mut self, prompt: &str) -> Result<String, PromptError> {
        // dialoguer adds its own separator.
        let label = prompt.trim_end().trim_end_matches(':').trim_end_matches('?');
        Input::<String>::with_theme(&self.theme)
            .with_prompt(label)
            .allow_empty(true)
            .interact_text()
            .map_err(dialoguer_error_to_prompt_error)
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool, PromptError> {
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(dialoguer_error_to_prompt_error)
    }

    fn notify(&mut self, message: &str) {
        eprintln!("  {message}");
    }
}

/// Pick the prompter for the current stdin. Prompts go to stderr so stdout
/// only carries results.
pub fn stdin_prompter() -> Box<dyn Prompter> {
    if io::stdin().is_terminal() {
        Box::new(TerminalPrompter::new())
    } else {
        Box::new(LinePrompter::new(io::stdin().lock(), io::stderr()))
    }
}

/// Convert dialoguer error to our PromptError.
fn dialoguer_error_to_prompt_error(e: dialoguer::Error) -> PromptError {
    match e {
        dialoguer::Error::IO(io_err) => {
            if io_err.kind() == io::ErrorKind::UnexpectedEof {
                PromptError::Cancelled
            } else {
                PromptError::Io(io_err)
            }
        }
    }
}
