//! Operator I/O used by the collection engine.

use std::io::{self, BufRead, Write};

use thiserror::Error;

/// Error type for operator prompts.
#[derive(Debug, Error)]
pub enum PromptError {
    /// End of input or an explicit interrupt.
    #[error("input cancelled by user")]
    Cancelled,

    #[error("prompt I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Line-oriented operator channel.
pub trait Prompter {
    /// Show `prompt` and read one answer, without its line terminator.
    fn read_line(&mut self, prompt: &str) -> Result<String, PromptError>;

    /// Ask a yes/no question.
    fn confirm(&mut self, prompt: &str) -> Result<bool, PromptError>;

    /// Show a message that needs no answer (validation failures, progress).
    fn notify(&mut self, message: &str);
}

/// [`Prompter`] over any buffered reader and writer.
///
/// Used for piped sessions and in tests; end of input is reported as
/// [`PromptError::Cancelled`].
#[derive(Debug)]
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<String, PromptError> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PromptError::Cancelled);
        }
        let trimmed = line.strip_suffix('\n').unwrap_or(&line);
        let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);
        Ok(trimmed.to_string())
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool, PromptError> {
        let question = format!("{prompt} [y/N] ");
        loop {
            let answer = self.read_line(&question)?;
            match answer.trim().to_lowercase().as_str() {
                "y" | "yes" | "д" | "да" => return Ok(true),
                "" | "n" | "no" | "н" | "нет" => return Ok(false),
                _ => self.notify("Please answer yes or no."),
            }
        }
    }

    fn notify(&mut self, message: &str) {
        // Nothing useful to do if the operator channel is gone; the next
        // read_line reports it.
        let _ = writeln!(self.output, "{message}");
    }
}
