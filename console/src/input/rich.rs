//! Line editor input
//!
//! Wraps dialoguer's text input with session history and Tab completion of
//! the chat commands.

use dialoguer::theme::ColorfulTheme;
use dialoguer::{BasicHistory, Completion, Input};
use std::io;

use crate::chat_loop::{EXIT_COMMAND, RESET_COMMAND};
use crate::error::ConsoleError;

/// Tab completion over a fixed word list
#[derive(Debug, Clone)]
pub struct CommandHints {
    words: Vec<String>,
}

impl CommandHints {
    pub fn new(words: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Completion for the built-in chat commands
    pub fn chat_commands() -> Self {
        Self::new([EXIT_COMMAND, RESET_COMMAND])
    }
}

impl Completion for CommandHints {
    /// Complete when exactly one word extends the typed prefix
    fn get(&self, input: &str) -> Option<String> {
        if input.is_empty() {
            return None;
        }
        let mut matches = self
            .words
            .iter()
            .filter(|word| word.starts_with(input) && word.as_str() != input);
        match (matches.next(), matches.next()) {
            (Some(word), None) => Some(word.clone()),
            _ => None,
        }
    }
}

/// Line editor with history, completion, and an optional multi-line mode
pub struct RichInput {
    theme: ColorfulTheme,
    history: BasicHistory,
    hints: CommandHints,
    multiline: bool,
}

impl RichInput {
    pub fn new(history_size: usize, multiline: bool) -> Self {
        Self {
            theme: ColorfulTheme::default(),
            history: BasicHistory::new()
                .max_entries(history_size)
                .no_duplicates(true),
            hints: CommandHints::chat_commands(),
            multiline,
        }
    }

    /// Read one message for `role`
    ///
    /// In multi-line mode lines are collected until an empty line.
    pub fn read(&mut self, role: &str) -> Result<String, ConsoleError> {
        if !self.multiline {
            return self.read_line(role);
        }

        let mut lines = Vec::new();
        loop {
            let prompt = if lines.is_empty() {
                format!("{role} [empty line to end]")
            } else {
                "...".to_string()
            };
            let line = self.read_line(&prompt)?;
            if line.is_empty() {
                break;
            }
            lines.push(line);
        }
        Ok(lines.join("\n"))
    }

    fn read_line(&mut self, prompt: &str) -> Result<String, ConsoleError> {
        Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .history_with(&mut self.history)
            .completion_with(&self.hints)
            .interact_text()
            .map_err(map_editor_error)
    }
}

fn map_editor_error(err: dialoguer::Error) -> ConsoleError {
    match err {
        dialoguer::Error::IO(e) if e.kind() == io::ErrorKind::Interrupted => {
            ConsoleError::Interrupted
        }
        #[allow(unreachable_patterns)]
        other => ConsoleError::Input(other.to_string()),
    }
}
