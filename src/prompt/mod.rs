//! Prompt capability
//!
//! The interaction loop asks for input through the [`Prompter`] trait: a
//! free-text answer or one pick from a list of [`Choice`]s. Calls block until
//! the user answers. [`DialoguerPrompter`] is the terminal implementation.

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use std::io;

use crate::error::{Result, RosterError};
use crate::selection::Choice;

/// Something that can ask the user a question
pub trait Prompter {
    /// Ask for a line of free text
    fn input(&mut self, message: &str) -> Result<String>;

    /// Ask for one of `choices` and return its value
    ///
    /// Returns `InvalidInput` when `choices` is empty.
    fn select<T: Clone>(&mut self, message: &str, choices: &[Choice<T>]) -> Result<T>;
}

/// Terminal prompts rendered with `dialoguer`
pub struct DialoguerPrompter {
    theme: ColorfulTheme,
}

impl DialoguerPrompter {
    #[must_use]
    pub fn new() -> Self {
        Self { theme: ColorfulTheme::default() }
    }
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for DialoguerPrompter {
    fn input(&mut self, message: &str) -> Result<String> {
        Input::<String>::with_theme(&self.theme)
            .with_prompt(message)
            .interact_text()
            .map_err(from_dialoguer)
    }

    fn select<T: Clone>(&mut self, message: &str, choices: &[Choice<T>]) -> Result<T> {
        if choices.is_empty() {
            return Err(RosterError::invalid_input(format!("Nothing to choose for '{message}'")));
        }

        let labels: Vec<&str> = choices.iter().map(|c| c.label.as_str()).collect();
        let index = Select::with_theme(&self.theme)
            .with_prompt(message)
            .items(&labels)
            .default(0)
            .interact()
            .map_err(from_dialoguer)?;

        choices
            .get(index)
            .map(|c| c.value.clone())
            .ok_or_else(|| RosterError::prompt_failed(format!("Selection {index} out of range")))
    }
}

#[allow(unreachable_patterns)]
fn from_dialoguer(err: dialoguer::Error) -> RosterError {
    match err {
        dialoguer::Error::IO(io_err) => from_io(&io_err),
        other => RosterError::prompt_failed(other.to_string()),
    }
}

/// Map a terminal I/O error; a closed or missing input stream becomes `InputClosed`
pub(crate) fn from_io(err: &io::Error) -> RosterError {
    match err.kind() {
        io::ErrorKind::UnexpectedEof
        | io::ErrorKind::Interrupted
        | io::ErrorKind::NotConnected
        | io::ErrorKind::BrokenPipe => RosterError::InputClosed,
        _ => RosterError::prompt_failed(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_input_kinds() {
        for kind in [
            io::ErrorKind::UnexpectedEof,
            io::ErrorKind::Interrupted,
            io::ErrorKind::NotConnected,
            io::ErrorKind::BrokenPipe,
        ] {
            let err = io::Error::new(kind, "gone");
            assert!(matches!(from_io(&err), RosterError::InputClosed), "{kind:?}");
        }
    }

    #[test]
    fn test_other_io_errors_are_prompt_failures() {
        let err = io::Error::new(io::ErrorKind::PermissionDenied, "tty locked");
        let mapped = from_io(&err);
        assert_eq!(mapped.error_code(), "PROMPT_FAILED");
        assert!(mapped.message().contains("tty locked"));
    }

    #[test]
    fn test_select_rejects_empty_choices() {
        let mut prompter = DialoguerPrompter::new();
        let err = prompter.select::<i64>("Select the department:", &[]).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }
}
