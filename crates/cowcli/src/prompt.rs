//! The yes/no gate in front of every irreversible action.
//!
//! The gate is an injectable capability rather than a module-level handle
//! on stdin, so automated runs and tests can script the answers.

use std::{cell::RefCell, collections::VecDeque};

use dialoguer::{theme::ColorfulTheme, Input};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("User declined")]
    UserDeclined,

    #[error("Other error: {0}")]
    Other(#[from] eyre::Error),
}

pub trait UserPrompt {
    /// Asks a yes/no question and returns the answer.
    fn confirm(&self, message: &str) -> eyre::Result<bool>;
}

/// Terminal-backed prompt. Accepts `y`/`yes`/`n`/`no` case-insensitively
/// and re-prompts on anything else.
pub struct TerminalPrompt;

impl UserPrompt for TerminalPrompt {
    fn confirm(&self, message: &str) -> eyre::Result<bool> {
        use colored::Colorize;

        println!("\n{}", format!("{} (y/n)", message).bright_cyan());

        let input: String = Input::with_theme(&ColorfulTheme::default())
            .validate_with(|input: &String| -> std::result::Result<(), &str> {
                let normalized = input.trim().to_lowercase();
                match normalized.as_str() {
                    "y" | "yes" | "n" | "no" => Ok(()),
                    _ => Err("Please type 'y/yes' or 'n/no'"),
                }
            })
            .interact()
            .map_err(|e: dialoguer::Error| match e {
                dialoguer::Error::IO(e) => match e.kind() {
                    std::io::ErrorKind::Interrupted => ExecuteError::UserDeclined,
                    _ => ExecuteError::Other(e.into()),
                },
            })?;

        Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
    }
}

/// Scripted responder; answers are consumed front to back.
pub struct ScriptedPrompt {
    answers: RefCell<VecDeque<bool>>,
}

impl ScriptedPrompt {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: RefCell::new(answers.into_iter().collect()),
        }
    }
}

impl UserPrompt for ScriptedPrompt {
    fn confirm(&self, _message: &str) -> eyre::Result<bool> {
        self.answers
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| eyre::eyre!("Scripted prompt ran out of answers"))
    }
}

/// Gate helper: a negative answer turns into the distinguished
/// user-declined termination instead of continuing.
pub fn require_confirmation(prompt: &dyn UserPrompt, message: &str) -> eyre::Result<()> {
    if prompt.confirm(message)? {
        Ok(())
    } else {
        Err(ExecuteError::UserDeclined.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_answers_are_consumed_in_order() {
        let prompt = ScriptedPrompt::new([true, false]);
        assert!(prompt.confirm("first").unwrap());
        assert!(!prompt.confirm("second").unwrap());
        assert!(prompt.confirm("third").is_err());
    }

    #[test]
    fn declining_is_distinguishable_from_errors() {
        let prompt = ScriptedPrompt::new([false]);
        let err = require_confirmation(&prompt, "continue?").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ExecuteError>(),
            Some(ExecuteError::UserDeclined)
        ));
    }

    #[test]
    fn accepting_passes_the_gate() {
        let prompt = ScriptedPrompt::new([true]);
        assert!(require_confirmation(&prompt, "continue?").is_ok());
    }
}
