use std::io;

use crate::catalog::{self, LocalFailure};
use crate::grammar::ParseError;

#[derive(Debug, thiserror::Error)]
pub enum FmcsError {
    #[error("{0}")]
    Grammar(#[from] ParseError),

    #[error(
        "Error: {} ({})",
        catalog::INVALID_COMMAND,
        catalog::describe(catalog::INVALID_COMMAND)
    )]
    InvalidCommand,

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("{0}: not implemented")]
    NotImplemented(String),

    #[error("Error: {code} ({})", describe(.code))]
    Remote { code: i64 },

    #[error(
        "Error: {} ({})",
        catalog::UNAVAILABLE_COMMAND,
        catalog::describe(catalog::UNAVAILABLE_COMMAND)
    )]
    Transport(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FmcsError {
    pub fn local(&self) -> Option<LocalFailure> {
        match self {
            FmcsError::Grammar(e) if e.after_command => Some(LocalFailure::InvalidOption),
            FmcsError::Grammar(_) | FmcsError::InvalidCommand | FmcsError::UnknownCommand(_) => {
                Some(LocalFailure::InvalidCommand)
            }
            FmcsError::NotImplemented(_) => Some(LocalFailure::NotImplemented),
            _ => None,
        }
    }

    /// Remote-style result code, for failures that carry one.
    pub fn code(&self) -> Option<i64> {
        match self {
            FmcsError::InvalidCommand => Some(catalog::INVALID_COMMAND),
            FmcsError::Remote { code } => Some(*code),
            FmcsError::Transport(_) | FmcsError::Decode(_) => Some(catalog::UNAVAILABLE_COMMAND),
            _ => None,
        }
    }

    pub fn exit_status(&self) -> i32 {
        if let Some(local) = self.local() {
            return local.exit_status();
        }
        match self.code() {
            Some(code) => catalog::exit_status(code),
            None => catalog::UNCLASSIFIED_EXIT,
        }
    }
}

fn describe(code: &i64) -> &'static str {
    catalog::describe(*code)
}

pub type Result<T> = std::result::Result<T, FmcsError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::ParseErrorKind;

    fn grammar(after_command: bool) -> FmcsError {
        FmcsError::Grammar(ParseError {
            kind: ParseErrorKind::UnknownOption("--unknown".into()),
            after_command,
        })
    }

    #[test]
    fn grammar_errors_split_on_command_position() {
        assert_eq!(grammar(false).exit_status(), 248);
        assert_eq!(grammar(true).exit_status(), 249);
    }

    #[test]
    fn invalid_command_message() {
        assert_eq!(
            FmcsError::InvalidCommand.to_string(),
            "Error: 11000 (Invalid command)"
        );
        assert_eq!(FmcsError::InvalidCommand.exit_status(), 248);
        assert_eq!(FmcsError::UnknownCommand("nope".into()).exit_status(), 248);
    }

    #[test]
    fn remote_errors_use_catalog() {
        let err = FmcsError::Remote { code: 10600 };
        assert_eq!(
            err.to_string(),
            "Error: 10600 (Schedule at specified index no longer exists)"
        );
        assert_eq!(err.exit_status(), 104);
        assert_eq!(FmcsError::Remote { code: 99999 }.to_string(), "Error: 99999 ()");
        assert_eq!(FmcsError::Remote { code: 99999 }.exit_status(), 1);
    }

    #[test]
    fn not_implemented_status() {
        assert_eq!(
            FmcsError::NotImplemented("set cwpconfig".into()).exit_status(),
            10001
        );
    }

    #[test]
    fn io_errors_are_unclassified() {
        let err = FmcsError::Io(io::Error::other("boom"));
        assert_eq!(err.exit_status(), catalog::UNCLASSIFIED_EXIT);
    }
}
