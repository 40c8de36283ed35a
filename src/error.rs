//! Error types for the shell.
//!
//! The `Display` text of every variant is exactly what the user sees, so the
//! read loop can print errors as-is.

use std::io;
use thiserror::Error;

/// Quoting problems found at end of input.
///
/// The tokenizer never fails on these; it flushes what it has and reports the
/// problem alongside the tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MalformedQuoting {
    #[error("unterminated single quote")]
    UnterminatedSingleQuote,
    #[error("unterminated double quote")]
    UnterminatedDoubleQuote,
    #[error("dangling escape at end of input")]
    DanglingEscape,
}

/// Errors from turning a line into a [`Command`](crate::parser::Command).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The line held no tokens at all.
    #[error("empty input")]
    EmptyInput,
}

/// Errors reported by builtin commands.
#[derive(Debug, Error)]
pub enum BuiltinError {
    #[error("{builtin}: missing argument")]
    MissingArgument { builtin: &'static str },

    #[error("{builtin}: too many arguments")]
    TooManyArguments { builtin: &'static str },

    #[error("cd: {0}: No such file or directory")]
    PathNotFound(String),

    #[error("cd: {path}: {source}")]
    ChangeDir {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("cd: HOME not set")]
    HomeNotSet,

    #[error("pwd: error getting current directory: {0}")]
    CurrentDir(#[source] io::Error),
}

/// Errors surfaced by the read loop for a single line.
///
/// None of these end the loop.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("{0}: command not found")]
    UnknownCommand(String),

    #[error(transparent)]
    Builtin(#[from] BuiltinError),

    #[error("{name}: Permission denied")]
    PermissionDenied { name: String },

    #[error("{name}: {source}")]
    Spawn {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ShellError {
    /// Status a failed line leaves behind, following the usual shell codes.
    pub fn status(&self) -> i32 {
        match self {
            ShellError::Parse(_) => 0,
            ShellError::UnknownCommand(_) => 127,
            ShellError::PermissionDenied { .. } | ShellError::Spawn { .. } => 126,
            ShellError::Builtin(_) | ShellError::Io(_) => 1,
        }
    }
}
