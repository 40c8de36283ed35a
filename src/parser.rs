//! Command line parsing module for the shell.
//!
//! Splits a tokenized line into a command name and its arguments.

use crate::error::ParseError;
use crate::tokenizer::{self, Token, BACKSLASH, DOUBLE_QUOTE, SINGLE_QUOTE};

/// A command name plus its ordered arguments. The name is never part of the
/// arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    name: Token,
    arguments: Vec<Token>,
}

impl Command {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &[Token] {
        &self.arguments
    }

    /// Name followed by arguments, the way a program sees its argv.
    pub fn argv(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.arguments.iter().map(String::as_str))
    }

    /// Rebuilds a command line that tokenizes back into this command.
    pub fn to_line(&self) -> String {
        self.argv().map(quote).collect::<Vec<_>>().join(" ")
    }
}

fn needs_quoting(token: &str) -> bool {
    token.is_empty()
        || token
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, SINGLE_QUOTE | DOUBLE_QUOTE | BACKSLASH))
}

fn quote(token: &str) -> String {
    if needs_quoting(token) {
        format!("'{}'", token.replace(SINGLE_QUOTE, r"'\''"))
    } else {
        token.to_string()
    }
}

/// Parses a line into a [`Command`].
///
/// # Returns
///
/// * `Ok(command)` - The first token as name, the rest as arguments
/// * `Err(ParseError::EmptyInput)` - The line produced no tokens
///
/// # Examples
///
/// ```
/// use minish::parser::parse;
///
/// let command = parse("type 'echo'").unwrap();
/// assert_eq!(command.name(), "type");
/// assert_eq!(command.arguments(), ["echo"]);
/// ```
pub fn parse(line: &str) -> Result<Command, ParseError> {
    from_tokens(tokenizer::tokenize(line))
}

/// Builds a [`Command`] from already tokenized input.
pub fn from_tokens(tokens: Vec<Token>) -> Result<Command, ParseError> {
    let mut tokens = tokens.into_iter();
    let name = tokens.next().ok_or(ParseError::EmptyInput)?;
    Ok(Command {
        name,
        arguments: tokens.collect(),
    })
}
