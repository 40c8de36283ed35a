//! A small interactive shell.
//!
//! Lines are split into tokens with POSIX-style quoting, the first token is
//! looked up among the builtins, and anything else is searched for on `PATH`
//! and run as a child process.

pub mod builtins;
pub mod error;
pub mod exec;
pub mod parser;
pub mod path;
pub mod platform;
pub mod shell;
pub mod tokenizer;

pub use parser::{parse, Command};
pub use shell::Shell;
pub use tokenizer::tokenize;
