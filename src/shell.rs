//! The interactive read loop.

use crate::builtins::{self, Outcome};
use crate::error::{ParseError, ShellError};
use crate::exec;
use crate::parser;
use crate::path::PathResolver;
use crate::platform::Platform;
use crate::tokenizer;
use anyhow::Context;
use std::io::{BufRead, Write};
use tracing::{debug, warn};

pub const DEFAULT_PROMPT: &str = "$ ";

/// Result of executing one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStatus {
    /// Keep reading. Carries the status the line produced.
    Continue(i32),
    /// The `exit` builtin ran with this code.
    Exit(i32),
}

impl LineStatus {
    pub fn code(self) -> i32 {
        match self {
            LineStatus::Continue(code) | LineStatus::Exit(code) => code,
        }
    }
}

pub struct Shell {
    resolver: PathResolver,
    prompt: String,
}

impl Shell {
    pub fn new(platform: Box<dyn Platform>) -> Self {
        Self {
            resolver: PathResolver::new(platform),
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Reads and executes lines until `exit` or end of input.
    ///
    /// Returns the status the shell should exit with: the `exit` builtin's
    /// code, or 0 on end of input.
    pub fn run<R, W, E>(&self, mut input: R, mut out: W, mut err: E) -> anyhow::Result<i32>
    where
        R: BufRead,
        W: Write,
        E: Write,
    {
        let mut line = String::new();
        loop {
            write!(out, "{}", self.prompt).context("failed to write prompt")?;
            out.flush().context("failed to flush stdout")?;

            line.clear();
            if input.read_line(&mut line).context("failed to read input")? == 0 {
                // Handle CTRL + D (EOF) gracefully
                writeln!(out)?;
                return Ok(0);
            }

            let trimmed = line.trim_end_matches(['\n', '\r']);
            if let LineStatus::Exit(code) = self.execute_line(trimmed, &mut out, &mut err)? {
                return Ok(code);
            }
        }
    }

    /// Executes one line and reports its status, or the code to exit with.
    ///
    /// Per-line failures (unknown commands, builtin errors, spawn errors) are
    /// printed to `err` and do not stop the shell. An empty line continues
    /// with status 0.
    pub fn execute_line<W, E>(
        &self,
        line: &str,
        out: &mut W,
        err: &mut E,
    ) -> anyhow::Result<LineStatus>
    where
        W: Write,
        E: Write,
    {
        match self.try_execute(line, out, err) {
            Ok(status) => Ok(status),
            Err(ShellError::Parse(ParseError::EmptyInput)) => Ok(LineStatus::Continue(0)),
            Err(ShellError::Io(e)) => Err(e).context("failed to write output"),
            Err(e) => {
                writeln!(err, "{}", e).context("failed to write diagnostic")?;
                Ok(LineStatus::Continue(e.status()))
            }
        }
    }

    fn try_execute<W, E>(
        &self,
        line: &str,
        out: &mut W,
        err: &mut E,
    ) -> Result<LineStatus, ShellError>
    where
        W: Write,
        E: Write,
    {
        let scanned = tokenizer::scan(line);
        if let Some(problem) = scanned.malformed {
            warn!(%problem, "malformed quoting, using best-effort tokens");
        }

        let command = parser::from_tokens(scanned.tokens)?;
        debug!(command = command.name(), args = ?command.arguments(), "parsed command");

        match builtins::dispatch(command.name(), command.arguments()) {
            Outcome::Handled { builtin, exit } => {
                let status = builtin.run(command.arguments(), &self.resolver, out, err)?;
                Ok(match exit {
                    Some(code) => LineStatus::Exit(code),
                    None => LineStatus::Continue(status),
                })
            }
            Outcome::NotABuiltin => {
                let program = self
                    .resolver
                    .resolve(command.name())
                    .ok_or_else(|| ShellError::UnknownCommand(command.name().to_string()))?;

                // The child writes straight to the inherited streams
                out.flush()?;
                err.flush()?;
                let status = exec::invoke(&program, &command)?;
                Ok(LineStatus::Continue(status))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::testing::FixedEnv;
    use std::io::Cursor;

    fn shell() -> Shell {
        Shell::new(Box::new(FixedEnv::new([("PATH", "/nonexistent/dir")])))
    }

    fn run(input: &str) -> (i32, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = shell().run(Cursor::new(input), &mut out, &mut err).unwrap();
        (
            code,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_echo_and_exit() {
        let (code, out, err) = run("echo 'hello   world' \"a\\\"b\"\nexit 2\n");
        assert_eq!(code, 2);
        assert_eq!(out, "$ hello   world a\"b\n$ ");
        assert!(err.is_empty());
    }

    #[test]
    fn test_eof_exits_zero() {
        let (code, out, _) = run("echo hi\n");
        assert_eq!(code, 0);
        assert_eq!(out, "$ hi\n$ \n");
    }

    #[test]
    fn test_empty_lines_reprompt_silently() {
        let (code, out, err) = run("\n   \nexit\n");
        assert_eq!(code, 0);
        assert_eq!(out, "$ $ $ ");
        assert!(err.is_empty());
    }

    #[test]
    fn test_unknown_command_continues() {
        let (code, out, err) = run("nonexistent_command_xyz arg\nexit 5\n");
        assert_eq!(code, 5);
        assert_eq!(out, "$ $ ");
        assert_eq!(err, "nonexistent_command_xyz: command not found\n");
    }

    #[test]
    fn test_exit_arity_error_exits_one() {
        let (code, _, err) = run("exit 1 2\necho unreachable\n");
        assert_eq!(code, 1);
        assert_eq!(err, "exit: too many arguments\n");
    }

    #[test]
    fn test_type_reports_builtin() {
        let (_, out, _) = run("type exit\n");
        assert_eq!(out, "$ exit is a shell builtin\n$ \n");
    }

    #[test]
    fn test_crlf_line_endings() {
        let (code, out, _) = run("echo x\r\nexit 3\r\n");
        assert_eq!(code, 3);
        assert_eq!(out, "$ x\n$ ");
    }

    #[test]
    fn test_custom_prompt() {
        let mut out = Vec::new();
        let shell = shell().with_prompt("> ");
        shell.run(Cursor::new("exit\n"), &mut out, Vec::new()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "> ");
    }

    #[test]
    fn test_execute_line() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let shell = shell();
        assert_eq!(
            shell.execute_line("echo 'x'y", &mut out, &mut err).unwrap(),
            LineStatus::Continue(0)
        );
        assert_eq!(
            shell.execute_line("exit 4", &mut out, &mut err).unwrap(),
            LineStatus::Exit(4)
        );
        assert_eq!(out, b"xy\n");
    }

    #[test]
    fn test_failed_lines_report_status() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let shell = shell();
        assert_eq!(
            shell.execute_line("   ", &mut out, &mut err).unwrap(),
            LineStatus::Continue(0)
        );
        assert_eq!(
            shell.execute_line("type", &mut out, &mut err).unwrap(),
            LineStatus::Continue(1)
        );
        assert_eq!(
            shell.execute_line("nonexistent_command_xyz", &mut out, &mut err).unwrap(),
            LineStatus::Continue(127)
        );
    }

    #[test]
    #[cfg(unix)]
    fn test_external_status_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink("/bin/sh", dir.path().join("tool")).unwrap();

        let path_list = dir.path().display().to_string();
        let shell = Shell::new(Box::new(FixedEnv::new([("PATH", path_list.as_str())])));
        let mut out = Vec::new();
        let mut err = Vec::new();
        let cases = [
            ("tool -c 'exit 0'", 0),
            ("tool -c false", 1),
            (r#"tool -c "exit 3""#, 3),
        ];
        for (line, code) in cases {
            let status = shell.execute_line(line, &mut out, &mut err).unwrap();
            assert_eq!(status, LineStatus::Continue(code), "line: {line}");
        }
        assert!(err.is_empty());
    }

    #[test]
    fn test_unterminated_quote_is_best_effort() {
        let (_, out, err) = run("echo 'still here\n");
        assert_eq!(out, "$ still here\n$ \n");
        assert!(err.is_empty());
    }
}
