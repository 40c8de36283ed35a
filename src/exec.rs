//! External command execution module for the shell.
//!
//! Runs a resolved executable with the tokenized arguments and waits for it.
//! The child inherits the shell's standard streams.

use crate::error::ShellError;
use crate::parser::Command;
use std::io::ErrorKind;
#[cfg(unix)]
use std::os::unix::process::CommandExt; // For arg0
use std::path::Path;
use std::process::{self, ExitStatus};
use tracing::debug;

/// Executes an external command and blocks until it terminates.
///
/// On Unix argv[0] is set to the name the user typed. On other platforms
/// argv[0] will typically be `program`.
///
/// # Arguments
///
/// * `program` - The full path to the executable
/// * `command` - The parsed command; its arguments become argv[1..]
///
/// # Returns
///
/// * `Ok(code)` - The child's exit status
/// * `Err(ShellError)` - The child could not be spawned or waited on
pub fn invoke(program: &Path, command: &Command) -> Result<i32, ShellError> {
    let name = command.name();
    debug!(
        program = %program.display(),
        line = %command.to_line(),
        "invoking external command"
    );

    let mut child = process::Command::new(program);
    #[cfg(unix)]
    {
        child.arg0(name);
    }
    child.args(command.arguments());

    let status = child.status().map_err(|e| match e.kind() {
        ErrorKind::PermissionDenied => ShellError::PermissionDenied {
            name: name.to_string(),
        },
        _ => ShellError::Spawn {
            name: name.to_string(),
            source: e,
        },
    })?;

    let code = exit_code(status);
    debug!(command = name, code, "external command finished");
    Ok(code)
}

fn exit_code(status: ExitStatus) -> i32 {
    match status.code() {
        Some(code) => code,
        None => terminated_by_signal(status),
    }
}

#[cfg(unix)]
fn terminated_by_signal(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    match status.signal() {
        Some(signal) => 128 + signal,
        None => -1,
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_status: ExitStatus) -> i32 {
    -1
}
