//! Built-in shell commands module.
//!
//! This module implements the commands handled directly by the shell rather
//! than being executed as external programs, and the routing table that
//! decides whether a name is one of them.

use crate::error::BuiltinError;
use crate::path::PathResolver;
use crate::platform::Platform;
use regex::Regex;
use std::env;
use std::io::{self, ErrorKind, Write};
use std::path::PathBuf;
use std::sync::LazyLock;
use tracing::debug;

/// The fixed set of builtins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Exit,
    Echo,
    Type,
    Pwd,
    Cd,
}

impl Builtin {
    pub const ALL: [Builtin; 5] = [
        Builtin::Exit,
        Builtin::Echo,
        Builtin::Type,
        Builtin::Pwd,
        Builtin::Cd,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "exit" => Some(Builtin::Exit),
            "echo" => Some(Builtin::Echo),
            "type" => Some(Builtin::Type),
            "pwd" => Some(Builtin::Pwd),
            "cd" => Some(Builtin::Cd),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Exit => "exit",
            Builtin::Echo => "echo",
            Builtin::Type => "type",
            Builtin::Pwd => "pwd",
            Builtin::Cd => "cd",
        }
    }
}

pub fn is_builtin(name: &str) -> bool {
    Builtin::from_name(name).is_some()
}

/// What happened when a name was offered to the builtins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// `name` is a builtin. `exit` carries a code when the shell should
    /// terminate after running it.
    Handled { builtin: Builtin, exit: Option<i32> },
    NotABuiltin,
}

/// Looks `name` up in the builtin table.
pub fn route(name: &str) -> Option<Builtin> {
    Builtin::from_name(name)
}

/// Decides what a command line means for the builtins without running
/// anything.
pub fn dispatch(name: &str, args: &[String]) -> Outcome {
    match route(name) {
        Some(builtin @ Builtin::Exit) => Outcome::Handled {
            builtin,
            exit: Some(handle_exit(args).unwrap_or(1)),
        },
        Some(builtin) => Outcome::Handled {
            builtin,
            exit: None,
        },
        None => Outcome::NotABuiltin,
    }
}

impl Builtin {
    /// Runs the builtin, writing output to `out` and diagnostics to `err`.
    ///
    /// Returns the status of the command: 0 on success, 1 when the builtin
    /// reported an error, or the requested code for `exit`. Only failures to
    /// write to the streams are returned as errors.
    pub fn run(
        self,
        args: &[String],
        resolver: &PathResolver,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> io::Result<i32> {
        debug!(builtin = self.name(), ?args, "running builtin");

        let result = match self {
            Builtin::Exit => {
                return match handle_exit(args) {
                    Ok(code) => Ok(code),
                    Err(e) => {
                        writeln!(err, "{}", e)?;
                        Ok(1)
                    }
                };
            }
            Builtin::Echo => Ok(Some(handle_echo(args))),
            Builtin::Type => handle_type(args, resolver),
            Builtin::Pwd => handle_pwd(args),
            Builtin::Cd => handle_cd(args, resolver.platform()),
        };

        match result {
            Ok(Some(output)) => {
                out.write_all(output.as_bytes())?;
                Ok(0)
            }
            Ok(None) => Ok(0),
            Err(e) => {
                writeln!(err, "{}", e)?;
                Ok(1)
            }
        }
    }
}

/// Handles the `echo` command by joining all arguments with spaces.
///
/// # Examples
///
/// ```
/// use minish::builtins::handle_echo;
///
/// let result = handle_echo(&["hello".to_string(), "world".to_string()]);
/// assert_eq!(result, "hello world\n");
/// ```
pub fn handle_echo(args: &[String]) -> String {
    format!("{}\n", args.join(" "))
}

/// Handles the `pwd` command by returning the current working directory.
/// Arguments are ignored.
pub fn handle_pwd(_args: &[String]) -> Result<Option<String>, BuiltinError> {
    let dir = env::current_dir().map_err(BuiltinError::CurrentDir)?;
    Ok(Some(format!("{}\n", dir.display())))
}

/// Generates the line printed by `type` for a single name.
fn type_info_string(name: &str, resolver: &PathResolver) -> String {
    if is_builtin(name) {
        format!("{} is a shell builtin", name)
    } else if let Some(full_path) = resolver.resolve(name) {
        format!("{} is {}", name, full_path.display())
    } else {
        format!("{}: not found", name)
    }
}

/// Handles the `type` command by showing where a command comes from.
///
/// # Returns
///
/// * `Ok(Some(info))` - Information about the command with trailing newline
/// * `Err(BuiltinError)` - Anything other than exactly one argument
pub fn handle_type(
    args: &[String],
    resolver: &PathResolver,
) -> Result<Option<String>, BuiltinError> {
    match args {
        [name] => Ok(Some(format!("{}\n", type_info_string(name, resolver)))),
        [] => Err(BuiltinError::MissingArgument { builtin: "type" }),
        _ => Err(BuiltinError::TooManyArguments { builtin: "type" }),
    }
}

/// Expands `~` and `~/rest` against the home directory.
fn expand_home(target: &str, platform: &dyn Platform) -> Result<PathBuf, BuiltinError> {
    let rest = if target == "~" {
        ""
    } else if let Some(rest) = target.strip_prefix("~/") {
        rest
    } else {
        return Ok(PathBuf::from(target));
    };

    let mut path = platform.home_directory().ok_or(BuiltinError::HomeNotSet)?;
    if !rest.is_empty() {
        path.push(rest);
    }
    Ok(path)
}

/// Performs the directory change for `cd`.
fn change_dir(target: &str, platform: &dyn Platform) -> Result<(), BuiltinError> {
    let target_path = expand_home(target, platform)?;
    let display = target_path.display().to_string();

    if !target_path.exists() {
        return Err(BuiltinError::PathNotFound(display));
    }

    env::set_current_dir(&target_path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => BuiltinError::PathNotFound(display.clone()),
        _ => BuiltinError::ChangeDir {
            path: display.clone(),
            source: e,
        },
    })
}

/// Handles the `cd` command by changing the current directory.
///
/// * No args or `~`: change to the home directory
/// * One arg: change to the specified directory
///
/// Succeeds silently.
pub fn handle_cd(args: &[String], platform: &dyn Platform) -> Result<Option<String>, BuiltinError> {
    let target = match args {
        [] => "~",
        [path] => path.as_str(),
        _ => return Err(BuiltinError::TooManyArguments { builtin: "cd" }),
    };
    change_dir(target, platform).map(|_| None)
}

// Leading integer the way C's atoi reads it
static EXIT_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([+-]?[0-9]+)").expect("exit code pattern is valid")
});

/// Converts an `exit` argument to a status code. Text without a leading
/// integer converts to 0. Out-of-range values saturate to `i32::MIN` / `i32::MAX`.
fn parse_exit_code(arg: &str) -> i32 {
    let Some(caps) = EXIT_CODE.captures(arg) else {
        return 0;
    };
    let digits = &caps[1];
    // The pattern only admits digits, so overflow is the only failure
    digits.parse::<i32>().unwrap_or(if digits.starts_with('-') {
        i32::MIN
    } else {
        i32::MAX
    })
}

/// Handles the `exit` command by computing the status the shell ends with.
///
/// # Returns
///
/// * `Ok(code)` - 0 without an argument, otherwise the converted argument
/// * `Err(BuiltinError)` - More than one argument; the shell exits with 1
pub fn handle_exit(args: &[String]) -> Result<i32, BuiltinError> {
    match args {
        [] => Ok(0),
        [code] => Ok(parse_exit_code(code)),
        _ => Err(BuiltinError::TooManyArguments { builtin: "exit" }),
    }
}
