//! Platform capabilities used by path resolution and the `cd` builtin.

use std::env;
use std::path::{Path, PathBuf};

/// What the shell needs to know about the host OS.
///
/// The tokenizer and parser never touch this; only path lookup and the
/// builtins that deal with directories do.
pub trait Platform {
    /// Separator between entries of `PATH`.
    fn path_delimiter(&self) -> char;

    /// Separator between directory components.
    fn path_separator(&self) -> char;

    /// Suffix tried when the bare name is not found in a directory.
    fn executable_suffix(&self) -> Option<&'static str>;

    /// Environment variable holding the user's home directory.
    fn home_var(&self) -> &'static str;

    fn var(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }

    fn home_directory(&self) -> Option<PathBuf> {
        self.var(self.home_var())
            .filter(|home| !home.is_empty())
            .map(PathBuf::from)
    }

    fn path_list(&self) -> Option<String> {
        self.var("PATH")
    }

    /// Whether `path` names something that can be run.
    fn is_executable(&self, path: &Path) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Unix;

impl Platform for Unix {
    fn path_delimiter(&self) -> char {
        ':'
    }

    fn path_separator(&self) -> char {
        '/'
    }

    fn executable_suffix(&self) -> Option<&'static str> {
        None
    }

    fn home_var(&self) -> &'static str {
        "HOME"
    }

    fn is_executable(&self, path: &Path) -> bool {
        let Ok(metadata) = path.metadata() else {
            return false;
        };
        if !metadata.is_file() {
            return false;
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            // Check execute permission (user, group, or other)
            metadata.permissions().mode() & 0o111 != 0
        }
        #[cfg(not(unix))]
        {
            true
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Windows;

impl Platform for Windows {
    fn path_delimiter(&self) -> char {
        ';'
    }

    fn path_separator(&self) -> char {
        '\\'
    }

    fn executable_suffix(&self) -> Option<&'static str> {
        Some(".exe")
    }

    fn home_var(&self) -> &'static str {
        "USERPROFILE"
    }

    fn is_executable(&self, path: &Path) -> bool {
        // No execute bits to check
        path.is_file()
    }
}

/// The platform this binary was built for.
pub fn host() -> Box<dyn Platform> {
    if cfg!(windows) {
        Box::new(Windows)
    } else {
        Box::new(Unix)
    }
}
