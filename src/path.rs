//! Executable lookup through the `PATH` search list.

use crate::platform::Platform;
use std::path::PathBuf;
use tracing::debug;

/// Finds executables for bare command names.
pub struct PathResolver {
    platform: Box<dyn Platform>,
}

impl PathResolver {
    pub fn new(platform: Box<dyn Platform>) -> Self {
        Self { platform }
    }

    pub fn platform(&self) -> &dyn Platform {
        self.platform.as_ref()
    }

    /// Finds an executable: checks the name directly if it contains a
    /// directory separator, otherwise searches each `PATH` entry in order.
    ///
    /// # Returns
    ///
    /// * `Some(path)` - First match in `PATH` order
    /// * `None` - Not found, or `PATH` is unset
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty() {
            return None;
        }

        let separator = self.platform.path_separator();
        if name.contains(separator) || name.contains('/') {
            let path = PathBuf::from(name);
            return self.platform.is_executable(&path).then_some(path);
        }

        let path_list = self.platform.path_list()?;
        let found = path_list
            .split(self.platform.path_delimiter())
            // An empty entry would mean the current directory
            .filter(|dir| !dir.is_empty())
            .find_map(|dir| self.find_in_dir(dir, name));

        if let Some(path) = &found {
            debug!(command = name, path = %path.display(), "resolved executable");
        }
        found
    }

    fn find_in_dir(&self, dir: &str, name: &str) -> Option<PathBuf> {
        let separator = self.platform.path_separator();
        let candidate = if dir.ends_with(separator) {
            format!("{dir}{name}")
        } else {
            format!("{dir}{separator}{name}")
        };

        let path = PathBuf::from(&candidate);
        if self.platform.is_executable(&path) {
            return Some(path);
        }

        let suffix = self.platform.executable_suffix()?;
        let path = PathBuf::from(candidate + suffix);
        self.platform.is_executable(&path).then_some(path)
    }
}
