//! Store configuration.

use rosterdb_codec::Format;
use std::path::{Path, PathBuf};

/// File name used when no path is given.
pub const DEFAULT_FILE_NAME: &str = "students.csv";

/// What to do with a line of the backing file that cannot be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// Skip the line, log a warning, and keep loading.
    #[default]
    Skip,
    /// Fail the whole load.
    Abort,
}

/// Configuration for opening a record store.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the backing file.
    pub path: PathBuf,

    /// Row encoding used for reading and writing.
    pub format: Format,

    /// Handling of undecodable lines during load.
    pub load_policy: LoadPolicy,

    /// Whether to create missing parent directories on the first write.
    pub create_dirs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_FILE_NAME),
            format: Format::Legacy,
            load_policy: LoadPolicy::Skip,
            create_dirs: false,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the backing file path.
    #[must_use]
    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = path.as_ref().to_path_buf();
        self
    }

    /// Sets the row encoding.
    #[must_use]
    pub const fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Sets the load policy.
    #[must_use]
    pub const fn load_policy(mut self, policy: LoadPolicy) -> Self {
        self.load_policy = policy;
        self
    }

    /// Sets whether missing parent directories are created.
    #[must_use]
    pub const fn create_dirs(mut self, value: bool) -> Self {
        self.create_dirs = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.path, PathBuf::from("students.csv"));
        assert_eq!(config.format, Format::Legacy);
        assert_eq!(config.load_policy, LoadPolicy::Skip);
        assert!(!config.create_dirs);
    }

    #[test]
    fn builder_pattern() {
        let config = Config::new()
            .path("data/roster.csv")
            .format(Format::Quoted)
            .load_policy(LoadPolicy::Abort)
            .create_dirs(true);

        assert_eq!(config.path, PathBuf::from("data/roster.csv"));
        assert_eq!(config.format, Format::Quoted);
        assert_eq!(config.load_policy, LoadPolicy::Abort);
        assert!(config.create_dirs);
    }
}
