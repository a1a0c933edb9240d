//! Spawn request configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Default minimum interval between coalesced output emissions (ms).
///
/// Forwarding every small pipe write to the editor overloads it; three
/// seconds is the interval the plugin backend has always shipped with.
pub const DEFAULT_MIN_EMIT_INTERVAL_MS: u64 = 3_000;

/// Intent-based description of a child process to run as a session.
///
/// Immutable once handed to `spawn`. The child does NOT inherit the parent
/// environment; only the variables in `environment` are set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpawnRequest {
    /// Executable to run.
    pub executable: PathBuf,
    /// Ordered arguments passed to the executable.
    pub arguments: Vec<String>,
    /// Initial working directory. When `None`, the executable's containing
    /// directory is used.
    pub working_directory: Option<PathBuf>,
    /// Environment for the child. The parent environment is not inherited.
    pub environment: HashMap<String, String>,
    /// Minimum interval between coalesced output emissions.
    pub min_emit_interval_ms: u64,
    /// Opaque display label.
    pub label: String,
}

impl SpawnRequest {
    /// Create a request for an executable with default settings.
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        let executable = executable.into();
        let label = executable.display().to_string();
        Self {
            executable,
            arguments: Vec::new(),
            working_directory: None,
            environment: HashMap::new(),
            min_emit_interval_ms: DEFAULT_MIN_EMIT_INTERVAL_MS,
            label,
        }
    }

    /// Set the argument list.
    #[must_use]
    pub fn with_args(mut self, arguments: Vec<String>) -> Self {
        self.arguments = arguments;
        self
    }

    /// Set an explicit working directory.
    #[must_use]
    pub fn with_working_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.working_directory = Some(directory.into());
        self
    }

    /// Set the child environment.
    #[must_use]
    pub fn with_env(mut self, environment: HashMap<String, String>) -> Self {
        self.environment = environment;
        self
    }

    /// Set the minimum emission interval in milliseconds.
    #[must_use]
    pub const fn with_min_emit_interval_ms(mut self, interval_ms: u64) -> Self {
        self.min_emit_interval_ms = interval_ms;
        self
    }

    /// Set the display label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// The executable and arguments as launched, for display and logging.
    #[must_use]
    pub fn command_line(&self) -> Vec<String> {
        let mut line = Vec::with_capacity(self.arguments.len() + 1);
        line.push(self.executable.display().to_string());
        line.extend(self.arguments.iter().cloned());
        line
    }

    /// The directory the child will start in.
    ///
    /// An explicit `working_directory` wins; otherwise the executable's
    /// containing directory. A bare command name has no containing
    /// directory, in which case no override is applied.
    #[must_use]
    pub fn effective_working_directory(&self) -> Option<&Path> {
        match &self.working_directory {
            Some(directory) => Some(directory.as_path()),
            None => self
                .executable
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let request = SpawnRequest::new("/opt/tests/run.sh");
        assert_eq!(request.min_emit_interval_ms, DEFAULT_MIN_EMIT_INTERVAL_MS);
        assert!(request.arguments.is_empty());
        assert!(request.environment.is_empty());
        assert_eq!(request.label, "/opt/tests/run.sh");
    }

    #[test]
    fn working_directory_defaults_to_executable_parent() {
        let request = SpawnRequest::new("/opt/tests/run.sh");
        assert_eq!(
            request.effective_working_directory(),
            Some(Path::new("/opt/tests"))
        );
    }

    #[test]
    fn explicit_working_directory_wins() {
        let request = SpawnRequest::new("/opt/tests/run.sh").with_working_directory("/srv/work");
        assert_eq!(
            request.effective_working_directory(),
            Some(Path::new("/srv/work"))
        );
    }

    #[test]
    fn bare_command_has_no_working_directory() {
        let request = SpawnRequest::new("node");
        assert_eq!(request.effective_working_directory(), None);
    }

    #[test]
    fn command_line_echoes_executable_and_arguments() {
        let request = SpawnRequest::new("/usr/bin/node")
            .with_args(vec!["runner.js".to_string(), "--strict".to_string()]);
        assert_eq!(
            request.command_line(),
            vec!["/usr/bin/node", "runner.js", "--strict"]
        );
    }
}
