//! Port definitions (trait abstractions) and the error taxonomy.
//!
//! Ports define what the session core expects from its surroundings. They
//! carry no implementation detail; transports (editor bridge, SSE, tests)
//! provide the implementations. The event port lives with the event types
//! in [`crate::events`].

mod status_sink;

pub use status_sink::{NoopStatusSink, StatusSink};

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::SessionId;

/// Failure to launch a session's child process.
///
/// Reported synchronously by `spawn`; when any of these occur, no session
/// has been registered.
#[derive(Debug, Error)]
pub enum SpawnError {
    /// The executable path does not exist.
    #[error("executable not found: {}", path.display())]
    ExecutableNotFound { path: PathBuf },

    /// The OS refused to execute the file.
    #[error("permission denied executing {}", path.display())]
    PermissionDenied { path: PathBuf },

    /// Any other OS-level launch failure.
    #[error("failed to spawn {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The process launched but reported no pid.
    #[error("spawned process reported no pid")]
    MissingPid,

    /// A stdio pipe could not be captured.
    #[error("failed to capture child {stream} stream")]
    OutputCapture { stream: &'static str },
}

impl SpawnError {
    /// Classify an OS spawn failure for the attempted executable.
    #[must_use]
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => Self::ExecutableNotFound {
                path: path.to_path_buf(),
            },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => Self::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}

/// Operation addressed at a session id the supervisor does not know.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The id was never issued, or the session already exited and was pruned.
    #[error("unknown session: {0}")]
    UnknownSession(SessionId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_error_names_the_executable() {
        let err = SpawnError::from_io(
            Path::new("/opt/tests/shell.sh"),
            io::Error::new(io::ErrorKind::NotFound, "missing"),
        );
        assert!(matches!(err, SpawnError::ExecutableNotFound { .. }));
        assert!(err.to_string().contains("/opt/tests/shell.sh"));
    }

    #[test]
    fn permission_denied_is_classified() {
        let err = SpawnError::from_io(
            Path::new("/opt/tests/shell.sh"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, SpawnError::PermissionDenied { .. }));
    }

    #[test]
    fn unknown_session_carries_the_id() {
        let err = SessionError::UnknownSession(SessionId::new(5));
        assert_eq!(err.to_string(), "unknown session: 5");
    }
}
