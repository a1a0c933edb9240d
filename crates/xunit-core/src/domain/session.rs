//! Session identity and metadata.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque supervisor-assigned session identity.
///
/// The OS pid is deliberately not the public identity: pids are recycled
/// after process death, so a long-lived host could conflate a reused pid
/// with a stale session. Tokens are unique for the supervisor's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(u64);

impl SessionId {
    /// Wrap a raw token value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw token value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a session's stdout should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    /// Raw passthrough; output is forwarded without interpretation.
    Plain,
    /// stdout carries the pass/fail test-log grammar and feeds the
    /// incremental summary parser.
    Summarized,
}

/// Snapshot of a tracked session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    /// Supervisor-assigned identity.
    pub id: SessionId,
    /// OS process id. Informational only; recycled by the OS after exit.
    pub pid: u32,
    /// Caller-supplied display label.
    pub label: String,
    /// Output interpretation mode.
    pub kind: SessionKind,
    /// Executable and arguments as launched.
    pub command_line: Vec<String>,
    /// Unix timestamp (seconds) when the process was spawned.
    pub started_at: u64,
}
