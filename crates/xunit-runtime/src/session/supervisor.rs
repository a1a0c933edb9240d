//! Session supervisor owning the table of live child-process sessions.

use std::collections::HashMap;
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use xunit_core::{
    SessionError, SessionEvents, SessionId, SessionInfo, SessionKind, SpawnError, SpawnRequest,
    StatusSink,
};

use super::stream::run_session;
use super::types::SessionRecord;

/// State shared between the supervisor handle and its pump tasks.
pub(crate) struct SupervisorShared {
    pub(crate) sessions: RwLock<HashMap<SessionId, SessionRecord>>,
    pub(crate) events: Arc<dyn SessionEvents>,
    pub(crate) status: Arc<dyn StatusSink>,
}

impl SupervisorShared {
    pub(crate) fn remove_session(&self, id: SessionId) {
        self.sessions.write().unwrap().remove(&id);
    }
}

/// Supervisor for child-process test sessions.
///
/// Owns the session table, spawns processes from [`SpawnRequest`]s, routes
/// their output through per-stream coalescers (and, for
/// [`SessionKind::Summarized`] sessions, the incremental summary parser),
/// and emits `output` / `error` / `exit` events to the configured sink.
///
/// Construct one per host; there is no process-wide instance. A session's
/// record prunes itself once its exit event has been emitted, so the table
/// only ever holds live sessions.
pub struct SessionSupervisor {
    shared: Arc<SupervisorShared>,
    next_id: AtomicU64,
}

impl SessionSupervisor {
    /// Create a supervisor delivering events and summary updates to the
    /// given sinks.
    #[must_use]
    pub fn new(events: Arc<dyn SessionEvents>, status: Arc<dyn StatusSink>) -> Self {
        Self {
            shared: Arc::new(SupervisorShared {
                sessions: RwLock::new(HashMap::new()),
                events,
                status,
            }),
            next_id: AtomicU64::new(1),
        }
    }

    /// Spawn a new session.
    ///
    /// The caller decides whether the session's stdout carries the
    /// summarized test-log grammar. The child starts with an empty
    /// environment apart from the request's variables. Returns the
    /// registered session's snapshot; on error nothing is registered.
    pub async fn spawn(
        &self,
        request: SpawnRequest,
        kind: SessionKind,
    ) -> Result<SessionInfo, SpawnError> {
        let mut cmd = Command::new(&request.executable);
        cmd.args(&request.arguments)
            .env_clear()
            .envs(&request.environment)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(directory) = request.effective_working_directory() {
            cmd.current_dir(directory);
        }

        let mut child = cmd
            .spawn()
            .map_err(|e| SpawnError::from_io(&request.executable, e))?;
        let pid = child.id().ok_or(SpawnError::MissingPid)?;
        let stdout = child
            .stdout
            .take()
            .ok_or(SpawnError::OutputCapture { stream: "stdout" })?;
        let stderr = child
            .stderr
            .take()
            .ok_or(SpawnError::OutputCapture { stream: "stderr" })?;

        let id = SessionId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let info = SessionInfo {
            id,
            pid,
            label: request.label.clone(),
            kind,
            command_line: request.command_line(),
            started_at: now_secs(),
        };
        let cancel = CancellationToken::new();
        {
            let mut sessions = self.shared.sessions.write().unwrap();
            sessions.insert(
                id,
                SessionRecord {
                    info: info.clone(),
                    cancel: cancel.clone(),
                },
            );
        }

        tokio::spawn(run_session(
            Arc::clone(&self.shared),
            id,
            kind,
            Duration::from_millis(request.min_emit_interval_ms),
            child,
            stdout,
            stderr,
            cancel,
        ));

        info!(session = %id, pid, label = %info.label, "session started");
        Ok(info)
    }

    /// Request termination of a session.
    ///
    /// Advisory: SIGTERM goes out immediately (escalating to SIGKILL after
    /// a grace period) and the call returns. Output already in flight and
    /// the final exit event still arrive afterwards.
    pub fn terminate(&self, id: SessionId) -> Result<(), SessionError> {
        let sessions = self.shared.sessions.read().unwrap();
        let record = sessions.get(&id).ok_or(SessionError::UnknownSession(id))?;
        debug!(session = %id, pid = record.info.pid, "terminating session");
        record.cancel.cancel();
        Ok(())
    }

    /// True while the session is tracked (its exit event has not fired).
    #[must_use]
    pub fn is_running(&self, id: SessionId) -> bool {
        self.shared.sessions.read().unwrap().contains_key(&id)
    }

    /// Snapshots of all live sessions.
    #[must_use]
    pub fn list_sessions(&self) -> Vec<SessionInfo> {
        self.shared
            .sessions
            .read()
            .unwrap()
            .values()
            .map(|record| record.info.clone())
            .collect()
    }

    /// Number of live sessions.
    #[must_use]
    pub fn count(&self) -> usize {
        self.shared.sessions.read().unwrap().len()
    }

    /// Request termination of every live session.
    pub fn shutdown(&self) {
        let sessions = self.shared.sessions.read().unwrap();
        info!(count = sessions.len(), "shutting down all sessions");
        for record in sessions.values() {
            record.cancel.cancel();
        }
    }
}

impl Drop for SessionSupervisor {
    fn drop(&mut self) {
        // Best effort: ask every live session to terminate.
        for record in self.shared.sessions.read().unwrap().values() {
            record.cancel.cancel();
        }
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use xunit_core::{NoopSessionEvents, NoopStatusSink};

    fn supervisor() -> SessionSupervisor {
        SessionSupervisor::new(Arc::new(NoopSessionEvents), Arc::new(NoopStatusSink))
    }

    #[test]
    fn fresh_supervisor_is_empty() {
        let supervisor = supervisor();
        assert_eq!(supervisor.count(), 0);
        assert!(supervisor.list_sessions().is_empty());
    }

    #[test]
    fn is_running_unknown_id() {
        assert!(!supervisor().is_running(SessionId::new(42)));
    }

    #[test]
    fn terminate_unknown_id_is_an_error() {
        let supervisor = supervisor();
        let err = supervisor.terminate(SessionId::new(9)).unwrap_err();
        assert!(matches!(
            err,
            SessionError::UnknownSession(id) if id == SessionId::new(9)
        ));
    }
}
