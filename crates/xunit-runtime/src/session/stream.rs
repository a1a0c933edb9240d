//! Per-session stream pump.
//!
//! One task per session multiplexes stdout reads, stderr reads and
//! cancellation, applies the per-stream coalescing policy, feeds the
//! summary parser, and emits the terminal exit event after both pipes have
//! drained. Running everything for a session on one task keeps its events
//! ordered and makes the exit event the last one without any locking.
//!
//! Chunks are read as raw bytes with lossy UTF-8 decoding: test shells (and
//! the C tooling they wrap) can emit non-UTF8 bytes, and a decode error
//! must not end output streaming.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::process::{Child, ChildStderr, ChildStdout};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use xunit_core::{SessionId, SessionKind, SummaryParser};

use super::coalescer::OutputCoalescer;
use super::shutdown;
use super::supervisor::SupervisorShared;

/// Read buffer size for each pipe.
const READ_CHUNK_BYTES: usize = 8 * 1024;

/// Drive one session from spawn to exit.
///
/// Guarantees, per session: output events are emitted in pipe order, the
/// stderr backlog is flushed before the exit event, stdout still buffered
/// at exit rides in the exit payload exactly once, and the exit event is
/// the final event. The session record is pruned afterwards.
#[allow(clippy::too_many_arguments)]
pub(crate) async fn run_session(
    shared: Arc<SupervisorShared>,
    id: SessionId,
    kind: SessionKind,
    min_interval: Duration,
    mut child: Child,
    mut stdout: ChildStdout,
    mut stderr: ChildStderr,
    cancel: CancellationToken,
) {
    let pid = child.id();
    let mut out = OutputCoalescer::new(min_interval);
    let mut err = OutputCoalescer::new(min_interval);
    let mut parser = match kind {
        SessionKind::Summarized => Some(SummaryParser::new()),
        SessionKind::Plain => None,
    };

    let mut stdout_buf = vec![0u8; READ_CHUNK_BYTES];
    let mut stderr_buf = vec![0u8; READ_CHUNK_BYTES];
    let mut stdout_open = true;
    let mut stderr_open = true;
    let mut termination_requested = false;
    let mut killer: Option<JoinHandle<()>> = None;

    while stdout_open || stderr_open {
        tokio::select! {
            read = stdout.read(&mut stdout_buf), if stdout_open => match read {
                Ok(0) => stdout_open = false,
                Ok(n) => {
                    let text = String::from_utf8_lossy(&stdout_buf[..n]);
                    if let Some(batch) = out.offer(&text) {
                        shared.events.output(id, &batch);
                        if let Some(parser) = parser.as_mut() {
                            parser.feed(&batch);
                            shared.status.update(id, parser.summary());
                        }
                    }
                }
                Err(e) => {
                    debug!(session = %id, error = %e, "stdout reader stopping on read error");
                    stdout_open = false;
                }
            },
            read = stderr.read(&mut stderr_buf), if stderr_open => match read {
                Ok(0) => stderr_open = false,
                Ok(n) => {
                    let text = String::from_utf8_lossy(&stderr_buf[..n]);
                    if let Some(batch) = err.offer(&text) {
                        shared.events.error(id, &batch);
                    }
                }
                Err(e) => {
                    debug!(session = %id, error = %e, "stderr reader stopping on read error");
                    stderr_open = false;
                }
            },
            () = cancel.cancelled(), if !termination_requested => {
                termination_requested = true;
                debug!(session = %id, pid, "termination requested");
                if let Some(pid) = pid {
                    killer = shutdown::request_termination(pid);
                }
            },
        }
    }

    let status = child.wait().await;
    if let Some(handle) = killer.take() {
        handle.abort();
    }

    // Flush the stderr backlog before the terminal event.
    let stderr_tail = err.flush();
    if !stderr_tail.is_empty() {
        shared.events.error(id, &stderr_tail);
    }

    // Stdout still buffered at exit rides in the exit payload; the parser
    // sees it here plus its own held-back partial line.
    let trailing = out.flush();
    if let Some(parser) = parser.as_mut() {
        if !trailing.is_empty() {
            parser.feed(&trailing);
        }
        parser.finish();
        shared.status.update(id, parser.summary());
    }

    let exit_code = match status {
        Ok(status) => status.code(),
        Err(ref e) => {
            warn!(session = %id, error = %e, "failed to reap child");
            None
        }
    };
    shared.events.exited(id, exit_code, &trailing);
    shared.remove_session(id);
    debug!(session = %id, ?exit_code, "session finished");
}
