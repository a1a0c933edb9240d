//! Graceful termination with SIGTERM → SIGKILL escalation.
//!
//! The pump task owns the `Child` handle, so termination is signalled by
//! pid: an immediate SIGTERM, then a detached escalation task that delivers
//! SIGKILL once the grace period lapses. ESRCH at any stage means the
//! process is already gone and is not an error. Windows has no SIGTERM
//! equivalent, so the process is killed outright.

use tokio::task::JoinHandle;

#[cfg(unix)]
use std::time::Duration;
#[cfg(unix)]
use tokio::time::sleep;
#[cfg(unix)]
use tracing::debug;

/// Grace period between SIGTERM and SIGKILL.
#[cfg(unix)]
const KILL_GRACE: Duration = Duration::from_secs(5);

/// Request termination of `pid`, escalating to a hard kill after the grace
/// period. Advisory: the caller keeps draining output until the process
/// actually exits, and should abort the returned escalation task once the
/// child has been reaped.
pub(crate) fn request_termination(pid: u32) -> Option<JoinHandle<()>> {
    #[cfg(unix)]
    {
        use nix::sys::signal::Signal;

        if !signal_process(pid, Signal::SIGTERM) {
            return None;
        }
        Some(tokio::spawn(async move {
            sleep(KILL_GRACE).await;
            signal_process(pid, Signal::SIGKILL);
        }))
    }

    #[cfg(not(unix))]
    {
        Some(tokio::spawn(async move {
            let _ = tokio::process::Command::new("taskkill")
                .args(["/PID", &pid.to_string(), "/T", "/F"])
                .output()
                .await;
        }))
    }
}

#[cfg(unix)]
fn signal_process(pid: u32, signal: nix::sys::signal::Signal) -> bool {
    use nix::errno::Errno;
    use nix::unistd::Pid;

    match nix::sys::signal::kill(Pid::from_raw(pid as i32), signal) {
        Ok(()) => true,
        Err(Errno::ESRCH) => {
            debug!(pid, "process already gone");
            false
        }
        Err(e) => {
            debug!(pid, error = %e, "failed to signal process");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[cfg(unix)]
    async fn termination_ends_a_sleeping_process() {
        let mut child = tokio::process::Command::new("/bin/sleep")
            .arg("30")
            .spawn()
            .expect("failed to spawn sleep");
        let pid = child.id().expect("child has no pid");

        let killer = request_termination(pid);
        let status = tokio::time::timeout(Duration::from_secs(8), child.wait())
            .await
            .expect("child did not exit")
            .expect("wait failed");
        assert!(!status.success());
        if let Some(handle) = killer {
            handle.abort();
        }
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn terminating_an_exited_process_is_harmless() {
        let mut child = tokio::process::Command::new("/bin/echo")
            .arg("done")
            .spawn()
            .expect("failed to spawn echo");
        let pid = child.id().expect("child has no pid");
        child.wait().await.expect("wait failed");

        // Pid has been reaped; signalling must not panic.
        let killer = request_termination(pid);
        if let Some(handle) = killer {
            handle.abort();
        }
    }
}
