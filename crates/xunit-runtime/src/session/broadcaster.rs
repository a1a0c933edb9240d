//! Session event broadcasting for fan-out consumers.
//!
//! Hosts that want more than one consumer (a results window plus a status
//! bar, or SSE clients) subscribe here. The broadcaster implements the
//! `SessionEvents` port, so it plugs directly into a supervisor.

use tokio::sync::broadcast;
use tracing::debug;
use xunit_core::{SessionEvent, SessionEvents, SessionId};

/// Broadcast channel capacity for session events
const CHANNEL_CAPACITY: usize = 64;

/// Fan-out broadcaster for session events.
///
/// Constructed per host, not process-wide, so embedders and tests get
/// isolated channels.
pub struct SessionEventBroadcaster {
    sender: broadcast::Sender<SessionEvent>,
}

impl SessionEventBroadcaster {
    /// Create a new broadcaster
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Broadcast an event to all subscribers
    pub fn broadcast(&self, event: SessionEvent) {
        // Only send if there are receivers (avoid spam when nobody listens)
        if self.sender.receiver_count() > 0 {
            debug!(?event, "broadcasting session event");
            let _ = self.sender.send(event);
        }
    }

    /// Subscribe to session events
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    /// Get number of active subscribers
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for SessionEventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionEvents for SessionEventBroadcaster {
    fn output(&self, id: SessionId, text: &str) {
        self.broadcast(SessionEvent::Output {
            session_id: id,
            text: text.to_string(),
        });
    }

    fn error(&self, id: SessionId, text: &str) {
        self.broadcast(SessionEvent::Error {
            session_id: id,
            text: text.to_string(),
        });
    }

    fn exited(&self, id: SessionId, exit_code: Option<i32>, trailing: &str) {
        self.broadcast(SessionEvent::Exit {
            session_id: id,
            exit_code,
            text: trailing.to_string(),
        });
    }
}
