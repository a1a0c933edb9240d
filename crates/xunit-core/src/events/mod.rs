//! Session lifecycle events delivered to the editor UI.
//!
//! This module is the single source of truth for the three event shapes a
//! session can produce. The exit event is always the final event for its
//! session id.
//!
//! # Wire Format
//!
//! Events are serialized with a `type` tag for frontend compatibility:
//!
//! ```json
//! { "type": "output", "sessionId": 3, "text": "12 tests passed\n" }
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::SessionId;

/// Event payloads produced by a session supervisor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SessionEvent {
    /// Coalesced stdout text.
    Output {
        #[serde(rename = "sessionId")]
        session_id: SessionId,
        text: String,
    },

    /// Coalesced stderr text.
    Error {
        #[serde(rename = "sessionId")]
        session_id: SessionId,
        text: String,
    },

    /// The process exited. `text` holds stdout that was still buffered when
    /// the process exited; it is delivered here and nowhere else.
    Exit {
        #[serde(rename = "sessionId")]
        session_id: SessionId,
        /// `None` when the process was ended by a signal.
        #[serde(rename = "exitCode")]
        exit_code: Option<i32>,
        text: String,
    },
}

/// Port for delivering session events to a consumer.
///
/// This trait decouples the session runtime from transport-specific
/// delivery (editor bridge, SSE, logging, tests).
///
/// # Design
///
/// - **Object-safe**: `&self` methods for dynamic dispatch via `Arc<dyn SessionEvents>`
/// - **Fire-and-forget**: methods don't return `Result`; implementations handle
///   their own failures
/// - Calls arrive from the owning session's task, so a slow or faulty
///   consumer only stalls its own session
pub trait SessionEvents: Send + Sync {
    /// Coalesced stdout text for a session.
    fn output(&self, id: SessionId, text: &str);

    /// Coalesced stderr text for a session.
    fn error(&self, id: SessionId, text: &str);

    /// Final event for a session. `trailing` holds stdout that was still
    /// buffered when the process exited, delivered exactly once here.
    fn exited(&self, id: SessionId, exit_code: Option<i32>, trailing: &str);
}

/// `SessionEvents` implementation that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSessionEvents;

impl SessionEvents for NoopSessionEvents {
    fn output(&self, _id: SessionId, _text: &str) {}
    fn error(&self, _id: SessionId, _text: &str) {}
    fn exited(&self, _id: SessionId, _exit_code: Option<i32>, _trailing: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_event_serialization() {
        let event = SessionEvent::Output {
            session_id: SessionId::new(7),
            text: "12 tests passed\n".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"output\""));
        assert!(json.contains("\"sessionId\":7"));
    }

    #[test]
    fn exit_event_serialization() {
        let event = SessionEvent::Exit {
            session_id: SessionId::new(2),
            exit_code: Some(0),
            text: String::new(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"exit\""));
        assert!(json.contains("\"exitCode\":0"));
    }

    #[test]
    fn signal_exit_round_trips() {
        let event = SessionEvent::Exit {
            session_id: SessionId::new(9),
            exit_code: None,
            text: "tail".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: SessionEvent = serde_json::from_str(&json).unwrap();
        match back {
            SessionEvent::Exit {
                session_id,
                exit_code,
                text,
            } => {
                assert_eq!(session_id, SessionId::new(9));
                assert_eq!(exit_code, None);
                assert_eq!(text, "tail");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
