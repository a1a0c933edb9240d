//! Core domain types and port definitions for the xunit session backend.
//!
//! This crate holds everything the process runtime and its consumers share:
//! spawn-request and session DTOs, the session event union, the incremental
//! pass/fail summary parser, and the port traits transports implement. It
//! contains no process or OS concerns; those live in `xunit-runtime`.

pub mod domain;
pub mod events;
pub mod ports;

// Re-export the domain surface
pub use domain::{
    DEFAULT_MIN_EMIT_INTERVAL_MS, SessionId, SessionInfo, SessionKind, SpawnRequest,
    SummaryParser, TestSummary,
};

// Re-export event types and the event port
pub use events::{NoopSessionEvents, SessionEvent, SessionEvents};

// Re-export remaining ports and the error taxonomy
pub use ports::{NoopStatusSink, SessionError, SpawnError, StatusSink};
