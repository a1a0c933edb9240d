//! Process runtime for the xunit session backend.
//!
//! Spawns test-runner child processes, multiplexes their stdout/stderr
//! across concurrent sessions, coalesces bursty output so a slow editor UI
//! is never flooded, and feeds summarized sessions through the incremental
//! pass/fail parser from `xunit-core`. Consumers receive the three session
//! event shapes (`output`, `error`, `exit`) through the `SessionEvents`
//! port.

pub mod session;

// Re-export the session management surface
pub use session::{OutputCoalescer, SessionEventBroadcaster, SessionSupervisor};
