//! Child-process session supervision with coalesced output streaming.
//!
//! # Structure
//!
//! - `SessionSupervisor` - spawning, tracking and terminating sessions
//! - `OutputCoalescer` - time-gated batching of pipe output
//! - `SessionEventBroadcaster` - fan-out of session events to subscribers
//! - `stream` - per-session read/emit pump (internal)
//! - `shutdown` - SIGTERM → SIGKILL escalation (internal)

mod broadcaster;
mod coalescer;
mod shutdown;
mod stream;
mod supervisor;
mod types;

// Re-export commonly used types
pub use broadcaster::SessionEventBroadcaster;
pub use coalescer::OutputCoalescer;
pub use supervisor::SessionSupervisor;
