//! Shared types for session tracking.

use tokio_util::sync::CancellationToken;
use xunit_core::SessionInfo;

/// Supervisor-side record of a live session.
///
/// The `Child` handle is owned by the session's pump task; the record only
/// carries what `terminate` and the query surface need.
pub(crate) struct SessionRecord {
    pub(crate) info: SessionInfo,
    pub(crate) cancel: CancellationToken,
}
