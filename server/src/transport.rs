//! Seam between the engine and whatever carries bytes to a real peer
//! (websocket adapter, in-process channel, test double).

use std::fmt;
use std::sync::Arc;

use crate::error::Result;

/// Opaque identifier for one connected peer. Stable for the lifetime of the
/// connection and never reused while that connection is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Outbound half of a peer connection.
///
/// Implementations must not block: a slow peer must never stall a session
/// tick. Failures are reported, not retried; the engine logs them and keeps
/// serving the remaining participants.
pub trait Connection: Send + Sync {
    fn id(&self) -> ConnectionId;
    fn send_bytes(&self, bytes: &[u8]) -> Result<()>;
}

pub type SharedConnection = Arc<dyn Connection>;
