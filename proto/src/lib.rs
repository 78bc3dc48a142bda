//! Network protocol for the Pong match server
//!
//! Uses postcard for efficient binary serialization

use postcard::{from_bytes, to_allocvec};

// ============================================================================
// Shared payloads
// ============================================================================

/// Ball position and velocity on the wire
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct BallWire {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
}

/// One paddle's position on the wire
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct PaddleWire {
    pub side: u8, // 0 = left, 1 = right
    pub y: f32,   // top edge
}

/// Paddle dimensions, so clients don't hardcode them
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct PaddleSpec {
    pub w: f32,
    pub h: f32,
}

/// Authoritative state snapshot, published every tick while a match runs
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct StateSnapshot {
    pub ball: BallWire,
    pub paddles: [PaddleWire; 2],
    pub paddle: PaddleSpec,
    pub scores: [u8; 2],
    pub width: f32,
    pub height: f32,
}

// ============================================================================
// C2S Messages (Client to Server)
// ============================================================================

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum C2S {
    /// Enter the matchmaking queue
    JoinQueue { display_name: String },

    /// Withdraw from the matchmaking queue
    LeaveQueue,

    /// Paddle input: -1 = up, 0 = stop, 1 = down
    Input { dir: i8 },
}

// ============================================================================
// S2C Messages (Server to Client)
// ============================================================================

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum S2C {
    /// Queue entry acknowledged
    QueueJoined { queue_size: u32 },

    /// Queue withdrawal acknowledged
    QueueLeft,

    /// A match was made; `side` is the receiver's paddle
    MatchFound {
        session_id: String,
        side: u8, // 0 = left, 1 = right
        opponent: String,
        players: [String; 2],
    },

    /// Authoritative state snapshot
    State(StateSnapshot),

    /// Final result, sent exactly once per session
    GameOver {
        winner: String,
        loser: String,
        winner_side: u8,
        scores: [u8; 2],
        final_score: String, // "<winner score>-<loser score>"
    },

    /// The other participant dropped; the named winner takes the match
    PlayerDisconnected { disconnected: String, winner: String },
}

// ============================================================================
// Serialization Helpers
// ============================================================================

impl C2S {
    /// Serialize C2S message to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, postcard::Error> {
        to_allocvec(self)
    }

    /// Deserialize C2S message from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, postcard::Error> {
        from_bytes(bytes)
    }
}

impl S2C {
    /// Serialize S2C message to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, postcard::Error> {
        to_allocvec(self)
    }

    /// Deserialize S2C message from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, postcard::Error> {
        from_bytes(bytes)
    }
}
