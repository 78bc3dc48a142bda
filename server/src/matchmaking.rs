//! FIFO matchmaking: two waiting connections make a match.

use std::collections::VecDeque;
use std::time::Instant;

use crate::transport::{ConnectionId, SharedConnection};

/// A connection waiting for an opponent.
pub struct QueueEntry {
    pub conn: SharedConnection,
    pub display_name: String,
    pub enqueued_at: Instant,
}

/// Strict arrival-order queue. No skill bucketing, no partial pairing.
#[derive(Default)]
pub struct MatchQueue {
    waiting: VecDeque<QueueEntry>,
}

impl MatchQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection to the back of the queue. Re-joining while already
    /// waiting neither duplicates the entry nor resets its position; returns
    /// whether a new entry was created.
    pub fn enqueue(&mut self, conn: SharedConnection, display_name: String) -> bool {
        if self.contains(conn.id()) {
            return false;
        }
        self.waiting.push_back(QueueEntry {
            conn,
            display_name,
            enqueued_at: Instant::now(),
        });
        true
    }

    /// Pop the two earliest entries, or nothing while fewer than two wait.
    pub fn dequeue_pair(&mut self) -> Option<(QueueEntry, QueueEntry)> {
        if self.waiting.len() < 2 {
            return None;
        }
        let first = self.waiting.pop_front()?;
        let second = self.waiting.pop_front()?;
        Some((first, second))
    }

    /// Withdraw a waiting connection. Returns whether it was present.
    pub fn remove(&mut self, conn: ConnectionId) -> bool {
        let before = self.waiting.len();
        self.waiting.retain(|entry| entry.conn.id() != conn);
        self.waiting.len() != before
    }

    pub fn contains(&self, conn: ConnectionId) -> bool {
        self.waiting.iter().any(|entry| entry.conn.id() == conn)
    }

    pub fn len(&self) -> usize {
        self.waiting.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waiting.is_empty()
    }
}
