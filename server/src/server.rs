//! Connection-facing engine: queue handling, pairing, intent routing and
//! disconnect settlement. A transport adapter owns the sockets and calls
//! into this; the engine never touches the wire directly.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use game_core::Config;
use proto::{C2S, S2C};
use tracing::{debug, info, warn};

use crate::error::ServerError;
use crate::matchmaking::{MatchQueue, QueueEntry};
use crate::registry::SessionRegistry;
use crate::session::{Participant, Session};
use crate::transport::{ConnectionId, SharedConnection};

/// Engine tunables. Defaults mirror production cadence: 60 Hz ticks, a
/// snapshot every tick, a one second pre-match countdown and a five second
/// removal grace once a session has ended.
pub struct ServerConfig {
    pub game: Config,
    pub tick_interval: Duration,
    /// Broadcast a state snapshot every this-many ticks.
    pub snapshot_every: u32,
    pub start_delay: Duration,
    pub removal_grace: Duration,
    /// Fixed kernel seed; `None` draws a fresh seed per session.
    pub seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            game: Config::new(),
            tick_interval: Duration::from_micros(16_667),
            snapshot_every: 1,
            start_delay: Duration::from_secs(1),
            removal_grace: Duration::from_secs(5),
            seed: None,
        }
    }
}

/// The multiplayer engine. One instance serves every connection a transport
/// adapter hands it.
pub struct GameServer {
    config: ServerConfig,
    queue: Mutex<MatchQueue>,
    sessions: SessionRegistry,
}

impl GameServer {
    pub fn new(config: ServerConfig) -> Arc<Self> {
        Arc::new(Self {
            config,
            queue: Mutex::new(MatchQueue::new()),
            sessions: SessionRegistry::new(),
        })
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    pub fn queue_len(&self) -> usize {
        self.queue.lock().unwrap().len()
    }

    /// Decode and dispatch one client frame. Undecodable bytes are logged
    /// and dropped; the connection stays up.
    pub fn handle_message(self: &Arc<Self>, conn: &SharedConnection, bytes: &[u8]) {
        match C2S::from_bytes(bytes) {
            Ok(C2S::JoinQueue { display_name }) => {
                self.join_queue(conn, &display_name);
            }
            Ok(C2S::LeaveQueue) => self.leave_queue(conn),
            Ok(C2S::Input { dir }) => self.input(conn.id(), dir),
            Err(e) => debug!(conn = %conn.id(), error = %e, "ignoring undecodable frame"),
        }
    }

    /// Put a connection in the queue and pair it immediately when an
    /// opponent is already waiting. Returns the new session when a pairing
    /// happened.
    pub fn join_queue(
        self: &Arc<Self>,
        conn: &SharedConnection,
        display_name: &str,
    ) -> Option<Arc<Session>> {
        let name = if display_name.trim().is_empty() {
            format!("Player_{}", conn.id().0)
        } else {
            display_name.trim().to_string()
        };

        let pair = {
            let mut queue = self.queue.lock().unwrap();
            if queue.enqueue(Arc::clone(conn), name.clone()) {
                info!(conn = %conn.id(), name = %name, depth = queue.len(), "joined queue");
            } else {
                debug!(conn = %conn.id(), "already queued");
            }
            self.deliver(
                conn,
                &S2C::QueueJoined {
                    queue_size: queue.len() as u32,
                },
            );
            queue.dequeue_pair()
        };

        pair.map(|(first, second)| self.open_session(first, second))
    }

    /// Withdraw from matchmaking. Acked regardless of whether the
    /// connection was actually waiting.
    pub fn leave_queue(&self, conn: &SharedConnection) {
        if self.queue.lock().unwrap().remove(conn.id()) {
            info!(conn = %conn.id(), "left queue");
        }
        self.deliver(conn, &S2C::QueueLeft);
    }

    /// Route a movement intent to the sender's live session. Intents from
    /// connections without a session are dropped.
    pub fn input(&self, conn: ConnectionId, dir: i8) {
        match self.sessions.find_by_participant(conn) {
            Some(session) => session.set_intent(conn, dir),
            None => debug!(%conn, "input without a session"),
        }
    }

    /// Settle everything a vanished connection touched: its queue slot, its
    /// live session (opponent wins by forfeit) and, after the grace delay,
    /// the directory entry.
    pub fn disconnect(self: &Arc<Self>, conn: ConnectionId) {
        if self.queue.lock().unwrap().remove(conn) {
            info!(%conn, "removed from queue on disconnect");
        }

        let Some(session) = self.sessions.find_by_participant(conn) else {
            return;
        };
        session.forfeit(conn);

        let server = Arc::clone(self);
        let id = session.id().to_string();
        let grace = self.config.removal_grace;
        tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            server.sessions.remove(&id).await;
        });
    }

    fn open_session(self: &Arc<Self>, first: QueueEntry, second: QueueEntry) -> Arc<Session> {
        let seed = self.config.seed.unwrap_or_else(rand::random);
        let players = [first.display_name.clone(), second.display_name.clone()];
        let session = Session::new(
            self.config.game.clone(),
            seed,
            self.config.snapshot_every,
            [
                Participant {
                    conn: Arc::clone(&first.conn),
                    display_name: first.display_name,
                },
                Participant {
                    conn: Arc::clone(&second.conn),
                    display_name: second.display_name,
                },
            ],
        );
        self.sessions.register(Arc::clone(&session));
        info!(session = %session.id(), left = %players[0], right = %players[1], "match found");

        self.deliver(
            &first.conn,
            &S2C::MatchFound {
                session_id: session.id().to_string(),
                side: 0,
                opponent: players[1].clone(),
                players: players.clone(),
            },
        );
        self.deliver(
            &second.conn,
            &S2C::MatchFound {
                session_id: session.id().to_string(),
                side: 1,
                opponent: players[0].clone(),
                players,
            },
        );

        let starting = Arc::clone(&session);
        let tick_interval = self.config.tick_interval;
        let start_delay = self.config.start_delay;
        tokio::spawn(async move {
            tokio::time::sleep(start_delay).await;
            starting.start(tick_interval);
        });
        session
    }

    fn deliver(&self, conn: &SharedConnection, msg: &S2C) {
        let outcome = msg
            .to_bytes()
            .map_err(ServerError::from)
            .and_then(|bytes| conn.send_bytes(&bytes));
        if let Err(e) = outcome {
            warn!(conn = %conn.id(), error = %e, "failed to deliver message");
        }
    }
}
