//! One live match: authoritative kernel state, tick scheduling, result
//! delivery.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use game_core::{
    create_ball, create_paddle, Ball, Config, Events, GameRng, NetQueue, Paddle, Score, Time,
};
use hecs::World;
use proto::{BallWire, PaddleSpec, PaddleWire, S2C, StateSnapshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::transport::{ConnectionId, SharedConnection};

/// Session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Both seats filled, first tick still pending.
    Forming,
    /// Tick task live, state flowing.
    Running,
    /// Result delivered; the session only waits for directory removal.
    Ended,
}

/// One seat in a session.
pub struct Participant {
    pub conn: SharedConnection,
    pub display_name: String,
}

/// Everything a tick mutates, behind the session lock.
struct Inner {
    world: World,
    time: Time,
    score: Score,
    events: Events,
    net_queue: NetQueue,
    rng: GameRng,
    /// Latest buffered movement intent per side; folded into the kernel at
    /// the next tick. Last write between ticks wins.
    intents: [i8; 2],
    participants: [Participant; 2],
    phase: SessionPhase,
    last_tick: Option<Instant>,
    tick: u32,
}

impl Inner {
    fn side_of(&self, conn: ConnectionId) -> Option<u8> {
        self.participants
            .iter()
            .position(|p| p.conn.id() == conn)
            .map(|i| i as u8)
    }

    fn name_of(&self, side: u8) -> String {
        let name = &self.participants[side as usize].display_name;
        if name.trim().is_empty() {
            format!("Player {}", side + 1)
        } else {
            name.clone()
        }
    }

    /// Send an encoded message to both seats. A failed send is logged and
    /// skipped so the remaining participant keeps receiving.
    fn broadcast(&self, msg: &S2C) {
        match msg.to_bytes() {
            Ok(bytes) => {
                for participant in &self.participants {
                    if let Err(e) = participant.conn.send_bytes(&bytes) {
                        let conn = participant.conn.id();
                        debug!(%conn, error = %e, "dropping undeliverable message");
                    }
                }
            }
            Err(e) => warn!(error = %e, "failed to encode broadcast"),
        }
    }

    fn snapshot(&mut self, config: &Config) -> StateSnapshot {
        let mut ball = BallWire {
            x: config.arena_width / 2.0,
            y: config.arena_height / 2.0,
            vx: 0.0,
            vy: 0.0,
        };
        for (_, b) in self.world.query_mut::<&Ball>() {
            ball = BallWire {
                x: b.pos.x,
                y: b.pos.y,
                vx: b.vel.x,
                vy: b.vel.y,
            };
        }

        let spawn_y = config.paddle_spawn_y();
        let mut paddles = [
            PaddleWire { side: 0, y: spawn_y },
            PaddleWire { side: 1, y: spawn_y },
        ];
        for (_, p) in self.world.query_mut::<&Paddle>() {
            if let Some(slot) = paddles.get_mut(p.side as usize) {
                slot.y = p.y;
            }
        }

        StateSnapshot {
            ball,
            paddles,
            paddle: PaddleSpec {
                w: config.paddle_width,
                h: config.paddle_height,
            },
            scores: [self.score.left, self.score.right],
            width: config.arena_width,
            height: config.arena_height,
        }
    }
}

/// A single authoritative match between two connections.
///
/// All mutable state sits behind one mutex and is only touched from
/// synchronous sections; the lock is never held across an await.
pub struct Session {
    id: String,
    config: Config,
    snapshot_every: u32,
    inner: Mutex<Inner>,
    tick_task: Mutex<Option<JoinHandle<()>>>,
}

impl Session {
    /// Create a session with both seats filled and the opening serve loaded,
    /// heading toward the right side.
    pub fn new(
        config: Config,
        seed: u64,
        snapshot_every: u32,
        participants: [Participant; 2],
    ) -> Arc<Self> {
        let mut world = World::new();
        let mut rng = GameRng::new(seed);
        create_ball(
            &mut world,
            config.center(),
            glam::Vec2::new(config.ball_speed, 0.0),
        );
        for (_, ball) in world.query_mut::<&mut Ball>() {
            ball.reset(&config, 1.0, &mut rng);
        }
        create_paddle(&mut world, 0, config.paddle_spawn_y());
        create_paddle(&mut world, 1, config.paddle_spawn_y());

        Arc::new(Session {
            id: Uuid::new_v4().to_string(),
            config,
            snapshot_every: snapshot_every.max(1),
            inner: Mutex::new(Inner {
                world,
                time: Time::default(),
                score: Score::new(),
                events: Events::new(),
                net_queue: NetQueue::new(),
                rng,
                intents: [0; 2],
                participants,
                phase: SessionPhase::Forming,
                last_tick: None,
                tick: 0,
            }),
            tick_task: Mutex::new(None),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn phase(&self) -> SessionPhase {
        self.locked().phase
    }

    pub fn scores(&self) -> [u8; 2] {
        let inner = self.locked();
        [inner.score.left, inner.score.right]
    }

    pub fn has_participant(&self, conn: ConnectionId) -> bool {
        self.locked().side_of(conn).is_some()
    }

    /// Buffer a movement intent from a participant. Ignored unless the
    /// session is running; the stored value is clamped to {-1, 0, 1}.
    pub fn set_intent(&self, conn: ConnectionId, dir: i8) {
        let mut inner = self.locked();
        if inner.phase != SessionPhase::Running {
            return;
        }
        if let Some(side) = inner.side_of(conn) {
            inner.intents[side as usize] = dir.clamp(-1, 1);
        }
    }

    /// Flip a forming session to running without scheduling anything. Pair
    /// with [`Session::advance`] when the embedder drives ticks from its own
    /// timer; [`Session::start`] does both for tokio environments. Returns
    /// false if the session is past forming.
    pub fn begin(&self) -> bool {
        let mut inner = self.locked();
        if inner.phase != SessionPhase::Forming {
            return false;
        }
        inner.phase = SessionPhase::Running;
        inner.last_tick = Some(Instant::now());
        true
    }

    /// Begin ticking on a spawned interval task. Does nothing unless the
    /// session is still forming, so a forfeit during the pre-match delay
    /// wins the race.
    pub fn start(self: &Arc<Self>, tick_interval: Duration) {
        if !self.begin() {
            return;
        }
        info!(session = %self.id, "session started");

        let session = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(tick_interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if !session.advance() {
                    break;
                }
            }
            debug!(session = %session.id, "tick task finished");
        });
        *self.tick_task.lock().unwrap() = Some(handle);
    }

    /// Run one authoritative tick: fold buffered intents into the kernel,
    /// advance physics by the real elapsed time, then publish. The tick
    /// that decides the match broadcasts the result and no further
    /// snapshot. Returns false once the session has ended.
    pub fn advance(&self) -> bool {
        let mut guard = self.locked();
        if guard.phase != SessionPhase::Running {
            return false;
        }

        let now = Instant::now();
        let dt = match guard.last_tick {
            Some(last) => (now - last).as_secs_f32(),
            None => 0.0,
        };
        guard.last_tick = Some(now);

        let inner = &mut *guard;
        inner.net_queue.push_input(0, inner.intents[0]);
        inner.net_queue.push_input(1, inner.intents[1]);
        inner.time.dt = dt;

        let winner = game_core::step(
            &mut inner.world,
            &mut inner.time,
            &self.config,
            &mut inner.score,
            &mut inner.events,
            &mut inner.net_queue,
            &mut inner.rng,
        );

        inner.tick = inner.tick.wrapping_add(1);
        match winner {
            Some(side) => {
                self.finish(inner, side);
                false
            }
            None => {
                if inner.tick % self.snapshot_every == 0 {
                    let snapshot = inner.snapshot(&self.config);
                    inner.broadcast(&S2C::State(snapshot));
                }
                true
            }
        }
    }

    /// Force-end with the given winner. Idempotent.
    pub fn end_with_winner(&self, winner: u8) {
        let mut guard = self.locked();
        self.finish(&mut guard, winner);
    }

    /// End the match in favor of the opponent of `leaver`, then announce the
    /// departure. Returns true when this call ended the session; a repeat
    /// call or an unknown connection is a no-op.
    pub fn forfeit(&self, leaver: ConnectionId) -> bool {
        let mut guard = self.locked();
        let inner = &mut *guard;
        let Some(side) = inner.side_of(leaver) else {
            return false;
        };
        if inner.phase == SessionPhase::Ended {
            return false;
        }

        let winner = if side == 0 { 1 } else { 0 };
        let disconnected = inner.name_of(side);
        self.finish(inner, winner);
        let msg = S2C::PlayerDisconnected {
            disconnected,
            winner: inner.name_of(winner),
        };
        inner.broadcast(&msg);
        info!(session = %self.id, side, "participant left, opponent wins by forfeit");
        true
    }

    /// Cancel the tick task and wait for it to settle. No tick runs after
    /// this returns.
    pub async fn stop(&self) {
        let handle = self.tick_task.lock().unwrap().take();
        if let Some(handle) = handle {
            handle.abort();
            let _ = handle.await;
        }
    }

    fn locked(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    fn finish(&self, inner: &mut Inner, winner: u8) {
        if inner.phase == SessionPhase::Ended {
            return;
        }
        inner.phase = SessionPhase::Ended;
        inner.score.clamp_to(self.config.win_score);

        let loser = if winner == 0 { 1 } else { 0 };
        let scores = [inner.score.left, inner.score.right];
        let msg = S2C::GameOver {
            winner: inner.name_of(winner),
            loser: inner.name_of(loser),
            winner_side: winner,
            scores,
            final_score: format!("{}-{}", scores[winner as usize], scores[loser as usize]),
        };
        inner.broadcast(&msg);
        info!(session = %self.id, winner, ?scores, "match over");
    }
}
