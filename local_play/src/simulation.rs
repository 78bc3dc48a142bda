//! Frame-stepped local match.
//!
//! This mode was tuned against a presentation loop, so it keeps that loop's
//! unit split: the ball advances by its velocity once per frame while the
//! paddles move in pixels per second scaled by the frame delta. The kernel
//! systems run in the same order every frame, with the bot slotted between
//! collision and scoring.

use game_core::ai::{drive_paddle, AiConfig, AiState};
use game_core::systems::{check_collisions, check_scoring, ingest_inputs, move_ball, move_paddles};
use game_core::{
    create_ball, create_paddle, Ball, Config, Events, GameRng, NetQueue, Paddle, Score, Time,
};
use hecs::World;

/// Frame clamp so a backgrounded driver does not teleport the ball on resume.
const MAX_FRAME_DT: f32 = 0.05;

/// Who sits on the right side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opponent {
    /// Second player on the same keyboard.
    Human,
    /// Built-in bot.
    Bot,
}

/// A match on one machine.
pub struct LocalMatch {
    world: World,
    config: Config,
    time: Time,
    score: Score,
    events: Events,
    net_queue: NetQueue,
    rng: GameRng,
    opponent: Opponent,
    ai: Option<(AiConfig, AiState)>,
    winner: Option<u8>,
}

impl LocalMatch {
    pub fn new(seed: u64, opponent: Opponent) -> Self {
        let config = Config::local();
        let mut world = World::new();
        // The opening ball heads for the right side with a fixed downward
        // drift; only later serves draw a random vertical speed
        create_ball(
            &mut world,
            config.center(),
            glam::Vec2::new(config.ball_speed, 3.0),
        );
        create_paddle(&mut world, 0, config.paddle_spawn_y());
        create_paddle(&mut world, 1, config.paddle_spawn_y());

        let ai = match opponent {
            Opponent::Bot => {
                let ai_config = AiConfig::default();
                let ai_state = AiState::new(&config, &ai_config);
                Some((ai_config, ai_state))
            }
            Opponent::Human => None,
        };

        Self {
            world,
            config,
            time: Time::default(),
            score: Score::new(),
            events: Events::new(),
            net_queue: NetQueue::new(),
            rng: GameRng::new(seed),
            opponent,
            ai,
            winner: None,
        }
    }

    /// Advance one animation frame. `dt_seconds` scales paddle travel and is
    /// clamped per frame; the ball always advances by one frame's velocity.
    /// In bot mode `right_dir` is ignored. Returns the winner's name when
    /// this frame decided the match; afterwards the state is frozen.
    pub fn step_frame(
        &mut self,
        dt_seconds: f32,
        left_dir: i8,
        right_dir: i8,
    ) -> Option<&'static str> {
        if self.winner.is_some() {
            return None;
        }

        let dt = dt_seconds.clamp(0.0, MAX_FRAME_DT);
        self.events.clear();

        self.net_queue.push_input(0, left_dir);
        if self.opponent == Opponent::Human {
            self.net_queue.push_input(1, right_dir);
        }
        ingest_inputs(&mut self.world, &mut self.net_queue);

        let paddle_time = Time {
            dt,
            now: self.time.now,
        };
        move_paddles(&mut self.world, &paddle_time, &self.config);

        // Velocity is already in px per frame
        let frame_time = Time {
            dt: 1.0,
            now: self.time.now,
        };
        move_ball(&mut self.world, &frame_time);
        check_collisions(&mut self.world, &self.config, &mut self.events);

        if let Some((ai_config, ai_state)) = &mut self.ai {
            drive_paddle(
                &mut self.world,
                &self.config,
                ai_config,
                ai_state,
                &mut self.rng,
            );
        }

        let winner = check_scoring(
            &mut self.world,
            &self.config,
            &mut self.score,
            &mut self.events,
            &mut self.rng,
        );
        self.time.now += dt;

        if let Some(side) = winner {
            self.winner = Some(side);
            return Some(self.winner_name(side));
        }
        None
    }

    /// Fresh rally state for a rematch: scores, paddles and ball return to
    /// their spawns while the random stream carries on.
    pub fn reset(&mut self) {
        self.score = Score::new();
        self.winner = None;
        self.net_queue.clear();
        self.events.clear();
        self.time = Time::default();
        if let Some((ai_config, ai_state)) = &mut self.ai {
            *ai_state = AiState::new(&self.config, ai_config);
        }
        for (_entity, paddle) in self.world.query_mut::<&mut Paddle>() {
            paddle.y = self.config.paddle_spawn_y();
        }
        for (_entity, ball) in self.world.query_mut::<&mut Ball>() {
            ball.pos = self.config.center();
            ball.vel = glam::Vec2::new(self.config.ball_speed, 3.0);
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn opponent(&self) -> Opponent {
        self.opponent
    }

    pub fn scores(&self) -> [u8; 2] {
        [self.score.left, self.score.right]
    }

    pub fn winner(&self) -> Option<&'static str> {
        self.winner.map(|side| self.winner_name(side))
    }

    /// Ball position and velocity, for rendering.
    pub fn ball(&self) -> (glam::Vec2, glam::Vec2) {
        let mut query = self.world.query::<&Ball>();
        query
            .iter()
            .next()
            .map(|(_entity, ball)| (ball.pos, ball.vel))
            .unwrap_or((self.config.center(), glam::Vec2::ZERO))
    }

    /// Top edge of a side's paddle.
    pub fn paddle_y(&self, side: u8) -> f32 {
        let mut query = self.world.query::<&Paddle>();
        query
            .iter()
            .find(|(_entity, paddle)| paddle.side == side)
            .map(|(_entity, paddle)| paddle.y)
            .unwrap_or_else(|| self.config.paddle_spawn_y())
    }

    fn winner_name(&self, side: u8) -> &'static str {
        if side == 0 {
            "Player 1"
        } else if self.opponent == Opponent::Bot {
            "Bot"
        } else {
            "Player 2"
        }
    }
}
