use glam::Vec2;

use crate::{Config, GameRng};

/// Paddle component - represents one player's paddle
#[derive(Debug, Clone, Copy)]
pub struct Paddle {
    pub side: u8, // 0 = left, 1 = right
    pub y: f32,   // Top edge, clamped to [0, arena_height - paddle_height]
}

impl Paddle {
    pub fn new(side: u8, y: f32) -> Self {
        Self { side, y }
    }
}

/// Ball component - the pong ball
#[derive(Debug, Clone, Copy)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self { pos, vel }
    }

    /// Re-serve from the arena center. `dir` picks the horizontal direction
    /// (±1); the vertical component gets a random sign and magnitude.
    pub fn reset(&mut self, config: &Config, dir: f32, rng: &mut GameRng) {
        use rand::Rng;
        self.pos = config.center();

        let vy_sign = if rng.0.gen_bool(0.5) { 1.0 } else { -1.0 };
        let vy = rng.0.gen_range(config.serve_vy_min..config.serve_vy_max);
        self.vel = Vec2::new(dir * config.ball_speed, vy_sign * vy);
    }
}

/// Movement intent for a paddle
#[derive(Debug, Clone, Copy, Default)]
pub struct PaddleIntent {
    pub dir: i8, // -1 = up, 0 = stop, 1 = down
}

impl PaddleIntent {
    pub fn new() -> Self {
        Self::default()
    }
}
