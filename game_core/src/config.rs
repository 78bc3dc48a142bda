use glam::Vec2;

/// Game tuning parameters for Pong
#[derive(Debug, Clone, Copy)]
pub struct Params;

impl Params {
    // Arena
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 500.0;

    // Paddle
    pub const PADDLE_WIDTH: f32 = 6.0;
    pub const PADDLE_HEIGHT: f32 = 88.0;
    pub const PADDLE_SPEED: f32 = 400.0; // px per second
    pub const PADDLE_INSET: f32 = 5.0; // gap between wall and paddle face

    // Ball (authoritative tick units: px per second)
    pub const BALL_RADIUS: f32 = 6.0;
    pub const BALL_SPEED: f32 = 200.0;
    pub const SERVE_VY_MIN: f32 = 100.0;
    pub const SERVE_VY_MAX: f32 = 200.0;
    pub const SPEED_UP_FACTOR: f32 = 1.05; // multiply |vx| on paddle hit
    pub const SPEED_UP_ADD: f32 = 0.0;
    pub const SPIN_GAIN: f32 = 200.0; // vy added per unit of hit offset

    // Local presentation units: ball moves px per frame, paddles px per second
    pub const LOCAL_PADDLE_SPEED: f32 = 360.0;
    pub const LOCAL_BALL_SPEED: f32 = 3.0;
    pub const LOCAL_SERVE_VY_MIN: f32 = 2.0;
    pub const LOCAL_SERVE_VY_MAX: f32 = 4.0;
    pub const LOCAL_SPEED_UP_FACTOR: f32 = 1.0;
    pub const LOCAL_SPEED_UP_ADD: f32 = 0.2;
    pub const LOCAL_SPIN_GAIN: f32 = 2.0;

    // Score
    pub const WIN_SCORE: u8 = 6; // First to 6 wins, hard cap

    // Physics
    pub const FIXED_DT: f32 = 0.0166; // ~60 Hz
    pub const MAX_DT: f32 = 0.1; // Clamp to prevent large jumps
}

/// Game configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub arena_width: f32,
    pub arena_height: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_speed: f32,
    pub paddle_inset: f32,
    pub ball_radius: f32,
    pub ball_speed: f32,
    pub serve_vy_min: f32,
    pub serve_vy_max: f32,
    pub speed_up_factor: f32,
    pub speed_up_add: f32,
    pub spin_gain: f32,
    pub win_score: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            arena_width: Params::ARENA_WIDTH,
            arena_height: Params::ARENA_HEIGHT,
            paddle_width: Params::PADDLE_WIDTH,
            paddle_height: Params::PADDLE_HEIGHT,
            paddle_speed: Params::PADDLE_SPEED,
            paddle_inset: Params::PADDLE_INSET,
            ball_radius: Params::BALL_RADIUS,
            ball_speed: Params::BALL_SPEED,
            serve_vy_min: Params::SERVE_VY_MIN,
            serve_vy_max: Params::SERVE_VY_MAX,
            speed_up_factor: Params::SPEED_UP_FACTOR,
            speed_up_add: Params::SPEED_UP_ADD,
            spin_gain: Params::SPIN_GAIN,
            win_score: Params::WIN_SCORE,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset for the local driver: the ball advances in px per frame while
    /// paddles stay in px per second.
    pub fn local() -> Self {
        Self {
            paddle_speed: Params::LOCAL_PADDLE_SPEED,
            ball_speed: Params::LOCAL_BALL_SPEED,
            serve_vy_min: Params::LOCAL_SERVE_VY_MIN,
            serve_vy_max: Params::LOCAL_SERVE_VY_MAX,
            speed_up_factor: Params::LOCAL_SPEED_UP_FACTOR,
            speed_up_add: Params::LOCAL_SPEED_UP_ADD,
            spin_gain: Params::LOCAL_SPIN_GAIN,
            ..Self::default()
        }
    }

    /// X of the paddle's left edge for a side
    pub fn paddle_x(&self, side: u8) -> f32 {
        if side == 0 {
            self.paddle_inset // Left paddle
        } else {
            self.arena_width - self.paddle_width - self.paddle_inset // Right paddle
        }
    }

    /// Clamp a paddle's top edge so the paddle stays fully inside the arena
    pub fn clamp_paddle_y(&self, y: f32) -> f32 {
        y.clamp(0.0, self.arena_height - self.paddle_height)
    }

    /// Centered spawn Y for a paddle's top edge
    pub fn paddle_spawn_y(&self) -> f32 {
        (self.arena_height - self.paddle_height) / 2.0
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.arena_width / 2.0, self.arena_height / 2.0)
    }
}
