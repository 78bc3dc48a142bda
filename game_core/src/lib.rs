pub mod ai;
pub mod components;
pub mod config;
pub mod resources;
pub mod systems;

pub use components::*;
pub use config::*;
pub use resources::*;

use hecs::World;
use systems::*;

/// Run the deterministic Pong game simulation. Returns the winning side if
/// this step pushed a score to the win threshold.
#[allow(clippy::too_many_arguments)]
pub fn step(
    world: &mut World,
    time: &mut Time,
    config: &Config,
    score: &mut Score,
    events: &mut Events,
    net_queue: &mut NetQueue,
    rng: &mut GameRng,
) -> Option<u8> {
    // Clamp dt to prevent large jumps
    let clamped_dt = time.dt.min(Params::MAX_DT);

    // Clear events at start of step
    events.clear();

    let mut winner = None;

    // Fixed micro-steps for stable physics
    let mut remaining_dt = clamped_dt;
    while remaining_dt > 0.0 {
        let step_dt = remaining_dt.min(Params::FIXED_DT);
        remaining_dt -= step_dt;

        let step_time = Time {
            dt: step_dt,
            now: time.now + (clamped_dt - remaining_dt),
        };

        // 1. Ingest inputs (apply to paddle intents)
        ingest_inputs(world, net_queue);

        // 2. Move paddles based on intents
        move_paddles(world, &step_time, config);

        // 3. Move ball
        move_ball(world, &step_time);

        // 4. Check collisions (ball vs paddles, walls)
        check_collisions(world, config, events);

        // 5. Check scoring (ball exited arena)
        winner = check_scoring(world, config, score, events, rng);
        if winner.is_some() {
            break;
        }
    }

    // Update time
    time.now += clamped_dt;
    winner
}

/// Helper to create a paddle entity
pub fn create_paddle(world: &mut World, side: u8, y: f32) -> hecs::Entity {
    world.spawn((Paddle::new(side, y), PaddleIntent::new()))
}

/// Helper to create the ball entity
pub fn create_ball(world: &mut World, pos: glam::Vec2, vel: glam::Vec2) -> hecs::Entity {
    world.spawn((Ball::new(pos, vel),))
}
