use crate::{Ball, Config, Events, GameRng, Score};
use hecs::World;

/// Check if the ball fully left the arena (scoring). Returns the winning side
/// when this point reaches the win threshold.
pub fn check_scoring(
    world: &mut World,
    config: &Config,
    score: &mut Score,
    events: &mut Events,
    rng: &mut GameRng,
) -> Option<u8> {
    let mut winner = None;

    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        let exited_left = ball.pos.x + config.ball_radius < 0.0;
        let exited_right = ball.pos.x - config.ball_radius > config.arena_width;
        if !exited_left && !exited_right {
            continue;
        }

        // Terminal matches award no further points
        if score.has_winner(config.win_score).is_some() {
            continue;
        }

        if exited_left {
            // Right player scores
            score.increment_right();
            events.right_scored = true;
        } else {
            // Left player scores
            score.increment_left();
            events.left_scored = true;
        }
        score.clamp_to(config.win_score);

        if let Some(side) = score.has_winner(config.win_score) {
            // Match over: freeze the ball where it ended up
            ball.vel = glam::Vec2::ZERO;
            winner = Some(side);
        } else {
            // Serve toward the side that just conceded
            let dir = if exited_left { -1.0 } else { 1.0 };
            ball.reset(config, dir, rng);
        }
    }

    winner
}
