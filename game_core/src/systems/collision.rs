use crate::{Ball, Config, Events, Paddle};
use hecs::World;

/// Check ball collisions with walls and paddles
pub fn check_collisions(world: &mut World, config: &Config, events: &mut Events) {
    // First, collect ball data without holding borrows
    let ball_data = {
        let mut ball_query = world.query::<&Ball>();
        ball_query
            .iter()
            .next()
            .map(|(_e, ball)| (ball.pos, ball.vel))
    };

    let (mut ball_pos, mut ball_vel) = match ball_data {
        Some(data) => data,
        None => return, // No ball in world
    };

    // Top/bottom wall bounces: invert and clamp flush so the ball re-enters
    let radius = config.ball_radius;
    if ball_pos.y - radius <= 0.0 {
        ball_pos.y = radius;
        ball_vel.y = -ball_vel.y;
        events.ball_hit_wall = true;
    }
    if ball_pos.y + radius >= config.arena_height {
        ball_pos.y = config.arena_height - radius;
        ball_vel.y = -ball_vel.y;
        events.ball_hit_wall = true;
    }

    if events.ball_hit_wall {
        for (_entity, ball) in world.query_mut::<&mut Ball>() {
            ball.pos = ball_pos;
            ball.vel = ball_vel;
        }
    }

    // Collect paddle data
    let paddles: Vec<(u8, f32)> = world
        .query::<&Paddle>()
        .iter()
        .map(|(_e, p)| (p.side, p.y))
        .collect();

    for (side, paddle_y) in paddles {
        let paddle_x = config.paddle_x(side);

        // AABB overlap between ball and paddle
        let hit = ball_pos.x + radius >= paddle_x
            && ball_pos.x - radius <= paddle_x + config.paddle_width
            && ball_pos.y + radius >= paddle_y
            && ball_pos.y - radius <= paddle_y + config.paddle_height;

        if hit {
            // Only bounce when the ball is moving toward this paddle
            let should_bounce =
                (side == 0 && ball_vel.x < 0.0) || (side == 1 && ball_vel.x > 0.0);

            if should_bounce {
                // Speed up horizontally, away from the paddle
                let new_vx = ball_vel.x.abs() * config.speed_up_factor + config.speed_up_add;
                ball_vel.x = if side == 0 { new_vx } else { -new_vx };

                // Deflect by where the ball struck the paddle:
                // -1 at the top edge, +1 at the bottom edge
                let paddle_center = paddle_y + config.paddle_height / 2.0;
                let hit_relative_y =
                    ((ball_pos.y - paddle_center) / (config.paddle_height / 2.0)).clamp(-1.0, 1.0);
                ball_vel.y += hit_relative_y * config.spin_gain;

                // Push ball out of the paddle
                if side == 0 {
                    ball_pos.x = paddle_x + config.paddle_width + radius;
                } else {
                    ball_pos.x = paddle_x - radius;
                }

                events.ball_hit_paddle = true;

                // Update ball
                for (_entity, ball) in world.query_mut::<&mut Ball>() {
                    ball.pos = ball_pos;
                    ball.vel = ball_vel;
                }
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_ball, create_paddle};

    fn setup_world() -> (hecs::World, Config, Events) {
        let world = hecs::World::new();
        let config = Config::new();
        let events = Events::new();
        (world, config, events)
    }

    fn ball_state(world: &hecs::World) -> Ball {
        world
            .query::<&Ball>()
            .iter()
            .next()
            .map(|(_e, b)| *b)
            .unwrap()
    }

    #[test]
    fn test_ball_bounces_off_top_wall() {
        let (mut world, config, mut events) = setup_world();
        let ball_pos = glam::Vec2::new(400.0, config.ball_radius - 1.0); // Past top wall
        let ball_vel = glam::Vec2::new(200.0, -120.0); // Moving up
        create_ball(&mut world, ball_pos, ball_vel);

        check_collisions(&mut world, &config, &mut events);

        let ball = ball_state(&world);
        assert!(
            ball.vel.y > 0.0,
            "Ball should bounce down after hitting top wall"
        );
        assert_eq!(ball.vel.x, ball_vel.x, "X velocity should be unchanged");
        assert_eq!(
            ball.vel.y.abs(),
            ball_vel.y.abs(),
            "Reflection preserves vertical speed"
        );
        assert!(
            ball.pos.y >= config.ball_radius,
            "Ball should be pushed out of wall"
        );
        assert!(events.ball_hit_wall, "Should trigger ball_hit_wall event");
    }

    #[test]
    fn test_ball_bounces_off_bottom_wall() {
        let (mut world, config, mut events) = setup_world();
        let ball_pos = glam::Vec2::new(400.0, config.arena_height - config.ball_radius + 1.0);
        let ball_vel = glam::Vec2::new(200.0, 120.0); // Moving down
        create_ball(&mut world, ball_pos, ball_vel);

        check_collisions(&mut world, &config, &mut events);

        let ball = ball_state(&world);
        assert!(
            ball.vel.y < 0.0,
            "Ball should bounce up after hitting bottom wall"
        );
        assert_eq!(ball.vel.x, ball_vel.x, "X velocity should be unchanged");
        assert_eq!(
            ball.vel.y.abs(),
            ball_vel.y.abs(),
            "Reflection preserves vertical speed"
        );
        assert!(
            ball.pos.y <= config.arena_height - config.ball_radius,
            "Ball should be pushed out of wall"
        );
        assert!(events.ball_hit_wall, "Should trigger ball_hit_wall event");
    }

    #[test]
    fn test_ball_collides_with_left_paddle() {
        let (mut world, config, mut events) = setup_world();
        let paddle_y = 206.0;
        create_paddle(&mut world, 0, paddle_y);

        let paddle_x = config.paddle_x(0);
        let ball_pos = glam::Vec2::new(
            paddle_x + config.paddle_width,
            paddle_y + config.paddle_height / 2.0,
        );
        let ball_vel = glam::Vec2::new(-200.0, 0.0); // Moving left toward paddle
        create_ball(&mut world, ball_pos, ball_vel);

        check_collisions(&mut world, &config, &mut events);

        let ball = ball_state(&world);
        assert!(
            ball.vel.x > 0.0,
            "Ball should bounce right after hitting left paddle"
        );
        assert_eq!(
            ball.pos.x,
            paddle_x + config.paddle_width + config.ball_radius,
            "Ball should be pushed out flush with the paddle face"
        );
        assert!(
            events.ball_hit_paddle,
            "Should trigger ball_hit_paddle event"
        );
    }

    #[test]
    fn test_ball_collides_with_right_paddle() {
        let (mut world, config, mut events) = setup_world();
        let paddle_y = 206.0;
        create_paddle(&mut world, 1, paddle_y);

        let paddle_x = config.paddle_x(1);
        let ball_pos = glam::Vec2::new(paddle_x, paddle_y + config.paddle_height / 2.0);
        let ball_vel = glam::Vec2::new(200.0, 0.0); // Moving right toward paddle
        create_ball(&mut world, ball_pos, ball_vel);

        check_collisions(&mut world, &config, &mut events);

        let ball = ball_state(&world);
        assert!(
            ball.vel.x < 0.0,
            "Ball should bounce left after hitting right paddle"
        );
        assert_eq!(
            ball.pos.x,
            paddle_x - config.ball_radius,
            "Ball should be pushed out flush with the paddle face"
        );
        assert!(
            events.ball_hit_paddle,
            "Should trigger ball_hit_paddle event"
        );
    }

    #[test]
    fn test_ball_speeds_up_on_paddle_hit() {
        let (mut world, config, mut events) = setup_world();
        let paddle_y = 206.0;
        create_paddle(&mut world, 0, paddle_y);

        let initial_speed = 200.0;
        let ball_pos = glam::Vec2::new(
            config.paddle_x(0) + config.paddle_width,
            paddle_y + config.paddle_height / 2.0,
        );
        create_ball(&mut world, ball_pos, glam::Vec2::new(-initial_speed, 0.0));

        check_collisions(&mut world, &config, &mut events);

        let ball = ball_state(&world);
        let expected = initial_speed * config.speed_up_factor + config.speed_up_add;
        assert!(
            (ball.vel.x - expected).abs() < 0.01,
            "Ball |vx| should grow to {}, got {}",
            expected,
            ball.vel.x
        );
    }

    #[test]
    fn test_ball_trajectory_affected_by_hit_position() {
        let (mut world, config, mut events) = setup_world();
        let paddle_y = 206.0;
        create_paddle(&mut world, 0, paddle_y);

        // Hit near the top of the paddle
        let ball_x = config.paddle_x(0) + config.paddle_width;
        let ball_pos_top = glam::Vec2::new(ball_x, paddle_y + 4.0);
        let ball_vel = glam::Vec2::new(-200.0, 0.0);
        create_ball(&mut world, ball_pos_top, ball_vel);

        check_collisions(&mut world, &config, &mut events);

        assert!(
            ball_state(&world).vel.y < 0.0,
            "Ball should deflect upward when hitting top of paddle"
        );

        // Reset and test bottom hit
        world.clear();
        events.clear();
        create_paddle(&mut world, 0, paddle_y);

        let ball_pos_bottom = glam::Vec2::new(ball_x, paddle_y + config.paddle_height - 4.0);
        create_ball(&mut world, ball_pos_bottom, ball_vel);

        check_collisions(&mut world, &config, &mut events);

        assert!(
            ball_state(&world).vel.y > 0.0,
            "Ball should deflect downward when hitting bottom of paddle"
        );
    }

    #[test]
    fn test_spin_is_symmetric_about_paddle_center() {
        let (mut world, config, mut events) = setup_world();
        let paddle_y = 206.0;
        let ball_x = config.paddle_x(0) + config.paddle_width;
        let offset = 20.0;
        let ball_vel = glam::Vec2::new(-200.0, 0.0);

        create_paddle(&mut world, 0, paddle_y);
        let center = paddle_y + config.paddle_height / 2.0;
        create_ball(&mut world, glam::Vec2::new(ball_x, center - offset), ball_vel);
        check_collisions(&mut world, &config, &mut events);
        let vy_above = ball_state(&world).vel.y;

        world.clear();
        events.clear();
        create_paddle(&mut world, 0, paddle_y);
        create_ball(&mut world, glam::Vec2::new(ball_x, center + offset), ball_vel);
        check_collisions(&mut world, &config, &mut events);
        let vy_below = ball_state(&world).vel.y;

        assert!(
            (vy_above + vy_below).abs() < 0.001,
            "Equal offsets above and below center deflect symmetrically, got {} and {}",
            vy_above,
            vy_below
        );
    }

    #[test]
    fn test_ball_does_not_bounce_when_moving_away_from_paddle() {
        let (mut world, config, mut events) = setup_world();
        let paddle_y = 206.0;
        create_paddle(&mut world, 0, paddle_y);

        // Ball overlaps the paddle but moves away (right)
        let ball_pos = glam::Vec2::new(
            config.paddle_x(0) + config.paddle_width,
            paddle_y + config.paddle_height / 2.0,
        );
        let ball_vel = glam::Vec2::new(200.0, 0.0);
        create_ball(&mut world, ball_pos, ball_vel);

        check_collisions(&mut world, &config, &mut events);

        let ball = ball_state(&world);
        assert_eq!(
            ball.vel.x, ball_vel.x,
            "Ball should not bounce when moving away"
        );
        assert!(
            !events.ball_hit_paddle,
            "Should not trigger collision when moving away"
        );
    }

    #[test]
    fn test_ball_misses_paddle_outside_vertical_span() {
        let (mut world, config, mut events) = setup_world();
        let paddle_y = 0.0;
        create_paddle(&mut world, 1, paddle_y);

        // Aligned with the paddle plane but far below the paddle
        let ball_pos = glam::Vec2::new(config.paddle_x(1), 400.0);
        let ball_vel = glam::Vec2::new(200.0, 0.0);
        create_ball(&mut world, ball_pos, ball_vel);

        check_collisions(&mut world, &config, &mut events);

        let ball = ball_state(&world);
        assert_eq!(ball.vel.x, ball_vel.x, "Miss should leave velocity alone");
        assert!(!events.ball_hit_paddle, "Miss should not count as a hit");
    }

    #[test]
    fn test_no_collision_when_no_ball() {
        let (mut world, config, mut events) = setup_world();
        create_paddle(&mut world, 0, 206.0);

        // Should not panic or error
        check_collisions(&mut world, &config, &mut events);

        assert!(!events.ball_hit_paddle);
        assert!(!events.ball_hit_wall);
    }
}
