#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use flappy_evo::simulation::agent::Agent;
use flappy_evo::simulation::collision::{Hitbox, MaskKind};
use flappy_evo::simulation::locatable::Locatable;
use flappy_evo::simulation::obstacle::Obstacle;
use flappy_evo::simulation::params::Params;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn create_test_params() -> Params {
    Params::default()
}

#[test]
fn test_gap_edges_from_center() {
    let params = create_test_params();
    let obstacle = Obstacle::with_gap_center(600.0, 200, &params);

    assert_eq!(obstacle.x, 600.0);
    assert_eq!(obstacle.gap_center(), 200);
    assert_eq!(obstacle.top_edge(), 200 - params.barrier_height as i32);
    assert_eq!(obstacle.bottom_edge(), 400);
    assert!(!obstacle.passed);
}

#[test]
fn test_random_gap_center_in_range() {
    let params = create_test_params();
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..500 {
        let obstacle = Obstacle::new(600.0, &params, &mut rng);
        assert!(obstacle.gap_center() >= params.gap_center_min);
        assert!(obstacle.gap_center() < params.gap_center_max);
    }
}

#[test]
fn test_gap_is_fixed_for_lifetime() {
    let params = create_test_params();
    let mut rng = StdRng::seed_from_u64(7);
    let mut obstacle = Obstacle::new(params.spawn_x, &params, &mut rng);
    let gap_center = obstacle.gap_center();

    while !obstacle.is_off_screen(&params) {
        obstacle.advance(&params);
        assert_eq!(obstacle.gap_center(), gap_center);
        assert_eq!(obstacle.bottom_edge() - obstacle.gap_center(), params.gap);
        assert_eq!(
            obstacle.bottom_edge() - obstacle.top_edge(),
            params.gap + params.barrier_height as i32
        );
    }
}

#[test]
fn test_advance_and_retirement() {
    let params = create_test_params();
    let mut obstacle = Obstacle::with_gap_center(10.0, 200, &params);

    obstacle.advance(&params);
    assert_eq!(obstacle.x, 5.0);
    assert_eq!(obstacle.right_edge(&params), 5.0 + params.barrier_width as f32);

    obstacle.x = -(params.barrier_width as f32);
    assert!(!obstacle.is_off_screen(&params), "right edge exactly at 0 is still visible");
    obstacle.advance(&params);
    assert!(obstacle.is_off_screen(&params));
}

#[test]
fn test_agent_inside_gap_does_not_collide() {
    let params = create_test_params();
    let agent_shape = MaskKind::Ellipse.build(params.agent_width, params.agent_height);
    let barrier = Hitbox::new(params.barrier_width, params.barrier_height);

    let obstacle = Obstacle::with_gap_center(params.agent_x, 200, &params);
    let agent = Agent::new(params.agent_x, 300.0);

    assert!(!obstacle.collides_with(&agent, agent_shape.as_ref(), &barrier));
}

#[test]
fn test_agent_hits_top_and_bottom_barrier() {
    let params = create_test_params();
    let agent_shape = MaskKind::Ellipse.build(params.agent_width, params.agent_height);
    let barrier = Hitbox::new(params.barrier_width, params.barrier_height);
    let obstacle = Obstacle::with_gap_center(params.agent_x + 10.0, 200, &params);

    let high = Agent::new(params.agent_x, 150.0);
    let low = Agent::new(params.agent_x, 380.0);

    assert!(obstacle.collides_with(&high, agent_shape.as_ref(), &barrier));
    assert!(obstacle.collides_with(&low, agent_shape.as_ref(), &barrier));
}

#[test]
fn test_agent_beside_obstacle_does_not_collide() {
    let params = create_test_params();
    let agent_shape = MaskKind::Hitbox.build(params.agent_width, params.agent_height);
    let barrier = Hitbox::new(params.barrier_width, params.barrier_height);

    // Agent ends exactly where the obstacle starts.
    let obstacle =
        Obstacle::with_gap_center(params.agent_x + params.agent_width as f32, 100, &params);
    let agent = Agent::new(params.agent_x, 500.0);

    assert!(!obstacle.collides_with(&agent, agent_shape.as_ref(), &barrier));
}
