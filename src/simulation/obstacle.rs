//! Paired top/bottom barriers that scroll towards the agents.

use geo::Coord;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::agent::Agent;
use super::collision::CollisionShape;
use super::locatable::Locatable;
use super::params::Params;

/// A top and a bottom barrier separated by a fixed vertical gap.
///
/// The gap is rolled once at construction; `gap_center`, `top_edge` and
/// `bottom_edge` never change afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Left edge of both barriers.
    pub x: f32,
    /// Set once the agents have flown past this obstacle.
    pub passed: bool,
    gap_center: i32,
    top_edge: i32,
    bottom_edge: i32,
}

impl Obstacle {
    /// Creates an obstacle at `x` with a random gap center in
    /// `[gap_center_min, gap_center_max)`.
    pub fn new(x: f32, params: &Params, rng: &mut impl Rng) -> Self {
        let gap_center = rng.random_range(params.gap_center_min..params.gap_center_max);
        Self::with_gap_center(x, gap_center, params)
    }

    /// Creates an obstacle with a known gap center.
    pub fn with_gap_center(x: f32, gap_center: i32, params: &Params) -> Self {
        Self {
            x,
            passed: false,
            gap_center,
            // The top sprite hangs from above the screen; its lower end sits at the gap center.
            top_edge: gap_center - params.barrier_height as i32,
            bottom_edge: gap_center + params.gap,
        }
    }

    /// Lower end of the top barrier.
    pub fn gap_center(&self) -> i32 {
        self.gap_center
    }

    /// Vertical position of the top barrier sprite.
    pub fn top_edge(&self) -> i32 {
        self.top_edge
    }

    /// Vertical position of the bottom barrier sprite.
    pub fn bottom_edge(&self) -> i32 {
        self.bottom_edge
    }

    /// Right edge of both barriers.
    pub fn right_edge(&self, params: &Params) -> f32 {
        self.x + params.barrier_width as f32
    }

    /// Checks whether the obstacle has scrolled completely off the left edge.
    pub fn is_off_screen(&self, params: &Params) -> bool {
        self.right_edge(params) < 0.0
    }

    /// Tests the agent's shape against both barriers.
    ///
    /// # Arguments
    ///
    /// * `agent` - Agent to test
    /// * `agent_shape` - Collision shape of the agent sprite
    /// * `barrier_shape` - Collision shape of a single barrier sprite
    pub fn collides_with(
        &self,
        agent: &Agent,
        agent_shape: &dyn CollisionShape,
        barrier_shape: &dyn CollisionShape,
    ) -> bool {
        let (ax, ay) = agent.pixel_pos();
        let dx = self.x.round() as i32 - ax;

        agent_shape.overlaps(barrier_shape, (dx, self.top_edge - ay))
            || agent_shape.overlaps(barrier_shape, (dx, self.bottom_edge - ay))
    }
}

impl Locatable for Obstacle {
    fn pos(&self) -> Coord<f32> {
        Coord {
            x: self.x,
            y: self.top_edge as f32,
        }
    }

    fn advance(&mut self, params: &Params) {
        self.x -= params.scroll_speed;
    }
}
