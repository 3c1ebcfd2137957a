//! Bird agents and their vertical kinematics.
//!
//! Agents never move horizontally; the world scrolls past them instead. Each
//! tick integrates `v·t + ½·a·t²` from the last ascend, clamped to a terminal
//! displacement.

use geo::{Coord, Rect};
use serde::{Deserialize, Serialize};

use super::locatable::Locatable;
use super::params::Params;

/// A single bird evaluated in the environment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Fixed horizontal position.
    pub x: f32,
    /// Vertical position of the sprite's top edge (grows downwards).
    pub y: f32,
    /// Velocity set by the last ascend.
    pub velocity: f32,
    /// Ticks elapsed since the last ascend.
    pub ticks_since_jump: u32,
    /// Displacement applied by the most recent advance.
    pub displacement: f32,
}

impl Agent {
    /// Creates a resting agent at the given position.
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            velocity: 0.0,
            ticks_since_jump: 0,
            displacement: 0.0,
        }
    }

    /// Creates an agent at the configured spawn position.
    pub fn spawn(params: &Params) -> Self {
        Self::new(params.agent_x, params.agent_start_y)
    }

    /// Applies the single control action: an upward impulse.
    pub fn ascend(&mut self, params: &Params) {
        self.velocity = params.jump_velocity;
        self.ticks_since_jump = 0;
    }

    /// Bounding rectangle of the agent sprite, rounded to whole pixels.
    pub fn bounds(&self, params: &Params) -> Rect<i32> {
        let (x, y) = self.pixel_pos();
        Rect::new(
            Coord { x, y },
            Coord {
                x: x + params.agent_width as i32,
                y: y + params.agent_height as i32,
            },
        )
    }

    /// Top-left corner rounded to the pixel grid used for collision tests.
    pub fn pixel_pos(&self) -> (i32, i32) {
        (self.x.round() as i32, self.y.round() as i32)
    }

    /// Checks whether the agent touched the ground or flew above the top.
    pub fn is_out_of_bounds(&self, params: &Params) -> bool {
        self.y + params.agent_height as f32 >= params.ground_y || self.y < 0.0
    }
}

impl Locatable for Agent {
    fn pos(&self) -> Coord<f32> {
        Coord {
            x: self.x,
            y: self.y,
        }
    }

    fn advance(&mut self, params: &Params) {
        self.ticks_since_jump += 1;
        let t = self.ticks_since_jump as f32;

        let mut displacement = self.velocity * t + 0.5 * params.gravity * t * t;
        if displacement >= params.terminal_displacement {
            displacement = params.terminal_displacement;
        }
        if displacement < 0.0 {
            displacement -= params.ascent_penalty;
        }

        self.displacement = displacement;
        self.y += displacement;
    }
}
