//! Sensory input handed to controllers each tick.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::agent::Agent;
use super::obstacle::Obstacle;

/// Number of values in a sensor vector.
pub const SENSOR_COUNT: usize = 3;

/// What an agent perceives about itself and the shared target obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sensors {
    /// Agent height.
    pub y: f32,
    /// Vertical distance to the lower end of the top barrier.
    pub gap_distance: f32,
    /// Vertical distance to the top of the bottom barrier.
    pub bottom_distance: f32,
}

impl Sensors {
    /// Reads the sensors of `agent` against `target`.
    pub fn read(agent: &Agent, target: &Obstacle) -> Self {
        Self {
            y: agent.y,
            gap_distance: (agent.y - target.gap_center() as f32).abs(),
            bottom_distance: (agent.y - target.bottom_edge() as f32).abs(),
        }
    }

    /// Sensor values in input-layer order.
    pub fn values(&self) -> [f32; SENSOR_COUNT] {
        [self.y, self.gap_distance, self.bottom_distance]
    }

    /// Sensor values as a brain input vector.
    pub fn to_array(&self) -> Array1<f32> {
        Array1::from_vec(self.values().to_vec())
    }
}
