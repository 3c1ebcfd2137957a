//! Events recorded while resolving a tick.
//!
//! Retirements are recorded as events and the agent slots are only marked
//! dead while obstacles are being processed; the slots are compacted once
//! the tick's bookkeeping is complete.

use serde::{Deserialize, Serialize};

/// Something notable that happened during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TickEvent {
    /// An agent hit a barrier and was retired with a fitness penalty.
    AgentCollided {
        /// Candidate index of the retired agent.
        candidate: usize,
        /// Horizontal position of the obstacle that was hit.
        obstacle_x: f32,
    },
    /// An agent touched the ground or flew above the playfield.
    AgentLeftBounds {
        /// Candidate index of the retired agent.
        candidate: usize,
        /// Vertical position at retirement.
        y: f32,
    },
    /// The agents flew past an obstacle and the score went up.
    ObstaclePassed {
        /// Score after the increment.
        score: u32,
        /// Agents alive to collect the pass reward.
        rewarded: usize,
    },
    /// A new obstacle entered at the spawn position.
    ObstacleSpawned {
        /// Spawn position.
        x: f32,
        /// Gap center rolled for the obstacle.
        gap_center: i32,
    },
    /// An obstacle scrolled off the left edge and was dropped.
    ObstacleRetired {
        /// Gap center of the dropped obstacle.
        gap_center: i32,
    },
}

impl TickEvent {
    /// Candidate index for agent retirements.
    pub fn retired_candidate(&self) -> Option<usize> {
        match *self {
            TickEvent::AgentCollided { candidate, .. }
            | TickEvent::AgentLeftBounds { candidate, .. } => Some(candidate),
            _ => None,
        }
    }
}
