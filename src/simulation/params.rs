use std::path::Path;

use serde::{Deserialize, Serialize};

use super::collision::MaskKind;
use super::error::ConfigError;
use super::sensors::SENSOR_COUNT;

/// Simulation and training parameters.
///
/// Defaults reproduce the classic game: a 500 px wide playfield, ground at
/// 730 px, 2x scaled sprites and a 30 Hz tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Horizontal scroll speed shared by obstacles and ground (px per tick).
    pub scroll_speed: f32,
    /// Vertical position of the ground strip; agents touching it are retired.
    pub ground_y: f32,
    /// Width of one ground strip image.
    pub ground_width: f32,
    /// Fixed horizontal position of every agent.
    pub agent_x: f32,
    /// Vertical position agents spawn at.
    pub agent_start_y: f32,
    /// Agent sprite width.
    pub agent_width: u32,
    /// Agent sprite height.
    pub agent_height: u32,
    /// Collision backing used for agents.
    pub agent_mask: MaskKind,
    /// Velocity set by an ascend action (negative is up).
    pub jump_velocity: f32,
    /// Synthetic acceleration; displacement grows by `0.5 * gravity * t^2`.
    pub gravity: f32,
    /// Maximum downward displacement per tick.
    pub terminal_displacement: f32,
    /// Extra upward displacement applied while rising.
    pub ascent_penalty: f32,
    /// Barrier sprite width.
    pub barrier_width: u32,
    /// Barrier sprite height.
    pub barrier_height: u32,
    /// Vertical opening between the top and bottom barrier.
    pub gap: i32,
    /// Lowest gap center (inclusive).
    pub gap_center_min: i32,
    /// Highest gap center (exclusive).
    pub gap_center_max: i32,
    /// Position of the obstacle present when a generation starts.
    pub first_obstacle_x: f32,
    /// Position new obstacles spawn at.
    pub spawn_x: f32,
    /// Controller outputs above this value trigger an ascend.
    pub ascend_threshold: f32,
    /// Fitness granted to every live agent each tick.
    pub survival_reward: f32,
    /// Fitness removed from an agent that hits a barrier.
    pub collision_penalty: f32,
    /// Fitness granted to every live agent when an obstacle is passed.
    pub pass_reward: f32,
    /// Nominal tick rate for real-time drivers (Hz).
    pub tick_rate: u32,
    /// Optional cap on ticks per generation.
    pub max_ticks: Option<u64>,
    /// Optional seed for the obstacle courses.
    ///
    /// Brain initialisation and breeding draw from the thread RNG, so a seed
    /// fixes the courses flown but not the population that flies them.
    pub seed: Option<u64>,
    /// Number of candidates per generation.
    pub population_size: usize,
    /// Brain layer dimensions, input first.
    pub layer_sizes: Vec<usize>,
    /// Range of the initial uniform brain weights.
    pub weight_scale: f32,
    /// Candidates copied unchanged into the next generation.
    pub elite_count: usize,
    /// Fraction of the ranked population eligible as parents.
    pub parent_fraction: f32,
    /// Lower bound of the log-uniform mutation scale.
    pub mutation_scale_min: f32,
    /// Upper bound of the log-uniform mutation scale.
    pub mutation_scale_max: f32,
    /// Training stops once the best fitness reaches this value.
    pub fitness_threshold: Option<f32>,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            scroll_speed: 5.0,
            ground_y: 730.0,
            ground_width: 672.0,
            agent_x: 230.0,
            agent_start_y: 350.0,
            agent_width: 68,
            agent_height: 48,
            agent_mask: MaskKind::Ellipse,
            jump_velocity: -10.5,
            gravity: 3.0,
            terminal_displacement: 16.0,
            ascent_penalty: 2.0,
            barrier_width: 104,
            barrier_height: 640,
            gap: 200,
            gap_center_min: 40,
            gap_center_max: 450,
            first_obstacle_x: 700.0,
            spawn_x: 600.0,
            ascend_threshold: 0.5,
            survival_reward: 0.1,
            collision_penalty: 1.0,
            pass_reward: 5.0,
            tick_rate: 30,
            max_ticks: None,
            seed: None,
            population_size: 50,
            layer_sizes: vec![SENSOR_COUNT, 6, 1],
            weight_scale: 1.0,
            elite_count: 2,
            parent_fraction: 0.2,
            mutation_scale_min: 0.01,
            mutation_scale_max: 0.5,
            fitness_threshold: Some(100.0),
        }
    }
}

impl Params {
    /// Loads parameters from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let params: Self = serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        params.validate()?;
        Ok(params)
    }

    /// Checks that the parameters describe a playable world.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scroll_speed <= 0.0 {
            return Err(ConfigError::Invalid("scroll_speed must be positive"));
        }
        if self.ground_width <= 0.0 {
            return Err(ConfigError::Invalid("ground_width must be positive"));
        }
        if self.agent_width == 0 || self.agent_height == 0 {
            return Err(ConfigError::Invalid("agent sprite must be non-empty"));
        }
        if self.ground_y <= self.agent_height as f32 {
            return Err(ConfigError::Invalid("ground_y must leave room for an agent"));
        }
        if self.agent_x < 0.0 {
            return Err(ConfigError::Invalid("agent_x must lie on screen"));
        }
        if self.agent_start_y < 0.0 || self.agent_start_y + self.agent_height as f32 >= self.ground_y
        {
            return Err(ConfigError::Invalid("agent_start_y must lie inside the playfield"));
        }
        if self.barrier_width == 0 || self.barrier_height == 0 {
            return Err(ConfigError::Invalid("barrier sprite must be non-empty"));
        }
        if self.gap <= 0 {
            return Err(ConfigError::Invalid("gap must be positive"));
        }
        if self.gap_center_min >= self.gap_center_max {
            return Err(ConfigError::Invalid("gap_center_min must be below gap_center_max"));
        }
        if self.terminal_displacement <= 0.0 {
            return Err(ConfigError::Invalid("terminal_displacement must be positive"));
        }
        if self.spawn_x <= self.agent_x {
            return Err(ConfigError::Invalid("spawn_x must lie right of agent_x"));
        }
        if self.population_size == 0 {
            return Err(ConfigError::Invalid("population_size must be non-zero"));
        }
        if self.layer_sizes.len() < 2 || self.layer_sizes.contains(&0) {
            return Err(ConfigError::Invalid("layer_sizes needs at least two non-zero layers"));
        }
        if self.layer_sizes.first() != Some(&SENSOR_COUNT) {
            return Err(ConfigError::Invalid("first layer must match the sensor count"));
        }
        if self.weight_scale <= 0.0 {
            return Err(ConfigError::Invalid("weight_scale must be positive"));
        }
        if self.tick_rate == 0 {
            return Err(ConfigError::Invalid("tick_rate must be non-zero"));
        }
        if self.elite_count > self.population_size {
            return Err(ConfigError::Invalid("elite_count exceeds population_size"));
        }
        if !(self.parent_fraction > 0.0 && self.parent_fraction <= 1.0) {
            return Err(ConfigError::Invalid("parent_fraction must be in (0, 1]"));
        }
        if !(self.mutation_scale_min > 0.0 && self.mutation_scale_min < self.mutation_scale_max) {
            return Err(ConfigError::Invalid(
                "mutation scale bounds must satisfy 0 < min < max",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        Params::default().validate().unwrap();
    }

    #[test]
    fn rejects_inverted_gap_range() {
        let params = Params {
            gap_center_min: 450,
            gap_center_max: 40,
            ..Params::default()
        };
        assert!(matches!(params.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_offscreen_agent_x() {
        let params = Params {
            agent_x: -300.0,
            ..Params::default()
        };
        assert!(matches!(params.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_wrong_input_layer() {
        let params = Params {
            layer_sizes: vec![4, 1],
            ..Params::default()
        };
        assert!(params.validate().is_err());
    }
}
