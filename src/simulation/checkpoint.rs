//! Training checkpoints persisted as JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::brain::Brain;
use super::controller::Candidate;
use super::error::CheckpointError;
use super::params::Params;
use super::stats::StatsHistory;

/// Everything needed to resume training or replay the best brain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Next generation to evaluate.
    pub generation: u32,
    /// Next candidate id the optimizer will assign.
    pub next_id: usize,
    /// Parameters the population was trained with.
    pub params: Params,
    /// Fittest candidate seen so far, with the fitness it earned.
    pub champion: Option<Candidate<Brain>>,
    /// Population awaiting evaluation.
    pub population: Vec<Candidate<Brain>>,
    /// Statistics of past generations.
    #[serde(default)]
    pub history: StatsHistory,
}

impl Checkpoint {
    /// Saves the checkpoint to a JSON file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), CheckpointError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| CheckpointError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads a checkpoint from a JSON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, CheckpointError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CheckpointError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&json)?)
    }
}
