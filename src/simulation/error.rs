//! Error types for configuration, controllers, evaluation and checkpoints.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating [`super::params::Params`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration value is out of range or inconsistent.
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The configuration file is not valid JSON for [`super::params::Params`].
    #[error("failed to parse config {path}: {source}")]
    Parse {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// Errors a [`super::controller::Controller`] may report from `decide`.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// The sensor vector does not match the controller's input layer.
    #[error("controller expects {expected} inputs, got {actual}")]
    InputSize {
        /// Inputs the controller was built for.
        expected: usize,
        /// Inputs actually supplied.
        actual: usize,
    },
    /// Any other failure inside an external controller.
    #[error("controller failed: {0}")]
    Failed(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors that abort a tick or a generation.
#[derive(Debug, Error)]
pub enum EvalError {
    /// A generation was requested with no candidates.
    #[error("no controllers supplied; a generation needs at least one candidate")]
    EmptyPopulation,
    /// The candidate slice does not match the environment's population.
    #[error("environment holds {expected} candidates, tick received {actual}")]
    PopulationMismatch {
        /// Population the environment was built for.
        expected: usize,
        /// Length of the slice passed to the tick.
        actual: usize,
    },
    /// A tick started with no obstacle left for the agents to sense.
    #[error("no obstacle left to sense at tick {tick}")]
    NoObstacles {
        /// Tick that could not be resolved.
        tick: u64,
    },
    /// The simulation parameters are invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A candidate's controller failed while deciding.
    #[error("controller of candidate {candidate} failed")]
    Controller {
        /// Index of the candidate in the evaluated slice.
        candidate: usize,
        /// Error returned by the controller.
        #[source]
        source: ControllerError,
    },
}

/// Errors raised while saving or loading a training checkpoint.
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// Reading or writing the checkpoint file failed.
    #[error("checkpoint I/O on {path}: {source}")]
    Io {
        /// Path of the checkpoint file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The checkpoint could not be encoded or decoded.
    #[error("checkpoint encoding: {0}")]
    Json(#[from] serde_json::Error),
}
