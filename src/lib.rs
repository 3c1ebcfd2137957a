//! # Flappy Evo - Evolving Flappy Bird Players
//!
//! A side-scrolling Flappy Bird simulation in which a whole population of
//! birds flies the same obstacle course at once, each steered by its own
//! controller. Fitness earned in the environment drives a generational
//! optimizer that breeds better controllers.
//!
//! ## Features
//!
//! - Deterministic tick-based environment (one obstacle course per seed)
//! - Pixel-mask or bounding-box collision shapes
//! - Opaque controller interface with a tanh MLP brain as the default
//! - Elitist crossover and mutation optimizer
//! - Parallel island evaluation with rayon
//! - JSON configuration and training checkpoints
//!
//! ## Core Modules
//!
//! - [`simulation::environment`] - Per-tick simulation protocol
//! - [`simulation::evaluator`] - Runs a generation against a population
//! - [`simulation::agent`] - Bird kinematics
//! - [`simulation::obstacle`] - Barrier pairs and their collision test
//! - [`simulation::controller`] - Controller interface and candidate records
//! - [`simulation::evolution`] - Population optimizer

/// Core simulation logic and data structures.
pub mod simulation {
    /// Bird agents and their kinematics.
    pub mod agent;
    /// Multi-layer perceptron controllers.
    pub mod brain;
    /// Training checkpoints.
    pub mod checkpoint;
    /// Collision shapes and overlap tests.
    pub mod collision;
    /// Controller interface and candidate records.
    pub mod controller;
    /// Per-generation simulation state and tick protocol.
    pub mod environment;
    /// Error types.
    pub mod error;
    /// Generation runner.
    pub mod evaluator;
    /// Events recorded while resolving a tick.
    pub mod events;
    /// Population optimizer and island evaluation.
    pub mod evolution;
    /// Scrolling ground strip.
    pub mod ground;
    /// Trait for entities that advance once per tick.
    ///
    /// The [`locatable::Locatable`] trait is implemented by every entity that
    /// has a position and moves with the simulation clock (Agent, Obstacle, Ground).
    pub mod locatable;
    /// Paired barriers.
    pub mod obstacle;
    /// Simulation parameters.
    pub mod params;
    /// Sensor vectors fed to controllers.
    pub mod sensors;
    /// Per-generation fitness statistics.
    pub mod stats;
    /// Telemetry frames and sinks.
    pub mod telemetry;
    /// Generational training loop.
    pub mod trainer;
}
