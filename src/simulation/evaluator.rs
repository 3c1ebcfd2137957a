//! Runs whole generations against a population of candidates.

use std::sync::atomic::{AtomicBool, Ordering};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::controller::{Candidate, Controller};
use super::environment::Environment;
use super::error::{ConfigError, EvalError};
use super::params::Params;
use super::telemetry::TelemetrySink;

/// Why a generation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Every agent was retired.
    Extinct,
    /// The configured tick cap was reached with agents still alive.
    TickLimit,
    /// The stop signal was raised between ticks.
    Interrupted,
}

/// Summary of one evaluated generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Generation number.
    pub generation: u32,
    /// Ticks simulated.
    pub ticks: u64,
    /// Obstacles passed.
    pub score: u32,
    /// Why the generation ended.
    pub outcome: Outcome,
    /// Highest candidate fitness.
    pub best_fitness: f32,
}

/// Owns the generation counter and drives environments tick by tick.
#[derive(Debug)]
pub struct Evaluator {
    params: Params,
    generation: u32,
    rng: StdRng,
}

impl Evaluator {
    /// Creates an evaluator, seeded from `params.seed` or from entropy.
    pub fn new(params: Params) -> Result<Self, ConfigError> {
        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(params, rng)
    }

    /// Creates an evaluator with an explicit seed, ignoring `params.seed`.
    pub fn with_seed(params: Params, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(params, StdRng::seed_from_u64(seed))
    }

    fn with_rng(params: Params, rng: StdRng) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self {
            params,
            generation: 0,
            rng,
        })
    }

    /// Parameters used for every generation.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Number of the next generation to be run.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Overrides the number of the next generation.
    pub fn set_generation(&mut self, generation: u32) {
        self.generation = generation;
    }

    /// Evaluates one generation.
    ///
    /// Every candidate's fitness is reset to zero, then accumulated while its
    /// agent lives. `stop` is polled before each tick; when it is raised the
    /// run ends with [`Outcome::Interrupted`] and the fitness committed so far
    /// is kept. The generation counter advances whatever the outcome.
    ///
    /// # Errors
    ///
    /// [`EvalError::EmptyPopulation`] for an empty slice, or the first
    /// controller error raised during a tick.
    pub fn run<C, S>(
        &mut self,
        candidates: &mut [Candidate<C>],
        mut sink: S,
        stop: &AtomicBool,
    ) -> Result<GenerationReport, EvalError>
    where
        C: Controller,
        S: TelemetrySink,
    {
        if candidates.is_empty() {
            return Err(EvalError::EmptyPopulation);
        }

        for candidate in candidates.iter_mut() {
            candidate.fitness = 0.0;
        }

        let generation = self.generation;
        let seed = self.rng.random::<u64>();
        let mut env = Environment::new(&self.params, candidates.len(), generation, seed)?;
        self.generation += 1;

        debug!(generation, population = candidates.len(), seed, "generation started");

        let outcome = loop {
            if stop.load(Ordering::Relaxed) {
                break Outcome::Interrupted;
            }
            if env.is_finished() {
                break Outcome::Extinct;
            }
            if self.params.max_ticks.is_some_and(|max| env.ticks >= max) {
                break Outcome::TickLimit;
            }

            env.tick(candidates)?;
            sink.on_tick(&env.frame());
        };

        let best_fitness = candidates
            .iter()
            .map(|candidate| candidate.fitness)
            .fold(f32::NEG_INFINITY, f32::max);

        let report = GenerationReport {
            generation,
            ticks: env.ticks,
            score: env.score,
            outcome,
            best_fitness,
        };

        if outcome == Outcome::Interrupted {
            warn!(generation, ticks = env.ticks, "generation interrupted");
        } else {
            info!(
                generation,
                ticks = report.ticks,
                score = report.score,
                best_fitness = report.best_fitness,
                ?outcome,
                "generation finished"
            );
        }

        Ok(report)
    }
}
