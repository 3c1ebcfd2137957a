//! Generational training loop tying the optimizer to the evaluator.

use std::sync::atomic::{AtomicBool, Ordering};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::brain::Brain;
use super::checkpoint::Checkpoint;
use super::controller::Candidate;
use super::error::{ConfigError, EvalError};
use super::evolution::{PopulationOptimizer, evaluate_islands};
use super::params::Params;
use super::stats::{GenerationStats, StatsHistory};

/// How a training run ended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    /// Generations evaluated in this run.
    pub generations_run: u32,
    /// Fitness of the best candidate seen so far.
    pub champion_fitness: Option<f32>,
    /// The fitness threshold was reached.
    pub solved: bool,
    /// The stop signal ended the run early.
    pub interrupted: bool,
}

/// Evaluates and breeds a population of brains generation after generation.
#[derive(Debug)]
pub struct Trainer {
    params: Params,
    optimizer: PopulationOptimizer,
    population: Vec<Candidate<Brain>>,
    champion: Option<Candidate<Brain>>,
    history: StatsHistory,
    generation: u32,
    islands: usize,
    rng: StdRng,
}

impl Trainer {
    /// Creates a trainer with a freshly seeded population.
    ///
    /// # Arguments
    ///
    /// * `params` - Simulation and evolution parameters (validated here)
    /// * `islands` - Number of environments evaluated in parallel per generation
    pub fn new(params: Params, islands: usize) -> Result<Self, ConfigError> {
        params.validate()?;
        let mut optimizer = PopulationOptimizer::new(&params);
        let population = optimizer.seed_population();
        let rng = seeded_rng(&params);

        Ok(Self {
            params,
            optimizer,
            population,
            champion: None,
            history: StatsHistory::default(),
            generation: 0,
            islands: islands.max(1),
            rng,
        })
    }

    /// Resumes training from a checkpoint.
    pub fn from_checkpoint(checkpoint: Checkpoint, islands: usize) -> Result<Self, ConfigError> {
        checkpoint.params.validate()?;
        let mut optimizer =
            PopulationOptimizer::new(&checkpoint.params).with_next_id(checkpoint.next_id);
        let population = if checkpoint.population.is_empty() {
            optimizer.seed_population()
        } else {
            checkpoint.population
        };
        let rng = seeded_rng(&checkpoint.params);

        Ok(Self {
            params: checkpoint.params,
            optimizer,
            population,
            champion: checkpoint.champion,
            history: checkpoint.history,
            generation: checkpoint.generation,
            islands: islands.max(1),
            rng,
        })
    }

    /// Population awaiting evaluation.
    pub fn population(&self) -> &[Candidate<Brain>] {
        &self.population
    }

    /// Fittest candidate seen so far.
    pub fn champion(&self) -> Option<&Candidate<Brain>> {
        self.champion.as_ref()
    }

    /// Statistics of past generations.
    pub fn history(&self) -> &StatsHistory {
        &self.history
    }

    /// Next generation to evaluate.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Evaluates the current population and, unless interrupted, breeds the next one.
    pub fn step(&mut self, stop: &AtomicBool) -> Result<GenerationStats, EvalError> {
        let seed = self.rng.random::<u64>();
        let reports = evaluate_islands(
            &self.params,
            &mut self.population,
            self.islands,
            self.generation,
            seed,
            stop,
        )?;

        let stats = GenerationStats::from_candidates(self.generation, &self.population, &reports)
            .ok_or(EvalError::EmptyPopulation)?;

        if stats.interrupted {
            warn!(generation = self.generation, "evaluation interrupted; population kept");
            return Ok(stats);
        }

        self.history.record(stats);
        self.update_champion();

        info!(
            generation = stats.generation,
            score = stats.score,
            best = stats.best_fitness,
            mean = stats.mean_fitness,
            stdev = stats.stdev_fitness,
            ticks = stats.ticks,
            "generation evaluated"
        );

        self.population = self.optimizer.next_generation(&self.population);
        self.generation += 1;
        Ok(stats)
    }

    /// Runs up to `generations` generations.
    ///
    /// Stops early when the stop signal is raised or when the best fitness of
    /// a generation reaches `fitness_threshold`.
    pub fn run(&mut self, generations: u32, stop: &AtomicBool) -> Result<TrainingSummary, EvalError> {
        let mut summary = TrainingSummary {
            generations_run: 0,
            champion_fitness: None,
            solved: false,
            interrupted: false,
        };

        for _ in 0..generations {
            if stop.load(Ordering::Relaxed) {
                summary.interrupted = true;
                break;
            }

            let stats = self.step(stop)?;
            if stats.interrupted {
                summary.interrupted = true;
                break;
            }
            summary.generations_run += 1;

            if self
                .params
                .fitness_threshold
                .is_some_and(|threshold| stats.best_fitness >= threshold)
            {
                info!(
                    generation = stats.generation,
                    fitness = stats.best_fitness,
                    "fitness threshold reached"
                );
                summary.solved = true;
                break;
            }
        }

        summary.champion_fitness = self.champion.as_ref().map(|c| c.fitness);
        Ok(summary)
    }

    /// Snapshot of the training state.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            generation: self.generation,
            next_id: self.optimizer.next_id(),
            params: self.params.clone(),
            champion: self.champion.clone(),
            population: self.population.clone(),
            history: self.history.clone(),
        }
    }

    fn update_champion(&mut self) {
        let Some(best) = self
            .population
            .iter()
            .max_by(|a, b| a.fitness.total_cmp(&b.fitness))
        else {
            return;
        };

        let improved = self
            .champion
            .as_ref()
            .is_none_or(|champion| best.fitness > champion.fitness);
        if improved {
            self.champion = Some(best.clone());
        }
    }
}

fn seeded_rng(params: &Params) -> StdRng {
    match params.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}
