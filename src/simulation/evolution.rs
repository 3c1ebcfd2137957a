//! Population optimizer and parallel island evaluation.
//!
//! The environment treats controllers as opaque; this module is one simple
//! optimizer that plugs into it. Each generation keeps a few elites unchanged
//! and breeds the rest from the fittest candidates through weighted
//! crossover and mutation.

use std::sync::atomic::AtomicBool;

use rand::Rng;
use rayon::prelude::*;
use tracing::debug;

use super::brain::Brain;
use super::controller::{Candidate, Controller};
use super::error::EvalError;
use super::evaluator::{Evaluator, GenerationReport};
use super::params::Params;
use super::telemetry::NullSink;

/// Breeds populations of brains from evaluated candidates.
#[derive(Debug, Clone)]
pub struct PopulationOptimizer {
    params: Params,
    next_id: usize,
}

impl PopulationOptimizer {
    /// Creates an optimizer using the evolution settings in `params`.
    pub fn new(params: &Params) -> Self {
        Self {
            params: params.clone(),
            next_id: 0,
        }
    }

    /// Resumes id assignment after the given id.
    pub fn with_next_id(mut self, next_id: usize) -> Self {
        self.next_id = next_id;
        self
    }

    /// Next id that will be assigned.
    pub fn next_id(&self) -> usize {
        self.next_id
    }

    /// Creates `population_size` candidates with random brains.
    pub fn seed_population(&mut self) -> Vec<Candidate<Brain>> {
        (0..self.params.population_size)
            .map(|_| {
                let brain = Brain::new(&self.params.layer_sizes, self.params.weight_scale);
                self.make_candidate(brain)
            })
            .collect()
    }

    /// Breeds the next generation from an evaluated population.
    ///
    /// The fittest `elite_count` candidates survive unchanged (keeping their
    /// ids). The remaining slots are children of parents drawn from the top
    /// `parent_fraction`: half of them by weighted crossover of two parents,
    /// the rest by cloning one parent, both followed by mutation.
    pub fn next_generation(&mut self, evaluated: &[Candidate<Brain>]) -> Vec<Candidate<Brain>> {
        if evaluated.is_empty() {
            return self.seed_population();
        }

        let mut ranked: Vec<&Candidate<Brain>> = evaluated.iter().collect();
        ranked.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));

        let size = self.params.population_size;
        let elite_count = self.params.elite_count.min(size).min(ranked.len());
        let parent_count = ((ranked.len() as f32 * self.params.parent_fraction).ceil() as usize)
            .clamp(1, ranked.len());
        let parents = &ranked[..parent_count];

        let mut next: Vec<Candidate<Brain>> = ranked[..elite_count]
            .iter()
            .map(|elite| Candidate::new(elite.id, elite.controller.clone()))
            .collect();

        let mut rng = rand::rng();
        while next.len() < size {
            let mutation_scale = sample_mutation_scale(
                self.params.mutation_scale_min,
                self.params.mutation_scale_max,
            );

            let brain = if parents.len() >= 2 && rng.random_bool(0.5) {
                let first = rng.random_range(0..parents.len());
                let mut second = rng.random_range(0..parents.len());
                while second == first {
                    second = rng.random_range(0..parents.len());
                }

                let mut child = Brain::crossover_weighted(
                    &parents[first].controller,
                    &parents[second].controller,
                    rng.random::<f32>(),
                );
                child.mutate(mutation_scale * 0.5);
                child
            } else {
                let parent = parents[rng.random_range(0..parents.len())];
                let mut child = parent.controller.clone();
                child.mutate(mutation_scale);
                child
            };

            next.push(self.make_candidate(brain));
        }

        debug!(
            elites = elite_count,
            parents = parent_count,
            size = next.len(),
            "bred next generation"
        );

        next
    }

    fn make_candidate(&mut self, brain: Brain) -> Candidate<Brain> {
        let candidate = Candidate::new(self.next_id, brain);
        self.next_id += 1;
        candidate
    }
}

/// Evaluates a population split into islands, one environment per island.
///
/// Islands run on the rayon thread pool. Each builds its own [`Evaluator`]
/// from the same seed, so every island flies the same obstacle course and
/// fitness stays comparable across islands.
pub fn evaluate_islands<C>(
    params: &Params,
    candidates: &mut [Candidate<C>],
    islands: usize,
    generation: u32,
    seed: u64,
    stop: &AtomicBool,
) -> Result<Vec<GenerationReport>, EvalError>
where
    C: Controller + Send,
{
    if candidates.is_empty() {
        return Err(EvalError::EmptyPopulation);
    }

    let islands = islands.clamp(1, candidates.len());
    let chunk_size = candidates.len().div_ceil(islands);

    candidates
        .par_chunks_mut(chunk_size)
        .map(|chunk| {
            let mut evaluator = Evaluator::with_seed(params.clone(), seed)?;
            evaluator.set_generation(generation);
            evaluator.run(chunk, NullSink, stop)
        })
        .collect()
}

/// Samples a mutation scale log-uniformly from `[min, max)`.
fn sample_mutation_scale(min: f32, max: f32) -> f32 {
    let log_mutation_scale = rand::rng().random_range(min.ln()..max.ln());
    log_mutation_scale.exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutation_scale_stays_in_range() {
        for _ in 0..200 {
            let scale = sample_mutation_scale(0.01, 0.5);
            assert!((0.01..0.5 + 1e-6).contains(&scale));
        }
    }
}
