use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::controller::Candidate;
use super::evaluator::{GenerationReport, Outcome};

/// Fitness statistics of one evaluated generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generation number.
    pub generation: u32,
    /// Highest fitness.
    pub best_fitness: f32,
    /// Id of the candidate with the highest fitness.
    pub best_id: usize,
    /// Mean fitness.
    pub mean_fitness: f32,
    /// Population standard deviation of fitness.
    pub stdev_fitness: f32,
    /// Highest score reached by any island.
    pub score: u32,
    /// Longest island run in ticks.
    pub ticks: u64,
    /// Whether any island was interrupted.
    pub interrupted: bool,
}

impl GenerationStats {
    /// Summarises an evaluated population and the reports of its islands.
    ///
    /// Returns `None` for an empty population.
    pub fn from_candidates<C>(
        generation: u32,
        candidates: &[Candidate<C>],
        reports: &[GenerationReport],
    ) -> Option<Self> {
        let best = candidates
            .iter()
            .max_by(|a, b| a.fitness.total_cmp(&b.fitness))?;

        let n = candidates.len() as f32;
        let mean = candidates.iter().map(|c| c.fitness).sum::<f32>() / n;
        let variance = candidates
            .iter()
            .map(|c| (c.fitness - mean).powi(2))
            .sum::<f32>()
            / n;

        Some(Self {
            generation,
            best_fitness: best.fitness,
            best_id: best.id,
            mean_fitness: mean,
            stdev_fitness: variance.sqrt(),
            score: reports.iter().map(|r| r.score).max().unwrap_or(0),
            ticks: reports.iter().map(|r| r.ticks).max().unwrap_or(0),
            interrupted: reports.iter().any(|r| r.outcome == Outcome::Interrupted),
        })
    }
}

/// Bounded history of generation statistics, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsHistory {
    /// Recorded generations.
    pub generations: VecDeque<GenerationStats>,
    /// Maximum number of generations to keep
    pub max_history: usize,
}

impl Default for StatsHistory {
    fn default() -> Self {
        Self::new(100)
    }
}

impl StatsHistory {
    /// Creates an empty history keeping at most `max_history` entries.
    pub fn new(max_history: usize) -> Self {
        Self {
            generations: VecDeque::with_capacity(max_history),
            max_history,
        }
    }

    /// Records a generation, dropping the oldest entry when full.
    pub fn record(&mut self, stats: GenerationStats) {
        self.generations.push_back(stats);
        while self.generations.len() > self.max_history {
            self.generations.pop_front();
        }
    }

    /// Most recent entry.
    pub fn latest(&self) -> Option<&GenerationStats> {
        self.generations.back()
    }

    /// Entry with the highest best fitness.
    pub fn best(&self) -> Option<&GenerationStats> {
        self.generations
            .iter()
            .max_by(|a, b| a.best_fitness.total_cmp(&b.best_fitness))
    }

    /// Mean of the per-generation best fitness over the last `window` entries.
    pub fn recent_best_mean(&self, window: usize) -> Option<f32> {
        let recent: Vec<f32> = self
            .generations
            .iter()
            .rev()
            .take(window)
            .map(|s| s.best_fitness)
            .collect();
        if recent.is_empty() {
            return None;
        }
        Some(recent.iter().sum::<f32>() / recent.len() as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(generation: u32, best_fitness: f32) -> GenerationStats {
        GenerationStats {
            generation,
            best_fitness,
            best_id: 0,
            mean_fitness: 0.0,
            stdev_fitness: 0.0,
            score: 0,
            ticks: 0,
            interrupted: false,
        }
    }

    #[test]
    fn history_drops_oldest_entries() {
        let mut history = StatsHistory::new(3);
        for generation in 0..5 {
            history.record(stats(generation, generation as f32));
        }

        assert_eq!(history.generations.len(), 3);
        assert_eq!(history.generations.front().map(|s| s.generation), Some(2));
        assert_eq!(history.latest().map(|s| s.generation), Some(4));
        assert_eq!(history.recent_best_mean(2), Some(3.5));
    }

    #[test]
    fn summary_of_population() {
        let candidates: Vec<Candidate<()>> = [1.0, 3.0]
            .iter()
            .enumerate()
            .map(|(id, &fitness)| Candidate {
                id,
                controller: (),
                fitness,
            })
            .collect();

        let summary = GenerationStats::from_candidates(4, &candidates, &[]).unwrap();
        assert_eq!(summary.best_id, 1);
        assert_eq!(summary.mean_fitness, 2.0);
        assert_eq!(summary.stdev_fitness, 1.0);
        assert!(GenerationStats::from_candidates::<()>(0, &[], &[]).is_none());
    }
}
