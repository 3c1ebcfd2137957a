#![allow(missing_docs)]

use std::collections::HashSet;
use std::sync::atomic::AtomicBool;

use flappy_evo::simulation::brain::Brain;
use flappy_evo::simulation::controller::{Candidate, Controller, FnController};
use flappy_evo::simulation::error::ControllerError;
use flappy_evo::simulation::evaluator::Outcome;
use flappy_evo::simulation::evolution::{PopulationOptimizer, evaluate_islands};
use flappy_evo::simulation::params::Params;
use flappy_evo::simulation::sensors::Sensors;
use flappy_evo::simulation::trainer::Trainer;

fn create_test_params() -> Params {
    Params {
        seed: Some(7),
        population_size: 10,
        max_ticks: Some(300),
        fitness_threshold: None,
        ..Params::default()
    }
}

fn never_jump(_: &Sensors) -> f32 {
    0.0
}

fn sensors() -> Sensors {
    Sensors {
        y: 350.0,
        gap_distance: 40.0,
        bottom_distance: 160.0,
    }
}

#[test]
fn test_brain_output_is_bounded() {
    let mut brain = Brain::new(&[3, 6, 1], 1.0);
    let output = brain.decide(&sensors()).unwrap();
    assert!((-1.0..=1.0).contains(&output));
}

#[test]
fn test_brain_rejects_wrong_input_size() {
    let mut brain = Brain::new(&[4, 2, 1], 1.0);
    let err = brain.decide(&sensors()).unwrap_err();
    assert!(matches!(
        err,
        ControllerError::InputSize {
            expected: 4,
            actual: 3
        }
    ));
}

#[test]
fn test_crossover_of_identical_parents_is_identity() {
    let brain = Brain::new(&[3, 6, 1], 1.0);
    let child = Brain::crossover(&brain, &brain);
    assert!(Brain::distance(&brain, &child) < 1e-5);
}

#[test]
fn test_mutation_moves_brain() {
    let brain = Brain::new(&[3, 6, 1], 1.0);
    let mut mutated = brain.clone();
    mutated.mutate(0.5);
    assert!(Brain::distance(&brain, &mutated) > 0.0);

    let mut untouched = brain.clone();
    untouched.mutate(0.0);
    assert_eq!(untouched, brain);
}

#[test]
fn test_distance_between_layouts_is_infinite() {
    let a = Brain::new(&[3, 6, 1], 1.0);
    let b = Brain::new(&[3, 4, 1], 1.0);
    assert!(Brain::distance(&a, &b).is_infinite());
}

#[test]
fn test_seed_population() {
    let params = create_test_params();
    let mut optimizer = PopulationOptimizer::new(&params);
    let population = optimizer.seed_population();

    assert_eq!(population.len(), params.population_size);
    assert_eq!(optimizer.next_id(), params.population_size);
    let ids: HashSet<usize> = population.iter().map(|c| c.id).collect();
    assert_eq!(ids.len(), population.len());
    assert!(population.iter().all(|c| c.fitness == 0.0));
}

#[test]
fn test_next_generation_keeps_elites() {
    let params = create_test_params();
    let mut optimizer = PopulationOptimizer::new(&params);
    let mut population = optimizer.seed_population();
    for (i, candidate) in population.iter_mut().enumerate() {
        candidate.fitness = i as f32;
    }

    let next = optimizer.next_generation(&population);

    assert_eq!(next.len(), params.population_size);
    assert_eq!(next[0].id, 9);
    assert_eq!(next[1].id, 8);
    assert_eq!(next[0].controller, population[9].controller);
    assert!(next.iter().all(|c| c.fitness == 0.0));

    // Children get fresh ids.
    for child in &next[params.elite_count..] {
        assert!(child.id >= params.population_size);
    }
    assert_eq!(
        optimizer.next_id(),
        2 * params.population_size - params.elite_count
    );
}

#[test]
fn test_islands_fly_the_same_course() {
    let params = create_test_params();
    let mut candidates: Vec<Candidate<FnController<fn(&Sensors) -> f32>>> = (0..10)
        .map(|id| Candidate::new(id, FnController(never_jump as fn(&Sensors) -> f32)))
        .collect();

    let reports =
        evaluate_islands(&params, &mut candidates, 4, 5, 99, &AtomicBool::new(false)).unwrap();

    assert_eq!(reports.len(), 4);
    for report in &reports {
        assert_eq!(report.generation, 5);
        assert_eq!(report.outcome, Outcome::Extinct);
        assert_eq!(report.ticks, 23);
    }
    let first = candidates[0].fitness;
    assert!(candidates.iter().all(|c| c.fitness == first));
}

#[test]
fn test_more_islands_than_candidates() {
    let params = create_test_params();
    let mut candidates: Vec<Candidate<FnController<fn(&Sensors) -> f32>>> = (0..3)
        .map(|id| Candidate::new(id, FnController(never_jump as fn(&Sensors) -> f32)))
        .collect();

    let reports =
        evaluate_islands(&params, &mut candidates, 8, 0, 1, &AtomicBool::new(false)).unwrap();
    assert_eq!(reports.len(), 3);
}

#[test]
fn test_trainer_runs_generations() {
    let params = create_test_params();
    let mut trainer = Trainer::new(params.clone(), 2).unwrap();

    let summary = trainer.run(3, &AtomicBool::new(false)).unwrap();

    assert_eq!(summary.generations_run, 3);
    assert!(!summary.solved);
    assert!(!summary.interrupted);
    assert_eq!(trainer.generation(), 3);
    assert_eq!(trainer.history().generations.len(), 3);
    assert_eq!(trainer.population().len(), params.population_size);

    let champion = trainer.champion().unwrap();
    let best_seen = trainer.history().best().unwrap().best_fitness;
    assert_eq!(champion.fitness, best_seen);
    assert_eq!(summary.champion_fitness, Some(champion.fitness));
}

#[test]
fn test_trainer_stops_at_fitness_threshold() {
    let params = Params {
        fitness_threshold: Some(1.0),
        ..create_test_params()
    };
    let mut trainer = Trainer::new(params, 1).unwrap();

    let summary = trainer.run(10, &AtomicBool::new(false)).unwrap();

    assert!(summary.solved);
    assert_eq!(summary.generations_run, 1);
}

#[test]
fn test_trainer_honours_stop_signal() {
    let mut trainer = Trainer::new(create_test_params(), 1).unwrap();
    let population_before: Vec<usize> = trainer.population().iter().map(|c| c.id).collect();

    let summary = trainer.run(5, &AtomicBool::new(true)).unwrap();

    assert!(summary.interrupted);
    assert_eq!(summary.generations_run, 0);
    assert_eq!(trainer.generation(), 0);
    let population_after: Vec<usize> = trainer.population().iter().map(|c| c.id).collect();
    assert_eq!(population_before, population_after);
}
