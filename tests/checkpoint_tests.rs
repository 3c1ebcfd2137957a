#![allow(missing_docs)]

use std::sync::atomic::AtomicBool;

use flappy_evo::simulation::checkpoint::Checkpoint;
use flappy_evo::simulation::error::{CheckpointError, ConfigError};
use flappy_evo::simulation::params::Params;
use flappy_evo::simulation::trainer::Trainer;

fn create_test_params() -> Params {
    Params {
        seed: Some(3),
        population_size: 6,
        max_ticks: Some(200),
        fitness_threshold: None,
        ..Params::default()
    }
}

#[test]
fn test_checkpoint_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("checkpoint.json");

    let mut trainer = Trainer::new(create_test_params(), 1).unwrap();
    trainer.run(2, &AtomicBool::new(false)).unwrap();
    let checkpoint = trainer.checkpoint();
    checkpoint.save_to_file(&path).unwrap();

    let loaded = Checkpoint::load_from_file(&path).unwrap();
    assert_eq!(loaded.generation, 2);
    assert_eq!(loaded.next_id, checkpoint.next_id);
    assert_eq!(loaded.params, checkpoint.params);
    assert_eq!(loaded.population.len(), 6);
    assert_eq!(
        loaded.champion.as_ref().map(|c| c.id),
        checkpoint.champion.as_ref().map(|c| c.id)
    );
    assert_eq!(loaded.history.generations.len(), 2);
}

#[test]
fn test_resume_from_checkpoint() {
    let mut trainer = Trainer::new(create_test_params(), 1).unwrap();
    trainer.run(1, &AtomicBool::new(false)).unwrap();
    let checkpoint = trainer.checkpoint();
    let ids: Vec<usize> = checkpoint.population.iter().map(|c| c.id).collect();

    let mut resumed = Trainer::from_checkpoint(checkpoint, 1).unwrap();
    assert_eq!(resumed.generation(), 1);
    assert_eq!(
        resumed.population().iter().map(|c| c.id).collect::<Vec<_>>(),
        ids
    );

    resumed.run(1, &AtomicBool::new(false)).unwrap();
    assert_eq!(resumed.generation(), 2);
    assert_eq!(resumed.history().generations.len(), 2);
}

#[test]
fn test_missing_checkpoint_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");

    match Checkpoint::load_from_file(&path) {
        Err(CheckpointError::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected an I/O error, got {other:?}"),
    }
}

#[test]
fn test_partial_config_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("params.json");
    std::fs::write(&path, r#"{ "gap": 150, "seed": 9 }"#).unwrap();

    let params = Params::from_json_file(&path).unwrap();
    assert_eq!(params.gap, 150);
    assert_eq!(params.seed, Some(9));
    assert_eq!(params.scroll_speed, Params::default().scroll_speed);
    assert_eq!(params.layer_sizes, Params::default().layer_sizes);
}

#[test]
fn test_malformed_config_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("params.json");
    std::fs::write(&path, "{ gap: ").unwrap();

    assert!(matches!(
        Params::from_json_file(&path),
        Err(ConfigError::Parse { .. })
    ));
}

#[test]
fn test_invalid_config_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("params.json");
    std::fs::write(&path, r#"{ "gap_center_min": 500 }"#).unwrap();

    assert!(matches!(
        Params::from_json_file(&path),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn test_missing_config_is_an_io_error() {
    assert!(matches!(
        Params::from_json_file("/nonexistent/flappy/params.json"),
        Err(ConfigError::Io { .. })
    ));
}
