use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use tracing::info;

use flappy_evo::simulation::checkpoint::Checkpoint;
use flappy_evo::simulation::evaluator::Evaluator;
use flappy_evo::simulation::params::Params;
use flappy_evo::simulation::telemetry::{RealtimeSink, TracingSink};
use flappy_evo::simulation::trainer::Trainer;

/// Tick cap applied to training when neither the CLI nor the config sets one.
const DEFAULT_TRAIN_TICK_CAP: u64 = 20_000;

#[derive(Debug, Parser)]
#[command(name = "flappy-evo", about = "Evolve controllers that play Flappy Bird")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Train a population, optionally resuming from a checkpoint.
    Train {
        /// JSON parameter file; defaults are used for missing fields.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Checkpoint to resume from.
        #[arg(long)]
        resume: Option<PathBuf>,
        /// Number of generations to run.
        #[arg(long, default_value_t = 20)]
        generations: u32,
        /// Overrides the population size.
        #[arg(long)]
        population: Option<usize>,
        /// Environments evaluated in parallel per generation.
        #[arg(long, default_value_t = 1)]
        islands: usize,
        /// Overrides the obstacle course seed.
        #[arg(long)]
        seed: Option<u64>,
        /// Caps the ticks of a single generation.
        #[arg(long)]
        max_ticks: Option<u64>,
        /// Stops training after this many seconds of wall-clock time.
        #[arg(long)]
        time_limit: Option<u64>,
        /// Where to write the final checkpoint.
        #[arg(long, default_value = "checkpoint.json")]
        checkpoint: PathBuf,
    },
    /// Fly the champion of a checkpoint alone and report its score.
    Replay {
        /// Checkpoint holding the champion.
        checkpoint: PathBuf,
        /// Obstacle course seed.
        #[arg(long)]
        seed: Option<u64>,
        /// Caps the ticks of the replay.
        #[arg(long, default_value_t = 10_000)]
        max_ticks: u64,
        /// Paces the replay at the configured tick rate.
        #[arg(long)]
        realtime: bool,
    },
    /// Print the default parameters as JSON.
    DefaultConfig,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Train {
            config,
            resume,
            generations,
            population,
            islands,
            seed,
            max_ticks,
            time_limit,
            checkpoint,
        } => {
            let mut trainer = match resume {
                Some(path) => {
                    let saved = Checkpoint::load_from_file(&path)
                        .with_context(|| format!("loading checkpoint {}", path.display()))?;
                    info!(generation = saved.generation, "resuming from checkpoint");
                    Trainer::from_checkpoint(saved, islands)?
                }
                None => {
                    let mut params = match config {
                        Some(path) => Params::from_json_file(&path)?,
                        None => Params::default(),
                    };
                    if let Some(size) = population {
                        params.population_size = size;
                    }
                    params.seed = seed.or(params.seed);
                    params.max_ticks = max_ticks
                        .or(params.max_ticks)
                        .or(Some(DEFAULT_TRAIN_TICK_CAP));
                    Trainer::new(params, islands)?
                }
            };

            let stop = Arc::new(AtomicBool::new(false));
            if let Some(secs) = time_limit {
                spawn_deadline(Arc::clone(&stop), Duration::from_secs(secs));
            }
            let summary = trainer.run(generations, &stop)?;
            info!(
                generations = summary.generations_run,
                champion = ?summary.champion_fitness,
                solved = summary.solved,
                interrupted = summary.interrupted,
                "training finished"
            );

            trainer
                .checkpoint()
                .save_to_file(&checkpoint)
                .with_context(|| format!("writing checkpoint {}", checkpoint.display()))?;
            info!(path = %checkpoint.display(), "checkpoint saved");
        }
        Command::Replay {
            checkpoint,
            seed,
            max_ticks,
            realtime,
        } => {
            let saved = Checkpoint::load_from_file(&checkpoint)
                .with_context(|| format!("loading checkpoint {}", checkpoint.display()))?;
            let champion = saved
                .champion
                .ok_or_else(|| anyhow!("checkpoint has no champion yet"))?;

            let mut params = saved.params;
            params.max_ticks = Some(max_ticks);
            if seed.is_some() {
                params.seed = seed;
            }

            let tick_rate = params.tick_rate;
            let mut evaluator = Evaluator::new(params)?;
            let mut candidates = vec![champion];
            let stop = AtomicBool::new(false);
            let report = if realtime {
                evaluator.run(&mut candidates, RealtimeSink::new(TracingSink, tick_rate), &stop)?
            } else {
                evaluator.run(&mut candidates, TracingSink, &stop)?
            };
            info!(
                score = report.score,
                ticks = report.ticks,
                fitness = report.best_fitness,
                outcome = ?report.outcome,
                "replay finished"
            );
        }
        Command::DefaultConfig => {
            println!("{}", serde_json::to_string_pretty(&Params::default())?);
        }
    }

    Ok(())
}

/// Raises `stop` once `after` has elapsed; the trainer notices between ticks.
fn spawn_deadline(stop: Arc<AtomicBool>, after: Duration) {
    std::thread::spawn(move || {
        std::thread::sleep(after);
        stop.store(true, Ordering::Relaxed);
    });
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
