//! The environment a generation of agents is evaluated in.
//!
//! One environment owns the agents and obstacles of exactly one generation.
//! Each call to [`Environment::tick`] runs the full per-tick protocol:
//! target selection, controller decisions, obstacle movement, collisions,
//! scoring and retirement.
//!
//! Agents are bound to candidates by index. Retired agents are marked dead
//! while the tick is being resolved and compacted away at its end, so no
//! neighbour is skipped and fitness always lands on the caller's candidate.

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::agent::Agent;
use super::collision::{CollisionShape, Hitbox};
use super::controller::{Candidate, Controller};
use super::error::EvalError;
use super::events::TickEvent;
use super::ground::Ground;
use super::locatable::Locatable;
use super::obstacle::Obstacle;
use super::params::Params;
use super::sensors::Sensors;
use super::telemetry::Frame;

/// A live agent bound to the candidate that controls it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentSlot {
    /// Physics state of the bird.
    pub agent: Agent,
    /// Index of the controlling candidate in the evaluated slice.
    pub candidate: usize,
    /// Cleared when the agent is retired; dead slots are compacted at tick end.
    pub alive: bool,
}

/// Simulation state for one generation.
#[derive(Debug)]
pub struct Environment {
    /// Live agents, one per surviving candidate.
    pub agents: Vec<AgentSlot>,
    /// Obstacles ordered left to right.
    pub obstacles: Vec<Obstacle>,
    /// Cosmetic ground strip.
    pub ground: Ground,
    /// Obstacles passed so far.
    pub score: u32,
    /// Generation this environment evaluates.
    pub generation: u32,
    /// Ticks completed.
    pub ticks: u64,
    population: usize,
    events: Vec<TickEvent>,
    params: Params,
    agent_shape: Box<dyn CollisionShape>,
    barrier_shape: Hitbox,
    rng: StdRng,
}

impl Environment {
    /// Creates an environment with one agent per candidate and a single obstacle.
    ///
    /// # Arguments
    ///
    /// * `params` - Simulation parameters (validated here)
    /// * `population` - Number of candidates; must be non-zero
    /// * `generation` - Generation number reported to telemetry
    /// * `seed` - Seed for obstacle gap generation
    pub fn new(
        params: &Params,
        population: usize,
        generation: u32,
        seed: u64,
    ) -> Result<Self, EvalError> {
        if population == 0 {
            return Err(EvalError::EmptyPopulation);
        }
        params.validate()?;

        let mut rng = StdRng::seed_from_u64(seed);
        let agents = (0..population)
            .map(|candidate| AgentSlot {
                agent: Agent::spawn(params),
                candidate,
                alive: true,
            })
            .collect();
        let obstacles = vec![Obstacle::new(params.first_obstacle_x, params, &mut rng)];

        Ok(Self {
            agents,
            obstacles,
            ground: Ground::new(params),
            score: 0,
            generation,
            ticks: 0,
            population,
            events: Vec::new(),
            params: params.clone(),
            agent_shape: params
                .agent_mask
                .build(params.agent_width, params.agent_height),
            barrier_shape: Hitbox::new(params.barrier_width, params.barrier_height),
            rng,
        })
    }

    /// Parameters the environment was built with.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Number of candidates the environment was built for.
    pub fn population(&self) -> usize {
        self.population
    }

    /// Events recorded during the most recent tick.
    pub fn events(&self) -> &[TickEvent] {
        &self.events
    }

    /// Number of agents still alive.
    pub fn live_count(&self) -> usize {
        self.agents.iter().filter(|slot| slot.alive).count()
    }

    /// A generation ends once every agent has been retired.
    pub fn is_finished(&self) -> bool {
        self.agents.is_empty()
    }

    /// Index of the obstacle every agent senses this tick.
    ///
    /// Normally the leftmost obstacle. Once the reference agent (the first
    /// live one) has flown past its right edge and another obstacle exists,
    /// sensing switches to the second obstacle. The same target is shared by
    /// all agents.
    pub fn target_index(&self) -> usize {
        match self.agents.first() {
            Some(reference)
                if self.obstacles.len() > 1
                    && reference.agent.x > self.obstacles[0].right_edge(&self.params) =>
            {
                1
            }
            _ => 0,
        }
    }

    /// Advances the simulation by one tick.
    ///
    /// Fitness deltas are written to `candidates`, which must be the slice the
    /// environment was built for. A controller error aborts the tick and is
    /// returned unchanged inside [`EvalError::Controller`]. Valid parameters
    /// always leave an obstacle to sense; an empty course is reported as
    /// [`EvalError::NoObstacles`].
    pub fn tick<C: Controller>(&mut self, candidates: &mut [Candidate<C>]) -> Result<(), EvalError> {
        if candidates.len() != self.population {
            return Err(EvalError::PopulationMismatch {
                expected: self.population,
                actual: candidates.len(),
            });
        }

        self.events.clear();
        self.ticks += 1;

        let Some(target) = self.obstacles.get(self.target_index()).copied() else {
            return Err(EvalError::NoObstacles { tick: self.ticks });
        };
        let params = &self.params;

        // decisions and motion
        for slot in &mut self.agents {
            let candidate = &mut candidates[slot.candidate];
            candidate.fitness += params.survival_reward;
            slot.agent.advance(params);

            let sensors = Sensors::read(&slot.agent, &target);
            let output = candidate
                .controller
                .decide(&sensors)
                .map_err(|source| EvalError::Controller {
                    candidate: slot.candidate,
                    source,
                })?;

            if output > params.ascend_threshold {
                slot.agent.ascend(params);
            }
        }

        self.ground.advance(params);

        // obstacle movement and collisions
        let mut passed = false;
        for obstacle in &mut self.obstacles {
            obstacle.advance(params);

            for slot in self.agents.iter_mut().filter(|slot| slot.alive) {
                if obstacle.collides_with(&slot.agent, self.agent_shape.as_ref(), &self.barrier_shape)
                {
                    slot.alive = false;
                    candidates[slot.candidate].fitness -= params.collision_penalty;
                    self.events.push(TickEvent::AgentCollided {
                        candidate: slot.candidate,
                        obstacle_x: obstacle.x,
                    });
                }
            }

            if !obstacle.passed && obstacle.x < params.agent_x {
                obstacle.passed = true;
                passed = true;
            }
        }

        if passed {
            self.score += 1;

            let mut rewarded = 0;
            for slot in self.agents.iter().filter(|slot| slot.alive) {
                candidates[slot.candidate].fitness += params.pass_reward;
                rewarded += 1;
            }
            self.events.push(TickEvent::ObstaclePassed {
                score: self.score,
                rewarded,
            });

            let obstacle = Obstacle::new(params.spawn_x, params, &mut self.rng);
            self.events.push(TickEvent::ObstacleSpawned {
                x: obstacle.x,
                gap_center: obstacle.gap_center(),
            });
            self.obstacles.push(obstacle);
        }

        // retirement
        let events = &mut self.events;
        self.obstacles.retain(|obstacle| {
            let off_screen = obstacle.is_off_screen(params);
            if off_screen {
                events.push(TickEvent::ObstacleRetired {
                    gap_center: obstacle.gap_center(),
                });
            }
            !off_screen
        });

        for slot in self.agents.iter_mut().filter(|slot| slot.alive) {
            if slot.agent.is_out_of_bounds(params) {
                slot.alive = false;
                events.push(TickEvent::AgentLeftBounds {
                    candidate: slot.candidate,
                    y: slot.agent.y,
                });
            }
        }
        self.agents.retain(|slot| slot.alive);

        trace!(
            generation = self.generation,
            tick = self.ticks,
            alive = self.agents.len(),
            score = self.score,
            obstacles = self.obstacles.len(),
            "tick resolved"
        );

        Ok(())
    }

    /// Snapshot of the current state for telemetry and rendering.
    pub fn frame(&self) -> Frame<'_> {
        Frame {
            agents: &self.agents,
            obstacles: &self.obstacles,
            ground: &self.ground,
            score: self.score,
            generation: self.generation,
            live_count: self.live_count(),
            tick: self.ticks,
            events: &self.events,
        }
    }
}
