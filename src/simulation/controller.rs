//! Controllers decide, from sensor input, whether an agent ascends.
//!
//! The environment never looks inside a controller. Whatever supplies the
//! population owns the [`Candidate`] records across generations and reads
//! `fitness` back once a generation has finished.

use serde::{Deserialize, Serialize};

use super::error::ControllerError;
use super::sensors::Sensors;

/// Maps a sensor vector to a scalar decision.
///
/// Outputs above the configured threshold trigger an ascend. Errors are not
/// swallowed: they abort the tick and surface to the driver.
pub trait Controller {
    /// Decides on the action for one tick.
    fn decide(&mut self, sensors: &Sensors) -> Result<f32, ControllerError>;
}

impl<C: Controller + ?Sized> Controller for Box<C> {
    fn decide(&mut self, sensors: &Sensors) -> Result<f32, ControllerError> {
        (**self).decide(sensors)
    }
}

/// Adapts a closure into a [`Controller`].
#[derive(Debug, Clone, Copy)]
pub struct FnController<F>(pub F);

impl<F> Controller for FnController<F>
where
    F: FnMut(&Sensors) -> f32,
{
    fn decide(&mut self, sensors: &Sensors) -> Result<f32, ControllerError> {
        Ok((self.0)(sensors))
    }
}

/// A controller paired with the fitness it earned in the current generation.
///
/// The candidate outlives its agent: fitness written after the agent is
/// retired still lands here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate<C> {
    /// Identifier assigned by the optimizer.
    pub id: usize,
    /// Policy driving the candidate's agent.
    pub controller: C,
    /// Fitness accumulated in the current generation.
    pub fitness: f32,
}

impl<C> Candidate<C> {
    /// Wraps a controller with zero fitness.
    pub fn new(id: usize, controller: C) -> Self {
        Self {
            id,
            controller,
            fitness: 0.0,
        }
    }
}
