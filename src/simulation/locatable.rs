//! Trait for entities that have a position and advance once per tick.
//!
//! Agents, obstacles and the ground strip all move on the simulation's
//! logical clock; this trait is the common interface the environment drives.

use geo::Coord;

use super::params::Params;

/// Trait for entities with a position that advance by one tick at a time.
///
/// Any type that implements this trait:
/// - Has a top-left position in playfield coordinates (y grows downwards)
/// - Can be advanced by exactly one logical tick
pub trait Locatable {
    /// Returns the entity's top-left position.
    fn pos(&self) -> Coord<f32>;

    /// Advances the entity's state by one tick.
    ///
    /// # Arguments
    ///
    /// * `params` - Simulation parameters (speeds, gravity, clamps).
    fn advance(&mut self, params: &Params);
}
