//! Feed-forward neural network used as the default controller.
//!
//! Brains support the genetic operations the population optimizer needs:
//! mutation, weighted crossover and a parameter-space distance.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::controller::Controller;
use super::error::ControllerError;
use super::sensors::Sensors;

pub mod mlp;

pub use mlp::Mlp;

/// Multi-layer perceptron with tanh activation on every layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brain {
    /// Ordered layers from input to output.
    pub layers: Vec<Mlp>,
}

impl Brain {
    /// Creates a new brain with random weights.
    ///
    /// # Arguments
    ///
    /// * `layer_sizes` - Layer dimensions, input first (at least two entries)
    /// * `scale` - Range of the initial uniform weights
    pub fn new(layer_sizes: &[usize], scale: f32) -> Self {
        let layers = layer_sizes
            .windows(2)
            .map(|pair| Mlp::new_random(pair[0], pair[1], scale))
            .collect();

        Self { layers }
    }

    /// Number of inputs the brain expects.
    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, Mlp::input_size)
    }

    /// Runs a forward pass through the brain.
    #[inline]
    pub fn think(&self, inputs: &Array1<f32>) -> Array1<f32> {
        let mut output = inputs.clone();
        for layer in &self.layers {
            output = layer.forward(&output);
        }
        output
    }

    /// Creates a new brain by averaging two parent brains.
    pub fn crossover(parent1: &Brain, parent2: &Brain) -> Self {
        Self::crossover_weighted(parent1, parent2, 0.5)
    }

    /// Creates a new brain by weighted averaging of two parents.
    ///
    /// `weight1` is the share of `parent1`. Parents with a different layer
    /// layout cannot be blended; a clone of `parent1` is returned instead.
    pub fn crossover_weighted(parent1: &Brain, parent2: &Brain, weight1: f32) -> Self {
        if !same_shape(parent1, parent2) {
            return parent1.clone();
        }

        let layers = parent1
            .layers
            .iter()
            .zip(&parent2.layers)
            .map(|(layer1, layer2)| Mlp::crossover_weighted(layer1, layer2, weight1))
            .collect();
        Self { layers }
    }

    /// Mutates all parameters in the brain.
    pub fn mutate(&mut self, mutation_scale: f32) {
        for layer in &mut self.layers {
            layer.mutate(mutation_scale);
        }
    }

    /// Euclidean distance between two brains in parameter space.
    ///
    /// Brains with a different layer layout are infinitely far apart.
    pub fn distance(brain1: &Brain, brain2: &Brain) -> f32 {
        if !same_shape(brain1, brain2) {
            return f32::INFINITY;
        }

        brain1
            .to_flat_vector()
            .iter()
            .zip(brain2.to_flat_vector())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f32>()
            .sqrt()
    }

    /// Flattens all weights and biases into a single vector.
    pub fn to_flat_vector(&self) -> Vec<f32> {
        let mut flat = Vec::with_capacity(self.layers.iter().map(Mlp::parameter_count).sum());
        for layer in &self.layers {
            flat.extend(layer.weights.iter().copied());
            flat.extend(layer.biases.iter().copied());
        }
        flat
    }
}

impl Controller for Brain {
    fn decide(&mut self, sensors: &Sensors) -> Result<f32, ControllerError> {
        let inputs = sensors.to_array();
        if inputs.len() != self.input_size() {
            return Err(ControllerError::InputSize {
                expected: self.input_size(),
                actual: inputs.len(),
            });
        }
        let output = self.think(&inputs);
        Ok(output.first().copied().unwrap_or(0.0))
    }
}

fn same_shape(a: &Brain, b: &Brain) -> bool {
    a.layers.len() == b.layers.len()
        && a
            .layers
            .iter()
            .zip(&b.layers)
            .all(|(l1, l2)| l1.same_shape(l2))
}
