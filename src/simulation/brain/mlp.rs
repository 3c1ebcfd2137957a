//! Fully connected tanh layer used by [`super::Brain`].

use ndarray::{Array1, Array2, Zip};
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;
use serde::{Deserialize, Serialize};

/// One dense layer: `tanh(weights · input + biases)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mlp {
    /// Weight matrix, one row per output.
    pub weights: Array2<f32>,
    /// Bias per output.
    pub biases: Array1<f32>,
}

impl Mlp {
    /// Layer mapping `input_size` sensors or activations to `output_size`
    /// outputs, every parameter uniform in `[-scale, scale)`.
    pub fn new_random(input_size: usize, output_size: usize, scale: f32) -> Self {
        let dist = Uniform::new(-scale, scale);
        Self {
            weights: Array2::random((output_size, input_size), dist),
            biases: Array1::random(output_size, dist),
        }
    }

    /// Number of inputs the layer consumes.
    pub fn input_size(&self) -> usize {
        self.weights.ncols()
    }

    /// Number of outputs the layer produces.
    pub fn output_size(&self) -> usize {
        self.weights.nrows()
    }

    /// Weights plus biases.
    pub fn parameter_count(&self) -> usize {
        self.weights.len() + self.biases.len()
    }

    /// Whether two layers can be blended parameter by parameter.
    pub fn same_shape(&self, other: &Mlp) -> bool {
        self.weights.dim() == other.weights.dim()
    }

    /// Squashes `inputs` through the layer. Outputs lie in `(-1, 1)`.
    #[inline]
    pub fn forward(&self, inputs: &Array1<f32>) -> Array1<f32> {
        (self.weights.dot(inputs) + &self.biases).mapv_into(f32::tanh)
    }

    /// Perturbs every parameter by uniform noise in `[-scale, scale)`.
    ///
    /// A non-positive scale leaves the layer untouched.
    pub fn mutate(&mut self, scale: f32) {
        if scale <= 0.0 {
            return;
        }
        let dist = Uniform::new(-scale, scale);
        self.weights += &Array2::random(self.weights.dim(), dist);
        self.biases += &Array1::random(self.biases.len(), dist);
    }

    /// Child layer interpolated between two parents of the same shape.
    ///
    /// `weight1` is the share of `parent1`; `1.0` reproduces it exactly.
    pub fn crossover_weighted(parent1: &Mlp, parent2: &Mlp, weight1: f32) -> Self {
        let mix = |a: &f32, b: &f32| a * weight1 + b * (1.0 - weight1);
        Self {
            weights: Zip::from(&parent1.weights)
                .and(&parent2.weights)
                .map_collect(mix),
            biases: Zip::from(&parent1.biases)
                .and(&parent2.biases)
                .map_collect(mix),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_weight_crossover_copies_first_parent() {
        let a = Mlp::new_random(3, 4, 1.0);
        let b = Mlp::new_random(3, 4, 1.0);
        let child = Mlp::crossover_weighted(&a, &b, 1.0);
        assert_eq!(child, a);
    }

    #[test]
    fn forward_is_squashed() {
        let layer = Mlp::new_random(3, 5, 10.0);
        let out = layer.forward(&Array1::from_vec(vec![400.0, -250.0, 90.0]));
        assert_eq!(out.len(), 5);
        assert!(out.iter().all(|v| (-1.0..=1.0).contains(v)));
        assert_eq!(layer.parameter_count(), 3 * 5 + 5);
    }
}
