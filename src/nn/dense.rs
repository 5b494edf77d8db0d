//! Fully connected (dense) layer.
//!
//! Implements the transformation z = xW^T + b with an attached activation.

use super::init::kaiming_uniform;
use crate::primitives::{Matrix, Vector};
use serde::{Deserialize, Serialize};

/// Activation applied to a layer's pre-activations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    /// ReLU(x) = max(0, x), used for the hidden layers.
    Relu,
    /// Row-wise softmax, used for the output layer.
    Softmax,
}

impl Activation {
    /// Name as recorded in artifact metadata.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Activation::Relu => "relu",
            Activation::Softmax => "softmax",
        }
    }

    /// Applies the activation to a batch of pre-activations.
    #[must_use]
    pub fn apply(self, z: &Matrix<f32>) -> Matrix<f32> {
        match self {
            Activation::Relu => {
                let data: Vec<f32> = z.as_slice().iter().map(|&x| x.max(0.0)).collect();
                let (rows, cols) = z.shape();
                Matrix::from_vec(rows, cols, data).expect("data length matches rows * cols")
            }
            Activation::Softmax => {
                let (rows, cols) = z.shape();
                let mut out = Matrix::zeros(rows, cols);
                for r in 0..rows {
                    let probs = softmax_1d(z.row_slice(r));
                    for (c, &p) in probs.iter().enumerate() {
                        out.set(r, c, p);
                    }
                }
                out
            }
        }
    }

    /// Propagates an upstream gradient through the activation.
    ///
    /// For ReLU this masks `delta` with the derivative at `z`. Softmax is
    /// only ever paired with cross-entropy, whose gradient is already taken
    /// with respect to the pre-activations, so it passes `delta` through.
    #[must_use]
    pub fn backward(self, delta: &Matrix<f32>, z: &Matrix<f32>) -> Matrix<f32> {
        match self {
            Activation::Relu => {
                let data: Vec<f32> = delta
                    .as_slice()
                    .iter()
                    .zip(z.as_slice())
                    .map(|(&d, &zv)| if zv > 0.0 { d } else { 0.0 })
                    .collect();
                let (rows, cols) = delta.shape();
                Matrix::from_vec(rows, cols, data).expect("data length matches rows * cols")
            }
            Activation::Softmax => delta.clone(),
        }
    }
}

/// Numerically stable softmax on one row of logits.
#[must_use]
pub(crate) fn softmax_1d(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b));
    let exp: Vec<f32> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exp.iter().sum();
    exp.iter().map(|&x| x / sum).collect()
}

/// Fully connected layer: z = xW^T + b, a = act(z).
///
/// # Shape
///
/// - Input: `(batch, in_features)`
/// - Output: `(batch, out_features)`
///
/// Weight initialization follows Kaiming/He (He et al., 2015); biases start
/// at zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dense {
    /// Weight matrix, shape: [out_features, in_features]
    weight: Matrix<f32>,
    /// Bias vector, shape: [out_features]
    bias: Vector<f32>,
    activation: Activation,
}

impl Dense {
    /// Create a new Dense layer with Kaiming initialization.
    pub fn new(
        in_features: usize,
        out_features: usize,
        activation: Activation,
        seed: Option<u64>,
    ) -> Self {
        Self {
            weight: kaiming_uniform(out_features, in_features, seed),
            bias: Vector::zeros(out_features),
            activation,
        }
    }

    /// Get the input feature dimension.
    #[must_use]
    pub fn in_features(&self) -> usize {
        self.weight.n_cols()
    }

    /// Get the output feature dimension.
    #[must_use]
    pub fn out_features(&self) -> usize {
        self.weight.n_rows()
    }

    /// Get reference to the weight matrix.
    #[must_use]
    pub fn weight(&self) -> &Matrix<f32> {
        &self.weight
    }

    /// Get reference to the bias vector.
    #[must_use]
    pub fn bias(&self) -> &Vector<f32> {
        &self.bias
    }

    /// The activation attached to this layer.
    #[must_use]
    pub fn activation(&self) -> Activation {
        self.activation
    }

    /// Set weight matrix from external data (e.g. a loaded checkpoint).
    pub fn set_weight(&mut self, weight: Matrix<f32>) {
        self.weight = weight;
    }

    /// Set bias vector from external data.
    pub fn set_bias(&mut self, bias: Vector<f32>) {
        self.bias = bias;
    }

    /// Mutable views of the flat parameter buffers, ordered (weight, bias).
    ///
    /// Used by the optimizer to apply in-place updates.
    pub fn params_mut(&mut self) -> (&mut [f32], &mut [f32]) {
        (self.weight.as_mut_slice(), self.bias.as_mut_slice())
    }

    /// Total number of learnable parameters.
    #[must_use]
    pub fn num_parameters(&self) -> usize {
        self.weight.as_slice().len() + self.bias.len()
    }

    /// Forward pass for a batch: returns (pre-activations, activations).
    ///
    /// # Panics
    ///
    /// Panics if `input` column count differs from `in_features`.
    #[must_use]
    pub fn forward(&self, input: &Matrix<f32>) -> (Matrix<f32>, Matrix<f32>) {
        assert_eq!(
            input.n_cols(),
            self.in_features(),
            "input columns must match in_features"
        );

        let (batch, _) = input.shape();
        let out = self.out_features();
        let mut z = Matrix::zeros(batch, out);
        for b in 0..batch {
            let x_row = input.row_slice(b);
            for o in 0..out {
                let w_row = self.weight.row_slice(o);
                let mut sum = self.bias[o];
                for (w, x) in w_row.iter().zip(x_row) {
                    sum += w * x;
                }
                z.set(b, o, sum);
            }
        }

        let a = self.activation.apply(&z);
        (z, a)
    }
}
