//! The NEURA9 classifier model and its native checkpoint form.
//!
//! The topology is fixed: input -> dense(64, relu) -> dense(64, relu) ->
//! dense(32, relu) -> dense(`num_classes`, softmax). It is intentionally
//! small; the inference target is a microcontroller with a hard memory and
//! compute budget, and the layer sizes are part of that budget.

use crate::error::{Neura9Error, Result};
use crate::nn::{Activation, Dense};
use crate::primitives::Matrix;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Hidden layer widths, input to output.
const HIDDEN_SIZES: [usize; 3] = [64, 64, 32];

/// A feed-forward multi-layer perceptron classifier.
///
/// Created untrained by [`Mlp::classifier`], fitted in place by
/// [`crate::train::fit`], then handed to [`crate::format::convert`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mlp {
    layers: Vec<Dense>,
    input_dim: usize,
    num_classes: usize,
}

/// Per-layer forward results cached for the backward pass.
///
/// `activations[0]` is the input batch; `activations[i + 1]` and `zs[i]`
/// belong to layer `i`.
pub struct ForwardCache {
    pub zs: Vec<Matrix<f32>>,
    pub activations: Vec<Matrix<f32>>,
}

impl Mlp {
    /// Builds the untrained classifier for the given input dimensionality
    /// and class count.
    ///
    /// Layer seeds are derived from `seed` so a seeded build is fully
    /// reproducible.
    #[must_use]
    pub fn classifier(input_dim: usize, num_classes: usize, seed: Option<u64>) -> Self {
        let mut layers = Vec::with_capacity(HIDDEN_SIZES.len() + 1);
        let mut prev = input_dim;
        for (i, &size) in HIDDEN_SIZES.iter().enumerate() {
            layers.push(Dense::new(
                prev,
                size,
                Activation::Relu,
                seed.map(|s| s.wrapping_add(i as u64)),
            ));
            prev = size;
        }
        layers.push(Dense::new(
            prev,
            num_classes,
            Activation::Softmax,
            seed.map(|s| s.wrapping_add(HIDDEN_SIZES.len() as u64)),
        ));

        Self {
            layers,
            input_dim,
            num_classes,
        }
    }

    /// Number of input features the model expects.
    #[must_use]
    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    /// Number of output classes.
    #[must_use]
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// The layers in forward order.
    #[must_use]
    pub fn layers(&self) -> &[Dense] {
        &self.layers
    }

    /// Mutable access to the layers (optimizer updates).
    pub fn layers_mut(&mut self) -> &mut [Dense] {
        &mut self.layers
    }

    /// Total number of learnable parameters.
    #[must_use]
    pub fn num_parameters(&self) -> usize {
        self.layers.iter().map(Dense::num_parameters).sum()
    }

    /// Forward pass returning class probabilities, shape `(batch, num_classes)`.
    #[must_use]
    pub fn forward(&self, x: &Matrix<f32>) -> Matrix<f32> {
        let mut a = x.clone();
        for layer in &self.layers {
            a = layer.forward(&a).1;
        }
        a
    }

    /// Forward pass keeping per-layer pre-activations and activations for
    /// the backward pass.
    #[must_use]
    pub fn forward_cached(&self, x: &Matrix<f32>) -> ForwardCache {
        let mut zs = Vec::with_capacity(self.layers.len());
        let mut activations = Vec::with_capacity(self.layers.len() + 1);
        activations.push(x.clone());
        let mut current = x.clone();
        for layer in &self.layers {
            let (z, a) = layer.forward(&current);
            zs.push(z);
            activations.push(a.clone());
            current = a;
        }
        ForwardCache { zs, activations }
    }

    /// Predicted class index (argmax) per sample.
    #[must_use]
    pub fn predict(&self, x: &Matrix<f32>) -> Vec<usize> {
        let probs = self.forward(x);
        (0..probs.n_rows())
            .map(|r| {
                let row = probs.row_slice(r);
                let mut best = 0;
                for (c, &p) in row.iter().enumerate() {
                    if p > row[best] {
                        best = c;
                    }
                }
                best
            })
            .collect()
    }

    /// Checks the structural invariants of the model.
    ///
    /// # Errors
    ///
    /// Returns [`Neura9Error::FormatError`] when the layer chain is empty,
    /// the feature dimensions do not chain, the declared input/output sizes
    /// disagree with the layers, or the activations are not relu-hidden /
    /// softmax-output.
    pub fn validate(&self) -> Result<()> {
        if self.layers.is_empty() {
            return Err(Neura9Error::FormatError {
                message: "model has no layers".to_string(),
            });
        }

        let mut prev = self.input_dim;
        for (i, layer) in self.layers.iter().enumerate() {
            if layer.in_features() != prev {
                return Err(Neura9Error::FormatError {
                    message: format!(
                        "layer {i} expects {} inputs, previous layer produces {prev}",
                        layer.in_features()
                    ),
                });
            }
            let expected_activation = if i == self.layers.len() - 1 {
                Activation::Softmax
            } else {
                Activation::Relu
            };
            if layer.activation() != expected_activation {
                return Err(Neura9Error::FormatError {
                    message: format!("layer {i} has unexpected activation"),
                });
            }
            prev = layer.out_features();
        }

        if prev != self.num_classes {
            return Err(Neura9Error::FormatError {
                message: format!(
                    "output layer produces {prev} classes, model declares {}",
                    self.num_classes
                ),
            });
        }
        Ok(())
    }

    /// Persists the model in its native checkpoint form (JSON).
    ///
    /// This is the form the standalone re-export path consumes.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Loads a native checkpoint and validates its structure.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// fails [`Mlp::validate`].
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let model: Mlp = serde_json::from_str(&json)?;
        model.validate()?;
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_classifier_topology() {
        let model = Mlp::classifier(72, 10, Some(1));
        let dims: Vec<(usize, usize)> = model
            .layers()
            .iter()
            .map(|l| (l.in_features(), l.out_features()))
            .collect();
        assert_eq!(dims, vec![(72, 64), (64, 64), (64, 32), (32, 10)]);
        assert_eq!(model.layers().last().unwrap().activation(), Activation::Softmax);
        model.validate().unwrap();
    }

    #[test]
    fn test_forward_shape_and_probabilities() {
        let model = Mlp::classifier(72, 10, Some(2));
        let x = Matrix::zeros(4, 72);
        let probs = model.forward(&x);
        assert_eq!(probs.shape(), (4, 10));
        for r in 0..4 {
            let sum: f32 = probs.row_slice(r).iter().sum();
            assert!((sum - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_predict_in_range() {
        let model = Mlp::classifier(8, 3, Some(3));
        let x = Matrix::from_vec(2, 8, (0..16).map(|i| i as f32).collect()).unwrap();
        let preds = model.predict(&x);
        assert_eq!(preds.len(), 2);
        assert!(preds.iter().all(|&p| p < 3));
    }

    #[test]
    fn test_forward_cached_layout() {
        let model = Mlp::classifier(8, 3, Some(4));
        let x = Matrix::zeros(5, 8);
        let cache = model.forward_cached(&x);
        assert_eq!(cache.zs.len(), 4);
        assert_eq!(cache.activations.len(), 5);
        assert_eq!(cache.activations[0].shape(), (5, 8));
        assert_eq!(cache.activations[4].shape(), (5, 3));
    }

    #[test]
    fn test_seeded_build_reproducible() {
        let a = Mlp::classifier(72, 10, Some(42));
        let b = Mlp::classifier(72, 10, Some(42));
        assert_eq!(
            a.layers()[0].weight().as_slice(),
            b.layers()[0].weight().as_slice()
        );
        // Different layers must not share a weight stream.
        assert_ne!(
            a.layers()[1].weight().as_slice(),
            a.layers()[2].weight().as_slice()
        );
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        let model = Mlp::classifier(72, 10, Some(9));
        model.save(&path).unwrap();

        let loaded = Mlp::load(&path).unwrap();
        assert_eq!(loaded.input_dim(), 72);
        assert_eq!(loaded.num_classes(), 10);
        assert_eq!(
            loaded.layers()[0].weight().as_slice(),
            model.layers()[0].weight().as_slice()
        );
    }

    #[test]
    fn test_load_missing_path_fails() {
        let err = Mlp::load(Path::new("/no/such/model.json")).unwrap_err();
        assert!(matches!(err, Neura9Error::Io(_)));
    }

    #[test]
    fn test_load_rejects_broken_structure() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        let mut model = Mlp::classifier(72, 10, Some(5));
        // Corrupt the chain: swap in a layer with the wrong input width.
        model.layers_mut()[2] = Dense::new(99, 32, Activation::Relu, Some(5));
        let json = serde_json::to_string(&model).unwrap();
        fs::write(&path, json).unwrap();

        let err = Mlp::load(&path).unwrap_err();
        assert!(matches!(err, Neura9Error::FormatError { .. }));
    }

    #[test]
    fn test_num_parameters() {
        let model = Mlp::classifier(72, 10, None);
        // 72*64+64 + 64*64+64 + 64*32+32 + 32*10+10
        assert_eq!(model.num_parameters(), 4672 + 4160 + 2080 + 330);
    }
}
