//! Mini-batch training with a held-out validation split.
//!
//! [`fit`] mutates the model's parameters in place and reports per-epoch
//! train/validation loss and accuracy through a [`TrainObserver`], so the
//! pipeline is testable without capturing process output. The split is
//! chosen uniformly at random, independent of class balance.

use crate::error::{Neura9Error, Result};
use crate::metrics::accuracy;
use crate::model::Mlp;
use crate::nn::{cross_entropy_grad, sparse_cross_entropy, Adam};
use crate::primitives::Matrix;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashSet;

/// Training hyperparameters.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Number of passes over the training split.
    pub epochs: usize,
    /// Mini-batch size.
    pub batch_size: usize,
    /// Fraction of samples reserved for validation, in `[0, 1)`.
    pub validation_split: f32,
    /// Adam learning rate.
    pub learning_rate: f32,
    /// Seed for the split and the per-epoch shuffles.
    pub seed: Option<u64>,
    /// Downgrade a class-count mismatch from a hard error to a warning.
    ///
    /// Training with fewer distinct labels than output classes leaves dead
    /// output units and silently degrades downstream classification, so the
    /// mismatch fails by default and continuing requires this explicit
    /// opt-in.
    pub allow_class_mismatch: bool,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            epochs: 40,
            batch_size: 256,
            validation_split: 0.2,
            learning_rate: 1e-3,
            seed: None,
            allow_class_mismatch: false,
        }
    }
}

/// Metrics reported at the end of each epoch.
#[derive(Debug, Clone)]
pub struct EpochMetrics {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total configured epochs.
    pub epochs: usize,
    pub train_loss: f32,
    pub train_accuracy: f32,
    /// None when the validation split is empty.
    pub val_loss: Option<f32>,
    pub val_accuracy: Option<f32>,
}

/// Progress sink for the trainer.
///
/// The CLI installs a console implementation; tests use `()` or collect
/// the metrics.
pub trait TrainObserver {
    /// Called once per epoch with that epoch's metrics.
    fn epoch_end(&mut self, metrics: &EpochMetrics);

    /// Called for non-fatal conditions the run survives.
    fn warning(&mut self, message: &str) {
        let _ = message;
    }
}

/// No-op observer.
impl TrainObserver for () {
    fn epoch_end(&mut self, _metrics: &EpochMetrics) {}
}

/// Fits the model against the dataset.
///
/// Reserves `validation_split` of the samples (chosen independently of class
/// balance) for once-per-epoch evaluation, shuffles the training order before
/// each pass, and applies mini-batch Adam updates.
///
/// # Errors
///
/// - [`Neura9Error::DimensionMismatch`] when the feature matrix does not
///   match the model's input width, rows and labels disagree, or a label is
///   outside the model's class range.
/// - [`Neura9Error::ClassCountMismatch`] when the number of distinct labels
///   differs from the model's class count and
///   [`TrainConfig::allow_class_mismatch`] is not set.
/// - [`Neura9Error::InvalidHyperparameter`] for a zero batch size or a
///   validation split outside `[0, 1)`.
pub fn fit(
    model: &mut Mlp,
    x: &Matrix<f32>,
    y: &[usize],
    config: &TrainConfig,
    observer: &mut dyn TrainObserver,
) -> Result<()> {
    validate_inputs(model, x, y, config, observer)?;

    let n_samples = x.n_rows();
    let mut rng = match config.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    // Validation split: uniform over samples, no stratification.
    let mut indices: Vec<usize> = (0..n_samples).collect();
    indices.shuffle(&mut rng);
    let n_val = (n_samples as f32 * config.validation_split).round() as usize;
    let (val_indices, train_indices) = indices.split_at(n_val.min(n_samples - 1));

    let x_train = x.select_rows(train_indices);
    let y_train: Vec<usize> = train_indices.iter().map(|&i| y[i]).collect();
    let x_val = x.select_rows(val_indices);
    let y_val: Vec<usize> = val_indices.iter().map(|&i| y[i]).collect();

    let mut optimizer = Adam::new(config.learning_rate);
    let mut order: Vec<usize> = (0..x_train.n_rows()).collect();

    for epoch in 1..=config.epochs {
        order.shuffle(&mut rng);

        let mut loss_sum = 0.0;
        let mut correct = 0;
        for chunk in order.chunks(config.batch_size) {
            let xb = x_train.select_rows(chunk);
            let yb: Vec<usize> = chunk.iter().map(|&i| y_train[i]).collect();
            let (batch_loss, batch_correct) = train_batch(model, &mut optimizer, &xb, &yb);
            loss_sum += batch_loss * chunk.len() as f32;
            correct += batch_correct;
        }

        let n_train = x_train.n_rows();
        let (val_loss, val_accuracy) = if y_val.is_empty() {
            (None, None)
        } else {
            let probs = model.forward(&x_val);
            let loss = sparse_cross_entropy(&probs, &y_val);
            let preds = model.predict(&x_val);
            (Some(loss), Some(accuracy(&preds, &y_val)))
        };

        observer.epoch_end(&EpochMetrics {
            epoch,
            epochs: config.epochs,
            train_loss: loss_sum / n_train as f32,
            train_accuracy: correct as f32 / n_train as f32,
            val_loss,
            val_accuracy,
        });
    }

    Ok(())
}

fn validate_inputs(
    model: &Mlp,
    x: &Matrix<f32>,
    y: &[usize],
    config: &TrainConfig,
    observer: &mut dyn TrainObserver,
) -> Result<()> {
    if config.batch_size == 0 {
        return Err(Neura9Error::InvalidHyperparameter {
            param: "batch_size".to_string(),
            value: "0".to_string(),
            constraint: ">= 1".to_string(),
        });
    }
    if !(0.0..1.0).contains(&config.validation_split) {
        return Err(Neura9Error::InvalidHyperparameter {
            param: "validation_split".to_string(),
            value: config.validation_split.to_string(),
            constraint: "in [0, 1)".to_string(),
        });
    }
    if x.n_cols() != model.input_dim() {
        return Err(Neura9Error::DimensionMismatch {
            expected: format!("{} feature columns", model.input_dim()),
            actual: format!("{}", x.n_cols()),
        });
    }
    if x.n_rows() != y.len() {
        return Err(Neura9Error::DimensionMismatch {
            expected: format!("{} labels", x.n_rows()),
            actual: format!("{}", y.len()),
        });
    }
    if x.n_rows() == 0 {
        return Err(Neura9Error::Other("dataset is empty".to_string()));
    }
    if let Some(&max) = y.iter().max() {
        if max >= model.num_classes() {
            return Err(Neura9Error::DimensionMismatch {
                expected: format!("labels < {}", model.num_classes()),
                actual: max.to_string(),
            });
        }
    }

    let distinct: HashSet<usize> = y.iter().copied().collect();
    if distinct.len() != model.num_classes() {
        if config.allow_class_mismatch {
            observer.warning(&format!(
                "dataset contains {} distinct classes (expected: {})",
                distinct.len(),
                model.num_classes()
            ));
        } else {
            return Err(Neura9Error::ClassCountMismatch {
                found: distinct.len(),
                expected: model.num_classes(),
            });
        }
    }
    Ok(())
}

/// One forward/backward/update cycle on a batch.
///
/// Returns (mean batch loss, correct predictions) computed from the
/// pre-update forward pass.
fn train_batch(
    model: &mut Mlp,
    optimizer: &mut Adam,
    xb: &Matrix<f32>,
    yb: &[usize],
) -> (f32, usize) {
    let cache = model.forward_cached(xb);
    let probs = cache
        .activations
        .last()
        .expect("forward produces at least one activation");
    let loss = sparse_cross_entropy(probs, yb);
    let correct = (0..probs.n_rows())
        .filter(|&r| {
            let row = probs.row_slice(r);
            let mut best = 0;
            for (c, &p) in row.iter().enumerate() {
                if p > row[best] {
                    best = c;
                }
            }
            best == yb[r]
        })
        .count();

    // Backward pass, output layer to input layer.
    let n_layers = model.layers().len();
    let mut d_weights: Vec<Matrix<f32>> = Vec::with_capacity(n_layers);
    let mut d_biases: Vec<Vec<f32>> = Vec::with_capacity(n_layers);
    let mut delta = cross_entropy_grad(probs, yb);

    for li in (0..n_layers).rev() {
        let layer = &model.layers()[li];
        let z = &cache.zs[li];
        let a_prev = &cache.activations[li];

        let dz = layer.activation().backward(&delta, z);

        // dW = dz^T · a_prev, db = column sums of dz
        let dw = dz
            .transpose()
            .matmul(a_prev)
            .expect("backward shapes chain");
        let mut db = vec![0.0; layer.out_features()];
        for r in 0..dz.n_rows() {
            for (o, b) in db.iter_mut().enumerate() {
                *b += dz.get(r, o);
            }
        }
        d_weights.push(dw);
        d_biases.push(db);

        if li > 0 {
            // delta_prev = dz · W
            delta = dz.matmul(layer.weight()).expect("backward shapes chain");
        }
    }
    d_weights.reverse();
    d_biases.reverse();

    let mut params: Vec<&mut [f32]> = Vec::with_capacity(n_layers * 2);
    for layer in model.layers_mut() {
        let (w, b) = layer.params_mut();
        params.push(w);
        params.push(b);
    }
    let mut grads: Vec<&[f32]> = Vec::with_capacity(n_layers * 2);
    for (dw, db) in d_weights.iter().zip(&d_biases) {
        grads.push(dw.as_slice());
        grads.push(db.as_slice());
    }
    optimizer.step(&mut params, &grads);

    (loss, correct)
}
