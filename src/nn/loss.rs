//! Sparse cross-entropy loss for multi-class classification.
//!
//! Targets are class indices, not one-hot vectors, matching the trainer's
//! label vector. The gradient is taken jointly through softmax, giving the
//! standard `(p - onehot) / batch` form.
//!
//! # References
//!
//! - Bishop, C. M. (2006). Pattern Recognition and Machine Learning. Springer.

use crate::primitives::Matrix;

/// Floor applied to probabilities before taking the log.
const EPS: f32 = 1e-12;

/// Mean negative log-likelihood of the target classes.
///
/// `probs` is a `(batch, num_classes)` matrix of softmax outputs;
/// `targets[i]` is the class index of sample `i`.
///
/// # Panics
///
/// Panics if `targets` length differs from the batch size or a target
/// index is out of range.
#[must_use]
pub fn sparse_cross_entropy(probs: &Matrix<f32>, targets: &[usize]) -> f32 {
    let (batch, _) = probs.shape();
    assert_eq!(batch, targets.len(), "one target per sample");
    assert!(batch > 0, "batch cannot be empty");

    let mut total = 0.0;
    for (i, &t) in targets.iter().enumerate() {
        let p = probs.get(i, t).max(EPS);
        total -= p.ln();
    }
    total / batch as f32
}

/// Gradient of the mean cross-entropy with respect to the output-layer
/// pre-activations: `(probs - onehot(targets)) / batch`.
///
/// # Panics
///
/// Panics if `targets` length differs from the batch size or a target
/// index is out of range.
#[must_use]
pub fn cross_entropy_grad(probs: &Matrix<f32>, targets: &[usize]) -> Matrix<f32> {
    let (batch, classes) = probs.shape();
    assert_eq!(batch, targets.len(), "one target per sample");

    let scale = 1.0 / batch as f32;
    let mut grad = Matrix::zeros(batch, classes);
    for i in 0..batch {
        for c in 0..classes {
            let indicator = if c == targets[i] { 1.0 } else { 0.0 };
            grad.set(i, c, (probs.get(i, c) - indicator) * scale);
        }
    }
    grad
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_probs_loss_is_log_classes() {
        let probs = Matrix::from_vec(2, 4, vec![0.25; 8]).unwrap();
        let loss = sparse_cross_entropy(&probs, &[0, 3]);
        assert!((loss - 4.0_f32.ln()).abs() < 1e-5);
    }

    #[test]
    fn test_confident_correct_prediction_has_low_loss() {
        let probs = Matrix::from_vec(1, 3, vec![0.98, 0.01, 0.01]).unwrap();
        assert!(sparse_cross_entropy(&probs, &[0]) < 0.05);
    }

    #[test]
    fn test_zero_probability_is_clamped() {
        let probs = Matrix::from_vec(1, 2, vec![0.0, 1.0]).unwrap();
        let loss = sparse_cross_entropy(&probs, &[0]);
        assert!(loss.is_finite());
    }

    #[test]
    fn test_grad_matches_probs_minus_onehot() {
        let probs = Matrix::from_vec(2, 2, vec![0.7, 0.3, 0.4, 0.6]).unwrap();
        let grad = cross_entropy_grad(&probs, &[0, 1]);
        // Scaled by 1/batch = 0.5.
        assert!((grad.get(0, 0) - (0.7 - 1.0) * 0.5).abs() < 1e-6);
        assert!((grad.get(0, 1) - 0.3 * 0.5).abs() < 1e-6);
        assert!((grad.get(1, 1) - (0.6 - 1.0) * 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_grad_rows_sum_to_zero() {
        let probs = Matrix::from_vec(1, 3, vec![0.2, 0.5, 0.3]).unwrap();
        let grad = cross_entropy_grad(&probs, &[1]);
        let sum: f32 = grad.row_slice(0).iter().sum();
        assert!(sum.abs() < 1e-6);
    }
}
