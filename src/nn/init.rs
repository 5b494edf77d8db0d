//! Weight initialization.
//!
//! Kaiming/He uniform initialization (He et al., 2015), the scheme suited to
//! the ReLU hidden layers this crate trains.

use crate::primitives::Matrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Kaiming uniform initialization (He et al., 2015).
///
/// Samples a `[out_features, in_features]` weight matrix from U(-bound, bound)
/// where bound = sqrt(6 / `fan_in`).
///
/// # Arguments
///
/// * `out_features` - Number of output features
/// * `in_features` - Number of input features (fan-in)
/// * `seed` - Optional random seed for reproducibility
#[must_use]
pub fn kaiming_uniform(out_features: usize, in_features: usize, seed: Option<u64>) -> Matrix<f32> {
    let bound = (6.0 / in_features as f32).sqrt();
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    let data: Vec<f32> = (0..out_features * in_features)
        .map(|_| rng.gen_range(-bound..bound))
        .collect();
    Matrix::from_vec(out_features, in_features, data).expect("data length matches rows * cols")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_and_bound() {
        let w = kaiming_uniform(4, 16, Some(7));
        assert_eq!(w.shape(), (4, 16));
        let bound = (6.0_f32 / 16.0).sqrt();
        assert!(w.as_slice().iter().all(|&x| x > -bound && x < bound));
    }

    #[test]
    fn test_seed_reproducible() {
        let a = kaiming_uniform(8, 8, Some(42));
        let b = kaiming_uniform(8, 8, Some(42));
        assert_eq!(a.as_slice(), b.as_slice());
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = kaiming_uniform(8, 8, Some(1));
        let b = kaiming_uniform(8, 8, Some(2));
        assert_ne!(a.as_slice(), b.as_slice());
    }
}
