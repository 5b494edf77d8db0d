//! Neura9: offline training and export pipeline for the NEURA9 defense classifier.
//!
//! Neura9 turns a labeled 72-feature dataset into a quantized inference
//! artifact small enough for the WavePwn firmware target, plus a C byte-array
//! rendering of that artifact for static linking.
//!
//! # Pipeline
//!
//! ```text
//! CSV dataset -> Mlp::classifier -> train::fit -> format::convert -> export::*
//! ```
//!
//! # Quick Start
//!
//! ```
//! use neura9::labels::NUM_CLASSES;
//! use neura9::model::Mlp;
//! use neura9::primitives::Matrix;
//! use neura9::train::{fit, TrainConfig};
//!
//! // Tiny synthetic dataset: 20 samples, 72 features.
//! let n = 20;
//! let data: Vec<f32> = (0..n * 72).map(|i| (i % 7) as f32 * 0.1).collect();
//! let x = Matrix::from_vec(n, 72, data).expect("data length matches rows * cols");
//! let y: Vec<usize> = (0..n).map(|i| i % NUM_CLASSES).collect();
//!
//! let mut model = Mlp::classifier(72, NUM_CLASSES, Some(42));
//! let config = TrainConfig {
//!     epochs: 1,
//!     batch_size: 8,
//!     allow_class_mismatch: true,
//!     ..TrainConfig::default()
//! };
//! fit(&mut model, &x, &y, &config, &mut ()).unwrap();
//!
//! let artifact = neura9::format::convert(&model).unwrap();
//! assert!(!artifact.is_empty());
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Core Vector and Matrix types
//! - [`dataset`]: CSV dataset loading (72 features + class label)
//! - [`labels`]: The fixed 10-class threat-label ABI shared with the firmware
//! - [`nn`]: Dense layers, activations, loss, and the Adam optimizer
//! - [`model`]: The fixed classifier topology and its native checkpoint form
//! - [`train`]: Mini-batch training with a held-out validation split
//! - [`metrics`]: Evaluation metrics
//! - [`format`]: The N9M1 quantized inference artifact (convert / read back)
//! - [`export`]: Raw-binary and C byte-array emission for the firmware build

pub mod dataset;
pub mod error;
pub mod export;
pub mod format;
pub mod labels;
pub mod metrics;
pub mod model;
pub mod nn;
pub mod prelude;
pub mod primitives;
pub mod train;
