//! Convenient re-exports for pipeline consumers.
//!
//! ```
//! use neura9::prelude::*;
//!
//! let model = Mlp::classifier(72, NUM_CLASSES, Some(42));
//! assert_eq!(model.num_classes(), NUM_CLASSES);
//! ```

pub use crate::dataset::{load_dataset, NUM_FEATURES};
pub use crate::error::{Neura9Error, Result};
pub use crate::format::{convert, ArtifactReader};
pub use crate::labels::{ThreatLabel, NUM_CLASSES};
pub use crate::model::Mlp;
pub use crate::primitives::{Matrix, Vector};
pub use crate::train::{fit, EpochMetrics, TrainConfig, TrainObserver};
