//! Neural network building blocks for the NEURA9 classifier.
//!
//! A deliberately small toolkit: dense layers with ReLU/Softmax activations,
//! sparse cross-entropy loss, and the Adam optimizer. Gradients are computed
//! explicitly by the trainer (no autograd graph); the topology is fixed and
//! shallow, so the classic layer-by-layer backward pass is all that's needed.
//!
//! # References
//!
//! - He, K., et al. (2015). Delving deep into rectifiers. ICCV.
//! - Kingma, D. P., & Ba, J. (2015). Adam: A method for stochastic optimization. ICLR.

mod dense;
mod init;
mod loss;
mod optim;

pub use dense::{Activation, Dense};
pub use init::kaiming_uniform;
pub use loss::{cross_entropy_grad, sparse_cross_entropy};
pub use optim::Adam;
