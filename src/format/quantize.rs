//! Block-wise 8-bit weight quantization.
//!
//! Layout per 32-element block (34 bytes): an f16 scale followed by 32
//! signed bytes. Values reconstruct as `q * scale`. Quantization is a
//! best-effort size/accuracy trade-off; no post-conversion accuracy check
//! is performed.

use crate::error::{Neura9Error, Result};
use half::f16;

/// Elements per quantization block.
pub const BLOCK_SIZE: usize = 32;

/// Q8 block size in bytes: 2 (f16 scale) + 32 (i8 × 32)
pub const Q8_BLOCK_BYTES: usize = 34;

/// A block-quantized tensor.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantizedTensor {
    /// Original tensor shape
    pub shape: Vec<usize>,
    /// Raw block data: per block, f16 scale then `BLOCK_SIZE` i8 values
    pub blocks: Vec<u8>,
}

impl QuantizedTensor {
    /// Number of blocks covering the tensor.
    #[must_use]
    pub fn num_blocks(&self) -> usize {
        let total: usize = self.shape.iter().product();
        total.div_ceil(BLOCK_SIZE)
    }

    /// Total number of elements in the original tensor.
    #[must_use]
    pub fn num_elements(&self) -> usize {
        self.shape.iter().product()
    }
}

/// Quantizes an f32 tensor into Q8 blocks.
///
/// The final partial block is zero-padded.
///
/// # Errors
///
/// Returns [`Neura9Error::DimensionMismatch`] if `data` length does not
/// match the product of `shape`.
pub fn quantize_q8(data: &[f32], shape: &[usize]) -> Result<QuantizedTensor> {
    let expected_len: usize = shape.iter().product();
    if data.len() != expected_len {
        return Err(Neura9Error::DimensionMismatch {
            expected: expected_len.to_string(),
            actual: data.len().to_string(),
        });
    }

    let num_blocks = data.len().div_ceil(BLOCK_SIZE);
    let mut blocks = Vec::with_capacity(num_blocks * Q8_BLOCK_BYTES);

    for block_data in data.chunks(BLOCK_SIZE) {
        // Max absolute value sets the block scale.
        let max_abs = block_data.iter().map(|x| x.abs()).fold(0.0_f32, f32::max);
        let scale = if max_abs > 0.0 { max_abs / 127.0 } else { 1.0 };
        let inv_scale = 1.0 / scale;

        let scale_f16 = f16::from_f32(scale);
        blocks.extend_from_slice(&scale_f16.to_le_bytes());

        for &val in block_data {
            let q = (val * inv_scale).round().clamp(-127.0, 127.0) as i8;
            blocks.push(q as u8);
        }

        let padding = BLOCK_SIZE - block_data.len();
        if padding > 0 {
            blocks.resize(blocks.len() + padding, 0);
        }
    }

    Ok(QuantizedTensor {
        shape: shape.to_vec(),
        blocks,
    })
}

/// Reconstructs f32 values from Q8 blocks.
///
/// # Errors
///
/// Returns [`Neura9Error::FormatError`] if the block data length is
/// inconsistent with the shape.
pub fn dequantize_q8(tensor: &QuantizedTensor) -> Result<Vec<f32>> {
    let total = tensor.num_elements();
    let num_blocks = tensor.num_blocks();

    if tensor.blocks.len() != num_blocks * Q8_BLOCK_BYTES {
        return Err(Neura9Error::FormatError {
            message: format!(
                "invalid Q8 block data size: expected {}, got {}",
                num_blocks * Q8_BLOCK_BYTES,
                tensor.blocks.len()
            ),
        });
    }

    let mut values = Vec::with_capacity(total);
    for block_idx in 0..num_blocks {
        let start = block_idx * Q8_BLOCK_BYTES;
        let scale = f16::from_le_bytes([tensor.blocks[start], tensor.blocks[start + 1]]).to_f32();
        let quants = &tensor.blocks[start + 2..start + Q8_BLOCK_BYTES];

        let remaining = total - values.len();
        for &q in &quants[..remaining.min(BLOCK_SIZE)] {
            values.push(f32::from(q as i8) * scale);
        }
    }

    Ok(values)
}
