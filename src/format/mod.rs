//! N9M1: the portable quantized inference artifact.
//!
//! The format converter turns a trained [`Mlp`] into a single immutable
//! binary blob the on-device interpreter can map directly. Weights are Q8
//! block-quantized, biases stay f32, and the label ABI is embedded in the
//! metadata so the artifact is self-describing.
//!
//! Layout:
//! ```text
//! [4-byte magic: "N9M1"]
//! [4-byte metadata_len: u32 little-endian]
//! [JSON metadata: key-value pairs]
//! [4-byte n_tensors: u32 little-endian]
//! [4-byte index_len: u32 little-endian]
//! [JSON tensor index: name, dtype, shape, offset, size per tensor]
//! [Raw tensor data]
//! [4-byte CRC32: checksum of all preceding bytes]
//! ```
//!
//! Conversion is deterministic: bit-identical model parameters yield
//! bit-identical artifacts.

mod quantize;

pub use quantize::{dequantize_q8, quantize_q8, QuantizedTensor, BLOCK_SIZE, Q8_BLOCK_BYTES};

use crate::error::{Neura9Error, Result};
use crate::labels::{label_names, NUM_CLASSES};
use crate::model::Mlp;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Magic bytes for the N9M1 artifact format.
pub const MAGIC: [u8; 4] = *b"N9M1";

/// Tensor dtype tag: raw little-endian f32 values.
pub const DTYPE_F32: &str = "F32";

/// Tensor dtype tag: Q8 block-quantized values.
pub const DTYPE_Q8: &str = "Q8";

/// Tensor descriptor in the index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TensorRecord {
    /// Tensor name
    pub name: String,
    /// Data type tag ([`DTYPE_F32`] or [`DTYPE_Q8`])
    pub dtype: String,
    /// Shape dimensions
    pub shape: Vec<usize>,
    /// Byte offset in data section
    pub offset: usize,
    /// Byte size
    pub size: usize,
}

/// Artifact metadata - arbitrary JSON, ordered for deterministic output.
pub type ArtifactMetadata = BTreeMap<String, JsonValue>;

/// Converts a trained model into the N9M1 inference artifact.
///
/// The model must be structurally valid and carry the firmware's class
/// count; the label ABI is embedded at this boundary.
///
/// # Errors
///
/// Propagates [`Mlp::validate`] failures unmodified, and returns
/// [`Neura9Error::FormatError`] when the model's class count does not match
/// the fixed label ABI.
pub fn convert(model: &Mlp) -> Result<Vec<u8>> {
    model.validate()?;
    if model.num_classes() != NUM_CLASSES {
        return Err(Neura9Error::FormatError {
            message: format!(
                "model has {} classes, the label ABI defines {NUM_CLASSES}",
                model.num_classes()
            ),
        });
    }

    let mut writer = ArtifactWriter::new();
    writer.set_metadata("model", json!("neura9_defense"));
    writer.set_metadata("schema_version", json!(1));
    writer.set_metadata("input_dim", json!(model.input_dim()));
    writer.set_metadata("num_classes", json!(model.num_classes()));
    writer.set_metadata("labels", json!(label_names()));
    let layers: Vec<JsonValue> = model
        .layers()
        .iter()
        .map(|l| {
            json!({
                "in": l.in_features(),
                "out": l.out_features(),
                "activation": l.activation().name(),
            })
        })
        .collect();
    writer.set_metadata("layers", JsonValue::Array(layers));

    for (i, layer) in model.layers().iter().enumerate() {
        let shape = [layer.out_features(), layer.in_features()];
        let quantized = quantize_q8(layer.weight().as_slice(), &shape)?;
        writer.add_tensor_q8(format!("dense{i}.weight"), &quantized);
        writer.add_tensor_f32(
            format!("dense{i}.bias"),
            vec![layer.out_features()],
            layer.bias().as_slice(),
        );
    }

    writer.to_bytes()
}

/// N9M1 artifact writer.
#[derive(Debug, Default)]
pub struct ArtifactWriter {
    metadata: ArtifactMetadata,
    tensors: Vec<(TensorRecord, Vec<u8>)>,
}

impl ArtifactWriter {
    /// Create a new writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a metadata key-value pair.
    pub fn set_metadata(&mut self, key: impl Into<String>, value: JsonValue) {
        self.metadata.insert(key.into(), value);
    }

    /// Add a tensor with raw f32 data.
    pub fn add_tensor_f32(&mut self, name: impl Into<String>, shape: Vec<usize>, data: &[f32]) {
        let bytes: Vec<u8> = data.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.push_tensor(name.into(), DTYPE_F32, shape, bytes);
    }

    /// Add a Q8 block-quantized tensor.
    pub fn add_tensor_q8(&mut self, name: impl Into<String>, tensor: &QuantizedTensor) {
        self.push_tensor(
            name.into(),
            DTYPE_Q8,
            tensor.shape.clone(),
            tensor.blocks.clone(),
        );
    }

    fn push_tensor(&mut self, name: String, dtype: &str, shape: Vec<usize>, bytes: Vec<u8>) {
        let offset: usize = self.tensors.iter().map(|(_, d)| d.len()).sum();
        let record = TensorRecord {
            name,
            dtype: dtype.to_string(),
            shape,
            offset,
            size: bytes.len(),
        };
        self.tensors.push((record, bytes));
    }

    /// Serialize to the N9M1 byte layout.
    ///
    /// # Errors
    ///
    /// Returns an error if metadata or index serialization fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut output = Vec::new();

        // 1. Magic
        output.extend_from_slice(&MAGIC);

        // 2. Metadata
        let metadata_json = serde_json::to_string(&self.metadata)?;
        let metadata_bytes = metadata_json.as_bytes();
        output.extend_from_slice(&(metadata_bytes.len() as u32).to_le_bytes());
        output.extend_from_slice(metadata_bytes);

        // 3. Tensor count
        output.extend_from_slice(&(self.tensors.len() as u32).to_le_bytes());

        // 4. Tensor index
        let records: Vec<_> = self.tensors.iter().map(|(r, _)| r).collect();
        let index_json = serde_json::to_string(&records)?;
        let index_bytes = index_json.as_bytes();
        output.extend_from_slice(&(index_bytes.len() as u32).to_le_bytes());
        output.extend_from_slice(index_bytes);

        // 5. Tensor data
        for (_, data) in &self.tensors {
            output.extend_from_slice(data);
        }

        // 6. CRC32
        let crc = crc32(&output);
        output.extend_from_slice(&crc.to_le_bytes());

        Ok(output)
    }
}

/// N9M1 artifact reader.
///
/// Parses and checksum-verifies an artifact; used by the inspection command
/// and by tests that confirm what convert wrote.
#[derive(Debug)]
pub struct ArtifactReader {
    /// Parsed metadata
    pub metadata: ArtifactMetadata,
    /// Tensor descriptors
    pub tensors: Vec<TensorRecord>,
    /// Raw artifact bytes
    data: Vec<u8>,
    /// Offset of the tensor data section
    tensor_data_offset: usize,
}

impl ArtifactReader {
    /// Load an artifact file from a path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid N9M1.
    pub fn open(path: &Path) -> Result<Self> {
        let data = fs::read(path)?;
        Self::from_bytes(data)
    }

    /// Parse an N9M1 artifact from bytes, verifying the trailing checksum.
    ///
    /// # Errors
    ///
    /// Returns [`Neura9Error::FormatError`] for structural problems and
    /// [`Neura9Error::ChecksumMismatch`] when the CRC32 does not match.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        if data.len() < 16 {
            return Err(Neura9Error::FormatError {
                message: "file too short".to_string(),
            });
        }
        if data[..4] != MAGIC {
            return Err(Neura9Error::FormatError {
                message: format!("invalid magic: expected N9M1, got {:?}", &data[..4]),
            });
        }

        let body_len = data.len() - 4;
        let expected =
            u32::from_le_bytes([data[body_len], data[body_len + 1], data[body_len + 2], data[body_len + 3]]);
        let actual = crc32(&data[..body_len]);
        if expected != actual {
            return Err(Neura9Error::ChecksumMismatch { expected, actual });
        }

        let metadata_len = read_u32(&data, 4)? as usize;
        let metadata_end = 8 + metadata_len;
        let metadata: ArtifactMetadata = if metadata_len > 0 {
            let slice = data.get(8..metadata_end).ok_or_else(short_file)?;
            serde_json::from_slice(slice).map_err(|e| Neura9Error::FormatError {
                message: format!("invalid metadata JSON: {e}"),
            })?
        } else {
            BTreeMap::new()
        };

        let n_tensors = read_u32(&data, metadata_end)? as usize;
        let index_len = read_u32(&data, metadata_end + 4)? as usize;
        let index_start = metadata_end + 8;
        let index_end = index_start + index_len;
        let index_slice = data.get(index_start..index_end).ok_or_else(short_file)?;
        let tensors: Vec<TensorRecord> = if n_tensors > 0 {
            serde_json::from_slice(index_slice).map_err(|e| Neura9Error::FormatError {
                message: format!("invalid tensor index: {e}"),
            })?
        } else {
            Vec::new()
        };

        Ok(Self {
            metadata,
            tensors,
            data,
            tensor_data_offset: index_end,
        })
    }

    /// Get a metadata value by key.
    #[must_use]
    pub fn get_metadata(&self, key: &str) -> Option<&JsonValue> {
        self.metadata.get(key)
    }

    /// Total artifact size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the artifact carries no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw bytes of a tensor's data section.
    ///
    /// # Errors
    ///
    /// Returns [`Neura9Error::FormatError`] if the tensor is missing or its
    /// recorded extent is out of bounds.
    pub fn tensor_bytes(&self, name: &str) -> Result<&[u8]> {
        let record = self
            .tensors
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| Neura9Error::FormatError {
                message: format!("tensor not found: {name}"),
            })?;
        let start = self.tensor_data_offset + record.offset;
        let end = start + record.size;
        self.data.get(start..end).ok_or_else(|| Neura9Error::FormatError {
            message: format!("tensor data out of bounds: {name}"),
        })
    }

    /// Read an f32 tensor's values.
    ///
    /// # Errors
    ///
    /// Returns [`Neura9Error::FormatError`] if the tensor is missing or not
    /// [`DTYPE_F32`].
    pub fn read_tensor_f32(&self, name: &str) -> Result<Vec<f32>> {
        let record = self
            .tensors
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| Neura9Error::FormatError {
                message: format!("tensor not found: {name}"),
            })?;
        if record.dtype != DTYPE_F32 {
            return Err(Neura9Error::FormatError {
                message: format!("tensor {name} is {}, expected {DTYPE_F32}", record.dtype),
            });
        }
        let bytes = self.tensor_bytes(name)?;
        Ok(bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect())
    }

    /// Read a Q8 tensor back into its block form.
    ///
    /// # Errors
    ///
    /// Returns [`Neura9Error::FormatError`] if the tensor is missing or not
    /// [`DTYPE_Q8`].
    pub fn read_tensor_q8(&self, name: &str) -> Result<QuantizedTensor> {
        let record = self
            .tensors
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| Neura9Error::FormatError {
                message: format!("tensor not found: {name}"),
            })?;
        if record.dtype != DTYPE_Q8 {
            return Err(Neura9Error::FormatError {
                message: format!("tensor {name} is {}, expected {DTYPE_Q8}", record.dtype),
            });
        }
        Ok(QuantizedTensor {
            shape: record.shape.clone(),
            blocks: self.tensor_bytes(name)?.to_vec(),
        })
    }
}

fn read_u32(data: &[u8], offset: usize) -> Result<u32> {
    let slice = data.get(offset..offset + 4).ok_or_else(short_file)?;
    Ok(u32::from_le_bytes([slice[0], slice[1], slice[2], slice[3]]))
}

fn short_file() -> Neura9Error {
    Neura9Error::FormatError {
        message: "file too short".to_string(),
    }
}

/// CRC32 (IEEE, reflected polynomial 0xEDB88320).
fn crc32(data: &[u8]) -> u32 {
    let mut crc: u32 = 0xFFFF_FFFF;
    for &byte in data {
        crc ^= u32::from(byte);
        for _ in 0..8 {
            let mask = (crc & 1).wrapping_neg();
            crc = (crc >> 1) ^ (0xEDB8_8320 & mask);
        }
    }
    !crc
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trained_like_model() -> Mlp {
        Mlp::classifier(72, NUM_CLASSES, Some(42))
    }

    #[test]
    fn test_crc32_known_value() {
        // CRC32("123456789") is the standard check value.
        assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn test_convert_roundtrip_metadata() {
        let model = trained_like_model();
        let bytes = convert(&model).unwrap();
        let reader = ArtifactReader::from_bytes(bytes).unwrap();

        assert_eq!(reader.get_metadata("input_dim").unwrap(), &json!(72));
        assert_eq!(reader.get_metadata("num_classes").unwrap(), &json!(10));
        let labels = reader.get_metadata("labels").unwrap().as_array().unwrap();
        assert_eq!(labels.len(), NUM_CLASSES);
        assert_eq!(labels[0], json!("SAFE"));
        assert_eq!(labels[9], json!("LEARNING_MODE"));
    }

    #[test]
    fn test_convert_tensor_index() {
        let model = trained_like_model();
        let bytes = convert(&model).unwrap();
        let reader = ArtifactReader::from_bytes(bytes).unwrap();

        // 4 layers, weight + bias each.
        assert_eq!(reader.tensors.len(), 8);
        assert_eq!(reader.tensors[0].name, "dense0.weight");
        assert_eq!(reader.tensors[0].dtype, DTYPE_Q8);
        assert_eq!(reader.tensors[0].shape, vec![64, 72]);
        assert_eq!(reader.tensors[1].name, "dense0.bias");
        assert_eq!(reader.tensors[1].dtype, DTYPE_F32);
    }

    #[test]
    fn test_convert_is_deterministic() {
        let model = trained_like_model();
        let a = convert(&model).unwrap();
        let b = convert(&model).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_bias_survives_verbatim() {
        let model = trained_like_model();
        let bytes = convert(&model).unwrap();
        let reader = ArtifactReader::from_bytes(bytes).unwrap();
        let bias = reader.read_tensor_f32("dense3.bias").unwrap();
        assert_eq!(bias, model.layers()[3].bias().as_slice());
    }

    #[test]
    fn test_weights_dequantize_close() {
        let model = trained_like_model();
        let bytes = convert(&model).unwrap();
        let reader = ArtifactReader::from_bytes(bytes).unwrap();

        let q = reader.read_tensor_q8("dense0.weight").unwrap();
        let restored = dequantize_q8(&q).unwrap();
        let original = model.layers()[0].weight().as_slice();
        assert_eq!(restored.len(), original.len());

        let max_abs = original.iter().map(|x| x.abs()).fold(0.0_f32, f32::max);
        let tolerance = max_abs / 127.0;
        for (o, r) in original.iter().zip(&restored) {
            assert!((o - r).abs() <= tolerance);
        }
    }

    #[test]
    fn test_wrong_class_count_rejected() {
        let model = Mlp::classifier(72, 6, Some(1));
        let err = convert(&model).unwrap_err();
        assert!(matches!(err, Neura9Error::FormatError { .. }));
    }

    #[test]
    fn test_reader_rejects_bad_magic() {
        let model = trained_like_model();
        let mut bytes = convert(&model).unwrap();
        bytes[0] = b'X';
        let err = ArtifactReader::from_bytes(bytes).unwrap_err();
        assert!(matches!(err, Neura9Error::FormatError { .. }));
    }

    #[test]
    fn test_reader_rejects_flipped_bit() {
        let model = trained_like_model();
        let mut bytes = convert(&model).unwrap();
        let mid = bytes.len() / 2;
        bytes[mid] ^= 0x40;
        let err = ArtifactReader::from_bytes(bytes).unwrap_err();
        assert!(matches!(err, Neura9Error::ChecksumMismatch { .. }));
    }

    #[test]
    fn test_reader_rejects_truncation() {
        let err = ArtifactReader::from_bytes(b"N9M1".to_vec()).unwrap_err();
        assert!(matches!(err, Neura9Error::FormatError { .. }));
    }
}
