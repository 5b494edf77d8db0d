//! Inspect subcommand: show an artifact's metadata and tensor layout.

use crate::error::{CliError, Result};
use crate::output;
use neura9::format::ArtifactReader;
use std::path::Path;

pub(crate) fn run(file: &Path) -> Result<()> {
    if !file.exists() {
        return Err(CliError::ModelNotFound(file.to_path_buf()));
    }

    // Checksum verification happens during parsing.
    let reader = ArtifactReader::open(file).map_err(|e| CliError::InvalidArtifact(e.to_string()))?;

    output::section("Artifact");
    output::kv("file", file.display());
    output::kv("format", "N9M1");
    output::kv("size", output::format_size(reader.len() as u64));
    for key in ["model", "input_dim", "num_classes"] {
        if let Some(value) = reader.get_metadata(key) {
            output::kv(key, value);
        }
    }
    if let Some(labels) = reader.get_metadata("labels").and_then(|v| v.as_array()) {
        let names: Vec<String> = labels
            .iter()
            .map(|l| l.as_str().unwrap_or("?").to_string())
            .collect();
        output::kv("labels", names.join(", "));
    }

    output::section("Tensors");
    for record in &reader.tensors {
        println!(
            "  {:<16} {:<4} {:?} ({})",
            record.name,
            record.dtype,
            record.shape,
            output::format_size(record.size as u64)
        );
    }

    output::success("checksum verified");
    Ok(())
}
