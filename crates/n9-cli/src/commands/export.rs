//! Export subcommand: re-enter the pipeline with an already-trained model.
//!
//! Loads a native checkpoint, converts it, and writes the raw binary
//! artifact. No byte-array emission on this path.

use crate::error::{CliError, Result};
use crate::output;
use neura9::export::write_binary;
use neura9::format::convert;
use neura9::model::Mlp;
use std::path::Path;

pub(crate) fn run(model_path: &Path, output_path: &Path) -> Result<()> {
    if !model_path.exists() {
        return Err(CliError::ModelNotFound(model_path.to_path_buf()));
    }

    output::info(&format!("loading checkpoint {}", model_path.display()));
    let model = Mlp::load(model_path)?;

    output::info("converting to N9M1");
    let artifact = convert(&model)?;
    write_binary(&artifact, output_path)?;

    output::success(&format!(
        "artifact {} ({})",
        output_path.display(),
        output::format_size(artifact.len() as u64)
    ));
    Ok(())
}
