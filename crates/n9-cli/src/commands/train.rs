//! Train subcommand: dataset -> trained model -> artifact + C sources.

use crate::error::{CliError, Result};
use crate::output::{self, ConsoleObserver};
use neura9::dataset::load_dataset;
use neura9::export::{write_binary, write_c_array, write_c_header};
use neura9::format::convert;
use neura9::labels::NUM_CLASSES;
use neura9::model::Mlp;
use neura9::train::{fit, TrainConfig};
use std::path::PathBuf;

/// Arguments for `n9 train`.
pub(crate) struct TrainArgs {
    pub dataset: PathBuf,
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f32,
    pub seed: Option<u64>,
    pub out_dir: PathBuf,
    pub symbol: String,
    pub save_model: Option<PathBuf>,
    pub allow_class_mismatch: bool,
}

/// Run the full training pipeline.
pub(crate) fn run(args: &TrainArgs) -> Result<()> {
    // Checked before any work so a bad path cannot leave partial outputs.
    if !args.dataset.exists() {
        return Err(CliError::DatasetNotFound(args.dataset.clone()));
    }

    output::section("Dataset");
    let (x, y) = load_dataset(&args.dataset)?;
    output::kv("path", args.dataset.display());
    output::kv("samples", x.n_rows());
    output::kv("features", x.n_cols());

    let mut model = Mlp::classifier(x.n_cols(), NUM_CLASSES, args.seed);
    output::section("Model");
    output::kv("classes", NUM_CLASSES);
    output::kv("parameters", model.num_parameters());

    output::section("Training");
    let config = TrainConfig {
        epochs: args.epochs,
        batch_size: args.batch_size,
        learning_rate: args.learning_rate,
        seed: args.seed,
        allow_class_mismatch: args.allow_class_mismatch,
        ..TrainConfig::default()
    };
    fit(&mut model, &x, &y, &config, &mut ConsoleObserver)?;

    if let Some(ckpt) = &args.save_model {
        model.save(ckpt)?;
        output::info(&format!("checkpoint saved to {}", ckpt.display()));
    }

    output::section("Export");
    let artifact = convert(&model)?;

    let binary_path = args.out_dir.join("neura9_defense_model.n9m");
    write_binary(&artifact, &binary_path)?;
    output::success(&format!(
        "artifact {} ({})",
        binary_path.display(),
        output::format_size(artifact.len() as u64)
    ));

    let c_array_path = args.out_dir.join("neura9_defense_model_data.cpp");
    write_c_array(&artifact, &c_array_path, &args.symbol)?;
    let header_path = args.out_dir.join("neura9_defense_model_data.h");
    write_c_header(&header_path, &args.symbol)?;
    output::success(&format!("byte array {}", c_array_path.display()));

    Ok(())
}
