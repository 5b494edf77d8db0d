//! n9 - NEURA9 training and export pipeline
//!
//! Usage:
//!   n9 train --dataset ai/dataset/neura9_dataset.csv   # train + export artifacts
//!   n9 export --model ckpt.json --output model.n9m     # re-export a trained model
//!   n9 inspect model.n9m                               # inspect an artifact

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod error;
mod output;

use commands::{export, inspect, train};

/// n9 - NEURA9 pipeline tool
///
/// Train the defense classifier offline and export it for the firmware.
#[derive(Parser)]
#[command(name = "n9")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train on a labeled dataset and export the inference artifacts
    Train {
        /// Path to the CSV dataset (72 feature columns + label)
        #[arg(long, default_value = "ai/dataset/neura9_dataset.csv")]
        dataset: PathBuf,

        /// Number of training epochs
        #[arg(long, default_value_t = 40)]
        epochs: usize,

        /// Mini-batch size
        #[arg(long, default_value_t = 256)]
        batch_size: usize,

        /// Adam learning rate
        #[arg(long, default_value_t = 1e-3)]
        learning_rate: f32,

        /// Seed for the validation split, shuffling, and weight init
        #[arg(long)]
        seed: Option<u64>,

        /// Output directory for the artifact and the C sources
        #[arg(long, default_value = "ai")]
        out_dir: PathBuf,

        /// Symbol name for the generated byte array
        #[arg(long, default_value = "neura9_defense_model")]
        symbol: String,

        /// Also persist the trained model in its native checkpoint form
        #[arg(long)]
        save_model: Option<PathBuf>,

        /// Continue with a warning when the dataset's distinct label count
        /// differs from the 10-class ABI
        #[arg(long)]
        allow_class_mismatch: bool,
    },

    /// Convert an already-trained checkpoint into the binary artifact
    Export {
        /// Path to a native model checkpoint
        #[arg(long, required = true)]
        model: PathBuf,

        /// Output path for the binary artifact
        #[arg(long, required = true)]
        output: PathBuf,
    },

    /// Inspect an artifact's metadata and tensor layout
    Inspect {
        /// Path to an .n9m artifact file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Train {
            dataset,
            epochs,
            batch_size,
            learning_rate,
            seed,
            out_dir,
            symbol,
            save_model,
            allow_class_mismatch,
        } => train::run(&train::TrainArgs {
            dataset,
            epochs,
            batch_size,
            learning_rate,
            seed,
            out_dir,
            symbol,
            save_model,
            allow_class_mismatch,
        }),

        Commands::Export { model, output } => export::run(&model, &output),

        Commands::Inspect { file } => inspect::run(&file),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            e.exit_code()
        }
    }
}
