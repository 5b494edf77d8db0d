//! Output formatting utilities.

use colored::Colorize;
use neura9::train::{EpochMetrics, TrainObserver};

/// Print a section header
pub(crate) fn section(title: &str) {
    println!("\n{}", format!("=== {title} ===").cyan().bold());
}

/// Print a key-value pair
pub(crate) fn kv(key: &str, value: impl std::fmt::Display) {
    println!("  {}: {}", key.white().bold(), value);
}

/// Print a success message
pub(crate) fn success(msg: &str) {
    println!("{} {}", "[PASS]".green().bold(), msg);
}

/// Print a warning message
pub(crate) fn warning(msg: &str) {
    println!("{} {}", "[WARN]".yellow().bold(), msg);
}

/// Print an info message
pub(crate) fn info(msg: &str) {
    println!("{} {}", "[INFO]".blue(), msg);
}

/// Format bytes as human-readable size
pub(crate) fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// Console progress sink for the trainer.
pub(crate) struct ConsoleObserver;

impl TrainObserver for ConsoleObserver {
    fn epoch_end(&mut self, m: &EpochMetrics) {
        let val = match (m.val_loss, m.val_accuracy) {
            (Some(loss), Some(acc)) => format!(" - val_loss {loss:.4} val_acc {acc:.4}"),
            _ => String::new(),
        };
        println!(
            "epoch {}/{} - loss {:.4} acc {:.4}{val}",
            m.epoch, m.epochs, m.train_loss, m.train_accuracy
        );
    }

    fn warning(&mut self, message: &str) {
        warning(message);
    }
}
