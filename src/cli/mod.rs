// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// The only input is the base directory that holds `data/`
// and `results/`; it can also come from CODEOCEAN_BASE_DIR.
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::application::train_use_case::{RunConfig, TrainUseCase, BASE_DIR_ENV};

/// The main CLI struct — clap reads the fields and generates
/// argument parsing code automatically via the Parser derive macro.
#[derive(Parser, Debug)]
#[command(
    name = "iris-classifier",
    version = "0.1.0",
    about = "Train a small feed-forward classifier on the Iris dataset and report the results."
)]
pub struct Cli {
    /// Directory containing data/Iris.csv; results/ is created beside it
    #[arg(long, env = BASE_DIR_ENV, default_value = "/")]
    pub base_dir: PathBuf,
}

impl Cli {
    /// Build the run config and hand off to Layer 2.
    pub fn run(self) -> Result<()> {
        tracing::info!("Base directory: {}", self.base_dir.display());

        let artifacts = TrainUseCase::new(RunConfig::from_base_dir(self.base_dir)).execute()?;
        tracing::info!(
            "Run complete: {} train / {} test rows, classes {:?}, final test accuracy {:.2}%",
            artifacts.train_rows,
            artifacts.test_rows,
            artifacts.class_names,
            artifacts.metrics.final_accuracy().unwrap_or_default()
        );
        tracing::info!(
            "Artifacts: model '{}', plot '{}', report '{}', metrics '{}'",
            artifacts.model_path.display(),
            artifacts.plot_path.display(),
            artifacts.report_path.display(),
            artifacts.metrics_path.display()
        );

        println!("Neural network example finished successfully with tabular data!");
        Ok(())
    }
}
