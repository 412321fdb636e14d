// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full pipeline in order:
//
//   Step 1: Validate config, create data/results dirs
//   Step 2: Load + encode + split + scale   (Layer 4 - data)
//   Step 3: Save run config                 (Layer 6 - infra)
//   Step 4: Build the model                 (Layer 5 - ml)
//   Step 5: Run the training loop           (Layer 5 - ml)
//   Step 6: Save model parameters           (Layer 6 - infra)
//   Step 7: Write plot and report           (Layer 6 - infra)
//
// Everything runs on one thread, start to finish. Any error
// stops the run; artifacts not yet written simply don't exist.
//
// Reference: Burn Book §5 (Training)

use std::{fs, path::PathBuf};

use anyhow::{ensure, Context, Result};
use burn::backend::{ndarray::NdArrayDevice, Autodiff, NdArray};
use serde::{Deserialize, Serialize};

use crate::data::{loader::CsvLoader, preparer::DatasetPreparer};
use crate::domain::error::PipelineError;
use crate::domain::metrics::MetricsSeries;
use crate::domain::traits::{ArtifactSink, RunRecord};
use crate::infra::{
    checkpoint::ModelStore,
    metrics::MetricsLogger,
    plot::PlotWriter,
    report::ReportWriter,
};
use crate::ml::{
    model::{IrisClassifier, IrisClassifierConfig},
    trainer::Trainer,
};

type TrainBackend = Autodiff<NdArray>;

/// Environment variable that relocates the data and results directories.
pub const BASE_DIR_ENV: &str = "CODEOCEAN_BASE_DIR";

// ─── Run Configuration ───────────────────────────────────────────────────────
// Paths and hyperparameters for one run. Only `base_dir` comes from
// the outside world; the rest are fixed constants set in Default.
// Serialisable so the exact settings are saved next to the results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub base_dir:      PathBuf,
    pub data_file:     String,
    pub target_column: String,
    pub id_column:     String,
    pub epochs:        usize,
    pub batch_size:    usize,
    pub learning_rate: f64,
    pub test_fraction: f64,
    pub split_seed:    u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            base_dir:      PathBuf::from("/"),
            data_file:     "Iris.csv".to_string(),
            target_column: "Species".to_string(),
            id_column:     "Id".to_string(),
            epochs:        50,
            batch_size:    16,
            learning_rate: 0.01,
            test_fraction: 0.2,
            split_seed:    42,
        }
    }
}

impl RunConfig {
    pub fn from_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into(), ..Self::default() }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn results_dir(&self) -> PathBuf {
        self.base_dir.join("results")
    }

    pub fn data_path(&self) -> PathBuf {
        self.data_dir().join(&self.data_file)
    }

    /// Model path without extension; the recorder adds ".mpk".
    pub fn model_stem(&self) -> PathBuf {
        self.results_dir().join("iris_nn_model")
    }

    pub fn plot_path(&self) -> PathBuf {
        self.results_dir().join("training_metrics.svg")
    }

    pub fn report_path(&self) -> PathBuf {
        self.results_dir().join("analysis_report.txt")
    }

    pub fn metrics_path(&self) -> PathBuf {
        self.results_dir().join("metrics.csv")
    }

    pub fn config_path(&self) -> PathBuf {
        self.results_dir().join("run_config.json")
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.epochs > 0, "epochs must be at least 1");
        ensure!(self.batch_size > 0, "batch_size must be at least 1");
        ensure!(
            self.learning_rate > 0.0 && self.learning_rate.is_finite(),
            "learning_rate must be positive, got {}",
            self.learning_rate
        );
        ensure!(
            self.test_fraction > 0.0 && self.test_fraction < 1.0,
            "test_fraction must be in (0, 1), got {}",
            self.test_fraction
        );
        Ok(())
    }
}

// ─── Run Summary ─────────────────────────────────────────────────────────────
/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct RunArtifacts {
    pub metrics:      MetricsSeries,
    pub class_names:  Vec<String>,
    pub train_rows:   usize,
    pub test_rows:    usize,
    pub model_path:   PathBuf,
    pub plot_path:    PathBuf,
    pub report_path:  PathBuf,
    pub metrics_path: PathBuf,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: RunConfig,
}

impl TrainUseCase {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    /// Execute the full pipeline end to end
    pub fn execute(&self) -> Result<RunArtifacts> {
        let cfg = &self.config;

        // ── Step 1: Config and directories ───────────────────────────────────
        cfg.validate().context("invalid run configuration")?;
        for dir in [cfg.data_dir(), cfg.results_dir()] {
            fs::create_dir_all(&dir)
                .map_err(|e| PipelineError::io(format!("cannot create '{}': {e}", dir.display())))?;
        }

        let device = NdArrayDevice::Cpu;
        println!("Using device: {:?}", device);

        // ── Step 2: Prepare the dataset ──────────────────────────────────────
        let loader = CsvLoader::new(cfg.data_path(), &cfg.target_column, &cfg.id_column);
        let data = DatasetPreparer::new(cfg.test_fraction, cfg.split_seed, cfg.batch_size)
            .prepare(&loader)
            .with_context(|| format!("preparing dataset from '{}'", cfg.data_path().display()))?;
        tracing::debug!(
            "Standardisation fitted on train split: means={:?} stds={:?}",
            data.scaler.means(),
            data.scaler.stds()
        );

        // ── Step 3: Save config next to the results ──────────────────────────
        let store = ModelStore::new(cfg.model_stem(), cfg.config_path());
        store.save_config(cfg)?;

        // ── Step 4: Build model ──────────────────────────────────────────────
        let model: IrisClassifier<TrainBackend> =
            IrisClassifierConfig::new(data.feature_count(), data.class_count()).init(&device);
        tracing::info!(
            "Model ready: {} features -> {} classes",
            model.input_size,
            model.num_classes
        );

        // ── Step 5: Train ────────────────────────────────────────────────────
        let mut logger = MetricsLogger::create(cfg.metrics_path())?;
        let outcome = Trainer::<TrainBackend>::new(cfg, device)
            .fit(model, &data, &mut logger)
            .context("training failed")?;
        tracing::debug!("Trainer finished in {:?} mode", outcome.mode);

        // ── Step 6: Save model ───────────────────────────────────────────────
        println!("Saving model...");
        let model_path = store.save_model(&outcome.model)?;

        // ── Step 7: Plot and report ──────────────────────────────────────────
        let run = RunRecord {
            epochs:        cfg.epochs,
            batch_size:    cfg.batch_size,
            learning_rate: cfg.learning_rate,
            metrics:       outcome.metrics,
            class_names:   data.class_names().to_vec(),
            model_path,
        };
        let plot   = PlotWriter::new(cfg.plot_path());
        let report = ReportWriter::new(cfg.report_path(), plot.path());
        let sinks: [&dyn ArtifactSink; 2] = [&plot, &report];
        for sink in sinks {
            sink.write(&run)?;
        }

        Ok(RunArtifacts {
            metrics:      run.metrics,
            class_names:  run.class_names,
            train_rows:   data.train.samples().len(),
            test_rows:    data.test.samples().len(),
            model_path:   run.model_path,
            plot_path:    plot.path().to_path_buf(),
            report_path:  report.path().to_path_buf(),
            metrics_path: logger.csv_path().to_path_buf(),
        })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write as _;

    fn scratch_base(tag: &str) -> PathBuf {
        let base = std::env::temp_dir().join(format!("iris_run_{tag}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&base);
        fs::create_dir_all(base.join("data")).unwrap();
        base
    }

    /// 100 rows, 3 balanced classes, 4 numeric features, Iris-style header.
    fn write_synthetic_iris(base: &std::path::Path) {
        let mut csv = String::from(
            "Id,SepalLengthCm,SepalWidthCm,PetalLengthCm,PetalWidthCm,Species\n",
        );
        let names = ["Iris-setosa", "Iris-versicolor", "Iris-virginica"];
        for i in 0..100 {
            let c = i % 3;
            let jitter = ((i * 13) % 7) as f64 * 0.1;
            writeln!(
                csv,
                "{},{:.1},{:.1},{:.1},{:.1},{}",
                i + 1,
                4.5 + c as f64 + jitter,
                3.0 + jitter,
                1.5 + 2.0 * c as f64 + jitter,
                0.2 + c as f64 + jitter,
                names[c]
            )
            .unwrap();
        }
        fs::write(base.join("data").join("Iris.csv"), csv).unwrap();
    }

    #[test]
    fn test_end_to_end_two_epochs() {
        let base = scratch_base("e2e");
        write_synthetic_iris(&base);

        let cfg = RunConfig { epochs: 2, ..RunConfig::from_base_dir(&base) };
        let artifacts = TrainUseCase::new(cfg).execute().unwrap();

        assert_eq!(artifacts.train_rows, 80);
        assert_eq!(artifacts.test_rows, 20);
        assert_eq!(
            artifacts.class_names,
            vec!["Iris-setosa", "Iris-versicolor", "Iris-virginica"]
        );
        assert_eq!(artifacts.metrics.train_losses().len(), 2);
        assert_eq!(artifacts.metrics.test_accuracies().len(), 2);

        let report = fs::read_to_string(&artifacts.report_path).unwrap();
        assert!(!report.is_empty());
        assert!(report.contains("Final Test Accuracy:"));
        assert!(report.contains("Number of Epochs: 2"));

        assert!(artifacts.model_path.is_file());
        assert!(artifacts.model_path.starts_with(base.join("results")));
        assert!(report.contains(&format!("Model saved to: {}", artifacts.model_path.display())));
        assert!(artifacts.plot_path.is_file());
        assert_eq!(fs::read_to_string(&artifacts.metrics_path).unwrap().lines().count(), 3);
        assert!(base.join("results").join("run_config.json").is_file());
    }

    #[test]
    fn test_missing_data_file_is_data_error() {
        let base = scratch_base("nodata");
        let err = TrainUseCase::new(RunConfig::from_base_dir(&base)).execute().unwrap_err();
        let kind = err.downcast_ref::<PipelineError>();
        assert!(matches!(kind, Some(PipelineError::Data(_))), "got {err:#}");
        assert!(!base.join("results").join("analysis_report.txt").exists());
    }

    #[test]
    fn test_paths_resolve_under_base_dir() {
        let cfg = RunConfig::from_base_dir("/srv/run");
        assert_eq!(cfg.data_path(), PathBuf::from("/srv/run/data/Iris.csv"));
        assert_eq!(cfg.report_path(), PathBuf::from("/srv/run/results/analysis_report.txt"));
        assert_eq!(cfg.plot_path(), PathBuf::from("/srv/run/results/training_metrics.svg"));
        assert_eq!(cfg.model_stem(), PathBuf::from("/srv/run/results/iris_nn_model"));
    }

    #[test]
    fn test_defaults_are_the_fixed_constants() {
        let cfg = RunConfig::default();
        assert_eq!(cfg.epochs, 50);
        assert_eq!(cfg.batch_size, 16);
        assert_eq!(cfg.learning_rate, 0.01);
        assert_eq!(cfg.test_fraction, 0.2);
        assert_eq!(cfg.split_seed, 42);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_degenerate_settings() {
        assert!(RunConfig { epochs: 0, ..RunConfig::default() }.validate().is_err());
        assert!(RunConfig { batch_size: 0, ..RunConfig::default() }.validate().is_err());
        assert!(RunConfig { learning_rate: 0.0, ..RunConfig::default() }.validate().is_err());
        assert!(RunConfig { test_fraction: 1.0, ..RunConfig::default() }.validate().is_err());
    }
}
