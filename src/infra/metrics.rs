// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records training metrics to a CSV file after each epoch.
//
// Metrics recorded per epoch:
//   - epoch:         the epoch number (1, 2, 3, ...)
//   - train_loss:    average cross-entropy loss on the training set
//   - test_accuracy: % of test samples classified correctly
//
// Output file: results/metrics.csv
//
// Example CSV output:
//   epoch,train_loss,test_accuracy
//   1,1.052310,63.333333
//   2,0.811942,80.000000
//   ...
//
// The file is recreated when the logger is built, so it always
// describes the current run; rows are then appended one epoch at
// a time, which leaves a usable partial log if a later epoch fails.
//
// Reference: Rust Book §12 (I/O and File Handling)

use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use crate::domain::error::{PipelineError, Result};
use crate::domain::metrics::EpochMetrics;
use crate::domain::traits::EpochObserver;

const HEADER: &str = "epoch,train_loss,test_accuracy";

/// Logs epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create the CSV file (replacing any previous one) and write the header.
    pub fn create(csv_path: impl Into<PathBuf>) -> Result<Self> {
        let csv_path = csv_path.into();
        let mut f = fs::File::create(&csv_path).map_err(|e| io_error(&csv_path, e))?;
        writeln!(f, "{HEADER}").map_err(|e| io_error(&csv_path, e))?;
        tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .map_err(|e| io_error(&self.csv_path, e))?;

        writeln!(f, "{},{:.6},{:.6}", m.epoch, m.train_loss, m.test_accuracy)
            .map_err(|e| io_error(&self.csv_path, e))?;

        tracing::debug!(
            "Logged epoch {} metrics: train_loss={:.4}, test_accuracy={:.2}",
            m.epoch,
            m.train_loss,
            m.test_accuracy,
        );
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

impl EpochObserver for MetricsLogger {
    fn on_epoch(&mut self, metrics: &EpochMetrics) -> Result<()> {
        self.log(metrics)
    }
}

fn io_error(path: &Path, e: std::io::Error) -> PipelineError {
    PipelineError::io(format!("metrics log '{}': {e}", path.display()))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_then_one_row_per_epoch() {
        let dir = std::env::temp_dir().join(format!("iris_metrics_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("metrics.csv");

        let mut logger = MetricsLogger::create(&path).unwrap();
        logger
            .on_epoch(&EpochMetrics { epoch: 1, train_loss: 1.5, test_accuracy: 40.0 })
            .unwrap();
        logger
            .on_epoch(&EpochMetrics { epoch: 2, train_loss: 0.25, test_accuracy: 95.0 })
            .unwrap();

        let text = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec![HEADER, "1,1.500000,40.000000", "2,0.250000,95.000000"]);

        // A new logger starts the file over
        MetricsLogger::create(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 1);
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let path = std::env::temp_dir().join("iris_no_such_dir_xyz").join("metrics.csv");
        let err = MetricsLogger::create(path).err().unwrap();
        assert!(matches!(err, PipelineError::Io(_)));
    }
}
