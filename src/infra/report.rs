// ============================================================
// Layer 6 — Analysis Report
// ============================================================
// Writes the plain-text summary of a run:
//
//   --- Neural Network Analysis Report (Tabular Data) ---
//
//   Date: 2026-10-19 14:03:11
//   Framework: Burn (ndarray backend)
//   Dataset: Iris (Tabular)
//   Number of Epochs: 50
//   Batch Size: 16
//   Learning Rate: 0.01
//
//   Training Summary:
//     Epoch 1: Loss = 1.052, Test Accuracy = 63.33%
//     ...
//
//   Final Test Accuracy: 96.67%
//   Model saved to: /results/iris_nn_model.mpk
//   Training plots saved to: /results/training_metrics.svg
//   Classes: ['Iris-setosa', 'Iris-versicolor', 'Iris-virginica']
//
// The report points at the saved model, so the model file must
// exist before the report is written.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};

use crate::domain::error::{PipelineError, Result};
use crate::domain::traits::{ArtifactSink, RunRecord};

pub struct ReportWriter {
    path:      PathBuf,
    plot_path: PathBuf,
}

impl ReportWriter {
    pub fn new(path: impl Into<PathBuf>, plot_path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), plot_path: plot_path.into() }
    }

    /// Render the report text for `run`, stamped with `now`.
    pub fn render(&self, run: &RunRecord, now: DateTime<Local>) -> String {
        let mut lines = vec![
            "--- Neural Network Analysis Report (Tabular Data) ---".to_string(),
            String::new(),
            format!("Date: {}", now.format("%Y-%m-%d %H:%M:%S")),
            "Framework: Burn (ndarray backend)".to_string(),
            "Dataset: Iris (Tabular)".to_string(),
            format!("Number of Epochs: {}", run.epochs),
            format!("Batch Size: {}", run.batch_size),
            format!("Learning Rate: {}", run.learning_rate),
            String::new(),
            "Training Summary:".to_string(),
        ];

        lines.extend(run.metrics.epochs().map(|m| {
            format!(
                "  Epoch {}: Loss = {:.3}, Test Accuracy = {:.2}%",
                m.epoch, m.train_loss, m.test_accuracy
            )
        }));

        let final_acc = run
            .metrics
            .final_accuracy()
            .map(|acc| format!("{acc:.2}%"))
            .unwrap_or_else(|| "n/a".to_string());
        let classes: Vec<String> = run.class_names.iter().map(|c| format!("'{c}'")).collect();

        lines.push(String::new());
        lines.push(format!("Final Test Accuracy: {final_acc}"));
        lines.push(format!("Model saved to: {}", run.model_path.display()));
        lines.push(format!("Training plots saved to: {}", self.plot_path.display()));
        lines.push(format!("Classes: [{}]", classes.join(", ")));

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

impl ArtifactSink for ReportWriter {
    fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, run: &RunRecord) -> Result<PathBuf> {
        if !run.model_path.is_file() {
            return Err(PipelineError::io(format!(
                "model file '{}' not found; cannot write report",
                run.model_path.display()
            )));
        }

        let text = self.render(run, Local::now());
        fs::write(&self.path, text).map_err(|e| {
            PipelineError::io(format!("cannot write report to '{}': {e}", self.path.display()))
        })?;

        println!("Analysis report saved to {}", self.path.display());
        Ok(self.path.clone())
    }
}
