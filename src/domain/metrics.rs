// ============================================================
// Layer 3 — Metrics Series
// ============================================================
// The per-epoch record of a training run: one average training
// loss and one test accuracy (percent) per completed epoch.
//
// Both sequences are append-only and grow together through
// `record`, so they always have the same length.

use serde::{Deserialize, Serialize};

/// One epoch's worth of metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// Epoch number, starting at 1
    pub epoch: usize,

    /// Mean cross-entropy loss over the epoch's training batches
    pub train_loss: f64,

    /// Percentage of test samples classified correctly, in [0, 100]
    pub test_accuracy: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSeries {
    train_losses:    Vec<f64>,
    test_accuracies: Vec<f64>,
}

impl MetricsSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one completed epoch and return its row.
    pub fn record(&mut self, train_loss: f64, test_accuracy: f64) -> EpochMetrics {
        self.train_losses.push(train_loss);
        self.test_accuracies.push(test_accuracy);
        EpochMetrics {
            epoch: self.len(),
            train_loss,
            test_accuracy,
        }
    }

    pub fn train_losses(&self) -> &[f64] {
        &self.train_losses
    }

    pub fn test_accuracies(&self) -> &[f64] {
        &self.test_accuracies
    }

    pub fn len(&self) -> usize {
        self.train_losses.len()
    }

    pub fn final_accuracy(&self) -> Option<f64> {
        self.test_accuracies.last().copied()
    }

    /// Iterate epochs in order, numbered from 1.
    pub fn epochs(&self) -> impl Iterator<Item = EpochMetrics> + '_ {
        self.train_losses
            .iter()
            .zip(&self.test_accuracies)
            .enumerate()
            .map(|(i, (&train_loss, &test_accuracy))| EpochMetrics {
                epoch: i + 1,
                train_loss,
                test_accuracy,
            })
    }
}
