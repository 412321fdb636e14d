// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The pipeline talks to its collaborators through these traits:
//
//   RowSource     — where raw rows come from (CsvLoader)
//   EpochObserver — told about each finished epoch (MetricsLogger)
//   ArtifactSink  — turns a finished run into a file
//                   (PlotWriter, ReportWriter)
//
// The application layer only sees the traits, so a test can
// feed rows from memory or collect epochs into a Vec without
// touching the filesystem.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use std::path::{Path, PathBuf};

use crate::domain::error::Result;
use crate::domain::metrics::{EpochMetrics, MetricsSeries};
use crate::domain::sample::RawRow;

// ─── RawTable ─────────────────────────────────────────────────────────────────
/// Rows read from a tabular source, with the names of the
/// numeric feature columns in the order they appear.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub feature_names: Vec<String>,
    pub rows:          Vec<RawRow>,
}

impl RawTable {
    pub fn feature_count(&self) -> usize {
        self.feature_names.len()
    }
}

// ─── RowSource ────────────────────────────────────────────────────────────────
/// Any component that can produce the raw table.
pub trait RowSource {
    fn load_table(&self) -> Result<RawTable>;
}

// ─── EpochObserver ────────────────────────────────────────────────────────────
/// Notified by the trainer after every completed epoch.
pub trait EpochObserver {
    fn on_epoch(&mut self, metrics: &EpochMetrics) -> Result<()>;
}

impl EpochObserver for Vec<EpochMetrics> {
    fn on_epoch(&mut self, metrics: &EpochMetrics) -> Result<()> {
        self.push(*metrics);
        Ok(())
    }
}

// ─── RunRecord ────────────────────────────────────────────────────────────────
/// Everything the output sinks need to describe a finished run.
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub epochs:        usize,
    pub batch_size:    usize,
    pub learning_rate: f64,
    pub metrics:       MetricsSeries,
    pub class_names:   Vec<String>,
    pub model_path:    PathBuf,
}

// ─── ArtifactSink ─────────────────────────────────────────────────────────────
/// Writes one artifact describing a finished run.
pub trait ArtifactSink {
    /// Where the artifact ends up.
    fn path(&self) -> &Path;

    /// Render and write the artifact, returning its path.
    fn write(&self, run: &RunRecord) -> Result<PathBuf>;
}
