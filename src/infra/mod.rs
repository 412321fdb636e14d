// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Everything that writes a file in the results directory:
//
//   checkpoint.rs — Model parameters via Burn's CompactRecorder,
//                   plus the run configuration as JSON
//
//   metrics.rs    — Per-epoch metrics appended to a CSV file,
//                   fed by the trainer through EpochObserver
//
//   plot.rs       — Two-panel loss / accuracy chart (plotters)
//
//   report.rs     — Plain-text analysis report
//
// Reference: Rust Book §9 (Error Handling)
//            Burn Book §5 (Checkpointing)

/// Model parameter and run config persistence
pub mod checkpoint;

/// Training metrics CSV logger
pub mod metrics;

/// Loss / accuracy plot
pub mod plot;

/// Text analysis report
pub mod report;
