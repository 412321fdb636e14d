// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// This layer handles everything from the raw CSV file all the
// way to tensor batches.
//
// The pipeline flows in this order:
//
//   Iris.csv
//       │
//       ▼
//   CsvLoader         → reads rows, drops the Id column
//       │
//       ▼
//   ClassIndex        → class name → integer label
//       │
//       ▼
//   stratified_split  → seeded 80/20 split per class
//       │
//       ▼
//   StandardScaler    → fit on train, applied to both splits
//       │
//       ▼
//   IrisDataset       → implements Burn's Dataset trait
//       │
//       ▼
//   IrisBatcher       → stacks samples into tensor batches
//       │
//       ▼
//   DataLoader        → feeds batches to the training loop
//
// DatasetPreparer runs the whole chain and hands back the
// splits together with the class list and feature count.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads the input table with the csv crate
pub mod loader;

/// Seeded, class-stratified train/test split
pub mod splitter;

/// Per-feature standardisation fitted on the training split
pub mod scaler;

/// Implements Burn's Dataset trait for prepared samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Runs load → encode → split → scale and builds the loaders
pub mod preparer;
