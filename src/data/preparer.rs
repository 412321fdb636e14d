// ============================================================
// Layer 4 — Dataset Preparer
// ============================================================
// Turns a raw table into everything the trainer needs:
//
//   RawTable
//       │  encode class names (first-seen order)
//       ▼
//   LabeledRow ──► stratified split (seeded)
//                       │
//            ┌──────────┴──────────┐
//            ▼                     ▼
//        train rows            test rows
//            │  fit scaler         │
//            ▼                     ▼
//        transform             transform (same scaler)
//            │                     │
//            ▼                     ▼
//      IrisDataset            IrisDataset
//            │                     │
//            ▼                     ▼
//   shuffled DataLoader    fixed-order DataLoader
//
// Feature count F and class count C are fixed here and never
// change afterwards.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

use std::sync::Arc;

use burn::{
    data::dataloader::{DataLoader, DataLoaderBuilder},
    prelude::*,
};

use crate::data::{
    batcher::{IrisBatch, IrisBatcher},
    dataset::IrisDataset,
    scaler::StandardScaler,
    splitter::stratified_split,
};
use crate::domain::class_index::ClassIndex;
use crate::domain::error::Result;
use crate::domain::sample::{LabeledRow, Sample};
use crate::domain::traits::RowSource;

/// Split and batching settings for a preparation run.
#[derive(Debug, Clone)]
pub struct DatasetPreparer {
    test_fraction: f64,
    split_seed:    u64,
    batch_size:    usize,
}

/// The prepared splits plus the metadata fixed while preparing them.
#[derive(Debug, Clone)]
pub struct PreparedData {
    pub train:         IrisDataset,
    pub test:          IrisDataset,
    pub classes:       ClassIndex,
    pub feature_names: Vec<String>,
    pub scaler:        StandardScaler,
    batch_size:        usize,
}

impl DatasetPreparer {
    pub fn new(test_fraction: f64, split_seed: u64, batch_size: usize) -> Self {
        Self { test_fraction, split_seed, batch_size }
    }

    pub fn prepare(&self, source: &impl RowSource) -> Result<PreparedData> {
        let table = source.load_table()?;

        let classes = ClassIndex::from_names(table.rows.iter().map(|r| r.class.as_str()));
        tracing::info!("Found {} classes: {:?}", classes.len(), classes.names());

        let labeled = table
            .rows
            .into_iter()
            .map(|row| {
                Ok(LabeledRow {
                    label:    classes.label_of(&row.class)?,
                    features: row.features,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let (train_rows, test_rows) = stratified_split(
            labeled,
            |r| r.label,
            classes.len(),
            self.test_fraction,
            self.split_seed,
        )?;

        // Fit on the training split only, then reuse for the test split
        let train_features: Vec<Vec<f64>> = train_rows.iter().map(|r| r.features.clone()).collect();
        let scaler = StandardScaler::fit(&train_features)?;

        let train = IrisDataset::new(standardise(&scaler, train_rows)?);
        let test  = IrisDataset::new(standardise(&scaler, test_rows)?);

        tracing::info!(
            "Split: {} train, {} test",
            train.samples().len(),
            test.samples().len()
        );

        Ok(PreparedData {
            train,
            test,
            classes,
            feature_names: table.feature_names,
            scaler,
            batch_size: self.batch_size,
        })
    }
}

fn standardise(scaler: &StandardScaler, rows: Vec<LabeledRow>) -> Result<Vec<Sample>> {
    rows.into_iter()
        .map(|r| Ok(Sample::new(scaler.transform(&r.features)?, r.label)))
        .collect()
}

impl PreparedData {
    pub fn feature_count(&self) -> usize {
        self.feature_names.len()
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Class names ordered by label.
    pub fn class_names(&self) -> &[String] {
        self.classes.names()
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Training batches; every call to `iter()` on the loader yields a
    /// fresh shuffle. The shuffle seed is drawn at random, so only the
    /// split itself is reproducible across runs.
    pub fn train_batches<B: Backend>(&self, device: &B::Device) -> Arc<dyn DataLoader<IrisBatch<B>>> {
        DataLoaderBuilder::new(IrisBatcher::<B>::new(device.clone()))
            .batch_size(self.batch_size)
            .shuffle(rand::random::<u64>())
            .build(self.train.clone())
    }

    /// Evaluation batches in a fixed order; the last batch may be short.
    pub fn test_batches<B: Backend>(&self, device: &B::Device) -> Arc<dyn DataLoader<IrisBatch<B>>> {
        DataLoaderBuilder::new(IrisBatcher::<B>::new(device.clone()))
            .batch_size(self.batch_size)
            .build(self.test.clone())
    }
}
