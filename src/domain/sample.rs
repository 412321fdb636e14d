// ============================================================
// Layer 3 — Sample Domain Types
// ============================================================
// A RawRow is one line of the input table after the target
// column has been pulled out and the identifier column dropped.
// A Sample is the same row once its label has been encoded and
// its features standardised; this is the unit the batcher stacks.
//
// Reference: Rust Book §5 (Structs and Methods)

use serde::{Deserialize, Serialize};

/// One input row: numeric feature values plus the class name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    pub features: Vec<f64>,
    pub class:    String,
}

impl RawRow {
    pub fn new(features: Vec<f64>, class: impl Into<String>) -> Self {
        Self { features, class: class.into() }
    }
}

/// A row whose class has been mapped to its integer label.
/// Features are still in their original units at this stage.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledRow {
    pub features: Vec<f64>,
    pub label:    usize,
}

/// A fully prepared training/evaluation example.
/// `features` are standardised with training-split statistics;
/// `label` is in [0, class_count).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub features: Vec<f32>,
    pub label:    usize,
}

impl Sample {
    pub fn new(features: Vec<f32>, label: usize) -> Self {
        Self { features, label }
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }
}
