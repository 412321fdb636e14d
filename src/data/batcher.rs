// ============================================================
// Layer 4 — Iris Batcher
// ============================================================
// Implements Burn's Batcher trait to stack a Vec<Sample> into
// the two tensors the model consumes.
//
// How batching works here:
//   Input:  Vec of N Samples, each with F standardised features
//   Output: IrisBatch with features [N, F] and labels [N]
//
//   The feature vectors are flattened row by row into one Vec,
//   then wrapped in TensorData with shape [N, F]:
//   [s1_f1, s1_f2, ..., s1_fF, s2_f1, ..., sN_fF] → [N, F]
//
// N is the loader's batch size except for the final batch of
// an epoch, which holds whatever samples are left.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
    tensor::TensorData,
};

use crate::domain::sample::Sample;

// ─── IrisBatch ────────────────────────────────────────────────────────────────
/// A batch of samples ready for the model forward pass.
#[derive(Debug, Clone)]
pub struct IrisBatch<B: Backend> {
    /// Standardised features — shape: [batch_size, feature_count]
    pub features: Tensor<B, 2>,

    /// Class labels — shape: [batch_size]
    pub labels: Tensor<B, 1, Int>,
}

impl<B: Backend> IrisBatch<B> {
    pub fn len(&self) -> usize {
        self.labels.dims()[0]
    }
}

// ─── IrisBatcher ──────────────────────────────────────────────────────────────
/// Holds the target device so tensors are created in the right place.
#[derive(Clone, Debug)]
pub struct IrisBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> IrisBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<Sample, IrisBatch<B>> for IrisBatcher<B> {
    fn batch(&self, items: Vec<Sample>) -> IrisBatch<B> {
        let batch_size = items.len();
        let width      = items.first().map(Sample::feature_count).unwrap_or(0);

        let features_flat: Vec<f32> = items
            .iter()
            .flat_map(|s| s.features.iter().copied())
            .collect();

        let labels: Vec<i64> = items.iter().map(|s| s.label as i64).collect();

        let features = Tensor::<B, 2>::from_floats(
            TensorData::new(features_flat, [batch_size, width]),
            &self.device,
        );
        let labels = Tensor::<B, 1, Int>::from_ints(
            TensorData::new(labels, [batch_size]),
            &self.device,
        );

        IrisBatch { features, labels }
    }
}
