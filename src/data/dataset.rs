use burn::data::dataset::Dataset;

use crate::domain::sample::Sample;

/// In-memory split of prepared samples.
/// Cloning is how the preparer hands one copy to each data loader.
#[derive(Debug, Clone)]
pub struct IrisDataset {
    samples: Vec<Sample>,
}

impl IrisDataset {
    pub fn new(samples: Vec<Sample>) -> Self { Self { samples } }

    pub fn samples(&self) -> &[Sample] { &self.samples }
}

impl Dataset<Sample> for IrisDataset {
    fn get(&self, index: usize) -> Option<Sample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
