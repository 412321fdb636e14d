// ============================================================
// Layer 4 — Feature Standardiser
// ============================================================
// Rescales every feature to zero mean and unit variance:
//
//   x' = (x - mean) / std
//
// The statistics are fitted on the TRAINING split only and then
// applied unchanged to the test split. Fitting on the test rows
// would leak information about the held-out data into training.
//
// std is the population standard deviation (divide by n). A
// feature that is constant in the training split has std 0; it
// is left unscaled (std treated as 1) so the transform stays
// finite.

use crate::domain::error::{PipelineError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    means: Vec<f64>,
    stds:  Vec<f64>,
}

impl StandardScaler {
    /// Fit per-feature mean and std on the given rows.
    pub fn fit(rows: &[Vec<f64>]) -> Result<Self> {
        let first = rows
            .first()
            .ok_or_else(|| PipelineError::data("cannot fit scaler on zero rows"))?;
        let width = first.len();
        if rows.iter().any(|r| r.len() != width) {
            return Err(PipelineError::data("rows have differing feature counts"));
        }

        let n = rows.len() as f64;
        let mut means = vec![0.0; width];
        for row in rows {
            for (m, &x) in means.iter_mut().zip(row) {
                *m += x;
            }
        }
        means.iter_mut().for_each(|m| *m /= n);

        let mut stds = vec![0.0; width];
        for row in rows {
            for ((s, &x), &m) in stds.iter_mut().zip(row).zip(&means) {
                *s += (x - m) * (x - m);
            }
        }
        for (i, s) in stds.iter_mut().enumerate() {
            *s = (*s / n).sqrt();
            if *s == 0.0 {
                tracing::warn!("Feature {i} is constant in the training split; leaving it unscaled");
                *s = 1.0;
            }
        }

        Ok(Self { means, stds })
    }

    /// Apply the fitted transform to one feature vector.
    pub fn transform(&self, features: &[f64]) -> Result<Vec<f32>> {
        if features.len() != self.means.len() {
            return Err(PipelineError::data(format!(
                "expected {} features, got {}",
                self.means.len(),
                features.len()
            )));
        }
        Ok(features
            .iter()
            .zip(&self.means)
            .zip(&self.stds)
            .map(|((&x, &m), &s)| ((x - m) / s) as f32)
            .collect())
    }

    pub fn means(&self) -> &[f64] {
        &self.means
    }

    pub fn stds(&self) -> &[f64] {
        &self.stds
    }
}
