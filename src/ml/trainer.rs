// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Train + evaluate for a fixed number of epochs with Adam.
//
// Per epoch:
//   1. mode → Train
//   2. every (reshuffled) training batch:
//        forward → cross-entropy → backward → Adam step
//   3. record mean batch loss
//   4. mode → Eval; model.valid() drops autodiff and dropout
//   5. every test batch (fixed order): arg-max vs label
//   6. record accuracy = 100 * correct / total
//
// Burn notes:
//   - Training runs on B (an AutodiffBackend) so loss.backward()
//     produces gradients
//   - model.valid() returns the model on B::InnerBackend, and the
//     test loader must be built on that same inner backend
//   - argmax(1) returns [batch, 1]; flatten before .equal()
//
// A batch whose feature width does not match the model aborts the run with
// a ModelError. There is no retry and no partial-epoch recovery.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use burn::{
    data::dataloader::DataLoader,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::{backend::AutodiffBackend, ElementConversion},
};

use crate::application::train_use_case::RunConfig;
use crate::data::{batcher::IrisBatch, preparer::PreparedData};
use crate::domain::error::{PipelineError, Result};
use crate::domain::metrics::MetricsSeries;
use crate::domain::traits::EpochObserver;
use crate::ml::model::{IrisClassifier, ModelMode};

/// What a finished run hands back: the model on the inner
/// (non-autodiff) backend, its final mode, and the metrics.
pub struct TrainingOutcome<B: Backend> {
    pub model:   IrisClassifier<B>,
    pub mode:    ModelMode,
    pub metrics: MetricsSeries,
}

pub struct Trainer<B: AutodiffBackend> {
    epochs:        usize,
    learning_rate: f64,
    device:        B::Device,
    mode:          ModelMode,
    metrics:       MetricsSeries,
}

impl<B: AutodiffBackend> Trainer<B> {
    pub fn new(cfg: &RunConfig, device: B::Device) -> Self {
        Self {
            epochs:        cfg.epochs,
            learning_rate: cfg.learning_rate,
            device,
            mode:          ModelMode::Train,
            metrics:       MetricsSeries::new(),
        }
    }

    fn set_mode(&mut self, next: ModelMode) {
        if self.mode != next {
            tracing::debug!(
                "Model mode {:?} -> {:?} (gradients {})",
                self.mode,
                next,
                if next.tracks_gradients() { "on" } else { "off" }
            );
        }
        self.mode = next;
    }

    /// Run every epoch and return the trained model in eval mode.
    pub fn fit(
        mut self,
        mut model: IrisClassifier<B>,
        data:      &PreparedData,
        observer:  &mut dyn EpochObserver,
    ) -> Result<TrainingOutcome<B::InnerBackend>> {
        // ── Adam optimiser ────────────────────────────────────────────────────
        // m = β1*m + (1-β1)*g        (mean)
        // v = β2*v + (1-β2)*g²       (variance)
        // θ = θ - lr * m / (√v + ε)  (update)
        let mut optim = AdamConfig::new().init();

        let train_loader = data.train_batches::<B>(&self.device);
        let test_loader  = data.test_batches::<B::InnerBackend>(&self.device);

        tracing::info!(
            "Training for {} epochs (lr={}, batch_size={})",
            self.epochs,
            self.learning_rate,
            data.batch_size()
        );

        for epoch in 1..=self.epochs {
            // ── Training phase ────────────────────────────────────────────────
            self.set_mode(ModelMode::Train);
            let mut loss_sum = 0.0f64;
            let mut batches  = 0usize;

            for batch in train_loader.iter() {
                check_batch(&batch, &model)?;
                let (loss, _) = model.forward_loss(batch.features, batch.labels);

                let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
                if !loss_val.is_finite() {
                    return Err(PipelineError::model(format!(
                        "non-finite loss {loss_val} in epoch {epoch}"
                    )));
                }
                loss_sum += loss_val;
                batches  += 1;

                // Backward pass + Adam update
                let grads = loss.backward();
                let grads = GradientsParams::from_grads(grads, &model);
                model = optim.step(self.learning_rate, model, grads);
            }

            if batches == 0 {
                return Err(PipelineError::model("training split produced no batches"));
            }
            let avg_loss = loss_sum / batches as f64;

            // ── Evaluation phase ──────────────────────────────────────────────
            self.set_mode(ModelMode::Eval);
            let accuracy = evaluate(&model.valid(), test_loader.as_ref())?;

            let row = self.metrics.record(avg_loss, accuracy);
            observer.on_epoch(&row)?;

            println!(
                "Epoch {:>3}/{} | train_loss={:.3} | test_acc={:.2}%",
                epoch, self.epochs, avg_loss, accuracy,
            );
            tracing::debug!("Epoch {} done over {} batches", epoch, batches);
        }

        println!("Finished Training");
        self.set_mode(ModelMode::Eval);
        Ok(TrainingOutcome {
            model:   model.valid(),
            mode:    self.mode,
            metrics: self.metrics,
        })
    }
}

/// Percentage of evaluation samples whose arg-max class matches the label.
///
/// Runs on a non-autodiff backend, so no gradients are tracked and
/// dropout is inactive; repeated calls on the same model and loader
/// give the same result.
pub fn evaluate<B: Backend>(
    model:  &IrisClassifier<B>,
    loader: &dyn DataLoader<IrisBatch<B>>,
) -> Result<f64> {
    let mut correct = 0usize;
    let mut total   = 0usize;

    for batch in loader.iter() {
        check_batch(&batch, model)?;
        total += batch.len();

        let predicted = model.predict(batch.features);
        let hits: i64 = predicted
            .equal(batch.labels)
            .int()
            .sum()
            .into_scalar()
            .elem::<i64>();
        correct += hits as usize;
    }

    if total == 0 {
        return Err(PipelineError::model("evaluation split produced no samples"));
    }
    Ok(100.0 * correct as f64 / total as f64)
}

/// Feature width of the batch must match the model's input layer.
fn check_batch<B: Backend>(batch: &IrisBatch<B>, model: &IrisClassifier<B>) -> Result<()> {
    let [_, width] = batch.features.dims();
    if width != model.input_size {
        return Err(PipelineError::model(format!(
            "batch has {width} features but the model expects {}",
            model.input_size
        )));
    }
    Ok(())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::{ndarray::NdArrayDevice, Autodiff, NdArray};

    use crate::data::batcher::IrisBatcher;
    use crate::data::preparer::{
        tests::{synthetic_table, MemorySource},
        DatasetPreparer,
    };
    use crate::domain::metrics::EpochMetrics;
    use crate::domain::sample::Sample;
    use crate::ml::model::IrisClassifierConfig;
    use burn::data::dataloader::batcher::Batcher;

    type TrainBackend = Autodiff<NdArray>;

    fn prepared() -> PreparedData {
        DatasetPreparer::new(0.2, 42, 16)
            .prepare(&MemorySource(synthetic_table(100, 3, 4)))
            .unwrap()
    }

    fn short_run(epochs: usize) -> RunConfig {
        RunConfig { epochs, ..RunConfig::default() }
    }

    #[test]
    fn test_series_length_and_ranges() {
        let data = prepared();
        let device = NdArrayDevice::Cpu;
        let model: IrisClassifier<TrainBackend> =
            IrisClassifierConfig::new(data.feature_count(), data.class_count()).init(&device);

        let mut seen: Vec<EpochMetrics> = Vec::new();
        let outcome = Trainer::<TrainBackend>::new(&short_run(3), device)
            .fit(model, &data, &mut seen)
            .unwrap();

        assert_eq!(outcome.mode, ModelMode::Eval);
        assert_eq!(outcome.metrics.len(), 3);
        assert_eq!(outcome.metrics.train_losses().len(), 3);
        assert_eq!(outcome.metrics.test_accuracies().len(), 3);
        assert!(outcome.metrics.train_losses().iter().all(|&l| l >= 0.0));
        assert!(outcome
            .metrics
            .test_accuracies()
            .iter()
            .all(|&a| (0.0..=100.0).contains(&a)));
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[2].epoch, 3);
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let data = prepared();
        let device = NdArrayDevice::Cpu;
        let model: IrisClassifier<NdArray> =
            IrisClassifierConfig::new(data.feature_count(), data.class_count()).init(&device);
        let loader = data.test_batches::<NdArray>(&device);

        let first = evaluate(&model, loader.as_ref()).unwrap();
        let second = evaluate(&model, loader.as_ref()).unwrap();
        assert_eq!(first, second);
        assert!((0.0..=100.0).contains(&first));
    }

    #[test]
    fn test_wrong_feature_width_is_model_error() {
        let device = NdArrayDevice::Cpu;
        let model: IrisClassifier<NdArray> = IrisClassifierConfig::new(4, 3).init(&device);
        let batch = IrisBatcher::<NdArray>::new(device).batch(vec![Sample::new(vec![0.0; 3], 1)]);
        let err = check_batch(&batch, &model).unwrap_err();
        assert!(matches!(err, PipelineError::Model(_)));
    }

    #[test]
    fn test_mismatched_model_aborts_training() {
        let data = prepared();
        let device = NdArrayDevice::Cpu;
        // Model built for 5 features, data has 4
        let model: IrisClassifier<TrainBackend> = IrisClassifierConfig::new(5, 3).init(&device);
        let mut seen: Vec<EpochMetrics> = Vec::new();
        let result = Trainer::<TrainBackend>::new(&short_run(2), device).fit(model, &data, &mut seen);
        assert!(matches!(result, Err(PipelineError::Model(_))));
        assert!(seen.is_empty());
    }

    #[test]
    fn test_trainer_starts_in_train_mode() {
        let trainer = Trainer::<TrainBackend>::new(&RunConfig::default(), NdArrayDevice::Cpu);
        assert_eq!(trainer.mode, ModelMode::Train);
    }
}
