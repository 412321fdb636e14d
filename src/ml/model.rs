use burn::{
    nn::{
        loss::CrossEntropyLossConfig,
        Dropout, DropoutConfig,
        Linear, LinearConfig,
        Relu,
    },
    prelude::*,
};

/// Whether the model is being fitted or measured.
///
/// Burn ties both behaviours to the backend: a model on an autodiff
/// backend records gradients and applies dropout, while `valid()`
/// moves it to the inner backend where neither happens. The trainer
/// keeps this enum in step with the backend it is using so every
/// switch shows up in the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelMode {
    Train,
    Eval,
}

impl ModelMode {
    pub fn tracks_gradients(self) -> bool {
        matches!(self, ModelMode::Train)
    }
}

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally. Do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct IrisClassifierConfig {
    pub input_size:  usize,
    pub num_classes: usize,
    #[config(default = 64)]
    pub hidden_size: usize,
    #[config(default = 32)]
    pub bottleneck_size: usize,
    #[config(default = 0.1)]
    pub dropout: f64,
}

impl IrisClassifierConfig {
    /// Build the model with freshly initialised random weights.
    pub fn init<B: Backend>(&self, device: &B::Device) -> IrisClassifier<B> {
        IrisClassifier {
            hidden:      LinearConfig::new(self.input_size, self.hidden_size).init(device),
            bottleneck:  LinearConfig::new(self.hidden_size, self.bottleneck_size).init(device),
            output:      LinearConfig::new(self.bottleneck_size, self.num_classes).init(device),
            activation:  Relu::new(),
            dropout:     DropoutConfig::new(self.dropout).init(),
            input_size:  self.input_size,
            num_classes: self.num_classes,
        }
    }
}

/// Fully-connected classifier:
/// F → 64 (ReLU, dropout) → 32 (ReLU, dropout) → C logits.
#[derive(Module, Debug)]
pub struct IrisClassifier<B: Backend> {
    pub hidden:      Linear<B>,
    pub bottleneck:  Linear<B>,
    pub output:      Linear<B>,
    pub activation:  Relu,
    pub dropout:     Dropout,
    pub input_size:  usize,
    pub num_classes: usize,
}

impl<B: Backend> IrisClassifier<B> {
    /// features: [batch, F] → logits: [batch, C]
    pub fn forward(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self.dropout.forward(self.activation.forward(self.hidden.forward(features)));
        let x = self.dropout.forward(self.activation.forward(self.bottleneck.forward(x)));
        self.output.forward(x)
    }

    /// Mean cross-entropy between the logits and the true labels.
    pub fn forward_loss(
        &self,
        features: Tensor<B, 2>,
        labels:   Tensor<B, 1, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let logits = self.forward(features);
        let loss = CrossEntropyLossConfig::new()
            .init(&logits.device())
            .forward(logits.clone(), labels);
        (loss, logits)
    }

    /// Predicted class per row: arg-max over the logits → [batch]
    pub fn predict(&self, features: Tensor<B, 2>) -> Tensor<B, 1, Int> {
        self.forward(features).argmax(1).flatten::<1>(0, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::{ndarray::NdArrayDevice, Autodiff, NdArray};
    use burn::tensor::ElementConversion;

    type TestBackend = NdArray;

    #[test]
    fn test_forward_shape() {
        let device = NdArrayDevice::Cpu;
        let model: IrisClassifier<TestBackend> = IrisClassifierConfig::new(4, 3).init(&device);
        let logits = model.forward(Tensor::zeros([5, 4], &device));
        assert_eq!(logits.dims(), [5, 3]);
        assert_eq!(model.predict(Tensor::zeros([5, 4], &device)).dims(), [5]);
    }

    #[test]
    fn test_loss_is_non_negative_scalar() {
        let device = NdArrayDevice::Cpu;
        let model: IrisClassifier<Autodiff<TestBackend>> = IrisClassifierConfig::new(4, 3).init(&device);
        let features = Tensor::random([8, 4], burn::tensor::Distribution::Default, &device);
        let labels = Tensor::<Autodiff<TestBackend>, 1, Int>::from_ints([0, 1, 2, 0, 1, 2, 0, 1], &device);
        let (loss, logits) = model.forward_loss(features, labels);
        assert_eq!(loss.dims(), [1]);
        assert_eq!(logits.dims(), [8, 3]);
        assert!(loss.into_scalar().elem::<f64>() >= 0.0);
    }

    #[test]
    fn test_mode_gradient_tracking() {
        assert!(ModelMode::Train.tracks_gradients());
        assert!(!ModelMode::Eval.tracks_gradients());
    }
}
