// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// The model architecture and the training loop.
//
//   model.rs   — fully-connected classifier F → 64 → 32 → C
//                with ReLU and dropout, plus the ModelMode
//                enum the trainer switches between
//
//   trainer.rs — epoch loop: Adam updates on shuffled
//                training batches, then accuracy on the fixed
//                test batches; records the metrics series
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)

/// Feed-forward classifier and train/eval mode
pub mod model;

/// Training loop and evaluation pass
pub mod trainer;
