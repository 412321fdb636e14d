// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates all the other layers to run one
// training pipeline from CSV to report.
//
// Rules for this layer:
//   - No ML math or model code here
//   - No argument parsing here (that's Layer 1)
//   - No direct file formats (that's Layer 4 and 6)
//   - Only workflow coordination and run configuration
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Run configuration and the training workflow
pub mod train_use_case;
