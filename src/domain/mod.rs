// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust structs, enums and traits describing the problem:
// rows and samples, the class mapping, the metrics series,
// the error taxonomy, and the seams to the outside world.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// Data, Model and Io failures
pub mod error;

// Raw rows and prepared samples
pub mod sample;

// Class name <-> label bijection
pub mod class_index;

// Per-epoch loss / accuracy series
pub mod metrics;

// RowSource, EpochObserver, ArtifactSink
pub mod traits;
