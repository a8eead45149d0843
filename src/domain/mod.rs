// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs and traits describing what the system
// works with: labelled images, evaluation-set definitions and
// evaluation results.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// A single labelled image and its shape
pub mod image;

// Named evaluation sets selected by class label
pub mod eval_set;

// What one evaluation pass produces
pub mod evaluation;

// Core abstractions (traits) that other layers implement
pub mod traits;
