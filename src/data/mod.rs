// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from raw CIFAR batch files to device tensors.
//
//   *.bin batch files
//       │
//       ▼
//   CifarLoader      → parses records into LabeledImages
//       │
//       ├─► sampler  → optional seeded cap on the training split
//       └─► subset   → evaluation sets picked out by class
//       │
//       ▼
//   ImageDataset     → implements Burn's Dataset trait
//       │
//       ▼
//   ImageBatcher     → normalises pixels, stacks [N, C, H, W]
//       │
//       ▼
//   DataLoader       → built in `loaders`, feeds the training loop
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads CIFAR-10 binary batch files
pub mod loader;

/// Per-channel pixel normalisation
pub mod preprocessor;

/// Evaluation sets by class label
pub mod subset;

/// Seeded random cap on the training split
pub mod sampler;

/// Implements Burn's Dataset trait for labelled images
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Builds the training and evaluation DataLoaders
pub mod loaders;
