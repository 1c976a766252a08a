//! Mushroom Classification Inference Service
//!
//! Serves a pre-trained binary classifier (1 = poisonous, 0 = edible) over
//! HTTP. Caller input is validated (variant-dependent), normalized into the
//! exact tabular encoding the preprocessor was fitted against, and fed
//! through the preprocessor and classifier ONNX sessions.
//!
//! Demonstration classifier only. Never treat its output as food-safety
//! guidance.

pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod normalizer;
pub mod server;
pub mod types;

pub use config::AppConfig;
pub use models::inference::PredictionService;
pub use models::loader::ArtifactLoader;
pub use normalizer::InputNormalizer;
pub use types::mushroom::{CapShape, MushroomInput, RawMushroom};
pub use types::prediction::Prediction;
pub use types::record::FeatureRecord;
