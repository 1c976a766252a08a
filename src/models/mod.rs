//! Model artifact loading and inference components

pub mod inference;
pub mod loader;

pub use inference::{Artifact, PredictionService};
pub use loader::{ArtifactLoader, ModelArtifact};
