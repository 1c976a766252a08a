//! Type definitions for the inference service

pub mod mushroom;
pub mod prediction;
pub mod record;

pub use mushroom::{CapShape, FieldViolation, MushroomInput, RawMushroom};
pub use prediction::Prediction;
pub use record::FeatureRecord;
