//! Error taxonomy for the inference service.
//!
//! Startup errors are fatal and keep the process from accepting traffic.
//! Normalization errors are caller mistakes. Inference errors are
//! server-side failures on a structurally valid record; the model is
//! deterministic, so none of these are retried.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors while loading the model bundle at startup.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact component missing: {}", .0.display())]
    Missing(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid artifact schema: {0}")]
    Schema(#[from] serde_json::Error),

    #[error("schema columns {found:?} do not match the feature record columns {expected:?}")]
    ColumnMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("failed to load {name}: {source}")]
    Load {
        name: String,
        #[source]
        source: ort::Error,
    },

    #[error("ONNX runtime initialization failed: {0}")]
    Runtime(#[source] ort::Error),
}

/// Caller supplied a categorical value outside the fixed mapping.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("unknown cap shape `{0}`")]
    UnknownCapShape(String),
}

/// Preprocessor or classifier failed on a structurally valid record.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("column `{0}` missing from feature record")]
    MissingColumn(String),

    #[error("column `{column}` has the wrong value kind for the fitted schema")]
    ColumnKind { column: String },

    #[error("category `{code}` for column `{column}` is outside the fitted vocabulary")]
    UnknownCategory { column: String, code: String },

    #[error("model session error: {0}")]
    Session(#[from] ort::Error),

    #[error("classifier produced no usable label output")]
    MalformedOutput,

    #[error("{0}")]
    Internal(String),
}
