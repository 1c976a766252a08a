//! ONNX model bundle loader
//!
//! Deserializes the fitted preprocessor and classifier from a fixed
//! directory at startup. Any failure here is fatal: the process must not
//! begin serving traffic with a partial bundle.

use crate::error::ArtifactError;
use crate::types::record;
use ort::session::{builder::GraphOptimizationLevel, Session};
use serde::Deserialize;
use std::path::Path;
use std::sync::RwLock;
use tracing::info;

pub const PREPROCESSOR_FILE: &str = "preprocessor.onnx";
pub const CLASSIFIER_FILE: &str = "classifier.onnx";
pub const SCHEMA_FILE: &str = "schema.json";

/// Value kind of one fitted column.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Categorical { categories: Vec<String> },
}

/// One column the preprocessor was fitted against.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ColumnSpec {
    pub name: String,
    #[serde(flatten)]
    pub kind: ColumnKind,
}

/// Column schema shipped alongside the ONNX files.
///
/// Records the fitted column order and, for categorical columns, the
/// vocabulary the preprocessor's encoder saw during training.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ArtifactSchema {
    pub columns: Vec<ColumnSpec>,
}

impl ArtifactSchema {
    /// Parse a schema from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, ArtifactError> {
        let schema: ArtifactSchema = serde_json::from_str(json)?;
        schema.check_columns()?;
        Ok(schema)
    }

    /// The fitted columns must be exactly the feature record columns,
    /// in order.
    fn check_columns(&self) -> Result<(), ArtifactError> {
        let found: Vec<String> = self.columns.iter().map(|c| c.name.clone()).collect();
        let expected: Vec<String> = record::COLUMNS.iter().map(|c| c.to_string()).collect();

        if found != expected {
            return Err(ArtifactError::ColumnMismatch { expected, found });
        }
        Ok(())
    }
}

/// One loaded ONNX session with its tensor names.
pub struct LoadedComponent {
    /// Component name for log and error messages
    pub name: String,
    /// ONNX Runtime session
    pub session: Session,
    /// Input tensor name
    pub input_name: String,
    /// Output tensor name
    pub output_name: String,
}

/// The deserialized model bundle: fitted preprocessor, fitted classifier
/// and the column schema.
///
/// Loaded once at startup and shared read-only across all requests. The
/// session locks exist only because `ort` requires exclusive access to
/// run; nothing mutates the fitted state.
pub struct ModelArtifact {
    pub preprocessor: RwLock<LoadedComponent>,
    pub classifier: RwLock<LoadedComponent>,
    pub schema: ArtifactSchema,
}

/// Loader for the model bundle
pub struct ArtifactLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ArtifactLoader {
    /// Create a new loader with default settings (1 thread)
    pub fn new() -> Result<Self, ArtifactError> {
        Self::with_threads(1)
    }

    /// Create a new loader with the specified number of threads
    pub fn with_threads(onnx_threads: usize) -> Result<Self, ArtifactError> {
        ort::init().commit().map_err(ArtifactError::Runtime)?;
        info!(onnx_threads = onnx_threads, "ONNX Runtime initialized");
        Ok(Self { onnx_threads })
    }

    /// Load the full bundle from a directory.
    pub fn load<P: AsRef<Path>>(&self, dir: P) -> Result<ModelArtifact, ArtifactError> {
        let dir = dir.as_ref();

        let schema_path = dir.join(SCHEMA_FILE);
        if !schema_path.exists() {
            return Err(ArtifactError::Missing(schema_path));
        }
        let schema_json =
            std::fs::read_to_string(&schema_path).map_err(|source| ArtifactError::Io {
                path: schema_path.clone(),
                source,
            })?;
        let schema = ArtifactSchema::from_json(&schema_json)?;
        info!(path = %schema_path.display(), columns = schema.columns.len(), "Artifact schema loaded");

        let preprocessor = self.load_component(dir, PREPROCESSOR_FILE, "preprocessor")?;
        let classifier = self.load_component(dir, CLASSIFIER_FILE, "classifier")?;

        Ok(ModelArtifact {
            preprocessor: RwLock::new(preprocessor),
            classifier: RwLock::new(classifier),
            schema,
        })
    }

    /// Load a single ONNX session from the bundle directory.
    fn load_component(
        &self,
        dir: &Path,
        filename: &str,
        name: &str,
    ) -> Result<LoadedComponent, ArtifactError> {
        let path = dir.join(filename);
        if !path.exists() {
            return Err(ArtifactError::Missing(path));
        }

        info!(component = %name, path = %path.display(), threads = self.onnx_threads, "Loading ONNX session");

        let session = (|| {
            Session::builder()?
                .with_optimization_level(GraphOptimizationLevel::Level3)?
                .with_intra_threads(self.onnx_threads)?
                .commit_from_file(&path)
        })()
        .map_err(|source| ArtifactError::Load {
            name: name.to_string(),
            source,
        })?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "input".to_string());

        // sklearn classifier exports carry a "label" output next to the
        // probability output; prefer it when present
        let output_name = session
            .outputs
            .iter()
            .find(|o| o.name.contains("label"))
            .map(|o| o.name.clone())
            .unwrap_or_else(|| {
                session
                    .outputs
                    .first()
                    .map(|o| o.name.clone())
                    .unwrap_or_else(|| "output".to_string())
            });

        info!(
            component = %name,
            input = %input_name,
            output = %output_name,
            "Session loaded successfully"
        );

        Ok(LoadedComponent {
            name: name.to_string(),
            session,
            input_name,
            output_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA_JSON: &str = r#"{
        "columns": [
            { "name": "cap-diameter", "kind": "numeric" },
            { "name": "cap-shape", "kind": "categorical", "categories": ["b", "c", "f", "o", "p", "s", "x"] },
            { "name": "has-ring", "kind": "categorical", "categories": ["f", "t"] },
            { "name": "stem-height", "kind": "numeric" },
            { "name": "stem-width", "kind": "numeric" }
        ]
    }"#;

    #[test]
    fn test_schema_parse() {
        let schema = ArtifactSchema::from_json(SCHEMA_JSON).unwrap();
        assert_eq!(schema.columns.len(), 5);
        assert_eq!(schema.columns[0].kind, ColumnKind::Numeric);
        assert_eq!(
            schema.columns[1].kind,
            ColumnKind::Categorical {
                categories: vec![
                    "b".into(),
                    "c".into(),
                    "f".into(),
                    "o".into(),
                    "p".into(),
                    "s".into(),
                    "x".into()
                ]
            }
        );
    }

    #[test]
    fn test_schema_rejects_wrong_columns() {
        let json = r#"{ "columns": [ { "name": "cap-diameter", "kind": "numeric" } ] }"#;
        let err = ArtifactSchema::from_json(json).unwrap_err();
        assert!(matches!(err, ArtifactError::ColumnMismatch { .. }));
    }

    #[test]
    fn test_schema_rejects_reordered_columns() {
        // Same columns, wrong order: the preprocessor is positional
        let json = r#"{
            "columns": [
                { "name": "cap-shape", "kind": "categorical", "categories": ["x"] },
                { "name": "cap-diameter", "kind": "numeric" },
                { "name": "has-ring", "kind": "categorical", "categories": ["f", "t"] },
                { "name": "stem-height", "kind": "numeric" },
                { "name": "stem-width", "kind": "numeric" }
            ]
        }"#;
        let err = ArtifactSchema::from_json(json).unwrap_err();
        assert!(matches!(err, ArtifactError::ColumnMismatch { .. }));
    }

    #[test]
    fn test_schema_rejects_invalid_json() {
        assert!(matches!(
            ArtifactSchema::from_json("not json"),
            Err(ArtifactError::Schema(_))
        ));
    }
}
