//! Prediction service running the preprocessor and classifier sessions

use crate::error::InferenceError;
use crate::models::loader::{ArtifactSchema, ColumnKind, LoadedComponent, ModelArtifact};
use crate::types::prediction::Prediction;
use crate::types::record::{Cell, FeatureRecord};
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Transform and predict capabilities of the loaded model bundle.
///
/// The service only depends on this seam, so the pipeline can be
/// exercised in tests with a stub artifact instead of real ONNX sessions.
pub trait Artifact: Send + Sync {
    /// Map a feature record to the classifier's numeric input tensor.
    fn transform(&self, record: &FeatureRecord) -> Result<Vec<f32>, InferenceError>;

    /// Map a transformed tensor to a discrete label.
    fn predict(&self, features: &[f32]) -> Result<i64, InferenceError>;
}

/// Runs one feature record through transform and predict.
///
/// Holds an explicit immutable handle to the shared artifact; no retries,
/// both steps are deterministic and a failure cannot improve on retry.
pub struct PredictionService {
    artifact: Arc<dyn Artifact>,
}

impl PredictionService {
    pub fn new(artifact: Arc<dyn Artifact>) -> Self {
        Self { artifact }
    }

    /// Produce a label for one record. 1 = poisonous, 0 = edible.
    pub fn predict(&self, record: &FeatureRecord) -> Result<Prediction, InferenceError> {
        let features = self.artifact.transform(record)?;
        let label = self.artifact.predict(&features)?;

        debug!(label = label, "Prediction complete");

        Ok(Prediction::new(label))
    }
}

impl Artifact for ModelArtifact {
    fn transform(&self, record: &FeatureRecord) -> Result<Vec<f32>, InferenceError> {
        let row = encode_row(&self.schema, record)?;
        run_to_tensor(&self.preprocessor, row)
    }

    fn predict(&self, features: &[f32]) -> Result<i64, InferenceError> {
        run_to_label(&self.classifier, features.to_vec())
    }
}

/// Encode a record into the preprocessor's numeric input row.
///
/// Columns are consumed by exact-name lookup in fitted order; categorical
/// codes become their index in the fitted vocabulary. A missing column,
/// kind mismatch or out-of-vocabulary code means the record has drifted
/// from the fitted schema.
pub(crate) fn encode_row(
    schema: &ArtifactSchema,
    record: &FeatureRecord,
) -> Result<Vec<f32>, InferenceError> {
    let mut row = Vec::with_capacity(schema.columns.len());

    for column in &schema.columns {
        let cell = record
            .column(&column.name)
            .ok_or_else(|| InferenceError::MissingColumn(column.name.clone()))?;

        match (&column.kind, cell) {
            (ColumnKind::Numeric, Cell::Number(value)) => row.push(value as f32),
            (ColumnKind::Categorical { categories }, Cell::Code(code)) => {
                let code = code.to_string();
                let index = categories.iter().position(|c| *c == code).ok_or_else(|| {
                    InferenceError::UnknownCategory {
                        column: column.name.clone(),
                        code,
                    }
                })?;
                row.push(index as f32);
            }
            _ => {
                return Err(InferenceError::ColumnKind {
                    column: column.name.clone(),
                })
            }
        }
    }

    Ok(row)
}

/// Run a session on one row and extract its f32 output tensor.
fn run_to_tensor(
    component: &RwLock<LoadedComponent>,
    row: Vec<f32>,
) -> Result<Vec<f32>, InferenceError> {
    use ort::value::Tensor;

    let mut component = component
        .write()
        .map_err(|e| InferenceError::Internal(format!("lock error: {}", e)))?;

    let shape = vec![1_i64, row.len() as i64];
    let input_tensor = Tensor::from_array((shape, row))?;

    let input_name = component.input_name.clone();
    let output_name = component.output_name.clone();
    let name = component.name.clone();

    let outputs = component
        .session
        .run(ort::inputs![input_name.as_str() => input_tensor])?;

    if let Some(output) = outputs.get(output_name.as_str()) {
        if let Ok((_, data)) = output.try_extract_tensor::<f32>() {
            debug!(component = %name, width = data.len(), "Extracted feature tensor");
            return Ok(data.to_vec());
        }
    }

    // Fallback: first f32 tensor among all outputs
    for (_, output) in outputs.iter() {
        if let Ok((_, data)) = output.try_extract_tensor::<f32>() {
            return Ok(data.to_vec());
        }
    }

    Err(InferenceError::MalformedOutput)
}

/// Run the classifier on one row and extract a discrete label.
fn run_to_label(
    component: &RwLock<LoadedComponent>,
    row: Vec<f32>,
) -> Result<i64, InferenceError> {
    use ort::value::Tensor;

    let mut component = component
        .write()
        .map_err(|e| InferenceError::Internal(format!("lock error: {}", e)))?;

    let shape = vec![1_i64, row.len() as i64];
    let input_tensor = Tensor::from_array((shape, row))?;

    let input_name = component.input_name.clone();
    let output_name = component.output_name.clone();
    let name = component.name.clone();

    let outputs = component
        .session
        .run(ort::inputs![input_name.as_str() => input_tensor])?;

    // sklearn exports emit an i64 "label" tensor next to the probabilities
    if let Some(output) = outputs.get(output_name.as_str()) {
        if let Ok((_, data)) = output.try_extract_tensor::<i64>() {
            if let Some(&label) = data.first() {
                debug!(component = %name, label = label, "Extracted label");
                return Ok(label);
            }
        }
    }

    // Fallback: probability tensor, take the argmax over classes
    for (out_name, output) in outputs.iter() {
        if let Ok((_, data)) = output.try_extract_tensor::<i64>() {
            if let Some(&label) = data.first() {
                return Ok(label);
            }
        }
        if let Ok((_, data)) = output.try_extract_tensor::<f32>() {
            if let Some(label) = argmax(data) {
                debug!(component = %name, output = %out_name, label = label, "Label from probabilities");
                return Ok(label);
            }
        }
    }

    Err(InferenceError::MalformedOutput)
}

fn argmax(probabilities: &[f32]) -> Option<i64> {
    if probabilities.is_empty() {
        return None;
    }
    if probabilities.len() == 1 {
        // Single positive-class probability
        return Some(if probabilities[0] >= 0.5 { 1 } else { 0 });
    }

    let mut best = 0usize;
    for (i, &p) in probabilities.iter().enumerate() {
        if p > probabilities[best] {
            best = i;
        }
    }
    Some(best as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NormalizeError;
    use crate::normalizer::InputNormalizer;

    /// Deterministic stand-in for the ONNX bundle.
    pub(crate) struct StubArtifact {
        pub label: i64,
    }

    impl Artifact for StubArtifact {
        fn transform(&self, record: &FeatureRecord) -> Result<Vec<f32>, InferenceError> {
            Ok(vec![
                record.cap_diameter as f32,
                record.stem_height as f32,
                record.stem_width as f32,
            ])
        }

        fn predict(&self, _features: &[f32]) -> Result<i64, InferenceError> {
            Ok(self.label)
        }
    }

    /// Artifact that always fails in transform, for error propagation.
    pub(crate) struct FailingArtifact;

    impl Artifact for FailingArtifact {
        fn transform(&self, _record: &FeatureRecord) -> Result<Vec<f32>, InferenceError> {
            Err(InferenceError::MissingColumn("cap-diameter".to_string()))
        }

        fn predict(&self, _features: &[f32]) -> Result<i64, InferenceError> {
            unreachable!("transform fails first")
        }
    }

    fn record() -> FeatureRecord {
        InputNormalizer::new()
            .normalize(5.0, "convex", false, 4.0, 3.0)
            .unwrap()
    }

    #[test]
    fn test_predict_returns_binary_label() {
        for label in [0, 1] {
            let service = PredictionService::new(Arc::new(StubArtifact { label }));
            let prediction = service.predict(&record()).unwrap();
            assert_eq!(prediction.prediction, label);
        }
    }

    #[test]
    fn test_predict_is_idempotent() {
        let service = PredictionService::new(Arc::new(StubArtifact { label: 1 }));
        let first = service.predict(&record()).unwrap();
        let second = service.predict(&record()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_transform_failure_propagates() {
        let service = PredictionService::new(Arc::new(FailingArtifact));
        let err = service.predict(&record()).unwrap_err();
        assert!(matches!(err, InferenceError::MissingColumn(_)));
    }

    #[test]
    fn test_argmax() {
        assert_eq!(argmax(&[0.9, 0.1]), Some(0));
        assert_eq!(argmax(&[0.2, 0.8]), Some(1));
        assert_eq!(argmax(&[0.7]), Some(1));
        assert_eq!(argmax(&[0.3]), Some(0));
        assert_eq!(argmax(&[]), None);
    }

    fn schema() -> ArtifactSchema {
        ArtifactSchema::from_json(
            r#"{
                "columns": [
                    { "name": "cap-diameter", "kind": "numeric" },
                    { "name": "cap-shape", "kind": "categorical", "categories": ["b", "c", "f", "o", "p", "s", "x"] },
                    { "name": "has-ring", "kind": "categorical", "categories": ["f", "t"] },
                    { "name": "stem-height", "kind": "numeric" },
                    { "name": "stem-width", "kind": "numeric" }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_encode_row_fitted_order() {
        // 'x' is index 6 in the cap-shape vocabulary, 'f' index 0 in has-ring
        let row = encode_row(&schema(), &record()).unwrap();
        assert_eq!(row, vec![5.0, 6.0, 0.0, 4.0, 3.0]);
    }

    #[test]
    fn test_encode_row_ring_code() {
        let ringed = InputNormalizer::new()
            .normalize(5.0, "convex", true, 4.0, 3.0)
            .unwrap();
        let row = encode_row(&schema(), &ringed).unwrap();
        assert_eq!(row[2], 1.0); // 't' is index 1
    }

    #[test]
    fn test_encode_row_rejects_out_of_vocabulary_code() {
        let mut drifted = record();
        drifted.cap_shape = 'z';

        let err = encode_row(&schema(), &drifted).unwrap_err();
        assert!(matches!(
            err,
            InferenceError::UnknownCategory { ref column, ref code }
                if column == "cap-shape" && code == "z"
        ));
    }

    #[test]
    fn test_unknown_shape_never_reaches_the_model() {
        // The normalizer rejects before a record can exist
        let err = InputNormalizer::new()
            .normalize(5.0, "mycelium", true, 4.0, 3.0)
            .unwrap_err();
        assert_eq!(err, NormalizeError::UnknownCapShape("mycelium".to_string()));
    }
}
