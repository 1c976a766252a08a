//! Prediction result returned to callers.

use serde::{Deserialize, Serialize};

/// Label value meaning "edible".
pub const LABEL_EDIBLE: i64 = 0;
/// Label value meaning "poisonous".
pub const LABEL_POISONOUS: i64 = 1;

/// Successful classification result.
///
/// Serializes to the single-key body `{"prediction": 0}` / `{"prediction": 1}`.
/// Demonstration output only, never food-safety guidance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    /// 1 = poisonous, 0 = edible
    pub prediction: i64,
}

impl Prediction {
    pub fn new(label: i64) -> Self {
        Self { prediction: label }
    }

    pub fn is_poisonous(&self) -> bool {
        self.prediction == LABEL_POISONOUS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_shape() {
        let json = serde_json::to_string(&Prediction::new(LABEL_POISONOUS)).unwrap();
        assert_eq!(json, r#"{"prediction":1}"#);

        let json = serde_json::to_string(&Prediction::new(LABEL_EDIBLE)).unwrap();
        assert_eq!(json, r#"{"prediction":0}"#);
    }

    #[test]
    fn test_is_poisonous() {
        assert!(Prediction::new(LABEL_POISONOUS).is_poisonous());
        assert!(!Prediction::new(LABEL_EDIBLE).is_poisonous());
    }
}
