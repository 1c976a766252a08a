//! Input normalization into the encoding the model was trained on.
//!
//! Converts caller-supplied field values into a single-row [`FeatureRecord`]
//! using the exact column names and single-character categorical codes the
//! preprocessor was fitted against. Both request surfaces feed through
//! here, so the categorical mapping cannot diverge between them.

use crate::error::NormalizeError;
use crate::types::record::FeatureRecord;

/// Fixed mapping from spelled-out cap-shape names to the single-character
/// codes in the training data. This table is the single source of truth
/// for both request surfaces.
pub const CAP_SHAPE_CODES: [(&str, char); 7] = [
    ("conical", 'c'),
    ("bell", 'b'),
    ("convex", 'x'),
    ("flat", 'f'),
    ("sunken", 's'),
    ("spherical", 'p'),
    ("others", 'o'),
];

/// Look up the training-data code for a spelled-out cap-shape name.
pub fn cap_shape_code(name: &str) -> Option<char> {
    CAP_SHAPE_CODES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, code)| *code)
}

/// Normalizer that assembles feature records from scalar inputs.
///
/// Numeric fields pass through unchanged; `cap_shape` is remapped via
/// [`CAP_SHAPE_CODES`]; `has_ring` becomes `'t'` / `'f'`.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputNormalizer;

impl InputNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Build the single-observation record for one request.
    ///
    /// `cap_shape` must be a spelled-out name from the fixed table;
    /// anything else is an [`NormalizeError::UnknownCapShape`].
    pub fn normalize(
        &self,
        cap_diameter: f64,
        cap_shape: &str,
        has_ring: bool,
        stem_height: f64,
        stem_width: f64,
    ) -> Result<FeatureRecord, NormalizeError> {
        let shape_code = cap_shape_code(cap_shape)
            .ok_or_else(|| NormalizeError::UnknownCapShape(cap_shape.to_string()))?;

        Ok(FeatureRecord {
            cap_diameter,
            cap_shape: shape_code,
            has_ring: if has_ring { 't' } else { 'f' },
            stem_height,
            stem_width,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::mushroom::CapShape;

    #[test]
    fn test_all_seven_shape_codes() {
        assert_eq!(cap_shape_code("conical"), Some('c'));
        assert_eq!(cap_shape_code("bell"), Some('b'));
        assert_eq!(cap_shape_code("convex"), Some('x'));
        assert_eq!(cap_shape_code("flat"), Some('f'));
        assert_eq!(cap_shape_code("sunken"), Some('s'));
        assert_eq!(cap_shape_code("spherical"), Some('p'));
        assert_eq!(cap_shape_code("others"), Some('o'));
    }

    #[test]
    fn test_enumeration_covers_table() {
        // The validated surface's enum and the mapping table must agree
        for shape in CapShape::ALL {
            assert!(cap_shape_code(shape.as_str()).is_some());
        }
        assert_eq!(CapShape::ALL.len(), CAP_SHAPE_CODES.len());
    }

    #[test]
    fn test_unknown_shape_rejected() {
        assert_eq!(cap_shape_code("mycelium"), None);

        let err = InputNormalizer::new()
            .normalize(5.0, "mycelium", false, 4.0, 3.0)
            .unwrap_err();
        assert_eq!(err, NormalizeError::UnknownCapShape("mycelium".to_string()));
    }

    #[test]
    fn test_single_char_codes_not_accepted() {
        // The table keys are spelled-out names; raw codes do not resolve
        assert_eq!(cap_shape_code("x"), None);
    }

    #[test]
    fn test_ring_flag_codes() {
        let normalizer = InputNormalizer::new();

        let ringed = normalizer.normalize(5.0, "convex", true, 4.0, 3.0).unwrap();
        assert_eq!(ringed.has_ring, 't');

        let ringless = normalizer.normalize(5.0, "convex", false, 4.0, 3.0).unwrap();
        assert_eq!(ringless.has_ring, 'f');
    }

    #[test]
    fn test_normalized_record() {
        // Concrete scenario: convex, no ring
        let record = InputNormalizer::new()
            .normalize(5.0, "convex", false, 4.0, 3.0)
            .unwrap();

        assert_eq!(
            record,
            FeatureRecord {
                cap_diameter: 5.0,
                cap_shape: 'x',
                has_ring: 'f',
                stem_height: 4.0,
                stem_width: 3.0,
            }
        );
    }
}
