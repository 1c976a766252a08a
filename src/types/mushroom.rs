//! Caller-facing mushroom input types for both request surfaces.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ops::RangeInclusive;

/// Closed enumeration of cap shapes accepted by the validated surface.
///
/// Anything outside this set is rejected at deserialization, before the
/// normalizer or model is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapShape {
    Conical,
    Bell,
    Convex,
    Flat,
    Sunken,
    Spherical,
    Others,
}

impl CapShape {
    pub const ALL: [CapShape; 7] = [
        CapShape::Conical,
        CapShape::Bell,
        CapShape::Convex,
        CapShape::Flat,
        CapShape::Sunken,
        CapShape::Spherical,
        CapShape::Others,
    ];

    /// Spelled-out name as it appears in requests and the mapping table.
    pub fn as_str(&self) -> &'static str {
        match self {
            CapShape::Conical => "conical",
            CapShape::Bell => "bell",
            CapShape::Convex => "convex",
            CapShape::Flat => "flat",
            CapShape::Sunken => "sunken",
            CapShape::Spherical => "spherical",
            CapShape::Others => "others",
        }
    }
}

/// A single field constraint violation, surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Typed mushroom input for the validated surface.
///
/// Deserialized identically from GET query parameters and a POST JSON
/// body; both channels share the same range checks.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MushroomInput {
    pub cap_diameter: f64,
    pub cap_shape: CapShape,
    pub has_ring: bool,
    pub stem_height: f64,
    pub stem_width: f64,
}

/// Numeric ranges the training data covered.
pub const CAP_DIAMETER_RANGE: RangeInclusive<f64> = 0.38..=62.34;
pub const STEM_HEIGHT_RANGE: RangeInclusive<f64> = 0.0..=33.92;
pub const STEM_WIDTH_RANGE: RangeInclusive<f64> = 0.0..=103.91;

impl MushroomInput {
    /// Check every numeric field against its closed range.
    ///
    /// Collects all violations so the caller sees every offending field
    /// at once, not just the first.
    pub fn validate(&self) -> Result<(), Vec<FieldViolation>> {
        let mut violations = Vec::new();

        check_range(
            &mut violations,
            "cap_diameter",
            self.cap_diameter,
            &CAP_DIAMETER_RANGE,
        );
        check_range(
            &mut violations,
            "stem_height",
            self.stem_height,
            &STEM_HEIGHT_RANGE,
        );
        check_range(
            &mut violations,
            "stem_width",
            self.stem_width,
            &STEM_WIDTH_RANGE,
        );

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

fn check_range(
    violations: &mut Vec<FieldViolation>,
    field: &'static str,
    value: f64,
    range: &RangeInclusive<f64>,
) {
    if !range.contains(&value) {
        violations.push(FieldViolation::new(
            field,
            format!(
                "must be between {} and {}, got {}",
                range.start(),
                range.end(),
                value
            ),
        ));
    }
}

/// Untyped mushroom input for the naive surface's POST body.
///
/// Holds the five logical fields after an explicit coercion step from a
/// raw JSON value. Coercion is strict about JSON kinds: numbers must be
/// JSON numbers, `cap_shape` a string, and `has_ring` a JSON boolean
/// (truthy values of other kinds are rejected, not coerced). No range or
/// enumeration checks happen here; unknown cap-shape names are left for
/// the normalizer to reject.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMushroom {
    pub cap_diameter: f64,
    pub cap_shape: String,
    pub has_ring: bool,
    pub stem_height: f64,
    pub stem_width: f64,
}

impl RawMushroom {
    /// Coerce a raw JSON value into the five logical fields.
    pub fn from_value(value: &Value) -> Result<Self, Vec<FieldViolation>> {
        let Some(map) = value.as_object() else {
            return Err(vec![FieldViolation::new("body", "must be a JSON object")]);
        };

        let mut violations = Vec::new();

        let cap_diameter = number_field(map, "cap_diameter", &mut violations);
        let cap_shape = string_field(map, "cap_shape", &mut violations);
        let has_ring = bool_field(map, "has_ring", &mut violations);
        let stem_height = number_field(map, "stem_height", &mut violations);
        let stem_width = number_field(map, "stem_width", &mut violations);

        if !violations.is_empty() {
            return Err(violations);
        }

        Ok(Self {
            cap_diameter: cap_diameter.unwrap_or_default(),
            cap_shape: cap_shape.unwrap_or_default(),
            has_ring: has_ring.unwrap_or_default(),
            stem_height: stem_height.unwrap_or_default(),
            stem_width: stem_width.unwrap_or_default(),
        })
    }
}

fn number_field(
    map: &serde_json::Map<String, Value>,
    field: &'static str,
    violations: &mut Vec<FieldViolation>,
) -> Option<f64> {
    match map.get(field) {
        Some(v) => match v.as_f64() {
            Some(n) => Some(n),
            None => {
                violations.push(FieldViolation::new(field, "must be a number"));
                None
            }
        },
        None => {
            violations.push(FieldViolation::new(field, "field is required"));
            None
        }
    }
}

fn string_field(
    map: &serde_json::Map<String, Value>,
    field: &'static str,
    violations: &mut Vec<FieldViolation>,
) -> Option<String> {
    match map.get(field) {
        Some(v) => match v.as_str() {
            Some(s) => Some(s.to_string()),
            None => {
                violations.push(FieldViolation::new(field, "must be a string"));
                None
            }
        },
        None => {
            violations.push(FieldViolation::new(field, "field is required"));
            None
        }
    }
}

fn bool_field(
    map: &serde_json::Map<String, Value>,
    field: &'static str,
    violations: &mut Vec<FieldViolation>,
) -> Option<bool> {
    match map.get(field) {
        Some(v) => match v.as_bool() {
            Some(b) => Some(b),
            None => {
                violations.push(FieldViolation::new(field, "must be a boolean"));
                None
            }
        },
        None => {
            violations.push(FieldViolation::new(field, "field is required"));
            None
        }
    }
}
