//! Canonical tabular record fed to the preprocessor.

/// Column names the preprocessor was fitted against, in order.
///
/// The preprocessor is an opaque artifact performing exact-name column
/// lookups, so these hyphenated names must never change.
pub const COLUMNS: [&str; 5] = [
    "cap-diameter",
    "cap-shape",
    "has-ring",
    "stem-height",
    "stem-width",
];

/// A single cell of a feature record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    /// Numeric measurement
    Number(f64),
    /// Single-character categorical code
    Code(char),
}

/// One observation in the exact encoding the model was trained on.
///
/// Always exactly five columns (see [`COLUMNS`]) and one row. Created
/// per-request by the normalizer and discarded after producing a label.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    pub cap_diameter: f64,
    pub cap_shape: char,
    pub has_ring: char,
    pub stem_height: f64,
    pub stem_width: f64,
}

impl FeatureRecord {
    /// Look up a cell by its fitted column name.
    pub fn column(&self, name: &str) -> Option<Cell> {
        match name {
            "cap-diameter" => Some(Cell::Number(self.cap_diameter)),
            "cap-shape" => Some(Cell::Code(self.cap_shape)),
            "has-ring" => Some(Cell::Code(self.has_ring)),
            "stem-height" => Some(Cell::Number(self.stem_height)),
            "stem-width" => Some(Cell::Number(self.stem_width)),
            _ => None,
        }
    }
}
