//! Column metadata and sample profiles.

use serde::{Deserialize, Serialize};

use super::types::ValueKind;

/// Declared schema metadata for a single column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name as declared in the warehouse.
    pub name: String,
    /// Declared type string (e.g. `VARCHAR(255)`, `NUMBER(38,0)`).
    pub declared_type: String,
    /// Whether the column accepts nulls.
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    /// Comment already attached to the column in the warehouse.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

fn default_nullable() -> bool {
    true
}

impl ColumnDescriptor {
    /// Create a nullable column descriptor without a comment.
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            nullable: true,
            comment: None,
        }
    }

    /// Attach an existing warehouse comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Set nullability.
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }
}

/// Numeric summary of the coercible values in a sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// How many values were successfully coerced.
    pub observations: usize,
}

/// A distinct value and how often it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// A named-entity label and how often it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCount {
    pub label: String,
    pub count: usize,
}

/// Lightweight statistical and textual summary of a column sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleProfile {
    /// Most frequent value kind in the sample.
    pub dominant_type: ValueKind,
    /// Present only when numeric values were observed on a non-text column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric_range: Option<NumericRange>,
    /// Most frequent distinct values, ranked (text columns only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub frequent_values: Vec<ValueCount>,
    /// Most frequent entity labels, ranked (text columns only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entity_categories: Vec<EntityCount>,
    /// Number of values analyzed.
    pub sample_size: usize,
}

impl SampleProfile {
    /// Profile of an empty sample.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when nothing could be derived from the sample.
    pub fn is_empty(&self) -> bool {
        self.numeric_range.is_none()
            && self.frequent_values.is_empty()
            && self.entity_categories.is_empty()
    }

    /// The ranked frequent values, without counts.
    pub fn frequent_value_strings(&self) -> impl Iterator<Item = &str> {
        self.frequent_values.iter().map(|v| v.value.as_str())
    }
}
