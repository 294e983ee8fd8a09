//! The documentation model written to `schema.yml`.

use indexmap::IndexMap;
use serde::Serialize;

/// A dbt properties document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaDocument {
    pub version: u32,
    pub models: Vec<ModelDoc>,
}

impl SchemaDocument {
    pub fn new() -> Self {
        Self {
            version: 2,
            models: Vec::new(),
        }
    }

    pub fn push(&mut self, model: ModelDoc) {
        self.models.push(model);
    }

    /// Total number of documented columns.
    pub fn column_count(&self) -> usize {
        self.models.iter().map(|m| m.columns.len()).sum()
    }
}

impl Default for SchemaDocument {
    fn default() -> Self {
        Self::new()
    }
}

/// One model (table) in the document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelDoc {
    pub name: String,
    pub description: String,
    pub columns: Vec<ColumnDoc>,
}

/// One documented column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDoc {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tests: Vec<ColumnTest>,
}

/// A dbt column test.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ColumnTest {
    /// A test without arguments, such as `not_null`.
    Simple(String),
    /// A test with named parameters, such as `relationships`.
    Parameterized {
        name: String,
        params: IndexMap<String, serde_json::Value>,
    },
}

impl ColumnTest {
    pub fn name(&self) -> &str {
        match self {
            ColumnTest::Simple(name) | ColumnTest::Parameterized { name, .. } => name,
        }
    }
}
