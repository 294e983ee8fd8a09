//! Heuristic column and table descriptions.
//!
//! Descriptions are built from names, declared types and sample profiles
//! only. Nothing here can fail: unmatched inputs fall back to the cleaned
//! name.

mod column;
mod dictionary;
mod naming;
mod table;

use tracing::debug;

use crate::schema::{ColumnDescriptor, SampleProfile};

pub use column::ColumnRule;
pub use dictionary::{ABBREVIATIONS, PIPELINE_COLUMNS, PIPELINE_PREFIXES};
pub use naming::clean_name;

/// Produces readable descriptions for columns and tables.
#[derive(Debug, Clone, Default)]
pub struct DescriptionSynthesizer;

impl DescriptionSynthesizer {
    pub fn new() -> Self {
        Self
    }

    /// Describe a column from its name, declared type and sample profile.
    ///
    /// # Example
    ///
    /// ```
    /// use schemadoc::describe::DescriptionSynthesizer;
    /// use schemadoc::schema::SampleProfile;
    ///
    /// let synth = DescriptionSynthesizer::new();
    /// let text = synth.describe_column("customer_id", "NUMBER(38,0)", &SampleProfile::empty());
    /// assert_eq!(text, "Identifier for Customer identifier");
    /// ```
    pub fn describe_column(&self, name: &str, declared_type: &str, profile: &SampleProfile) -> String {
        self.describe_column_with_rule(name, declared_type, profile).1
    }

    /// Which rule of the cascade handles this column.
    pub fn classify_column(&self, name: &str, declared_type: &str, profile: &SampleProfile) -> ColumnRule {
        self.describe_column_with_rule(name, declared_type, profile).0
    }

    /// Description together with the rule that produced it.
    pub fn describe_column_with_rule(
        &self,
        name: &str,
        declared_type: &str,
        profile: &SampleProfile,
    ) -> (ColumnRule, String) {
        let (rule, text) = column::describe(name, declared_type, profile);
        debug!(column = name, ?rule, "Described column");
        (rule, text)
    }

    /// Describe a table from its columns.
    pub fn describe_table(&self, name: &str, columns: &[ColumnDescriptor]) -> String {
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        self.describe_table_columns(name, &names)
    }

    /// Describe a table from bare column names. The result is empty only
    /// when neither the columns nor the table name yield anything readable.
    pub fn describe_table_columns<S: AsRef<str>>(&self, name: &str, columns: &[S]) -> String {
        let text = table::describe(name, columns);
        debug!(table = name, columns = columns.len(), "Described table");
        text
    }
}
