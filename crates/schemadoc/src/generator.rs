//! Walks a schema source and assembles the documentation document.

use tracing::{debug, info, warn};

use crate::config::TestsConfig;
use crate::describe::DescriptionSynthesizer;
use crate::error::Result;
use crate::inference::SampleAnalyzer;
use crate::input::SchemaSource;
use crate::output::{ColumnDoc, ModelDoc, SchemaDocument};
use crate::schema::{ColumnDescriptor, SampleProfile, TableDescriptor};

/// Configuration for document generation.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Values sampled per column.
    pub sample_size: usize,
    /// Use comments already stored in the warehouse instead of generating.
    pub prefer_existing_comments: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            sample_size: 100,
            prefer_existing_comments: true,
        }
    }
}

/// Produces a [`SchemaDocument`] for the tables of a schema.
#[derive(Debug, Clone, Default)]
pub struct DocGenerator {
    config: GeneratorConfig,
    analyzer: SampleAnalyzer,
    synthesizer: DescriptionSynthesizer,
    tests: TestsConfig,
}

impl DocGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: GeneratorConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Use a custom analyzer, e.g. one with a different entity extractor.
    pub fn with_analyzer(mut self, analyzer: SampleAnalyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// Attach column tests to the generated columns.
    pub fn with_tests(mut self, tests: TestsConfig) -> Self {
        self.tests = tests;
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Document every table in `schema`.
    pub fn generate_schema(&self, source: &dyn SchemaSource, schema: &str) -> Result<SchemaDocument> {
        let tables = source.list_tables(schema)?;
        if tables.is_empty() {
            warn!(schema, source = source.name(), "No tables found in schema");
        } else {
            info!(schema, tables = tables.len(), "Found tables");
        }
        self.generate(source, schema, &tables)
    }

    /// Document the named tables in order.
    pub fn generate(
        &self,
        source: &dyn SchemaSource,
        schema: &str,
        tables: &[String],
    ) -> Result<SchemaDocument> {
        let mut doc = SchemaDocument::new();
        for table in tables {
            doc.push(self.document_table(source, schema, table)?);
        }
        info!(
            schema,
            models = doc.models.len(),
            columns = doc.column_count(),
            "Generated documentation"
        );
        Ok(doc)
    }

    /// Document one table.
    pub fn document_table(&self, source: &dyn SchemaSource, schema: &str, table: &str) -> Result<ModelDoc> {
        let descriptor = source.table(schema, table)?;
        info!(schema, table, columns = descriptor.column_count(), "Documenting table");

        let columns = descriptor
            .columns
            .iter()
            .map(|column| ColumnDoc {
                name: column.name.clone(),
                description: self.column_description(source, schema, table, column),
                tests: self.tests.tests_for(&column.name),
            })
            .collect();

        Ok(ModelDoc {
            name: table.to_string(),
            description: self.table_description(schema, &descriptor),
            columns,
        })
    }

    fn table_description(&self, schema: &str, table: &TableDescriptor) -> String {
        if let Some(comment) = self.existing(table.comment.as_deref()) {
            return comment;
        }
        let generated = self.synthesizer.describe_table(&table.name, &table.columns);
        if generated.trim().is_empty() {
            format!("Data from {}.{}", schema, table.name)
        } else {
            generated
        }
    }

    fn column_description(
        &self,
        source: &dyn SchemaSource,
        schema: &str,
        table: &str,
        column: &ColumnDescriptor,
    ) -> String {
        if let Some(comment) = self.existing(column.comment.as_deref()) {
            debug!(table, column = %column.name, "Using existing comment");
            return comment;
        }

        let profile = match source.sample_values(schema, table, &column.name, self.config.sample_size) {
            Ok(samples) => self.analyzer.analyze(&samples),
            Err(e) => {
                warn!(table, column = %column.name, error = %e, "Could not sample column");
                SampleProfile::empty()
            }
        };
        self.synthesizer
            .describe_column(&column.name, &column.declared_type, &profile)
    }

    fn existing(&self, comment: Option<&str>) -> Option<String> {
        if !self.config.prefer_existing_comments {
            return None;
        }
        comment
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
    }
}
