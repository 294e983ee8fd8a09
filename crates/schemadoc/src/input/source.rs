//! Schema sources: where table structure and samples come from.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::parser::{Parser, ParserConfig};
use super::table::DataTable;
use super::values::{infer_declared_type, parse_cell};
use crate::error::{Result, SchemadocError};
use crate::schema::{ColumnDescriptor, SampleValue, TableDescriptor};

/// A catalog of schemas, tables and sampled column values.
pub trait SchemaSource {
    /// Short name used in logs.
    fn name(&self) -> &str;

    fn list_schemas(&self) -> Result<Vec<String>>;

    fn list_tables(&self, schema: &str) -> Result<Vec<String>>;

    /// Column structure and any existing comments for one table.
    fn table(&self, schema: &str, table: &str) -> Result<TableDescriptor>;

    /// Up to `limit` non-null values from a column.
    fn sample_values(&self, schema: &str, table: &str, column: &str, limit: usize)
        -> Result<Vec<SampleValue>>;
}

/// File extensions read as tables, with their delimiter.
const TABLE_EXTENSIONS: &[(&str, Option<u8>)] = &[("csv", None), ("tsv", Some(b'\t')), ("psv", Some(b'|'))];

/// A directory of delimited files. The directory name is the schema and
/// each file stem is a table.
#[derive(Debug, Clone)]
pub struct CsvSource {
    root: PathBuf,
    schema: String,
    files: BTreeMap<String, PathBuf>,
}

impl CsvSource {
    /// Scan `dir` for table files.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let root = dir.as_ref().to_path_buf();
        let io_err = |e: std::io::Error| SchemadocError::Io {
            path: root.clone(),
            source: e,
        };

        let mut files = BTreeMap::new();
        for entry in fs::read_dir(&root).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let extension = path
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_lowercase)
                .unwrap_or_default();
            if TABLE_EXTENSIONS.iter().any(|(ext, _)| *ext == extension) {
                files.insert(stem.to_string(), path.clone());
            }
        }

        let schema = root
            .canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "public".to_string());

        debug!(dir = %root.display(), tables = files.len(), "Opened CSV source");
        Ok(Self { root, schema, files })
    }

    /// The schema name this source exposes.
    pub fn schema(&self) -> &str {
        &self.schema
    }

    fn load(&self, schema: &str, table: &str) -> Result<DataTable> {
        let not_found = || SchemadocError::TableNotFound {
            schema: schema.to_string(),
            table: table.to_string(),
        };
        if !schema.eq_ignore_ascii_case(&self.schema) {
            return Err(not_found());
        }
        let path = self
            .files
            .iter()
            .find(|(stem, _)| stem.eq_ignore_ascii_case(table))
            .map(|(_, path)| path)
            .ok_or_else(not_found)?;

        let delimiter = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(|ext| {
                TABLE_EXTENSIONS
                    .iter()
                    .find(|(known, _)| known.eq_ignore_ascii_case(ext))
                    .and_then(|(_, d)| *d)
            });
        let parser = Parser::with_config(ParserConfig {
            delimiter,
            ..Default::default()
        });
        parser.parse_file(path)
    }
}

impl SchemaSource for CsvSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn list_schemas(&self) -> Result<Vec<String>> {
        Ok(vec![self.schema.clone()])
    }

    fn list_tables(&self, schema: &str) -> Result<Vec<String>> {
        if !schema.eq_ignore_ascii_case(&self.schema) {
            warn!(schema, dir = %self.root.display(), "Unknown schema for CSV source");
            return Ok(Vec::new());
        }
        Ok(self.files.keys().cloned().collect())
    }

    fn table(&self, schema: &str, table: &str) -> Result<TableDescriptor> {
        let data = self.load(schema, table)?;
        let columns = data
            .headers
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                let declared = infer_declared_type(data.column_values(idx));
                let nullable = data.column_values(idx).any(DataTable::is_null_value);
                ColumnDescriptor::new(header.clone(), declared).with_nullable(nullable)
            })
            .collect();
        Ok(TableDescriptor::new(table, columns))
    }

    fn sample_values(
        &self,
        schema: &str,
        table: &str,
        column: &str,
        limit: usize,
    ) -> Result<Vec<SampleValue>> {
        let data = self.load(schema, table)?;
        let idx = data
            .column_index(column)
            .ok_or_else(|| SchemadocError::Source(format!("Column {} not found in {}.{}", column, schema, table)))?;
        Ok(data.non_null_values(idx).filter_map(parse_cell).take(limit).collect())
    }
}
