//! Renders a [`SchemaDocument`] as dbt `schema.yml`.
//!
//! The layout is written by hand rather than through a YAML serializer so
//! descriptions always come out single-quoted and wrapped.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::info;

use super::document::{ColumnTest, ModelDoc, SchemaDocument};
use crate::error::{Result, SchemadocError};

/// Writes schema documents.
#[derive(Debug, Clone)]
pub struct SchemaWriter {
    model_width: usize,
    column_width: usize,
}

impl Default for SchemaWriter {
    fn default() -> Self {
        Self {
            model_width: 70,
            column_width: 65,
        }
    }
}

impl SchemaWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the wrap widths for model and column descriptions.
    pub fn with_widths(model_width: usize, column_width: usize) -> Self {
        Self {
            model_width,
            column_width,
        }
    }

    /// Render the document to a string.
    pub fn render(&self, doc: &SchemaDocument) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.write_to(doc, &mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Write the document to any writer.
    pub fn write_to<W: Write>(&self, doc: &SchemaDocument, mut out: W) -> io::Result<()> {
        writeln!(out, "version: {}", doc.version)?;
        writeln!(out)?;
        writeln!(out, "models:")?;
        for model in &doc.models {
            self.write_model(model, &mut out)?;
        }
        out.flush()
    }

    /// Write the document to `path`, creating parent directories.
    pub fn write_file(&self, doc: &SchemaDocument, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let io_err = |e: io::Error| SchemadocError::Io {
            path: path.to_path_buf(),
            source: e,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let file = File::create(path).map_err(io_err)?;
        self.write_to(doc, BufWriter::new(file)).map_err(io_err)?;

        info!(
            path = %path.display(),
            models = doc.models.len(),
            columns = doc.column_count(),
            "Wrote schema document"
        );
        Ok(())
    }

    fn write_model<W: Write>(&self, model: &ModelDoc, out: &mut W) -> io::Result<()> {
        writeln!(out, "  - name: {}", model.name)?;
        let description = wrap(&escape(&model.description), self.model_width).join("\n      ");
        writeln!(out, "    description:\n      '{}'", description)?;
        writeln!(out, "    columns:")?;

        for column in &model.columns {
            writeln!(out, "      - name: {}", column.name)?;
            let description = wrap(&escape(&column.description), self.column_width).join("\n          ");
            writeln!(out, "        description: '{}'", description)?;

            if !column.tests.is_empty() {
                writeln!(out, "        tests:")?;
                for test in &column.tests {
                    write_test(test, out)?;
                }
            }
        }
        writeln!(out)
    }
}

fn write_test<W: Write>(test: &ColumnTest, out: &mut W) -> io::Result<()> {
    match test {
        ColumnTest::Simple(name) => writeln!(out, "          - {}", name),
        ColumnTest::Parameterized { name, params } => {
            writeln!(out, "          - {}:", name)?;
            for (param, value) in params {
                match value {
                    serde_json::Value::Array(items) => {
                        writeln!(out, "              {}:", param)?;
                        for item in items {
                            writeln!(out, "                - '{}'", scalar(item))?;
                        }
                    }
                    other => writeln!(out, "              {}: {}", param, scalar(other))?,
                }
            }
            Ok(())
        }
    }
}

fn scalar(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Escape single quotes for a single-quoted YAML scalar.
pub fn escape(text: &str) -> String {
    text.replace('\'', "''")
}

/// Greedy word wrap. Whitespace runs collapse to one space and words
/// longer than `width` are split across lines.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_len = 0;

    for word in text.split_whitespace() {
        let mut rest: Vec<char> = word.chars().collect();
        while !rest.is_empty() {
            let sep = usize::from(line_len > 0);
            if line_len + sep + rest.len() <= width {
                if sep == 1 {
                    line.push(' ');
                }
                line.extend(rest.iter());
                line_len += sep + rest.len();
                break;
            }

            if rest.len() > width {
                let space = width.saturating_sub(line_len + sep);
                if space > 0 {
                    if sep == 1 {
                        line.push(' ');
                    }
                    line.extend(rest.drain(..space));
                }
            }
            lines.push(std::mem::take(&mut line));
            line_len = 0;
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
