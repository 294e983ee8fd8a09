//! schemadoc: heuristic documentation for warehouse schemas.
//!
//! schemadoc reads table structure and a small sample of values per
//! column, then writes plausible descriptions into a dbt `schema.yml`.
//! No model or external knowledge base is involved: descriptions come
//! from naming patterns, simple statistics and rule-based entity
//! recognition over sampled text.
//!
//! # Core Pieces
//!
//! - [`SampleAnalyzer`]: profiles sampled values (dominant type, numeric
//!   range, frequent values, entity categories)
//! - [`DescriptionSynthesizer`]: turns names, types and profiles into
//!   sentences
//! - [`DocGenerator`]: walks a [`SchemaSource`] and builds a
//!   [`SchemaDocument`]
//! - [`SchemaWriter`]: renders the document as `schema.yml`
//!
//! # Example
//!
//! ```
//! use schemadoc::{DescriptionSynthesizer, SampleAnalyzer, SampleValue};
//!
//! let samples: Vec<SampleValue> = vec![12.5.into(), 99.0.into(), 40.25.into()];
//! let profile = SampleAnalyzer::new().analyze(&samples);
//!
//! let text = DescriptionSynthesizer::new().describe_column("order_amt", "NUMBER(10,2)", &profile);
//! assert_eq!(text, "Monetary amount for Order amount (ranges from 12.50 to 99.00)");
//! ```

pub mod config;
pub mod describe;
pub mod error;
pub mod generator;
pub mod inference;
pub mod input;
pub mod output;
pub mod schema;

pub use config::{AuthMethod, SnowflakeConfig, TestsConfig};
pub use describe::{ColumnRule, DescriptionSynthesizer, clean_name};
pub use error::{Result, SchemadocError};
pub use generator::{DocGenerator, GeneratorConfig};
pub use inference::{EntityExtractor, PatternEntityExtractor, SampleAnalyzer};
pub use input::{CsvSource, SchemaSource, SnowflakeSource};
pub use output::{SchemaDocument, SchemaWriter};
pub use schema::{ColumnDescriptor, SampleProfile, SampleValue, TableDescriptor, ValueKind};
