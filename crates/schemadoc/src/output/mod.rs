//! Documentation output: the document model and its `schema.yml` writer.

mod document;
mod writer;

pub use document::{ColumnDoc, ColumnTest, ModelDoc, SchemaDocument};
pub use writer::{escape, wrap, SchemaWriter};
