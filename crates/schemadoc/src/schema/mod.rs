//! Schema and sample types shared by the analyzer and synthesizer.

mod column;
mod table;
mod types;

pub use column::{ColumnDescriptor, EntityCount, NumericRange, SampleProfile, ValueCount};
pub use table::TableDescriptor;
pub use types::{SampleValue, ValueKind};
