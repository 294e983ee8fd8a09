//! Schema sources and the file parsing behind them.

mod parser;
mod snowflake;
mod source;
mod table;
mod values;

pub use parser::{Parser, ParserConfig};
pub use snowflake::SnowflakeSource;
pub use source::{CsvSource, SchemaSource};
pub use table::DataTable;
pub use values::{infer_declared_type, parse_cell};
