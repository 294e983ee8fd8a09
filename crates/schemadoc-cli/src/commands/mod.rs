//! CLI command implementations.

pub mod describe_column;
pub mod describe_table;
pub mod generate;
