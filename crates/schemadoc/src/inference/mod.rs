//! Sample profiling: value-type tallies, numeric ranges, frequent values
//! and entity categories.

mod analyzer;
mod entities;

pub use analyzer::{AnalyzerConfig, SampleAnalyzer};
pub use entities::{
    Entity, EntityExtractor, EntityLabel, NoopEntityExtractor, PatternEntityExtractor,
};
