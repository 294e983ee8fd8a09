//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// schemadoc: generate dbt schema.yml documentation from a warehouse
#[derive(Parser)]
#[command(name = "schemadoc")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Document every table of a schema and write schema.yml
    Generate(GenerateArgs),

    /// Describe a single column from its name, type and sample values
    DescribeColumn {
        /// Column name
        #[arg(value_name = "NAME")]
        name: String,

        /// Declared column type (e.g. "VARCHAR(255)")
        #[arg(short = 't', long = "type", default_value = "")]
        declared_type: String,

        /// Sample value (repeatable)
        #[arg(short, long = "sample", value_name = "VALUE")]
        samples: Vec<String>,
    },

    /// Describe a table from its column names
    DescribeTable {
        /// Table name
        #[arg(value_name = "NAME")]
        name: String,

        /// Comma-separated column names
        #[arg(short, long, value_delimiter = ',', required = true)]
        columns: Vec<String>,
    },
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Path to environment variables file
    #[arg(long, default_value = ".env")]
    pub env_file: PathBuf,

    /// Path to tests configuration file (YAML or JSON)
    #[arg(long, default_value = schemadoc::config::DEFAULT_TESTS_CONFIG)]
    pub tests_config: PathBuf,

    /// Output path for schema.yml (overrides DBT_YAML_OUTPUT_PATH)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Schema to document (overrides SCHEMA)
    #[arg(short, long)]
    pub schema: Option<String>,

    /// Where table metadata comes from
    #[arg(long, default_value = "snowflake")]
    pub source: SourceKind,

    /// Directory of CSV/TSV files, for --source csv
    #[arg(long, required_if_eq("source", "csv"))]
    pub csv_dir: Option<PathBuf>,

    /// Values sampled per column
    #[arg(long, default_value = "100")]
    pub sample_size: usize,

    /// Generate descriptions even where the warehouse already has comments
    #[arg(long)]
    pub ignore_comments: bool,
}

/// Schema source choice
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SourceKind {
    /// Snowflake SQL API (requires AUTH_METHOD=token)
    #[default]
    Snowflake,
    /// A local directory of delimited files
    Csv,
}

impl std::str::FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "snowflake" => Ok(SourceKind::Snowflake),
            "csv" => Ok(SourceKind::Csv),
            _ => Err(format!("Unknown source: {}. Use snowflake or csv.", s)),
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Snowflake => write!(f, "snowflake"),
            SourceKind::Csv => write!(f, "csv"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_defaults() {
        let cli = Cli::try_parse_from(["schemadoc", "generate"]).unwrap();
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.env_file, PathBuf::from(".env"));
                assert_eq!(args.tests_config, PathBuf::from("tests_config.yaml"));
                assert_eq!(args.source, SourceKind::Snowflake);
                assert_eq!(args.sample_size, 100);
                assert!(!args.ignore_comments);
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_csv_source_requires_dir() {
        assert!(Cli::try_parse_from(["schemadoc", "generate", "--source", "csv"]).is_err());
        assert!(
            Cli::try_parse_from(["schemadoc", "generate", "--source", "csv", "--csv-dir", "data"]).is_ok()
        );
    }

    #[test]
    fn test_describe_table_columns_split() {
        let cli = Cli::try_parse_from([
            "schemadoc",
            "describe-table",
            "orders",
            "--columns",
            "customer_id,order_date",
        ])
        .unwrap();
        match cli.command {
            Commands::DescribeTable { name, columns } => {
                assert_eq!(name, "orders");
                assert_eq!(columns, vec!["customer_id", "order_date"]);
            }
            _ => panic!("expected describe-table"),
        }
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["schemadoc", "-v", "-q", "describe-table", "t", "-c", "a"]).is_err());
    }
}
