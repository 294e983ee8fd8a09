//! Error types for the schemadoc library.
//!
//! The description engine itself never fails; these errors belong to the
//! layers around it (schema sources, configuration, the document writer).

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for schemadoc operations.
#[derive(Debug, Error)]
pub enum SchemadocError {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML deserialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP transport error talking to a warehouse.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// One or more required environment variables are unset.
    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingEnv(Vec<String>),

    /// The schema source rejected a request.
    #[error("Source error: {0}")]
    Source(String),

    /// The requested table does not exist in the source.
    #[error("Table not found: {schema}.{table}")]
    TableNotFound { schema: String, table: String },

    /// Empty file or no data to read.
    #[error("Empty data: {0}")]
    EmptyData(String),
}

/// Result type alias for schemadoc operations.
pub type Result<T> = std::result::Result<T, SchemadocError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_env_lists_every_variable() {
        let err = SchemadocError::MissingEnv(vec!["SNOWFLAKE_ACCOUNT".into(), "SCHEMA".into()]);
        assert_eq!(
            err.to_string(),
            "Missing required environment variables: SNOWFLAKE_ACCOUNT, SCHEMA"
        );
    }

    #[test]
    fn test_table_not_found_display() {
        let err = SchemadocError::TableNotFound {
            schema: "raw".into(),
            table: "orders".into(),
        };
        assert_eq!(err.to_string(), "Table not found: raw.orders");
    }
}
