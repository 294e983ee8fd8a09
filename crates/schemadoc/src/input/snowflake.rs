//! Snowflake schema source over the SQL API (`/api/v2/statements`).

use std::thread;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use super::source::SchemaSource;
use crate::config::{AuthMethod, SnowflakeConfig};
use crate::error::{Result, SchemadocError};
use crate::schema::{ColumnDescriptor, SampleValue, TableDescriptor};

/// Seconds the warehouse may spend on one statement.
const STATEMENT_TIMEOUT_SECS: u64 = 60;

/// Polls of an asynchronous statement before giving up.
const MAX_POLLS: usize = 30;

const POLL_INTERVAL: Duration = Duration::from_millis(500);

static PLAIN_IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_$]*$").unwrap());

/// Column metadata in a statement result.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ColumnMeta {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    scale: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ResultSetMetaData {
    #[serde(rename = "rowType", default)]
    row_type: Vec<ColumnMeta>,
}

#[derive(Debug, Deserialize)]
struct StatementResponse {
    #[serde(rename = "resultSetMetaData")]
    meta: Option<ResultSetMetaData>,
    #[serde(default)]
    data: Vec<Vec<Option<String>>>,
    #[serde(rename = "statementHandle")]
    handle: Option<String>,
    message: Option<String>,
}

/// Rows of one statement, all cells as delivered (strings or null).
#[derive(Debug, Default)]
pub(crate) struct ResultSet {
    columns: Vec<ColumnMeta>,
    rows: Vec<Vec<Option<String>>>,
}

impl ResultSet {
    fn from_response(response: StatementResponse) -> Self {
        Self {
            columns: response.meta.map(|m| m.row_type).unwrap_or_default(),
            rows: response.data,
        }
    }

    fn index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Non-null cells of the named column, in row order.
    fn strings(&self, name: &str) -> Vec<String> {
        let Some(idx) = self.index(name) else {
            return Vec::new();
        };
        self.rows
            .iter()
            .filter_map(|row| row.get(idx).cloned().flatten())
            .collect()
    }

    fn cell(&self, row: usize, name: &str) -> Option<&str> {
        let idx = self.index(name)?;
        self.rows.get(row)?.get(idx)?.as_deref()
    }
}

/// Reads structure and samples from a Snowflake database.
///
/// Only OAuth token authentication is available through the SQL API.
pub struct SnowflakeSource {
    client: Client,
    base_url: String,
    token: String,
    config: SnowflakeConfig,
}

impl SnowflakeSource {
    pub fn connect(config: SnowflakeConfig) -> Result<Self> {
        let token = match &config.auth {
            AuthMethod::Token { token } => token.clone(),
            other => {
                return Err(SchemadocError::Config(format!(
                    "The Snowflake SQL API source supports only token authentication \
                     (AUTH_METHOD=token); got '{}'",
                    other.name()
                )));
            }
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(STATEMENT_TIMEOUT_SECS + 30))
            .build()
            .map_err(|e| SchemadocError::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            account = %config.account,
            user = %config.user,
            database = %config.database,
            warehouse = %config.warehouse,
            role = %config.role,
            "Using Snowflake SQL API with token authentication"
        );

        Ok(Self {
            client,
            base_url: config.account_url(),
            token,
            config,
        })
    }

    /// Point the client at a different endpoint, such as a proxy.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn config(&self) -> &SnowflakeConfig {
        &self.config
    }

    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("schemadoc/", env!("CARGO_PKG_VERSION"))),
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.token))
                .map_err(|e| SchemadocError::Config(format!("Invalid token: {}", e)))?,
        );
        headers.insert(
            "x-snowflake-authorization-token-type",
            HeaderValue::from_static("OAUTH"),
        );
        Ok(headers)
    }

    /// Run one statement and wait for its result.
    fn execute(&self, sql: &str) -> Result<ResultSet> {
        debug!(sql, "Executing statement");
        let body = json!({
            "statement": sql,
            "timeout": STATEMENT_TIMEOUT_SECS,
            "database": self.config.database,
            "schema": self.config.schema,
            "warehouse": self.config.warehouse,
            "role": self.config.role,
        });

        let response = self
            .client
            .post(format!("{}/api/v2/statements", self.base_url))
            .headers(self.build_headers()?)
            .json(&body)
            .send()?;
        let mut parsed = Self::read_response(response)?;

        let mut polls = 0;
        while let Some(handle) = parsed.pending.take() {
            if polls >= MAX_POLLS {
                return Err(SchemadocError::Source(format!(
                    "Statement {} did not finish in time",
                    handle
                )));
            }
            polls += 1;
            thread::sleep(POLL_INTERVAL);
            let response = self
                .client
                .get(format!("{}/api/v2/statements/{}", self.base_url, handle))
                .headers(self.build_headers()?)
                .send()?;
            parsed = Self::read_response(response)?;
        }

        Ok(parsed.result)
    }

    fn read_response(response: reqwest::blocking::Response) -> Result<Polled> {
        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().unwrap_or_default();
            let message = serde_json::from_str::<StatementResponse>(&error_text)
                .ok()
                .and_then(|r| r.message)
                .unwrap_or(error_text);
            return Err(SchemadocError::Source(format!(
                "Snowflake API error ({}): {}",
                status, message
            )));
        }

        let parsed: StatementResponse = response.json()?;
        if status == StatusCode::ACCEPTED {
            return Ok(Polled {
                pending: parsed.handle,
                result: ResultSet::default(),
            });
        }
        Ok(Polled {
            pending: None,
            result: ResultSet::from_response(parsed),
        })
    }
}

struct Polled {
    pending: Option<String>,
    result: ResultSet,
}

impl SchemaSource for SnowflakeSource {
    fn name(&self) -> &str {
        "snowflake"
    }

    fn list_schemas(&self) -> Result<Vec<String>> {
        Ok(self.execute("SHOW SCHEMAS")?.strings("name"))
    }

    fn list_tables(&self, schema: &str) -> Result<Vec<String>> {
        let sql = format!("SHOW TABLES IN SCHEMA {}", identifier(schema));
        Ok(self.execute(&sql)?.strings("name"))
    }

    fn table(&self, schema: &str, table: &str) -> Result<TableDescriptor> {
        let sql = format!("DESCRIBE TABLE {}.{}", identifier(schema), identifier(table));
        let described = self.execute(&sql).map_err(|e| match e {
            SchemadocError::Source(msg) if msg.contains("does not exist") => SchemadocError::TableNotFound {
                schema: schema.to_string(),
                table: table.to_string(),
            },
            other => other,
        })?;

        let columns = (0..described.rows.len())
            .filter_map(|row| {
                let name = described.cell(row, "name")?;
                let declared = described.cell(row, "type").unwrap_or_default();
                let mut column = ColumnDescriptor::new(name, declared)
                    .with_nullable(described.cell(row, "null?") != Some("N"));
                if let Some(comment) = described.cell(row, "comment").filter(|c| !c.trim().is_empty()) {
                    column = column.with_comment(comment);
                }
                Some(column)
            })
            .collect();

        let mut descriptor = TableDescriptor::new(table, columns);

        let comment_sql = format!(
            "SELECT COMMENT FROM information_schema.tables WHERE table_schema = {} AND table_name = {}",
            literal(schema),
            literal(table)
        );
        match self.execute(&comment_sql) {
            Ok(result) => {
                if let Some(comment) = result.strings("COMMENT").into_iter().find(|c| !c.trim().is_empty()) {
                    descriptor = descriptor.with_comment(comment);
                }
            }
            Err(e) => info!(schema, table, error = %e, "Table comment not available"),
        }

        Ok(descriptor)
    }

    fn sample_values(
        &self,
        schema: &str,
        table: &str,
        column: &str,
        limit: usize,
    ) -> Result<Vec<SampleValue>> {
        let col = identifier(column);
        let sql = format!(
            "SELECT {col} FROM {}.{} WHERE {col} IS NOT NULL SAMPLE ({} ROWS)",
            identifier(schema),
            identifier(table),
            limit
        );
        let result = self.execute(&sql)?;
        let Some(meta) = result.columns.first() else {
            return Ok(Vec::new());
        };
        Ok(result
            .rows
            .iter()
            .filter_map(|row| row.first().cloned().flatten())
            .map(|raw| to_sample(meta, &raw))
            .take(limit)
            .collect())
    }
}

/// Quote an identifier unless it is a plain unquoted name.
fn identifier(name: &str) -> String {
    if PLAIN_IDENTIFIER.is_match(name) {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}

/// A single-quoted SQL string literal.
fn literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Convert one result cell according to its column type.
pub(crate) fn to_sample(meta: &ColumnMeta, raw: &str) -> SampleValue {
    let text = || SampleValue::Text(raw.to_string());
    match meta.kind.to_lowercase().as_str() {
        "fixed" if meta.scale.unwrap_or(0) == 0 => raw
            .parse::<i64>()
            .map(SampleValue::Integer)
            .unwrap_or_else(|_| SampleValue::Decimal(raw.to_string())),
        "fixed" => SampleValue::Decimal(raw.to_string()),
        "real" => raw.parse::<f64>().map(SampleValue::Float).unwrap_or_else(|_| text()),
        "boolean" => SampleValue::Boolean(raw.eq_ignore_ascii_case("true") || raw == "1"),
        "date" => raw
            .parse::<i64>()
            .ok()
            .and_then(|days| NaiveDate::from_ymd_opt(1970, 1, 1)?.checked_add_signed(chrono::TimeDelta::try_days(days)?))
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(SampleValue::Temporal)
            .unwrap_or_else(text),
        "timestamp_ntz" | "timestamp_ltz" | "timestamp_tz" => {
            // timestamp_tz carries a trailing timezone offset
            let epoch = raw.split_whitespace().next().unwrap_or_default();
            epoch_parts(epoch)
                .and_then(|(secs, nanos)| DateTime::from_timestamp(secs, nanos))
                .map(|dt| SampleValue::Temporal(dt.naive_utc()))
                .unwrap_or_else(text)
        }
        "time" => epoch_parts(raw)
            .and_then(|(secs, nanos)| NaiveTime::from_num_seconds_from_midnight_opt(u32::try_from(secs).ok()?, nanos))
            .map(|t| SampleValue::Text(t.to_string()))
            .unwrap_or_else(text),
        _ => text(),
    }
}

/// Split `"secs.fraction"` into whole seconds and nanoseconds.
fn epoch_parts(raw: &str) -> Option<(i64, u32)> {
    let (whole, frac) = raw.split_once('.').unwrap_or((raw, ""));
    let mut secs: i64 = whole.parse().ok()?;
    let digits: String = frac.chars().take(9).collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let mut nanos: u32 = if digits.is_empty() {
        0
    } else {
        format!("{:0<9}", digits).parse().ok()?
    };
    if whole.starts_with('-') && nanos > 0 {
        secs -= 1;
        nanos = 1_000_000_000 - nanos;
    }
    Some((secs, nanos))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(kind: &str, scale: Option<i64>) -> ColumnMeta {
        ColumnMeta {
            name: "C".into(),
            kind: kind.into(),
            scale,
        }
    }

    #[test]
    fn test_identifier_quoting() {
        assert_eq!(identifier("ORDERS"), "ORDERS");
        assert_eq!(identifier("order lines"), "\"order lines\"");
        assert_eq!(identifier("a\"b"), "\"a\"\"b\"");
        assert_eq!(literal("o'brien"), "'o''brien'");
    }

    #[test]
    fn test_fixed_and_real_cells() {
        assert_eq!(to_sample(&meta("fixed", Some(0)), "42"), SampleValue::Integer(42));
        assert_eq!(
            to_sample(&meta("fixed", Some(2)), "12.50"),
            SampleValue::Decimal("12.50".into())
        );
        assert_eq!(to_sample(&meta("real", None), "1.5"), SampleValue::Float(1.5));
        assert_eq!(to_sample(&meta("boolean", None), "true"), SampleValue::Boolean(true));
        assert_eq!(to_sample(&meta("text", None), "x"), SampleValue::Text("x".into()));
    }

    #[test]
    fn test_temporal_cells() {
        let date = to_sample(&meta("date", None), "19723");
        assert_eq!(date.to_string(), "2024-01-01 00:00:00");

        let ts = to_sample(&meta("timestamp_ntz", None), "1704067200.500000000");
        assert_eq!(ts.to_string(), "2024-01-01 00:00:00.500");

        let tz = to_sample(&meta("timestamp_tz", None), "1704067200.000000000 1440");
        assert_eq!(tz.to_string(), "2024-01-01 00:00:00");

        let time = to_sample(&meta("time", None), "3661.000000000");
        assert_eq!(time, SampleValue::Text("01:01:01".into()));
    }

    #[test]
    fn test_negative_epoch_fraction() {
        assert_eq!(epoch_parts("-1.5"), Some((-2, 500_000_000)));
        assert_eq!(epoch_parts("10"), Some((10, 0)));
        assert_eq!(epoch_parts("x.1"), None);
    }

    #[test]
    fn test_result_set_from_response() {
        let body = r#"{
            "resultSetMetaData": {"rowType": [
                {"name": "name", "type": "text"},
                {"name": "comment", "type": "text"}
            ]},
            "data": [["ORDERS", null], ["CUSTOMERS", "People"]],
            "statementHandle": "01b2"
        }"#;
        let response: StatementResponse = serde_json::from_str(body).unwrap();
        let result = ResultSet::from_response(response);

        assert_eq!(result.strings("NAME"), vec!["ORDERS", "CUSTOMERS"]);
        assert_eq!(result.strings("comment"), vec!["People"]);
        assert_eq!(result.cell(0, "comment"), None);
        assert_eq!(result.cell(1, "name"), Some("CUSTOMERS"));
    }

    #[test]
    fn test_connect_requires_token_auth() {
        let config = SnowflakeConfig {
            account: "xy12345".into(),
            user: "loader".into(),
            database: "DB".into(),
            schema: "RAW".into(),
            warehouse: "COMPUTE_WH".into(),
            role: "ACCOUNTADMIN".into(),
            auth: AuthMethod::ExternalBrowser,
        };
        let err = SnowflakeSource::connect(config).err().unwrap();
        assert!(err.to_string().contains("only token authentication"));
    }
}
