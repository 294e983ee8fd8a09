//! Runtime configuration: warehouse connection settings, column tests and
//! the output location.
//!
//! Values come from the process environment (optionally seeded from a
//! `.env` file by the caller) and from a tests file in YAML or JSON.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{Result, SchemadocError};
use crate::output::ColumnTest;

/// Output file used when neither a flag nor `DBT_YAML_OUTPUT_PATH` is set.
pub const DEFAULT_OUTPUT_PATH: &str = "./models/schema.yml";

/// Tests file read when none is given.
pub const DEFAULT_TESTS_CONFIG: &str = "tests_config.yaml";

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\{([A-Za-z0-9_]+)\}").unwrap());

/// Replace every `${VAR}` in `value` with the variable's value from the
/// process environment. Unset variables become empty strings.
pub fn expand_env_placeholders(value: &str) -> String {
    expand_with(value, |name| std::env::var(name).ok())
}

/// Placeholder expansion against an arbitrary lookup.
pub fn expand_with(value: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    PLACEHOLDER
        .replace_all(value, |caps: &Captures| match lookup(&caps[1]) {
            Some(v) if !v.is_empty() => v,
            _ => {
                warn!(variable = &caps[1], "Environment variable not set, using empty string");
                String::new()
            }
        })
        .into_owned()
}

/// How to authenticate against Snowflake.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthMethod {
    Password { password: String },
    ExternalBrowser,
    Okta { url: String },
    Token { token: String },
}

impl AuthMethod {
    /// Short name, as accepted in `AUTH_METHOD`.
    pub fn name(&self) -> &'static str {
        match self {
            AuthMethod::Password { .. } => "password",
            AuthMethod::ExternalBrowser => "externalbrowser",
            AuthMethod::Okta { .. } => "okta",
            AuthMethod::Token { .. } => "token",
        }
    }
}

// Secrets stay out of logs and panics.
impl fmt::Debug for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMethod::Okta { url } => f.debug_struct("Okta").field("url", url).finish(),
            other => write!(f, "{}", other.name()),
        }
    }
}

/// Snowflake connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnowflakeConfig {
    pub account: String,
    pub user: String,
    pub database: String,
    pub schema: String,
    pub warehouse: String,
    pub role: String,
    pub auth: AuthMethod,
}

impl SnowflakeConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through `lookup`, expanding `${VAR}` placeholders in
    /// every value. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |name: &str| {
            lookup(name)
                .map(|v| expand_with(&v, &lookup))
                .filter(|v| !v.trim().is_empty())
        };

        let required = ["SNOWFLAKE_ACCOUNT", "SNOWFLAKE_USER", "DATABASE", "SCHEMA"];
        let values: Vec<Option<String>> = required.iter().map(|name| get(*name)).collect();
        let missing: Vec<String> = required
            .iter()
            .zip(&values)
            .filter(|(_, v)| v.is_none())
            .map(|(name, _)| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(SchemadocError::MissingEnv(missing));
        }
        let [account, user, database, schema]: [String; 4] = values
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .try_into()
            .map_err(|_| SchemadocError::Config("Incomplete Snowflake settings".to_string()))?;

        let method = get("AUTH_METHOD").unwrap_or_else(|| "password".to_string());
        let require = |name: &str, method: &str| {
            get(name).ok_or_else(|| {
                SchemadocError::Config(format!("{} is required for {} authentication", name, method))
            })
        };
        let auth = match method.to_lowercase().as_str() {
            "password" => AuthMethod::Password {
                password: require("SNOWFLAKE_PASSWORD", "password")?,
            },
            "browser" | "externalbrowser" => AuthMethod::ExternalBrowser,
            "okta" => AuthMethod::Okta {
                url: require("OKTA_URL", "Okta")?,
            },
            "token" => AuthMethod::Token {
                token: require("SNOWFLAKE_TOKEN", "token")?,
            },
            other => {
                return Err(SchemadocError::Config(format!(
                    "Unsupported authentication method: {}",
                    other
                )));
            }
        };

        Ok(Self {
            account,
            user,
            database,
            schema,
            warehouse: get("SNOWFLAKE_WAREHOUSE").unwrap_or_else(|| "COMPUTE_WH".to_string()),
            role: get("SNOWFLAKE_ROLE").unwrap_or_else(|| "ACCOUNTADMIN".to_string()),
            auth,
        })
    }

    /// Base URL of the account, e.g. `https://xy12345.snowflakecomputing.com`.
    pub fn account_url(&self) -> String {
        if self.account.starts_with("https://") || self.account.starts_with("http://") {
            self.account.trim_end_matches('/').to_string()
        } else {
            format!("https://{}.snowflakecomputing.com", self.account)
        }
    }
}

/// One test as written in a tests file: either a bare name or a mapping
/// from test name to parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawTest {
    Simple(String),
    Parameterized(IndexMap<String, Option<IndexMap<String, serde_json::Value>>>),
}

/// Tests attached to one column name.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnTestsEntry {
    pub column: String,
    #[serde(default)]
    tests: Vec<RawTest>,
}

impl ColumnTestsEntry {
    /// The entry's tests in file order.
    pub fn tests(&self) -> Vec<ColumnTest> {
        self.tests
            .iter()
            .flat_map(|raw| match raw {
                RawTest::Simple(name) => vec![ColumnTest::Simple(name.clone())],
                RawTest::Parameterized(map) => map
                    .iter()
                    .map(|(name, params)| ColumnTest::Parameterized {
                        name: name.clone(),
                        params: params.clone().unwrap_or_default(),
                    })
                    .collect(),
            })
            .collect()
    }
}

/// Column tests to emit alongside descriptions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TestsConfig {
    #[serde(default)]
    pub tests: Vec<ColumnTestsEntry>,
}

impl TestsConfig {
    /// Load from a `.yaml`/`.yml` or `.json` file. A missing file yields an
    /// empty configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(path = %path.display(), "Tests configuration file not found");
            return Ok(Self::default());
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        let contents = fs::read_to_string(path).map_err(|e| SchemadocError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config = match extension.as_str() {
            "yaml" | "yml" => Self::from_yaml(&contents)?,
            "json" => Self::from_json(&contents)?,
            _ => {
                return Err(SchemadocError::Config(format!(
                    "Unsupported file format for tests configuration: {}",
                    path.display()
                )));
            }
        };
        info!(path = %path.display(), entries = config.tests.len(), "Loaded tests configuration");
        Ok(config)
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        // An empty document deserializes as null.
        let parsed: Option<Self> = serde_yaml::from_str(contents)?;
        Ok(parsed.unwrap_or_default())
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Tests for `column`. The first entry naming the column wins.
    pub fn tests_for(&self, column: &str) -> Vec<ColumnTest> {
        self.tests
            .iter()
            .find(|entry| entry.column == column)
            .map(ColumnTestsEntry::tests)
            .unwrap_or_default()
    }
}

/// Where to write the document: the explicit path, else
/// `DBT_YAML_OUTPUT_PATH`, else [`DEFAULT_OUTPUT_PATH`]. Parent directories
/// are created.
pub fn resolve_output_path(explicit: Option<&Path>) -> Result<PathBuf> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match std::env::var("DBT_YAML_OUTPUT_PATH") {
            Ok(p) if !p.trim().is_empty() => PathBuf::from(p),
            _ => {
                warn!("DBT_YAML_OUTPUT_PATH not specified, using default {}", DEFAULT_OUTPUT_PATH);
                PathBuf::from(DEFAULT_OUTPUT_PATH)
            }
        },
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| SchemadocError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
            info!(dir = %parent.display(), "Created output directory");
        }
    }
    Ok(path)
}
