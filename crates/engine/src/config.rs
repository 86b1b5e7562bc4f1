//! Client configuration via `patent_client.toml`
//!
//! One TOML file holds the HTTP settings and the per-provider endpoints,
//! page sizes and credentials. Every key has a default, so an empty file
//! (or no file at all) yields a working configuration against the public
//! endpoints. Credentials are never acquired here; they are read as given.

use patent_client_core::Error;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error as ThisError;

/// Config file name looked up by [`ClientConfig::from_file`] callers
pub const CONFIG_FILE_NAME: &str = "patent_client.toml";

/// EPO OPS never returns more than this many results per request
pub const EPO_MAX_PAGE_SIZE: usize = 100;

/// Errors raised while loading or saving configuration
#[derive(Debug, ThisError)]
pub enum ConfigError {
    /// The file could not be read or written
    #[error("config file '{path}': {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for this schema
    #[error("failed to parse config file '{path}': {message}")]
    Parse {
        /// File path
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// The configuration could not be serialized
    #[error("failed to serialize config: {0}")]
    Serialize(String),

    /// A value is out of its allowed range
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::config(e.to_string())
    }
}

/// `[http]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
    /// `User-Agent` header value
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            timeout_ms: 30_000,
            user_agent: format!("patent-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// `[epo]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EpoConfig {
    /// OPS REST root
    pub base_url: String,
    /// Results per search request (at most 100)
    pub page_size: usize,
    /// OAuth bearer token, obtained elsewhere
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl Default for EpoConfig {
    fn default() -> Self {
        EpoConfig {
            base_url: "https://ops.epo.org/3.2/rest-services".to_string(),
            page_size: EPO_MAX_PAGE_SIZE,
            access_token: None,
        }
    }
}

/// `[odp]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OdpConfig {
    /// Open Data Portal API root
    pub base_url: String,
    /// Results per search request
    pub page_size: usize,
    /// `X-API-KEY` value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for OdpConfig {
    fn default() -> Self {
        OdpConfig {
            base_url: "https://api.uspto.gov/api/v1".to_string(),
            page_size: 25,
            api_key: None,
        }
    }
}

/// `[assignment]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssignmentConfig {
    /// Assignment search endpoint
    pub base_url: String,
    /// Rows per search request
    pub page_size: usize,
}

impl Default for AssignmentConfig {
    fn default() -> Self {
        AssignmentConfig {
            base_url: "https://assignment-api.uspto.gov/patent/lookup".to_string(),
            page_size: 20,
        }
    }
}

/// `[bulk_data]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BulkDataConfig {
    /// Bulk data product catalog root
    pub base_url: String,
}

impl Default for BulkDataConfig {
    fn default() -> Self {
        BulkDataConfig {
            base_url: "https://bulkdata.uspto.gov/BDSS-API/products".to_string(),
        }
    }
}

/// Client configuration loaded from `patent_client.toml`
///
/// # Example
///
/// ```toml
/// [http]
/// timeout_ms = 30000
///
/// [epo]
/// page_size = 100
/// # access_token = "..."
///
/// [odp]
/// # api_key = "..."
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// HTTP transport settings
    pub http: HttpConfig,
    /// EPO OPS
    pub epo: EpoConfig,
    /// USPTO Open Data Portal
    pub odp: OdpConfig,
    /// USPTO assignment search
    pub assignment: AssignmentConfig,
    /// USPTO bulk data catalog
    pub bulk_data: BulkDataConfig,
}

impl ClientConfig {
    /// Check page sizes and timeouts
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a zero page size, an EPO page
    /// size above 100, or a zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.timeout_ms == 0 {
            return Err(ConfigError::Invalid("http.timeout_ms must be > 0".into()));
        }
        for (name, size) in [
            ("epo.page_size", self.epo.page_size),
            ("odp.page_size", self.odp.page_size),
            ("assignment.page_size", self.assignment.page_size),
        ] {
            if size == 0 {
                return Err(ConfigError::Invalid(format!("{} must be > 0", name)));
            }
        }
        if self.epo.page_size > EPO_MAX_PAGE_SIZE {
            return Err(ConfigError::Invalid(format!(
                "epo.page_size must be <= {}, got {}",
                EPO_MAX_PAGE_SIZE, self.epo.page_size
            )));
        }
        Ok(())
    }

    /// Default config file content with comments
    pub fn default_toml() -> &'static str {
        r#"# patent-client configuration
#
# Every key is optional; the values below are the defaults.

[http]
# Per-request timeout in milliseconds
timeout_ms = 30000
# user_agent = "patent-client/0.1.0"

[epo]
base_url = "https://ops.epo.org/3.2/rest-services"
# Results per search request, at most 100
page_size = 100
# OAuth bearer token for OPS
# access_token = "..."

[odp]
base_url = "https://api.uspto.gov/api/v1"
page_size = 25
# api_key = "..."

[assignment]
base_url = "https://assignment-api.uspto.gov/patent/lookup"
page_size = 20

[bulk_data]
base_url = "https://bulkdata.uspto.gov/BDSS-API/products"
"#
    }

    /// Read, parse and validate a config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ClientConfig = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the commented default file if `path` does not exist yet
    pub fn write_default_if_missing(path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        }
        Ok(())
    }

    /// Serialize to TOML and write to `path`
    pub fn write_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
