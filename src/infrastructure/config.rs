//! Application configuration
//!
//! Read once at startup from a JSON (or any format the `config` crate
//! understands) file, with `LISTING_HARVESTER__*` environment variables layered
//! on top. Nothing here is mutated after `AppConfig::load` returns.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{QueryParameters, RecordField};
use crate::infrastructure::http_client::HttpClientConfig;
use crate::infrastructure::url_utils::validate_base_url;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {source}")]
    Load {
        #[from]
        source: config::ConfigError,
    },

    #[error("Configuration validation failed: {message}")]
    Validation { message: String },
}

impl ConfigError {
    fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Top level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Search parameters; Hungarian key names are accepted as aliases
    pub query: QueryParameters,

    #[serde(default)]
    pub http: HttpClientConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub sites: SitesConfig,
}

/// Logging configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// JSON formatted file output
    pub json_format: bool,

    pub console_output: bool,

    pub file_output: bool,

    pub log_dir: PathBuf,

    pub file_name: String,

    /// Extra per-target levels, e.g. `"reqwest": "debug"`
    pub module_filters: HashMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: false,
            console_output: true,
            file_output: false,
            log_dir: PathBuf::from(defaults::LOG_DIR),
            file_name: defaults::LOG_FILE_NAME.to_string(),
            module_filters: HashMap::new(),
        }
    }
}

/// Where the CSV export goes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,

    /// Prepended to the derived file name, joined with `_`
    pub file_prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(defaults::OUTPUT_DIRECTORY),
            file_prefix: String::new(),
        }
    }
}

/// Per-site switches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,

    pub base_url: String,

    /// Additional labels per field, merged over the site's built-in table
    #[serde(default)]
    pub field_labels: HashMap<RecordField, Vec<String>>,
}

fn enabled_by_default() -> bool {
    true
}

impl SiteConfig {
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            enabled: true,
            base_url: base_url.to_string(),
            field_labels: HashMap::new(),
        }
    }

    /// Label overrides flattened into label -> field form
    pub fn label_overrides(&self) -> HashMap<String, RecordField> {
        self.field_labels
            .iter()
            .flat_map(|(field, labels)| labels.iter().map(move |label| (label.clone(), *field)))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SitesConfig {
    pub dunahouse: SiteConfig,
    pub ingatlan_com: SiteConfig,
}

impl Default for SitesConfig {
    fn default() -> Self {
        Self {
            dunahouse: SiteConfig::with_base_url(defaults::DUNAHOUSE_BASE_URL),
            ingatlan_com: SiteConfig::with_base_url(defaults::INGATLAN_COM_BASE_URL),
        }
    }
}

impl AppConfig {
    /// Load from `path`, overlay environment variables and validate.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(
                config::Environment::with_prefix(defaults::ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Minimal configuration for a query, everything else defaulted
    pub fn for_query(query: QueryParameters) -> Self {
        Self {
            query,
            http: HttpClientConfig::default(),
            logging: LoggingConfig::default(),
            output: OutputConfig::default(),
            sites: SitesConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let query = &self.query;

        if query.districts.is_empty() {
            return Err(ConfigError::validation("at least one district is required"));
        }

        if query.min_price > query.max_price {
            return Err(ConfigError::validation(format!(
                "min price ({}) cannot be greater than max price ({})",
                query.min_price, query.max_price
            )));
        }

        if query.min_size > query.max_size {
            return Err(ConfigError::validation(format!(
                "min size ({}) cannot be greater than max size ({})",
                query.min_size, query.max_size
            )));
        }

        if self.http.timeout_seconds == 0 {
            return Err(ConfigError::validation("http timeout must be greater than 0"));
        }

        let sites = [&self.sites.dunahouse, &self.sites.ingatlan_com];
        if !sites.iter().any(|s| s.enabled) {
            return Err(ConfigError::validation("no listing site is enabled"));
        }

        for site in sites.iter().filter(|s| s.enabled) {
            validate_base_url(&site.base_url).map_err(|e| ConfigError::validation(e.to_string()))?;
        }

        Ok(())
    }
}

/// Default configuration values
pub mod defaults {
    /// Path used when no config path is given on the command line
    pub const CONFIG_PATH: &str = "config.json";

    /// Environment variable prefix, e.g. `LISTING_HARVESTER__HTTP__TIMEOUT_SECONDS`
    pub const ENV_PREFIX: &str = "LISTING_HARVESTER";

    pub const REQUEST_TIMEOUT_SECONDS: u64 = 5;

    pub const MAX_REDIRECTS: usize = 10;

    pub const USER_AGENT: &str =
        "Mozilla/5.0 (X11; Fedora; Linux x86_64; rv:90.0) Gecko/20100101 Firefox/90.0";

    pub const LOG_LEVEL: &str = "info";

    pub const LOG_DIR: &str = "logs";

    pub const LOG_FILE_NAME: &str = "listing-harvester.log";

    pub const OUTPUT_DIRECTORY: &str = ".";

    pub const DUNAHOUSE_BASE_URL: &str = "https://dh.hu/";

    pub const INGATLAN_COM_BASE_URL: &str = "https://ingatlan.com/";
}
