//! Configuration management.
//!
//! The configuration is built once at startup, from defaults, an optional
//! TOML file, and `SCHOLAR_PMID_*` environment variables, in that order.
//!
//! # Configuration File Format
//!
//! ```toml
//! [eutils]
//! esearch_url = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi"
//! api_key = "your-ncbi-api-key"
//! pubmed_url = "https://pubmed.ncbi.nlm.nih.gov"
//!
//! [http]
//! connect_timeout_secs = 10
//!
//! [selectors]
//! block = "div.gs_r.gs_or.gs_scl"
//! title = "h3.gs_rt"
//! link = "h3.gs_rt a"
//! slot = ".gs_ri"
//!
//! [[hostname_rules]]
//! prefix = "www.nature.com/articles"
//! doi_prefix = "10.1038"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default NCBI E-utilities eSearch endpoint
pub const DEFAULT_ESEARCH_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi";

/// Default base URL of PubMed record pages
pub const DEFAULT_PUBMED_URL: &str = "https://pubmed.ncbi.nlm.nih.gov";

/// Environment variable consulted for the NCBI API key
const API_KEY_VAR: &str = "NCBI_API_KEY";

/// Name of the config file looked up in the working directory
const LOCAL_CONFIG_NAME: &str = "scholar-pmid.toml";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// E-utilities endpoints and API key
    #[serde(default)]
    pub eutils: EutilsConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// CSS selectors locating result blocks on the page
    #[serde(default)]
    pub selectors: SelectorConfig,

    /// Hostname prefixes rewritten into DOI prefixes before extraction
    #[serde(default = "default_hostname_rules")]
    pub hostname_rules: Vec<HostnameRule>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            eutils: EutilsConfig::default(),
            http: HttpConfig::default(),
            selectors: SelectorConfig::default(),
            hostname_rules: default_hostname_rules(),
        }
    }
}

/// E-utilities configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EutilsConfig {
    /// eSearch endpoint
    #[serde(default = "default_esearch_url")]
    pub esearch_url: String,

    /// NCBI API key (optional, raises the service's request allowance)
    #[serde(default = "default_api_key")]
    pub api_key: Option<String>,

    /// Base URL that PMIDs are appended to when linking records
    #[serde(default = "default_pubmed_url")]
    pub pubmed_url: String,
}

impl Default for EutilsConfig {
    fn default() -> Self {
        Self {
            esearch_url: default_esearch_url(),
            api_key: default_api_key(),
            pubmed_url: default_pubmed_url(),
        }
    }
}

fn default_esearch_url() -> String {
    DEFAULT_ESEARCH_URL.to_string()
}

fn default_api_key() -> Option<String> {
    std::env::var(API_KEY_VAR).ok().filter(|k| !k.is_empty())
}

fn default_pubmed_url() -> String {
    DEFAULT_PUBMED_URL.to_string()
}

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Connection establishment timeout
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Whole-request timeout; unset means requests run to completion
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            connect_timeout_secs: default_connect_timeout(),
            request_timeout_secs: None,
        }
    }
}

fn default_user_agent() -> String {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

/// Selectors describing the results page structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// One element per search result
    #[serde(default = "default_block_selector")]
    pub block: String,

    /// Title element inside a block
    #[serde(default = "default_title_selector")]
    pub title: String,

    /// Link element inside a block whose `href` is the article URL
    #[serde(default = "default_link_selector")]
    pub link: String,

    /// Element inside a block that rendered fragments are appended to
    #[serde(default = "default_slot_selector")]
    pub slot: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            block: default_block_selector(),
            title: default_title_selector(),
            link: default_link_selector(),
            slot: default_slot_selector(),
        }
    }
}

fn default_block_selector() -> String {
    "div.gs_r.gs_or.gs_scl".to_string()
}

fn default_title_selector() -> String {
    "h3.gs_rt".to_string()
}

fn default_link_selector() -> String {
    "h3.gs_rt a".to_string()
}

fn default_slot_selector() -> String {
    ".gs_ri".to_string()
}

/// A hostname+path prefix and the DOI prefix it stands for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostnameRule {
    pub prefix: String,
    pub doi_prefix: String,
}

impl HostnameRule {
    pub fn new(prefix: impl Into<String>, doi_prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            doi_prefix: doi_prefix.into(),
        }
    }
}

fn default_hostname_rules() -> Vec<HostnameRule> {
    vec![HostnameRule::new("www.nature.com/articles", "10.1038")]
}

/// Load configuration from an optional file, then the environment
pub fn load_config(path: Option<&Path>) -> Result<Config, config::ConfigError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix("SCHOLAR_PMID")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize()
}

/// Find a config file in the working directory or the user config directory
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_NAME);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("scholar-pmid").join("config.toml"))
        .filter(|path| path.is_file())
}

/// Write a configuration to a TOML file
pub fn save_config(config: &Config, path: &Path) -> Result<(), ConfigFileError> {
    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigFileError::Serialize(e.to_string()))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ConfigFileError::Io(e.to_string()))?;
    }

    std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}
