//! Configuration types for refsearch.
//!
//! [`Config::load`] reads `~/.config/refsearch/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist, then layers `REFSEARCH_*`
//! environment variables on top (`REFSEARCH_STORE__URL`,
//! `REFSEARCH_STORE__API_KEY`, …). [`Config::defaults`] returns the same
//! defaults without touching the filesystem or environment (useful in tests).

use serde::Deserialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[store]
url         = ""
api_key     = ""
table       = "NYSE2023"
filter_mode = "server"

[search]
columns = ["CUSIP", "ISIN", "Stock Symbol", "Issuer Name"]

[display]
lead_column = "Issuer Name"
theme       = "default"

[export]
path = "results.csv"

[keybindings]
query_focus = "/"
export      = "e"
"#;

const ENV_PREFIX: &str = "REFSEARCH";

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}

/// Where rows are filtered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Send an `ilike` disjunction and let the store filter.
    #[default]
    Server,
    /// Fetch the whole table and filter locally.
    Client,
}

impl std::fmt::Display for FilterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterMode::Server => write!(f, "server"),
            FilterMode::Client => write!(f, "client"),
        }
    }
}

/// `[store]` section: remote endpoint and credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the hosted project, e.g. `https://xyz.supabase.co`.
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default)]
    pub filter_mode: FilterMode,
}

fn default_table() -> String { "NYSE2023".to_string() }

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            table: default_table(),
            filter_mode: FilterMode::default(),
        }
    }
}

impl StoreConfig {
    /// Both the endpoint and the key are set.
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty() && !self.api_key.trim().is_empty()
    }
}

/// `[search]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Columns a term is matched against.
    #[serde(default = "default_search_columns")]
    pub columns: Vec<String>,
}

/// The four designated searchable columns.
pub fn default_search_columns() -> Vec<String> {
    ["CUSIP", "ISIN", "Stock Symbol", "Issuer Name"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { columns: default_search_columns() }
    }
}

/// `[display]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// Column moved to the front of the table and the export. Empty disables.
    #[serde(default = "default_lead_column")]
    pub lead_column: String,
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_lead_column() -> String { crate::types::DEFAULT_LEAD_COLUMN.to_string() }
fn default_theme() -> String { "default".to_string() }

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            lead_column: default_lead_column(),
            theme: default_theme(),
        }
    }
}

impl DisplayConfig {
    pub fn lead(&self) -> Option<&str> {
        let lead = self.lead_column.trim();
        (!lead.is_empty()).then_some(lead)
    }
}

/// `[export]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_export_path")]
    pub path: PathBuf,
}

fn default_export_path() -> PathBuf { PathBuf::from(crate::export::DEFAULT_EXPORT_FILE) }

impl Default for ExportConfig {
    fn default() -> Self {
        Self { path: default_export_path() }
    }
}

/// `[keybindings]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct KeybindingsConfig {
    #[serde(default = "default_query_focus")]
    pub query_focus: String,
    #[serde(default = "default_export")]
    pub export: String,
}

fn default_query_focus() -> String { "/".to_string() }
fn default_export() -> String { "e".to_string() }

impl Default for KeybindingsConfig {
    fn default() -> Self {
        Self {
            query_focus: default_query_focus(),
            export: default_export(),
        }
    }
}

impl KeybindingsConfig {
    /// The first character of a binding, if it is a single-key binding.
    pub fn key(binding: &str) -> Option<char> {
        let mut chars = binding.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/refsearch/config.toml`, layered on top of the
    /// built-in defaults and under the environment. Creates the file with
    /// defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
            tracing::info!(path = %path.display(), "wrote default config");
        }

        Self::load_from(&path)
    }

    /// Load an explicit file (must exist), layered the same way as [`Config::load`].
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Parse a TOML string over the built-in defaults. No environment layer.
    pub fn from_toml_str(src: &str) -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from_str(src, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

/// `$XDG_CONFIG_HOME/refsearch/config.toml`, falling back to `~/.config`.
pub fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("refsearch")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
