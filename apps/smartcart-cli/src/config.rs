//! # CLI Configuration
//!
//! Settings for the `smartcart` binary.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority, applied by the caller)       │
//! │     --format json, --tier gold                                         │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     SMARTCART_TIER=gold                                                │
//! │     SMARTCART_FORMAT=json                                              │
//! │     SMARTCART_CATALOG=/srv/shop/catalog.json                           │
//! │     SMARTCART_LOG=debug                                                │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     --config <path>, else                                              │
//! │     ~/.config/smartcart/smartcart.toml (Linux)                         │
//! │     ~/Library/Application Support/dev.smartcart.smartcart/... (macOS)  │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     Silver customer, text output, built-in sample catalog              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # smartcart.toml
//! [cart]
//! default_tier = "gold"   # bronze | silver | gold
//!
//! [output]
//! format = "json"         # text | json
//!
//! [catalog]
//! path = "catalog.json"   # omit to use the built-in sample catalog
//!
//! [logging]
//! filter = "info,smartcart=debug"
//! ```
//!
//! Logging is not running yet while configuration loads (the filter comes
//! from here), so the loader records what it did in [`LoadReport`] and the
//! caller logs it once the subscriber is installed.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize};
use smartcart_core::LoyaltyTier;
use tracing_subscriber::EnvFilter;

use crate::error::{AppError, AppResult};

pub const ENV_TIER: &str = "SMARTCART_TIER";
pub const ENV_FORMAT: &str = "SMARTCART_FORMAT";
pub const ENV_CATALOG: &str = "SMARTCART_CATALOG";
pub const ENV_LOG: &str = "SMARTCART_LOG";

/// Filter used when neither `RUST_LOG` nor the config names one.
pub const DEFAULT_LOG_FILTER: &str = "info,smartcart=debug";

// =============================================================================
// Output Format
// =============================================================================

/// How command results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable tables.
    #[default]
    Text,

    /// The serde form of the result, decimals as strings.
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "plain" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(AppError::Config(format!(
                "Unknown output format: '{}'. Valid options: text, json",
                other
            ))),
        }
    }
}

// =============================================================================
// Sections
// =============================================================================

/// `[cart]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartSettings {
    /// Tier new sessions start with.
    #[serde(default = "default_tier", deserialize_with = "deserialize_tier")]
    pub default_tier: LoyaltyTier,
}

fn default_tier() -> LoyaltyTier {
    LoyaltyTier::Silver
}

/// Accepts tiers in any case, as the command line does.
pub(crate) fn deserialize_tier<'de, D>(deserializer: D) -> Result<LoyaltyTier, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}

impl Default for CartSettings {
    fn default() -> Self {
        CartSettings {
            default_tier: default_tier(),
        }
    }
}

/// `[output]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default)]
    pub format: OutputFormat,
}

/// `[catalog]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// JSON catalog file. `None` means the built-in sample catalog.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// `[logging]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive string. `RUST_LOG` still wins when set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_log_filter(),
        }
    }
}

// =============================================================================
// Load Report
// =============================================================================

/// What the loader did, for logging after the subscriber is up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// File the settings came from, if any.
    pub source: Option<PathBuf>,

    /// Environment variables that were applied.
    pub applied: Vec<&'static str>,

    /// Environment variables that were ignored, with their rejected value.
    pub ignored: Vec<(&'static str, String)>,
}

// =============================================================================
// Main CLI Configuration
// =============================================================================

/// Complete CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub cart: CartSettings,

    #[serde(default)]
    pub output: OutputSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl CliConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file: `config_path` if given (must exist), else the
    ///    platform default path (skipped when absent)
    /// 3. Environment variables
    ///
    /// ## Errors
    /// - Explicit config file missing or unreadable
    /// - File is not valid TOML for this structure
    /// - Final configuration fails [`CliConfig::validate`]
    pub fn load(config_path: Option<PathBuf>) -> AppResult<(Self, LoadReport)> {
        let mut report = LoadReport::default();

        let path = match config_path {
            Some(path) => Some(path),
            None => Self::default_config_path().filter(|p| p.exists()),
        };

        let mut config = match path {
            Some(path) => {
                let config = Self::from_file(&path)?;
                report.source = Some(path);
                config
            }
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok(), &mut report);
        config.validate()?;

        Ok((config, report))
    }

    /// Reads and parses one TOML file.
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> AppResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> AppResult<()> {
        if self.logging.filter.trim().is_empty() {
            return Err(AppError::Config("logging.filter must not be empty".into()));
        }

        EnvFilter::try_new(&self.logging.filter).map_err(|e| {
            AppError::Config(format!("logging.filter '{}' is invalid: {}", self.logging.filter, e))
        })?;

        if let Some(ref path) = self.catalog.path {
            if path.as_os_str().is_empty() {
                return Err(AppError::Config("catalog.path must not be empty".into()));
            }
        }

        Ok(())
    }

    /// Applies overrides from `lookup` (the process environment in
    /// production). Unparseable values are recorded and skipped.
    pub fn apply_overrides<F>(&mut self, lookup: F, report: &mut LoadReport)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(tier) = lookup(ENV_TIER) {
            match tier.parse::<LoyaltyTier>() {
                Ok(parsed) => {
                    self.cart.default_tier = parsed;
                    report.applied.push(ENV_TIER);
                }
                Err(_) => report.ignored.push((ENV_TIER, tier)),
            }
        }

        if let Some(format) = lookup(ENV_FORMAT) {
            match format.parse::<OutputFormat>() {
                Ok(parsed) => {
                    self.output.format = parsed;
                    report.applied.push(ENV_FORMAT);
                }
                Err(_) => report.ignored.push((ENV_FORMAT, format)),
            }
        }

        if let Some(path) = lookup(ENV_CATALOG) {
            if path.trim().is_empty() {
                report.ignored.push((ENV_CATALOG, path));
            } else {
                self.catalog.path = Some(PathBuf::from(path));
                report.applied.push(ENV_CATALOG);
            }
        }

        if let Some(filter) = lookup(ENV_LOG) {
            if EnvFilter::try_new(&filter).is_ok() && !filter.trim().is_empty() {
                self.logging.filter = filter;
                report.applied.push(ENV_LOG);
            } else {
                report.ignored.push((ENV_LOG, filter));
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("dev", "smartcart", "smartcart")
            .map(|dirs| dirs.config_dir().join("smartcart.toml"))
    }
}
