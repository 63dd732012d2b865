//! Report configuration
//!
//! Everything client-specific (sheet name fragments, label cleanup rules,
//! branding) lives here so that a new export convention needs a TOML edit and
//! not a code change. Lookup order: explicit `--config` path, then
//! `$XDG_CONFIG_HOME/transition-report/config.toml` (or the platform config
//! directory), then built-in defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::importers::SheetNames;
use crate::transition::allocation::LabelRule;

const CONFIG_DIR: &str = "transition-report";
const CONFIG_FILENAME: &str = "config.toml";

/// Fallback when every model category in the export is unassigned
pub const DEFAULT_MODEL_NAME: &str = "Savvy Strategic Model";
/// Wordmark drawn in the logo box when no logo image is available
pub const DEFAULT_BRAND_NAME: &str = "Savvy";
pub const DEFAULT_LOGO_FILENAME: &str = "savvy_logo.png";
pub const DEFAULT_TOP_TRADES: usize = 5;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub sheets: SheetNames,
    pub label_rules: Vec<LabelRule>,
    pub default_model_name: String,
    pub brand_name: String,
    pub default_logo: Option<PathBuf>,
    pub top_trades: usize,
    /// Reject gain/loss sheets with more than one summary row
    pub strict_gain_loss_rows: bool,
    pub access: AccessConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    /// When set, report generation requires this password
    pub password: Option<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            sheets: SheetNames::default(),
            label_rules: LabelRule::defaults(),
            default_model_name: DEFAULT_MODEL_NAME.to_string(),
            brand_name: DEFAULT_BRAND_NAME.to_string(),
            default_logo: Some(PathBuf::from(DEFAULT_LOGO_FILENAME)),
            top_trades: DEFAULT_TOP_TRADES,
            strict_gain_loss_rows: false,
            access: AccessConfig::default(),
        }
    }
}

impl ReportConfig {
    /// Parse configuration from TOML text; omitted keys keep their defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: ReportConfig = toml::from_str(text).context("Invalid configuration file")?;
        Ok(config)
    }

    /// Load configuration from an explicit path, the default location, or defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => default_config_path().filter(|p| p.exists()),
        };

        match path {
            Some(path) => {
                info!("Loading configuration from {:?}", path);
                let text = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config file {:?}", path))?;
                Self::from_toml_str(&text)
            }
            None => {
                debug!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }
}

/// `$XDG_CONFIG_HOME/transition-report/config.toml`, or the platform equivalent
pub fn default_config_path() -> Option<PathBuf> {
    std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(dir_spec::config_home)
        .map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILENAME))
}
