//! Handles settings for the application.
//!
//! Layers, lowest priority first: built-in defaults, the optional TOML file
//! (`kinbank.toml` unless `--config` says otherwise), `KINBANK_*` environment
//! variables. Command line flags are applied on top by the caller.
use clap::ValueEnum;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;

pub const DEFAULT_CONFIG_PATH: &str = "kinbank.toml";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Log level for the `kinbank` and `engine` targets.
    pub level: String,
    /// Account used by `history` when `--account` is not given.
    pub default_account: Option<String>,
    pub format: OutputFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            default_account: None,
            format: OutputFormat::Text,
        }
    }
}

impl Settings {
    pub fn new(config_path: Option<&str>) -> Result<Self> {
        let path = config_path.unwrap_or(DEFAULT_CONFIG_PATH);
        let settings = Config::builder()
            .add_source(File::with_name(path).required(config_path.is_some()))
            .add_source(Environment::with_prefix("KINBANK"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
