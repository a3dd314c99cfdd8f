//! Demo configuration, loaded from an optional JSON file.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use curtain::ControllerConfig;
use log::LevelFilter;
use serde::Deserialize;

use crate::error::DemoError;

/// Settings for the demo binary.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Where log output goes.
    pub log_file: PathBuf,
    /// Log level name (`error`, `warn`, `info`, `debug`, `trace`).
    pub log_level: String,
    /// Dialog controller settings.
    pub controller: ControllerConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from("curtain-demo.log"),
            log_level: "debug".into(),
            controller: ControllerConfig::default(),
        }
    }
}

impl DemoConfig {
    /// Load from `path`, or use defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, DemoError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// The configured log level.
    pub fn level(&self) -> Result<LevelFilter, DemoError> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| DemoError::LogLevel(self.log_level.clone()))
    }
}
