use std::path::Path;

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::data::loader::LoadOptions;

/// Environment variable pointing at an optional JSON config file.
pub const CONFIG_ENV: &str = "RUST_QUOTA_CONFIG";

/// Application settings.
///
/// ```json
/// { "preview_rows": 20, "load": { "header": "none", "delimiter": ";" } }
/// ```
/// Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Rows shown in each upload preview.
    pub preview_rows: usize,
    pub load: LoadOptions,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            preview_rows: 10,
            load: LoadOptions::default(),
        }
    }
}

impl AppConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: AppConfig = serde_json::from_str(text).context("parsing config JSON")?;
        ensure!(
            config.load.delimiter.is_ascii(),
            "delimiter {:?} is not an ASCII character",
            config.load.delimiter
        );
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Config from `$RUST_QUOTA_CONFIG`, or the defaults when unset.
    /// A broken config file is logged and replaced by the defaults.
    pub fn from_env() -> Self {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => match Self::from_path(Path::new(&path)) {
                Ok(config) => {
                    log::info!("Using config from {}", Path::new(&path).display());
                    config
                }
                Err(e) => {
                    log::error!("Ignoring config: {e:#}");
                    Self::default()
                }
            },
            None => Self::default(),
        }
    }
}
