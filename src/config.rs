use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{IoResultExt, Result};

/// verifier settings stored in a toml file
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// hashing threads, 0 for one per cpu
    pub threads: usize,
    /// skip dot files when checking the payload tree
    pub ignore_hidden_files: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threads: 0,
            ignore_hidden_files: true,
        }
    }
}

impl Config {
    /// load config from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).with_path(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).with_path(path)?;
        Ok(())
    }
}
