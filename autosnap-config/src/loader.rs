use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::debug;

use crate::config::AppConfig;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "AUTOSNAP_CONFIG";

/// Finds and reads `autosnap.yaml`.
///
/// Lookup order:
/// 1. The path given on the command line.
/// 2. `$AUTOSNAP_CONFIG`.
/// 3. `./autosnap.yaml`.
/// 4. `<user config dir>/pve-autosnap/config.yaml`.
/// 5. `/etc/pve-autosnap/config.yaml`.
///
/// An explicitly named file (1 or 2) must exist. When none of 3-5 exist the
/// built-in defaults are used.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    explicit: Option<PathBuf>,
    search_paths: Vec<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ConfigLoader {
    pub fn new(explicit: Option<PathBuf>) -> Self {
        Self {
            explicit,
            search_paths: default_search_paths(),
        }
    }

    /// Replace the implicit search locations.
    pub fn with_search_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.search_paths = paths;
        self
    }

    /// Path of the config file that [`load`](Self::load) would read.
    pub fn resolve(&self) -> Result<Option<PathBuf>> {
        let named = self.explicit.clone().or_else(|| {
            std::env::var_os(CONFIG_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        });
        if let Some(path) = named {
            if !path.is_file() {
                bail!("Config file not found: {}", path.display());
            }
            return Ok(Some(path));
        }

        Ok(self.search_paths.iter().find(|p| p.is_file()).cloned())
    }

    pub fn load(&self) -> Result<AppConfig> {
        match self.resolve()? {
            Some(path) => {
                debug!("Loading config from: {}", path.display());
                Self::load_file(&path)
            }
            None => {
                debug!("No config file found, using defaults");
                Ok(AppConfig::default())
            }
        }
    }

    /// Read and parse one file. Empty or comment-only files give the defaults.
    pub fn load_file(path: &Path) -> Result<AppConfig> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file at {}", path.display()))?;

        let mut config = Self::parse(&contents)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    pub fn parse(contents: &str) -> Result<AppConfig> {
        let value: serde_yaml_ng::Value = serde_yaml_ng::from_str(contents)?;
        if value.is_null() {
            return Ok(AppConfig::default());
        }
        Ok(serde_yaml_ng::from_value(value)?)
    }
}

fn default_search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("autosnap.yaml")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("pve-autosnap").join("config.yaml"));
    }
    paths.push(PathBuf::from("/etc/pve-autosnap/config.yaml"));
    paths
}
