use anyhow::{Context as _, Result};
use owlset_assistant::AssistantConfig;
use owlset_indexer::ScanConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "owlset.toml";
pub const DATABASE_ENV: &str = "OWLSET_DB";

/// Contents of `owlset.toml`; every field has a default
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: PathBuf,
    pub scan: ScanConfig,
    pub assistant: AssistantConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from("data/owlset.db"),
            scan: ScanConfig::default(),
            assistant: AssistantConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read `explicit` if given (it must exist), else `./owlset.toml` when present,
    /// else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let local = Path::new(DEFAULT_CONFIG_FILE);
                if local.is_file() {
                    Self::from_file(local)
                } else {
                    log::debug!("No {DEFAULT_CONFIG_FILE} found, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::parse(&raw)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// `--db` flag, then `OWLSET_DB`, then the config file
    #[must_use]
    pub fn database_path(&self, flag: Option<&Path>, env: Option<&str>) -> PathBuf {
        if let Some(path) = flag {
            return path.to_path_buf();
        }
        match env {
            Some(value) if !value.trim().is_empty() => PathBuf::from(value),
            _ => self.database.clone(),
        }
    }
}
