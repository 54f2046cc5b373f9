use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use serde::Deserialize;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".student-records-admin";
/// Optional settings file inside the data directory.
const CONFIG_FILE_NAME: &str = "config.json";
/// Log file written inside the data directory unless configured otherwise.
const LOG_FILE_NAME: &str = "student-records-admin.log";

pub const ENV_API_URL: &str = "STUDENT_ADMIN_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "STUDENT_ADMIN_TIMEOUT_SECS";

/// Runtime settings. Every field has a default so a missing or partial
/// `config.json` is fine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the backend, without the `/api/...` part.
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            request_timeout_secs: 10,
            log_file: None,
        }
    }
}

impl Config {
    /// Read `~/.student-records-admin/config.json` when present, then apply
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let path = data_dir()?.join(CONFIG_FILE_NAME);
        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("invalid config in {}", path.display()))
    }

    /// Apply overrides from `lookup` (the process environment in production).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|url| !url.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            self.request_timeout_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("{ENV_TIMEOUT_SECS} must be a whole number of seconds"))?;
        }
        if self.request_timeout_secs == 0 {
            return Err(anyhow!("request timeout must be at least one second"));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn log_path(&self) -> Result<PathBuf> {
        match &self.log_file {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join(LOG_FILE_NAME)),
        }
    }
}

/// Resolve the application data directory inside the user's home.
fn data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}
