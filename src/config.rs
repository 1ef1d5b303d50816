use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::{AppError, AppResult};
use crate::security::InputValidator;

pub const DEFAULT_UPLOAD_BASE_URL: &str = "https://upload.uploadcare.com";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub public_key: String,
    pub upload_base_url: String,
    pub poll_interval_ms: u64,
    /// `None` polls until the job reaches a terminal status.
    pub max_poll_attempts: Option<u32>,
    pub poll_timeout_secs: Option<u64>,
    pub request_timeout_secs: u64,
    pub log_level: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            public_key: String::new(),
            upload_base_url: DEFAULT_UPLOAD_BASE_URL.to_string(),
            poll_interval_ms: 500,
            max_poll_attempts: None,
            poll_timeout_secs: None,
            request_timeout_secs: 120,
            log_level: "info".to_string(),
        }
    }
}

impl UploadConfig {
    pub fn new(public_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.upload_base_url = base_url.into();
        self
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn poll_timeout(&self) -> Option<Duration> {
        self.poll_timeout_secs.map(Duration::from_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Default location: `<config dir>/remote-upload/config.json`.
pub fn config_path() -> AppResult<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| AppError::Config("Could not find config directory".to_string()))?
        .join("remote-upload");

    Ok(config_dir.join("config.json"))
}

pub fn load_config() -> AppResult<UploadConfig> {
    load_config_from(&config_path()?)
}

/// Missing file means defaults. A file that does not parse is reported and
/// replaced by defaults rather than failing startup.
pub fn load_config_from(path: &Path) -> AppResult<UploadConfig> {
    if !path.exists() {
        log::debug!("No config at {}, using defaults", path.display());
        return Ok(UploadConfig::default());
    }

    let config_str = fs::read_to_string(path)?;
    let config = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        log::warn!(
            "Failed to parse config file {}: {}. Using defaults.",
            path.display(),
            e
        );
        UploadConfig::default()
    });

    Ok(config)
}

pub fn save_config_to(path: &Path, config: &UploadConfig) -> AppResult<()> {
    validate_config(config)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    // Keep the previous file around
    if path.exists() {
        let backup_path = path.with_extension("json.bak");
        if let Err(e) = fs::copy(path, &backup_path) {
            log::warn!("Failed to create config backup: {}", e);
        }
    }

    let config_str = serde_json::to_string_pretty(config)?;
    fs::write(path, config_str)?;

    log::info!("Configuration saved to {}", path.display());
    Ok(())
}

pub fn validate_config(config: &UploadConfig) -> AppResult<()> {
    if config.public_key.trim().is_empty() {
        return Err(AppError::validation("public_key", "Public key cannot be empty"));
    }

    if InputValidator::validate_source_url(&config.upload_base_url).is_err() {
        return Err(AppError::validation(
            "upload_base_url",
            "Must be an absolute http or https URL",
        ));
    }

    if config.poll_interval_ms == 0 {
        return Err(AppError::validation("poll_interval_ms", "Must be at least 1ms"));
    }

    if config.max_poll_attempts == Some(0) {
        return Err(AppError::validation("max_poll_attempts", "Must be at least 1"));
    }

    if config.poll_timeout_secs == Some(0) {
        return Err(AppError::validation("poll_timeout_secs", "Must be greater than 0"));
    }

    if config.request_timeout_secs == 0 {
        return Err(AppError::validation(
            "request_timeout_secs",
            "Must be greater than 0",
        ));
    }

    let valid_log_levels = ["error", "warn", "info", "debug", "trace", "off"];
    if !valid_log_levels.contains(&config.log_level.as_str()) {
        return Err(AppError::validation("log_level", "Must be a valid log level"));
    }

    Ok(())
}
