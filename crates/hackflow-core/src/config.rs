//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the Authentication Service URL, the last email used to
//! log in, and the confirmation redirect delays.
//!
//! Configuration is stored at `~/.config/hackflow/config.json`. The
//! `HACKFLOW_API_URL` and `HACKFLOW_EMAIL` environment variables take
//! precedence over the file.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::DEFAULT_API_BASE_URL;
use crate::auth::RedirectDelays;

/// Application name used for config/data directory paths
const APP_NAME: &str = "hackflow";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the Authentication Service URL
pub const API_URL_ENV: &str = "HACKFLOW_API_URL";

/// Environment variable pre-filling the login email
pub const EMAIL_ENV: &str = "HACKFLOW_EMAIL";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub last_email: Option<String>,
    pub login_redirect_ms: Option<u64>,
    pub register_redirect_ms: Option<u64>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the stored session and log files
    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|dir| dir.join(APP_NAME))
            .unwrap_or_else(|| PathBuf::from(format!(".{}", APP_NAME)))
    }

    /// Authentication Service URL: environment, then config, then default
    pub fn api_base_url(&self) -> String {
        Self::non_empty_env(API_URL_ENV)
            .or_else(|| self.api_base_url.clone())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
    }

    /// Email to pre-fill on the login form: environment, then last successful login
    pub fn default_email(&self) -> Option<String> {
        Self::non_empty_env(EMAIL_ENV).or_else(|| self.last_email.clone())
    }

    pub fn redirect_delays(&self) -> RedirectDelays {
        let defaults = RedirectDelays::default();
        RedirectDelays {
            login: self
                .login_redirect_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.login),
            register: self
                .register_redirect_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.register),
        }
    }

    fn non_empty_env(name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|value| !value.trim().is_empty())
    }
}
