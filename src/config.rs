#![allow(missing_docs)]

use crate::defaults;
use crate::error::{MoralisError, Result};
use crate::runtime::RuntimeSettings;
use serde::{Deserialize, Serialize};

pub const API_KEY_SETTING: &str = "MORALIS_API_KEY";
pub const BASE_URL_SETTING: &str = "MORALIS_BASE_URL";
pub const TIMEOUT_SETTING: &str = "MORALIS_TIMEOUT_SECS";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoralisConfig {
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    defaults::SOLANA_GATEWAY_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    defaults::TIMEOUT_SECS
}

/// Settings first, then the process environment.
fn lookup(settings: &dyn RuntimeSettings, key: &str) -> Option<String> {
    settings
        .get_setting(key)
        .or_else(|| std::env::var(key).ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl MoralisConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_settings(&std::collections::HashMap::<String, String>::new())
    }

    /// Resolve configuration from runtime settings with environment fallback.
    ///
    /// Every problem is collected and reported in a single error.
    pub fn from_settings(settings: &dyn RuntimeSettings) -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut problems = Vec::new();

        let api_key = lookup(settings, API_KEY_SETTING).unwrap_or_default();

        let base_url = lookup(settings, BASE_URL_SETTING).unwrap_or_else(default_base_url);

        let timeout_secs = match lookup(settings, TIMEOUT_SETTING) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) => secs,
                Err(_) => {
                    problems.push(format!("{TIMEOUT_SETTING} must be a whole number of seconds"));
                    default_timeout_secs()
                }
            },
            None => default_timeout_secs(),
        };

        let config = Self {
            api_key,
            base_url,
            timeout_secs,
        };

        problems.extend(config.problems());
        if problems.is_empty() {
            Ok(config)
        } else {
            Err(MoralisError::config(problems.join("; ")))
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.api_key.trim().is_empty() {
            problems.push(format!("{API_KEY_SETTING} is required"));
        }

        let base_url = self.base_url.trim();
        if base_url.is_empty() {
            problems.push(format!("{BASE_URL_SETTING} cannot be empty"));
        } else if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            problems.push(format!("{BASE_URL_SETTING} must be an http(s) URL"));
        }

        if self.timeout_secs == 0 {
            problems.push(format!("{TIMEOUT_SETTING} must be greater than zero"));
        }

        problems
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        let problems = self.problems();
        if problems.is_empty() {
            Ok(())
        } else {
            Err(MoralisError::config(problems.join("; ")))
        }
    }

    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
