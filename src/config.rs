use std::env;

use crate::error::{InsightError, Result};

pub const DEFAULT_BASE_URL: &str = "https://eu.rest.logs.insight.rapid7.com";

/// Process-wide configuration, read once at startup and passed into the tool
/// layer. No other component touches the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup("RAPID7_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                InsightError::Config(
                    "Environment variable RAPID7_API_KEY is not set. Please set it before running the server."
                        .to_string(),
                )
            })?;
        let base_url = lookup("RAPID7_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}
