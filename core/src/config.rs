//! Runtime Configuration
//!
//! Loads configuration from environment variables.

use anyhow::{ensure, Result};
use std::env;

/// Core configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Public base URL used when building item links (e.g., "https://aula.example.org")
    pub base_url: String,

    /// Keep a module completed for users who finished it under an older
    /// definition, even when recomputation would regress it (default: false)
    pub grandfather_completions: bool,

    /// Enable the advisory per-user progress cache (default: true)
    pub progress_cache: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let base_url = env::var("AULA_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8080".into())
            .trim_end_matches('/')
            .to_string();
        ensure!(
            base_url.starts_with("http://") || base_url.starts_with("https://"),
            "AULA_BASE_URL must be an http(s) URL, got '{base_url}'"
        );

        Ok(Self {
            base_url,
            grandfather_completions: env::var("AULA_GRANDFATHER_COMPLETIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            progress_cache: env::var("AULA_PROGRESS_CACHE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        })
    }

    /// Create a default configuration for testing.
    #[must_use]
    pub fn default_for_test() -> Self {
        Self {
            base_url: "http://www.example.com".into(),
            grandfather_completions: false,
            progress_cache: true,
        }
    }
}
