//! Configuration loading
//!
//! Settings come from three places, highest priority first: command-line
//! flags (and their environment variables), `.gitea-admin.toml`, built-in
//! defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::Deserialize;

use crate::paginate::{exceeds_server_limit, DEFAULT_PAGE_SIZE, SERVER_MAX_PAGE_SIZE};

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = ".gitea-admin.toml";

/// API base URL used when none is configured
pub const DEFAULT_API_URL: &str = "https://code.frickelbude.ch/api/v1";

/// Token file used when none is configured
pub const DEFAULT_TOKEN_FILE: &str = ".token";

/// Find a config file by walking up the directory tree, then checking global config.
///
/// Search order:
/// 1. Current directory and parent directories (walking up to root)
/// 2. Global config at ~/.config/gitea-admin/
fn find_config_file(filename: &str) -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let candidate = current.join(filename);
        if candidate.exists() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => break,
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let global_path = config_dir.join("gitea-admin").join(filename);
        if global_path.exists() {
            return Some(global_path);
        }
    }

    None
}

/// Top-level file configuration (from .gitea-admin.toml)
#[derive(Debug, Default, Deserialize)]
pub struct AdminFileConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub report: ReportSection,
}

/// Server connection section
#[derive(Debug, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_token_file")]
    pub token_file: PathBuf,
}

/// Report and listing section
#[derive(Debug, Deserialize)]
pub struct ReportSection {
    /// IANA time zone name used for timestamps in reports
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_token_file() -> PathBuf {
    PathBuf::from(DEFAULT_TOKEN_FILE)
}

fn default_timezone() -> String {
    "Europe/Zurich".to_string()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token_file: default_token_file(),
        }
    }
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            page_size: default_page_size(),
        }
    }
}

impl AdminFileConfig {
    /// Load config from .gitea-admin.toml, falling back to defaults
    pub fn load() -> Result<Self> {
        if let Some(config_path) = find_config_file(CONFIG_FILE_NAME) {
            tracing::debug!("Loading config from: {}", config_path.display());
            return Self::load_from_path(&config_path);
        }

        tracing::debug!("No {} found, using defaults", CONFIG_FILE_NAME);
        Ok(Self::default())
    }

    /// Load from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: AdminFileConfig =
            toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }
}

/// Settings given on the command line; `None` means "not given"
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub api_url: Option<String>,
    pub token_file: Option<PathBuf>,
    pub page_size: Option<usize>,
    pub timezone: Option<String>,
}

/// Fully resolved configuration, built once per invocation
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub api_url: String,
    pub token_file: PathBuf,
    pub page_size: usize,
    pub timezone: Tz,
}

impl AdminConfig {
    /// Resolve with priority: CLI/env > config file > defaults
    pub fn resolve(overrides: CliOverrides, file: AdminFileConfig) -> Result<Self> {
        let timezone_name = overrides.timezone.unwrap_or(file.report.timezone);
        let timezone: Tz = timezone_name
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid time zone {:?}: {}", timezone_name, e))?;

        let page_size = overrides.page_size.unwrap_or(file.report.page_size).max(1);
        if exceeds_server_limit(page_size) {
            tracing::warn!(
                page_size,
                server_default = SERVER_MAX_PAGE_SIZE,
                "page size is above Gitea's default response cap; lists may be cut short"
            );
        }

        Ok(Self {
            api_url: overrides.api_url.unwrap_or(file.server.api_url),
            token_file: overrides.token_file.unwrap_or(file.server.token_file),
            page_size,
            timezone,
        })
    }
}
