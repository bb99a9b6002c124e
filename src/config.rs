use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::Cli;
use crate::constants::{
    CHECK_TIMEOUT_SECS, DEFAULT_PAGES, MANIFEST_PATH, OG_IMAGE_PATH, PAGE_TIMEOUT_SECS,
    ScoringWeights, Thresholds,
};
use crate::crawler::CrawlerConfig;

/// Configuration file structure that mirrors CLI arguments
/// All fields are optional to allow partial configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Output format: text or json
    pub output: Option<String>,

    /// Save report to file
    pub save: Option<String>,

    /// Verbose output
    pub verbose: Option<bool>,

    /// Page paths to audit
    pub pages: Option<Vec<String>>,

    /// Per-page fetch timeout in seconds
    pub page_timeout: Option<u64>,

    /// Site-level check timeout in seconds
    pub check_timeout: Option<u64>,

    /// Path of the social preview image
    pub og_image_path: Option<String>,

    /// Path of the web app manifest
    pub manifest_path: Option<String>,

    pub thresholds: Option<Thresholds>,

    pub weights: Option<ScoringWeights>,
}

/// Configuration file format based on file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
    Yaml,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                "toml" => Some(ConfigFormat::Toml),
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                _ => None,
            })
    }

    /// Get file extensions for this format
    pub fn extensions(&self) -> &[&str] {
        match self {
            ConfigFormat::Json => &["json"],
            ConfigFormat::Toml => &["toml"],
            ConfigFormat::Yaml => &["yaml", "yml"],
        }
    }
}

/// Everything one audit run needs, after CLI and file values are merged.
#[derive(Debug, Clone)]
pub struct AuditSettings {
    pub crawler: CrawlerConfig,
    pub thresholds: Thresholds,
    pub weights: ScoringWeights,
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let format = ConfigFormat::from_path(path)
            .with_context(|| format!("Unsupported config file format: {}", path.display()))?;

        let config = match format {
            ConfigFormat::Json => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?,
            ConfigFormat::Toml => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?,
            ConfigFormat::Yaml => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?,
        };

        Ok(config)
    }

    /// Get the default configuration file paths to check (in order of priority)
    /// Returns paths in order: current directory, user config directory
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        for format in &[ConfigFormat::Json, ConfigFormat::Toml, ConfigFormat::Yaml] {
            for ext in format.extensions() {
                paths.push(PathBuf::from(format!("seo-audit.{}", ext)));
            }
        }

        // Use XDG_CONFIG_HOME if set, otherwise fall back to ~/.config
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")));

        if let Some(config_home) = config_home {
            let app_dir = config_home.join("seo-audit");
            for format in &[ConfigFormat::Json, ConfigFormat::Toml, ConfigFormat::Yaml] {
                for ext in format.extensions() {
                    paths.push(app_dir.join(format!("config.{}", ext)));
                }
            }
        }

        paths
    }

    /// Try to load configuration from default paths
    /// Returns the first configuration file found, or None if no config exists
    pub fn from_default_paths() -> Result<Option<Self>> {
        for path in Self::default_paths() {
            if path.exists() {
                tracing::debug!(path = %path.display(), "Loading config file");
                return Ok(Some(Self::from_file(&path)?));
            }
        }
        Ok(None)
    }

    /// Merge this configuration with CLI arguments
    /// CLI arguments take precedence over config file values
    pub fn merge_with_cli(&self, cli: &Cli) -> Cli {
        Cli {
            url: cli.url.clone(),
            output: if cli.output != "text" {
                cli.output.clone()
            } else {
                self.output.clone().unwrap_or_else(|| cli.output.clone())
            },
            save: cli.save.clone().or_else(|| self.save.clone()),
            verbose: if cli.verbose {
                cli.verbose
            } else {
                self.verbose.unwrap_or(cli.verbose)
            },
            pages: if !cli.pages.is_empty() {
                cli.pages.clone()
            } else {
                self.pages.clone().unwrap_or_default()
            },
            page_timeout: if cli.page_timeout != PAGE_TIMEOUT_SECS {
                cli.page_timeout
            } else {
                self.page_timeout.unwrap_or(cli.page_timeout)
            },
            check_timeout: if cli.check_timeout != CHECK_TIMEOUT_SECS {
                cli.check_timeout
            } else {
                self.check_timeout.unwrap_or(cli.check_timeout)
            },
            config: cli.config.clone(),
        }
    }

    /// Builds run settings from merged CLI arguments plus file-only values
    pub fn audit_settings(&self, cli: &Cli) -> Result<AuditSettings> {
        let weights = self.weights.unwrap_or_default();
        weights.validate()?;

        let pages = if cli.pages.is_empty() {
            DEFAULT_PAGES.iter().map(|p| p.to_string()).collect()
        } else {
            cli.pages.iter().map(|p| normalize_path(p)).collect()
        };

        Ok(AuditSettings {
            crawler: CrawlerConfig {
                site_url: cli.url.clone(),
                pages,
                page_timeout: Duration::from_secs(cli.page_timeout),
                check_timeout: Duration::from_secs(cli.check_timeout),
                og_image_path: normalize_path(
                    self.og_image_path.as_deref().unwrap_or(OG_IMAGE_PATH),
                ),
                manifest_path: normalize_path(
                    self.manifest_path.as_deref().unwrap_or(MANIFEST_PATH),
                ),
            },
            thresholds: self.thresholds.unwrap_or_default(),
            weights,
        })
    }
}

fn normalize_path(path: &str) -> String {
    let path = path.trim();
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}
