//! Configuration file management
//!
//! Handles finding, loading, and validating configuration files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::AppConfig;

/// Configuration file locations (in order of precedence)
const CONFIG_LOCATIONS: &[&str] = &[
    "./test-collector.yaml",
    "./test-collector.yml",
    "./.test-collector.yaml",
    "~/.config/test-collector/config.yaml",
];

/// Full configuration file structure
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Version of config file format
    #[serde(default = "default_version")]
    pub version: String,

    /// Application settings
    #[serde(default)]
    pub app: AppConfig,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            version: default_version(),
            app: AppConfig::default(),
        }
    }
}

impl ConfigFile {
    /// Find configuration file in standard locations
    pub fn find() -> Option<PathBuf> {
        CONFIG_LOCATIONS
            .iter()
            .map(|location| expand_path(location))
            .find(|path| path.exists())
    }

    /// Load configuration from default location
    pub fn load_default() -> Result<Self> {
        match Self::find() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if is_yaml_file(path) {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = if is_yaml_file(path) {
            serde_yaml::to_string(self).context("Failed to serialize config")?
        } else {
            serde_json::to_string_pretty(self).context("Failed to serialize config")?
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !["1.0"].contains(&self.version.as_str()) {
            anyhow::bail!("Unsupported config version: {}", self.version);
        }

        let mut seen = HashSet::new();
        for engine in &self.app.engines {
            if engine.trim().is_empty() {
                anyhow::bail!("Engine ids must not be empty");
            }
            if !seen.insert(engine.as_str()) {
                anyhow::bail!("Engine '{}' is listed more than once", engine);
            }
        }

        Ok(())
    }

    /// Generate example configuration
    pub fn example() -> Self {
        Self {
            version: default_version(),
            app: AppConfig {
                engines: vec![
                    "junit-jupiter".to_string(),
                    "junit-vintage".to_string(),
                    "junit-platform-suite".to_string(),
                ],
                include_engines: vec!["junit-jupiter".to_string()],
                search_path: vec![PathBuf::from("target/dependency")],
                artifact_directory: Some(PathBuf::from("target/test-classes")),
                format: "json-pretty".to_string(),
            },
        }
    }
}

/// Expand ~ in path
fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

/// Check if file is YAML based on extension
fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}
