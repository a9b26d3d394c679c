//! Configuration module
//!
//! Holds the immutable collector configuration and the application settings
//! loaded from files and the environment.

mod env;
mod file;

pub use env::{print_env_help, EnvBuilder, EnvConfig, EnvGuard};
pub use file::ConfigFile;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

use crate::context::ExecutionContext;
use crate::error::CollectorError;

/// Engine ids registered when nothing else is configured
pub const DEFAULT_ENGINES: &[&str] = &["junit-jupiter", "junit-vintage"];

/// Immutable configuration of a [`crate::collector::TestCollector`]
#[derive(Clone, Debug)]
pub struct CollectorConfig {
    execution_context: Arc<ExecutionContext>,
    search_path: Vec<PathBuf>,
    artifact_directory: PathBuf,
}

impl CollectorConfig {
    pub fn builder() -> CollectorConfigBuilder {
        CollectorConfigBuilder::default()
    }

    /// Base context the discovery context is layered over
    pub fn execution_context(&self) -> &Arc<ExecutionContext> {
        &self.execution_context
    }

    /// Extra search path entries made visible during discovery
    pub fn search_path(&self) -> &[PathBuf] {
        &self.search_path
    }

    /// Directory containing compiled test artifacts
    pub fn artifact_directory(&self) -> &PathBuf {
        &self.artifact_directory
    }
}

/// Builder for [`CollectorConfig`]
#[derive(Debug, Default)]
pub struct CollectorConfigBuilder {
    execution_context: Option<Arc<ExecutionContext>>,
    search_path: Vec<PathBuf>,
    artifact_directory: Option<PathBuf>,
}

impl CollectorConfigBuilder {
    /// Context used as parent of the discovery context
    pub fn execution_context(mut self, context: Arc<ExecutionContext>) -> Self {
        self.execution_context = Some(context);
        self
    }

    /// Search path holding the test artifacts, their dependencies and the engines
    pub fn search_path_entries<I, P>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.search_path = entries.into_iter().map(Into::into).collect();
        self
    }

    /// Directory that should be searched for tests
    pub fn artifact_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifact_directory = Some(dir.into());
        self
    }

    pub fn build(self) -> Result<CollectorConfig, CollectorError> {
        let artifact_directory = self
            .artifact_directory
            .filter(|dir| !dir.as_os_str().is_empty())
            .ok_or(CollectorError::MissingArtifactDirectory)?;

        Ok(CollectorConfig {
            execution_context: self.execution_context.unwrap_or_else(ExecutionContext::system),
            search_path: self.search_path,
            artifact_directory,
        })
    }
}

/// Application settings
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Engines registered with the launcher
    pub engines: Vec<String>,

    /// Engines allowed to take part in discovery (empty means all)
    pub include_engines: Vec<String>,

    /// Extra search path entries
    pub search_path: Vec<PathBuf>,

    /// Default artifact directory
    pub artifact_directory: Option<PathBuf>,

    /// Output format
    pub format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            engines: DEFAULT_ENGINES.iter().map(|e| e.to_string()).collect(),
            include_engines: Vec::new(),
            search_path: Vec::new(),
            artifact_directory: None,
            format: "plain".to_string(),
        }
    }
}

impl AppConfig {
    /// Apply environment overrides on top of these settings
    pub fn apply_env(&mut self, env: &EnvConfig) {
        if let Some(dir) = &env.artifact_directory {
            self.artifact_directory = Some(dir.clone());
        }
        if let Some(engines) = &env.include_engines {
            self.include_engines = engines.clone();
        }
        if let Some(search_path) = &env.search_path {
            self.search_path = search_path.clone();
        }
        if let Some(format) = &env.format {
            self.format = format.clone();
        }
    }
}
