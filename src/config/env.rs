//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;
use std::path::PathBuf;

/// Environment variable prefix
const ENV_PREFIX: &str = "TEST_COLLECTOR";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Artifact directory from TEST_COLLECTOR_DIR
    pub artifact_directory: Option<PathBuf>,
    /// Engine allow-list from TEST_COLLECTOR_ENGINES (comma separated)
    pub include_engines: Option<Vec<String>>,
    /// Search path from TEST_COLLECTOR_SEARCH_PATH (platform path list)
    pub search_path: Option<Vec<PathBuf>>,
    /// Output format from TEST_COLLECTOR_FORMAT
    pub format: Option<String>,
    /// Config file from TEST_COLLECTOR_CONFIG
    pub config_file: Option<PathBuf>,
    /// Verbose from TEST_COLLECTOR_VERBOSE
    pub verbose: Option<bool>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            artifact_directory: get_env("DIR").map(PathBuf::from),
            include_engines: get_env("ENGINES").map(|v| split_list(&v)),
            search_path: env::var_os(format!("{ENV_PREFIX}_SEARCH_PATH"))
                .map(|v| env::split_paths(&v).collect()),
            format: get_env("FORMAT"),
            config_file: get_env("CONFIG").map(PathBuf::from),
            verbose: get_env_bool("VERBOSE"),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.artifact_directory.is_some()
            || self.include_engines.is_some()
            || self.search_path.is_some()
            || self.format.is_some()
            || self.config_file.is_some()
            || self.verbose.is_some()
    }
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}")).ok()
}

/// Get environment variable as boolean
fn get_env_bool(name: &str) -> Option<bool> {
    get_env(name).map(|v| {
        matches!(
            v.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on" | "enabled"
        )
    })
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Builder for setting environment variables (useful for testing)
#[derive(Default)]
pub struct EnvBuilder {
    vars: Vec<(String, String)>,
}

impl EnvBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn artifact_directory(mut self, dir: impl Into<String>) -> Self {
        self.vars.push((format!("{ENV_PREFIX}_DIR"), dir.into()));
        self
    }

    pub fn engines(mut self, engines: &[&str]) -> Self {
        self.vars.push((format!("{ENV_PREFIX}_ENGINES"), engines.join(",")));
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.vars.push((format!("{ENV_PREFIX}_FORMAT"), format.into()));
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.vars.push((format!("{ENV_PREFIX}_VERBOSE"), verbose.to_string()));
        self
    }

    /// Apply environment variables
    pub fn apply(self) {
        for (key, value) in self.vars {
            env::set_var(key, value);
        }
    }

    /// Apply and return guard that restores on drop
    pub fn apply_scoped(self) -> EnvGuard {
        let previous: Vec<_> = self
            .vars
            .iter()
            .map(|(k, _)| (k.clone(), env::var(k).ok()))
            .collect();

        self.apply();

        EnvGuard { previous }
    }
}

/// Guard that restores environment variables on drop
pub struct EnvGuard {
    previous: Vec<(String, Option<String>)>,
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.previous {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
    }
}

/// Print all TEST_COLLECTOR environment variables
pub fn print_env_help() {
    println!("Environment Variables:");
    println!();
    println!("  {ENV_PREFIX}_DIR          Directory containing compiled test artifacts");
    println!("  {ENV_PREFIX}_ENGINES      Comma separated engine allow-list");
    println!("  {ENV_PREFIX}_SEARCH_PATH  Extra search path entries (platform path list)");
    println!("  {ENV_PREFIX}_FORMAT       Output format (plain, json, json-pretty, yaml, csv)");
    println!("  {ENV_PREFIX}_CONFIG       Path to configuration file");
    println!("  {ENV_PREFIX}_VERBOSE      Enable debug logging (true/false)");
}
