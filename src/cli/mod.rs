//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Discover tests from compiled artifacts through pluggable engines
#[derive(Parser, Debug)]
#[command(name = "test-collector")]
#[command(version)]
#[command(about = "Discover tests and list them as portable items for a host runner")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to the standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Discover tests in an artifact directory
    Collect(CollectArgs),

    /// List registered engines
    Engines,

    /// Print the JSON schema of test manifests
    Schema,

    /// Manage configuration
    Config(ConfigArgs),
}

/// Arguments for collect command
#[derive(Parser, Debug)]
pub struct CollectArgs {
    /// Directory containing compiled test artifacts
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Engine allowed to take part in discovery (repeatable, default: all)
    #[arg(short, long = "engine")]
    pub engines: Vec<String>,

    /// Extra search path entry (repeatable)
    #[arg(short, long = "search-path")]
    pub search_path: Vec<PathBuf>,

    /// Output format (plain, json, json-pretty, yaml, csv)
    #[arg(short, long)]
    pub format: Option<String>,
}

/// Arguments for config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write an example configuration file
    Init {
        /// Output path
        #[arg(default_value = "./test-collector.yaml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the effective configuration
    Show {
        /// Show environment variables instead
        #[arg(long)]
        env: bool,

        /// Output format (yaml, json)
        #[arg(short, long, default_value = "yaml")]
        format: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_collect() {
        let args = Args::parse_from([
            "test-collector",
            "collect",
            "--dir",
            "target/test-classes",
            "-e",
            "junit-jupiter",
            "-e",
            "junit-vintage",
            "--search-path",
            "lib",
            "--format",
            "json",
        ]);

        let Command::Collect(collect) = args.command else {
            panic!("expected collect command");
        };
        assert_eq!(collect.dir, Some(PathBuf::from("target/test-classes")));
        assert_eq!(collect.engines, vec!["junit-jupiter", "junit-vintage"]);
        assert_eq!(collect.search_path, vec![PathBuf::from("lib")]);
        assert_eq!(collect.format.as_deref(), Some("json"));
    }

    #[test]
    fn test_global_flags() {
        let args = Args::parse_from(["test-collector", "engines", "--verbose", "--config", "c.yaml"]);
        assert!(args.verbose);
        assert_eq!(args.config, Some(PathBuf::from("c.yaml")));
        assert!(matches!(args.command, Command::Engines));
    }

    #[test]
    fn test_config_init_default_path() {
        let args = Args::parse_from(["test-collector", "config", "init"]);
        let Command::Config(ConfigArgs {
            action: ConfigAction::Init { output, force },
        }) = args.command
        else {
            panic!("expected config init");
        };
        assert_eq!(output, PathBuf::from("./test-collector.yaml"));
        assert!(!force);
    }
}
