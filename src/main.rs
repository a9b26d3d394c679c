//! Test Collector CLI
//!
//! Discovers tests in a directory of compiled test artifacts and prints them
//! as portable items.
//!
//! ## Usage
//!
//! ```bash
//! # Discover with every registered engine
//! test-collector collect --dir target/test-classes
//!
//! # Restrict discovery to one engine and emit JSON
//! test-collector collect --dir target/test-classes -e junit-jupiter --format json
//!
//! # Print the manifest schema
//! test-collector schema
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use tracing::{debug, info};

use test_collector::cli::{self, Args};
use test_collector::config::{print_env_help, AppConfig, CollectorConfig, ConfigFile, EnvConfig};
use test_collector::engine::{Launcher, ManifestEngine};
use test_collector::engine::manifest::TestManifest;
use test_collector::output::{write_report, DiscoveryReport, ItemFormatter, OutputFormat};
use test_collector::utils::{init_logger, LogLevel};
use test_collector::TestCollector;

fn main() -> Result<()> {
    let args = Args::parse();
    let env = EnvConfig::load();

    init_logger(LogLevel::for_verbosity(args.verbose || env.verbose.unwrap_or(false)));

    match args.command {
        cli::Command::Collect(collect_args) => {
            let app = load_app_config(args.config.as_ref(), &env)?;
            collect(collect_args, app)?;
        }
        cli::Command::Engines => {
            let app = load_app_config(args.config.as_ref(), &env)?;
            let launcher = build_launcher(&app)?;
            for id in launcher.engine_ids() {
                println!("{id}");
            }
        }
        cli::Command::Schema => {
            let schema = serde_json::to_string_pretty(&TestManifest::json_schema())?;
            println!("{schema}");
        }
        cli::Command::Config(config_args) => {
            manage_config(config_args, args.config.as_ref(), &env)?;
        }
    }

    Ok(())
}

fn load_app_config(path: Option<&std::path::PathBuf>, env: &EnvConfig) -> Result<AppConfig> {
    let file = match path.or(env.config_file.as_ref()) {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::load_default()?,
    };

    let mut app = file.app;
    app.apply_env(env);
    Ok(app)
}

fn build_launcher(app: &AppConfig) -> Result<Launcher> {
    let mut launcher = Launcher::new();
    for id in &app.engines {
        launcher
            .register(Box::new(ManifestEngine::new(id)))
            .with_context(|| format!("Failed to register engine {id}"))?;
    }
    Ok(launcher)
}

fn collect(args: cli::CollectArgs, app: AppConfig) -> Result<()> {
    let artifact_directory = args
        .dir
        .or_else(|| app.artifact_directory.clone())
        .context("No artifact directory given. Use --dir or set TEST_COLLECTOR_DIR.")?;

    let engines = if args.engines.is_empty() {
        app.include_engines.clone()
    } else {
        args.engines
    };

    let search_path = if args.search_path.is_empty() {
        app.search_path.clone()
    } else {
        args.search_path
    };

    let format_name = args.format.unwrap_or_else(|| app.format.clone());
    let format = OutputFormat::from_str(&format_name)
        .ok_or_else(|| anyhow::anyhow!("Unknown output format: {format_name}"))?;

    let config = CollectorConfig::builder()
        .search_path_entries(search_path)
        .artifact_directory(&artifact_directory)
        .build()?;

    let launcher = build_launcher(&app)?;
    debug!("Registered engines: {:?}", launcher.engine_ids());
    info!(
        "Collecting tests in {} (engines: {})",
        artifact_directory.display(),
        if engines.is_empty() {
            "all".to_string()
        } else {
            engines.join(", ")
        }
    );

    let collector = TestCollector::new(config, launcher);
    let result = collector
        .collect_tests(engines.as_slice())
        .with_context(|| format!("Test discovery failed in {}", artifact_directory.display()))?;

    let report = DiscoveryReport::new(&artifact_directory, &engines, &result);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, &ItemFormatter::new(format), &report)?;
    out.flush()?;

    Ok(())
}

fn manage_config(args: cli::ConfigArgs, path: Option<&std::path::PathBuf>, env: &EnvConfig) -> Result<()> {
    match args.action {
        cli::ConfigAction::Init { output, force } => {
            if output.exists() && !force {
                anyhow::bail!(
                    "Configuration file already exists: {}. Use --force to overwrite.",
                    output.display()
                );
            }

            ConfigFile::example().save(&output)?;
            println!("✓ Configuration file created: {}", output.display());
        }

        cli::ConfigAction::Show { env: show_env, format } => {
            if show_env {
                print_env_help();
                println!();
                println!("{env:#?}");
            } else {
                let config = ConfigFile {
                    app: load_app_config(path, env)?,
                    ..ConfigFile::default()
                };
                let output = if format == "json" {
                    serde_json::to_string_pretty(&config)?
                } else {
                    serde_yaml::to_string(&config)?
                };
                println!("{output}");
            }
        }
    }

    Ok(())
}
