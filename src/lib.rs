//! Test Collector - test discovery adapter for host test runners
//!
//! Discovers test containers through pluggable discovery engines and maps the
//! resulting plan to portable items a host runner can schedule.
//!
//! ## Pipeline
//!
//! 1. [`config::CollectorConfig`] names the artifact directory, the base
//!    execution context and extra search path entries
//! 2. [`collector::TestCollector::collect_tests`] installs an isolated
//!    execution context for the run
//! 3. A [`engine::DiscoveryRequest`] selects the artifact directory and
//!    optionally filters engines
//! 4. The [`engine::Launcher`] asks every participating engine for its tree
//!    and assembles a [`engine::TestPlan`]
//! 5. Roots are checked for incompatible engines and their direct children
//!    are mapped to [`models::Item`]s
//!
//! ```no_run
//! use test_collector::collector::TestCollector;
//! use test_collector::config::CollectorConfig;
//! use test_collector::engine::{Launcher, ManifestEngine};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CollectorConfig::builder()
//!     .artifact_directory("target/test-classes")
//!     .build()?;
//! let launcher = Launcher::new().with_engine(ManifestEngine::new("junit-jupiter"))?;
//!
//! let result = TestCollector::new(config, launcher).collect_tests(&["junit-jupiter"])?;
//! for item in result.items() {
//!     println!("{}", item.fully_qualified_name());
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod collector;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod models;
pub mod output;
pub mod utils;

pub use collector::TestCollector;
pub use error::{CollectorError, EngineError};
pub use models::{DiscoveryResult, Item};
