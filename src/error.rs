//! Error types
//!
//! Typed errors for the discovery pipeline and the engines behind it.

use std::path::PathBuf;
use thiserror::Error;

/// Engine id that must not participate in discovery directly.
pub const INCOMPATIBLE_ENGINE_ID: &str = "cucumber";

/// Errors raised by the collector
#[derive(Error, Debug)]
pub enum CollectorError {
    #[error(
        "The core engine, {engine_id}, was found during discovery. \
         Hint: try configuring the engine as a delegate of the junit-platform-suite-engine instead."
    )]
    IncompatibleEngine { engine_id: String },

    #[error("No artifact directory configured")]
    MissingArtifactDirectory,

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl CollectorError {
    /// Engine id carried by an incompatible-engine error
    pub fn engine_id(&self) -> Option<&str> {
        match self {
            CollectorError::IncompatibleEngine { engine_id } => Some(engine_id),
            _ => None,
        }
    }
}

/// Errors raised by discovery engines and the launcher
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid test manifest {path}: {message}")]
    Manifest { path: PathBuf, message: String },

    #[error("Cannot resolve include '{include}' referenced by {path}")]
    UnresolvedInclude { path: PathBuf, include: String },

    #[error("Engine '{0}' is already registered")]
    DuplicateEngine(String),

    #[error("Engine '{engine_id}' failed during discovery: {message}")]
    Failed { engine_id: String, message: String },

    #[error("Engine '{engine_id}' returned root {actual}, expected {expected}")]
    RootMismatch {
        engine_id: String,
        expected: String,
        actual: String,
    },
}

impl EngineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EngineError::Io {
            path: path.into(),
            source,
        }
    }
}
