//! Shared utilities

mod logger;
mod timer;

pub use logger::{init_logger, LogLevel};
pub use timer::PhaseTimer;
