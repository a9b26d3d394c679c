//! Output formatting module
//!
//! Renders discovered items for the host build tool.

mod formatter;

pub use formatter::{write_report, DiscoveryReport, ItemFormatter, OutputFormat};
