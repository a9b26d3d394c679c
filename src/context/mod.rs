//! Execution context management
//!
//! Engines resolve artifacts through the ambient execution context of the
//! current thread. The collector swaps in an isolated context for the
//! duration of a discovery run and restores the previous one afterwards.

mod scope;

pub use scope::{current, with_context, ContextScope};

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Name of the root context every thread starts with
pub const SYSTEM_CONTEXT: &str = "system";

/// Resolution context consulted by engines during discovery
#[derive(Debug, PartialEq, Eq)]
pub struct ExecutionContext {
    name: String,
    search_path: Vec<PathBuf>,
    parent: Option<Arc<ExecutionContext>>,
}

impl ExecutionContext {
    /// Create a root context without a parent
    pub fn new(name: impl Into<String>, search_path: Vec<PathBuf>) -> Self {
        Self {
            name: name.into(),
            search_path,
            parent: None,
        }
    }

    /// The root context with an empty search path
    pub fn system() -> Arc<ExecutionContext> {
        Arc::new(Self::new(SYSTEM_CONTEXT, Vec::new()))
    }

    /// Create a context layering `search_path` over `parent`
    pub fn child(parent: Arc<ExecutionContext>, search_path: Vec<PathBuf>) -> Arc<ExecutionContext> {
        Arc::new(Self {
            name: format!("{}/discovery", parent.name),
            search_path,
            parent: Some(parent),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Search path entries owned by this context
    pub fn search_path(&self) -> &[PathBuf] {
        &self.search_path
    }

    pub fn parent(&self) -> Option<&Arc<ExecutionContext>> {
        self.parent.as_ref()
    }

    /// All entries visible from this context, parents first
    pub fn search_path_chain(&self) -> Vec<&Path> {
        let mut chain = self
            .parent
            .as_ref()
            .map(|p| p.search_path_chain())
            .unwrap_or_default();
        chain.extend(self.search_path.iter().map(PathBuf::as_path));
        chain
    }

    /// Resolve a relative location against the visible search path.
    ///
    /// Parents are consulted before this context's own entries; the first
    /// existing file wins. Absolute locations are returned when they name a file.
    pub fn resolve(&self, location: impl AsRef<Path>) -> Option<PathBuf> {
        let location = location.as_ref();
        if location.is_absolute() {
            return location.is_file().then(|| location.to_path_buf());
        }

        self.search_path_chain()
            .into_iter()
            .map(|entry| entry.join(location))
            .find(|candidate| candidate.is_file())
    }
}

impl fmt::Display for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} entries)", self.name, self.search_path_chain().len())
    }
}
