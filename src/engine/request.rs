//! Discovery request and builder

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// What an engine should search
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiscoverySelector {
    /// Search these locations as artifact roots
    ClasspathRoots(BTreeSet<PathBuf>),
    /// Search this directory directly
    Directory(PathBuf),
}

impl DiscoverySelector {
    /// Select artifact roots, deduplicated and normalized to absolute paths
    pub fn classpath_roots<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        DiscoverySelector::ClasspathRoots(roots.into_iter().map(|p| absolute_path(p.as_ref())).collect())
    }

    pub fn directory(path: impl AsRef<Path>) -> Self {
        DiscoverySelector::Directory(absolute_path(path.as_ref()))
    }
}

/// Restricts which engines take part in discovery
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineFilter {
    Include(Vec<String>),
    Exclude(Vec<String>),
}

impl EngineFilter {
    pub fn include_engines<I, S>(engine_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        EngineFilter::Include(engine_ids.into_iter().map(Into::into).collect())
    }

    pub fn exclude_engines<I, S>(engine_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        EngineFilter::Exclude(engine_ids.into_iter().map(Into::into).collect())
    }

    /// Whether an engine with `engine_id` passes this filter
    pub fn matches(&self, engine_id: &str) -> bool {
        match self {
            EngineFilter::Include(ids) => ids.iter().any(|id| id == engine_id),
            EngineFilter::Exclude(ids) => !ids.iter().any(|id| id == engine_id),
        }
    }
}

/// Request handed to the launcher
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiscoveryRequest {
    selectors: Vec<DiscoverySelector>,
    filters: Vec<EngineFilter>,
}

impl DiscoveryRequest {
    pub fn builder() -> DiscoveryRequestBuilder {
        DiscoveryRequestBuilder::default()
    }

    pub fn selectors(&self) -> &[DiscoverySelector] {
        &self.selectors
    }

    pub fn filters(&self) -> &[EngineFilter] {
        &self.filters
    }

    /// Whether every filter lets `engine_id` through
    pub fn engine_included(&self, engine_id: &str) -> bool {
        self.filters.iter().all(|f| f.matches(engine_id))
    }

    /// Every selected directory, each once, in selector order
    pub fn directories(&self) -> Vec<&Path> {
        let mut seen = BTreeSet::new();
        let mut directories = Vec::new();
        for selector in &self.selectors {
            let paths: Vec<&Path> = match selector {
                DiscoverySelector::ClasspathRoots(roots) => roots.iter().map(PathBuf::as_path).collect(),
                DiscoverySelector::Directory(dir) => vec![dir.as_path()],
            };
            for path in paths {
                if seen.insert(path) {
                    directories.push(path);
                }
            }
        }
        directories
    }
}

/// Builder for [`DiscoveryRequest`]
#[derive(Debug, Default)]
pub struct DiscoveryRequestBuilder {
    selectors: Vec<DiscoverySelector>,
    filters: Vec<EngineFilter>,
}

impl DiscoveryRequestBuilder {
    pub fn selector(mut self, selector: DiscoverySelector) -> Self {
        self.selectors.push(selector);
        self
    }

    pub fn selectors(mut self, selectors: impl IntoIterator<Item = DiscoverySelector>) -> Self {
        self.selectors.extend(selectors);
        self
    }

    pub fn filter(mut self, filter: EngineFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn build(self) -> DiscoveryRequest {
        DiscoveryRequest {
            selectors: self.selectors,
            filters: self.filters,
        }
    }
}

/// Make `path` absolute against the working directory without touching the filesystem
pub fn absolute_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
