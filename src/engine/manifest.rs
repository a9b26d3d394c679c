//! Descriptor manifest engine
//!
//! Discovers test containers from `*.tests.yaml`, `*.tests.yml` and
//! `*.tests.json` manifests placed next to compiled test artifacts.
//!
//! ```yaml
//! engine: junit-jupiter
//! include: [shared.tests.yaml]
//! tests:
//!   - class: com.acme.FooTest
//!   - class: com.acme.Foo
//!     method: bar
//!     parameter_types: java.lang.String
//!   - name: login.feature
//!     kind: file
//! ```
//!
//! Includes are resolved through the ambient execution context first and
//! then relative to the including manifest.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::identifier::{TestDescriptor, TestSource, UniqueId};
use super::request::DiscoveryRequest;
use super::TestEngine;
use crate::context;
use crate::error::EngineError;

/// File name suffixes recognised as manifests
pub const MANIFEST_SUFFIXES: &[&str] = &[".tests.yaml", ".tests.yml", ".tests.json"];

/// Contents of one manifest file
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TestManifest {
    /// Engine the manifest belongs to. Included manifests may omit it.
    #[serde(default)]
    pub engine: Option<String>,

    /// Further manifests to merge, resolved through the execution context
    #[serde(default)]
    pub include: Vec<String>,

    /// Discovered containers
    #[serde(default)]
    pub tests: Vec<ManifestEntry>,
}

/// One discovered unit
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ManifestEntry {
    /// Fully qualified class name
    #[serde(default)]
    pub class: Option<String>,

    /// Method name; requires `class`
    #[serde(default)]
    pub method: Option<String>,

    /// Comma separated parameter types of `method`
    #[serde(default)]
    pub parameter_types: String,

    /// Display name, required when neither class nor method is given
    #[serde(default)]
    pub name: Option<String>,

    /// Source kind for entries that are not classes or methods (file, directory, resource)
    #[serde(default)]
    pub kind: Option<String>,

    #[serde(default)]
    pub children: Vec<ManifestEntry>,
}

impl TestManifest {
    /// Load a manifest, choosing the format by extension
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let content = fs::read_to_string(path).map_err(|e| EngineError::io(path, e))?;

        let parsed = if is_json_file(path) {
            serde_json::from_str(&content).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str(&content).map_err(|e| e.to_string())
        };

        parsed.map_err(|message| EngineError::Manifest {
            path: path.to_path_buf(),
            message,
        })
    }

    /// JSON schema describing the manifest format
    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(TestManifest)
    }
}

/// Engine backed by manifest files
#[derive(Clone, Debug)]
pub struct ManifestEngine {
    id: String,
}

impl ManifestEngine {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    fn accepts(&self, manifest: &TestManifest) -> bool {
        manifest.engine.as_deref() == Some(self.id.as_str())
    }

    fn load_tree(
        &self,
        path: &Path,
        visited: &mut HashSet<PathBuf>,
        entries: &mut Vec<(PathBuf, ManifestEntry)>,
    ) -> Result<(), EngineError> {
        let key = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        if !visited.insert(key) {
            return Ok(());
        }

        let manifest = TestManifest::load(path)?;
        entries.extend(manifest.tests.into_iter().map(|e| (path.to_path_buf(), e)));

        for include in &manifest.include {
            let resolved = resolve_include(path, include).ok_or_else(|| {
                EngineError::UnresolvedInclude {
                    path: path.to_path_buf(),
                    include: include.clone(),
                }
            })?;

            let included = TestManifest::load(&resolved)?;
            if included.engine.as_deref().is_some_and(|e| e != self.id) {
                debug!("Skipping include {} for another engine", resolved.display());
                continue;
            }
            self.load_tree(&resolved, visited, entries)?;
        }

        Ok(())
    }
}

impl TestEngine for ManifestEngine {
    fn id(&self) -> &str {
        &self.id
    }

    fn discover(&self, request: &DiscoveryRequest, root: UniqueId) -> Result<TestDescriptor, EngineError> {
        let mut files = BTreeSet::new();
        for dir in request.directories() {
            collect_manifest_files(dir, &mut files)?;
        }

        let mut visited = HashSet::new();
        let mut entries = Vec::new();
        for file in &files {
            let manifest = TestManifest::load(file)?;
            if !self.accepts(&manifest) {
                debug!("Skipping {} (engine {:?})", file.display(), manifest.engine);
                continue;
            }
            self.load_tree(file, &mut visited, &mut entries)?;
        }

        let mut descriptor = TestDescriptor::new(root.clone(), self.id.clone());
        let mut seen = HashSet::new();
        for (origin, entry) in &entries {
            let child = entry_descriptor(&root, entry, origin)?;
            if seen.insert(child.unique_id.clone()) {
                descriptor.add_child(child);
            }
        }

        Ok(descriptor)
    }
}

fn entry_descriptor(parent: &UniqueId, entry: &ManifestEntry, origin: &Path) -> Result<TestDescriptor, EngineError> {
    let invalid = |message: &str| EngineError::Manifest {
        path: origin.to_path_buf(),
        message: message.to_string(),
    };

    let mut descriptor = match (&entry.class, &entry.method) {
        (Some(class), Some(method)) => {
            let signature = format!("{method}({})", entry.parameter_types);
            let display = entry.name.clone().unwrap_or_else(|| signature.clone());
            TestDescriptor::new(parent.append("method", format!("{class}#{signature}")), display)
                .with_source(TestSource::method(class, method, &entry.parameter_types))
        }
        (Some(class), None) => {
            let display = entry.name.clone().unwrap_or_else(|| simple_name(class).to_string());
            TestDescriptor::new(parent.append("class", class), display)
                .with_source(TestSource::class(class))
        }
        (None, Some(_)) => return Err(invalid("'method' requires 'class'")),
        (None, None) => {
            let name = entry
                .name
                .as_ref()
                .ok_or_else(|| invalid("entry needs 'class' or 'name'"))?;
            let descriptor = TestDescriptor::new(parent.append("entry", name), name);
            match &entry.kind {
                Some(kind) => descriptor.with_source(TestSource::other(format!("{kind}:{name}"))),
                None => descriptor,
            }
        }
    };

    for child in &entry.children {
        let child = entry_descriptor(&descriptor.unique_id, child, origin)?;
        descriptor.add_child(child);
    }

    Ok(descriptor)
}

fn resolve_include(manifest: &Path, include: &str) -> Option<PathBuf> {
    context::current().resolve(include).or_else(|| {
        manifest
            .parent()
            .map(|dir| dir.join(include))
            .filter(|candidate| candidate.is_file())
    })
}

fn collect_manifest_files(dir: &Path, files: &mut BTreeSet<PathBuf>) -> Result<(), EngineError> {
    if !dir.is_dir() {
        return Ok(());
    }

    for entry in fs::read_dir(dir).map_err(|e| EngineError::io(dir, e))? {
        let entry = entry.map_err(|e| EngineError::io(dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| EngineError::io(&path, e))?;

        if file_type.is_dir() {
            collect_manifest_files(&path, files)?;
        } else if is_manifest_file(&path) {
            files.insert(path);
        }
    }

    Ok(())
}

fn is_manifest_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| MANIFEST_SUFFIXES.iter().any(|suffix| n.ends_with(suffix)))
        .unwrap_or(false)
}

fn is_json_file(path: &Path) -> bool {
    path.extension().map(|e| e == "json").unwrap_or(false)
}

fn simple_name(class: &str) -> &str {
    class.rsplit('.').next().unwrap_or(class)
}
