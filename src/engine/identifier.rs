//! Test identifiers reported by discovery engines

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Segment type marking the engine a unique id belongs to
pub const ENGINE_SEGMENT: &str = "engine";

/// One `[type:value]` component of a unique id
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Segment {
    pub kind: String,
    pub value: String,
}

/// Hierarchical identifier of a node in a test plan
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UniqueId {
    segments: Vec<Segment>,
}

impl UniqueId {
    /// Root id for an engine: `[engine:<id>]`
    pub fn for_engine(engine_id: impl Into<String>) -> Self {
        Self::root(ENGINE_SEGMENT, engine_id)
    }

    /// Root id with an arbitrary segment type
    pub fn root(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            segments: vec![Segment {
                kind: kind.into(),
                value: value.into(),
            }],
        }
    }

    /// Child id with one more segment
    pub fn append(&self, kind: impl Into<String>, value: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment {
            kind: kind.into(),
            value: value.into(),
        });
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Engine id declared by the leading segment, if any
    pub fn engine_id(&self) -> Option<&str> {
        self.segments
            .first()
            .filter(|s| s.kind == ENGINE_SEGMENT)
            .map(|s| s.value.as_str())
    }
}

impl fmt::Display for UniqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .segments
            .iter()
            .map(|s| format!("[{}:{}]", s.kind, s.value))
            .collect();
        write!(f, "{}", rendered.join("/"))
    }
}

impl FromStr for UniqueId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut segments = Vec::new();
        for part in s.split("]/") {
            let part = part.strip_prefix('[').unwrap_or(part);
            let part = part.strip_suffix(']').unwrap_or(part);
            let (kind, value) = part
                .split_once(':')
                .ok_or_else(|| format!("Malformed unique id segment '{part}' in '{s}'"))?;
            if kind.is_empty() {
                return Err(format!("Empty segment type in '{s}'"));
            }
            segments.push(Segment {
                kind: kind.to_string(),
                value: value.to_string(),
            });
        }
        Ok(Self { segments })
    }
}

/// Class container source
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSource {
    pub class_name: String,
}

/// Method container source
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSource {
    pub class_name: String,
    pub method_name: String,
    /// Parameter types as reported by the engine, comma separated
    pub parameter_types: String,
}

/// Where a discovered unit comes from
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TestSource {
    Class(ClassSource),
    Method(MethodSource),
    /// Any other source (files, directories, resources)
    Other { description: String },
}

impl TestSource {
    pub fn class(class_name: impl Into<String>) -> Self {
        TestSource::Class(ClassSource {
            class_name: class_name.into(),
        })
    }

    pub fn method(
        class_name: impl Into<String>,
        method_name: impl Into<String>,
        parameter_types: impl Into<String>,
    ) -> Self {
        TestSource::Method(MethodSource {
            class_name: class_name.into(),
            method_name: method_name.into(),
            parameter_types: parameter_types.into(),
        })
    }

    pub fn other(description: impl Into<String>) -> Self {
        TestSource::Other {
            description: description.into(),
        }
    }
}

/// Tree node returned by an engine for one discovery request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestDescriptor {
    pub unique_id: UniqueId,
    pub display_name: String,
    pub legacy_reporting_name: String,
    pub source: Option<TestSource>,
    pub children: Vec<TestDescriptor>,
}

impl TestDescriptor {
    /// Create a descriptor whose legacy name equals its display name
    pub fn new(unique_id: UniqueId, display_name: impl Into<String>) -> Self {
        let display_name = display_name.into();
        Self {
            unique_id,
            legacy_reporting_name: display_name.clone(),
            display_name,
            source: None,
            children: Vec::new(),
        }
    }

    pub fn with_source(mut self, source: TestSource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_legacy_reporting_name(mut self, name: impl Into<String>) -> Self {
        self.legacy_reporting_name = name.into();
        self
    }

    pub fn with_child(mut self, child: TestDescriptor) -> Self {
        self.children.push(child);
        self
    }

    pub fn add_child(&mut self, child: TestDescriptor) {
        self.children.push(child);
    }
}

/// Immutable view of one plan node, detached from its children
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TestIdentifier {
    unique_id: UniqueId,
    parent_id: Option<UniqueId>,
    display_name: String,
    legacy_reporting_name: String,
    source: Option<TestSource>,
}

impl TestIdentifier {
    pub(crate) fn from_descriptor(descriptor: &TestDescriptor, parent_id: Option<UniqueId>) -> Self {
        Self {
            unique_id: descriptor.unique_id.clone(),
            parent_id,
            display_name: descriptor.display_name.clone(),
            legacy_reporting_name: descriptor.legacy_reporting_name.clone(),
            source: descriptor.source.clone(),
        }
    }

    pub fn unique_id(&self) -> &UniqueId {
        &self.unique_id
    }

    pub fn parent_id(&self) -> Option<&UniqueId> {
        self.parent_id.as_ref()
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Human readable name used by legacy reporting infrastructure
    pub fn legacy_reporting_name(&self) -> &str {
        &self.legacy_reporting_name
    }

    pub fn source(&self) -> Option<&TestSource> {
        self.source.as_ref()
    }
}
