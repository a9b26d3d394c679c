//! Discovered test item models
//!
//! Defines the portable item handed to the host runner together with the
//! host-owned fingerprint and selector value types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Annotation name announced by the adapter fingerprint
pub const ADAPTER_ANNOTATION: &str = "org.junit.jupiter.api.Test";

/// Marker telling the host which adapter produced a test
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fingerprint {
    Annotated {
        annotation_name: String,
        is_module: bool,
    },
    Subclass {
        superclass_name: String,
        is_module: bool,
        requires_no_arg_constructor: bool,
    },
}

impl Fingerprint {
    /// The fixed fingerprint attached to every discovered item
    pub fn adapter() -> Self {
        Fingerprint::Annotated {
            annotation_name: ADAPTER_ANNOTATION.to_string(),
            is_module: false,
        }
    }

    pub fn is_module(&self) -> bool {
        match self {
            Fingerprint::Annotated { is_module, .. } | Fingerprint::Subclass { is_module, .. } => {
                *is_module
            }
        }
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fingerprint::Annotated {
                annotation_name,
                is_module,
            } => write!(f, "Annotated({annotation_name}, module={is_module})"),
            Fingerprint::Subclass {
                superclass_name,
                is_module,
                ..
            } => write!(f, "Subclass({superclass_name}, module={is_module})"),
        }
    }
}

/// Host selector telling the runner how to re-select a test unit
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Selector {
    /// Selects the whole suite (container)
    Suite,
    Test {
        name: String,
    },
    NestedSuite {
        suite_id: String,
    },
    NestedTest {
        suite_id: String,
        name: String,
    },
    TestWildcard {
        pattern: String,
    },
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Suite => write!(f, "SuiteSelector"),
            Selector::Test { name } => write!(f, "TestSelector({name})"),
            Selector::NestedSuite { suite_id } => write!(f, "NestedSuiteSelector({suite_id})"),
            Selector::NestedTest { suite_id, name } => {
                write!(f, "NestedTestSelector({suite_id}, {name})")
            }
            Selector::TestWildcard { pattern } => write!(f, "TestWildcardSelector({pattern})"),
        }
    }
}

/// A discovered test item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    fully_qualified_name: String,
    fingerprint: Fingerprint,
    selectors: Vec<Selector>,
    explicit: bool,
}

impl Item {
    /// Create a suite-level item for the given name.
    ///
    /// Items are never explicit: there is no way yet to target a single test
    /// explicitly.
    pub(crate) fn suite(fully_qualified_name: impl Into<String>) -> Self {
        Self {
            fully_qualified_name: fully_qualified_name.into(),
            fingerprint: Fingerprint::adapter(),
            selectors: vec![Selector::Suite],
            explicit: false,
        }
    }

    /// Fully qualified name of the discovered test
    pub fn fully_qualified_name(&self) -> &str {
        &self.fully_qualified_name
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    pub fn selectors(&self) -> &[Selector] {
        &self.selectors
    }

    /// Whether this item was explicitly requested
    pub fn is_explicit(&self) -> bool {
        self.explicit
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let selectors: Vec<String> = self.selectors.iter().map(|s| s.to_string()).collect();
        write!(
            f,
            "Item({}, {}, [{}], {})",
            self.fully_qualified_name,
            self.fingerprint,
            selectors.join(", "),
            self.explicit
        )
    }
}
