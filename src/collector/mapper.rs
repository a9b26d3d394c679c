//! Mapping of plan identifiers to host items

use crate::engine::{TestIdentifier, TestSource};
use crate::models::Item;

/// Fully qualified name of an identifier.
///
/// Class sources yield the class name, method sources
/// `Class#method(parameterTypes)` with the parameter types exactly as the
/// engine reported them. Anything else falls back to the legacy reporting
/// name.
pub fn fully_qualified_name(identifier: &TestIdentifier) -> String {
    match identifier.source() {
        Some(TestSource::Class(class)) => class.class_name.clone(),
        Some(TestSource::Method(method)) => format!(
            "{}#{}({})",
            method.class_name, method.method_name, method.parameter_types
        ),
        Some(TestSource::Other { .. }) | None => identifier.legacy_reporting_name().to_string(),
    }
}

/// Suite-level item for an identifier
pub fn to_item(identifier: &TestIdentifier) -> Item {
    Item::suite(fully_qualified_name(identifier))
}
