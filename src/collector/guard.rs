//! Engine compatibility check

use crate::engine::TestIdentifier;
use crate::error::{CollectorError, INCOMPATIBLE_ENGINE_ID};

/// Fail if `root` belongs to an engine that must run as a suite delegate
pub fn ensure_compatible(root: &TestIdentifier) -> Result<(), CollectorError> {
    let engine_id = root.unique_id().engine_id().unwrap_or("");
    if engine_id.eq_ignore_ascii_case(INCOMPATIBLE_ENGINE_ID) {
        return Err(CollectorError::IncompatibleEngine {
            engine_id: engine_id.to_string(),
        });
    }
    Ok(())
}
