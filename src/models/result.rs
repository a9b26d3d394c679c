//! Discovery result model

#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};

use super::Item;

static EMPTY_RESULT: OnceLock<Arc<DiscoveryResult>> = OnceLock::new();

/// Ordered collection of items produced by one discovery run
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryResult {
    items: Vec<Item>,
}

impl DiscoveryResult {
    /// Create a result from already mapped items
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    /// The shared empty result.
    ///
    /// Every call returns the same allocation, compare with [`Arc::ptr_eq`].
    pub fn empty() -> Arc<DiscoveryResult> {
        EMPTY_RESULT
            .get_or_init(|| Arc::new(DiscoveryResult::default()))
            .clone()
    }

    /// The list of discovered test items
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether this is the shared empty result
    pub fn is_shared_empty(result: &Arc<DiscoveryResult>) -> bool {
        Arc::ptr_eq(result, &Self::empty())
    }
}

impl IntoIterator for DiscoveryResult {
    type Item = Item;
    type IntoIter = std::vec::IntoIter<Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
