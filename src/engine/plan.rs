//! Test plan assembled from engine descriptor trees

use std::collections::HashMap;

use super::identifier::{TestDescriptor, TestIdentifier, UniqueId};

/// Tree of identifiers discovered for one request
#[derive(Clone, Debug, Default)]
pub struct TestPlan {
    roots: Vec<TestIdentifier>,
    children: HashMap<UniqueId, Vec<TestIdentifier>>,
}

impl TestPlan {
    /// Build a plan from engine root descriptors, keeping their order
    pub fn from_roots(roots: Vec<TestDescriptor>) -> Self {
        let mut plan = Self::default();
        for root in &roots {
            plan.roots.push(TestIdentifier::from_descriptor(root, None));
            plan.index_children(root);
        }
        plan
    }

    fn index_children(&mut self, parent: &TestDescriptor) {
        if parent.children.is_empty() {
            return;
        }
        let identifiers = parent
            .children
            .iter()
            .map(|child| TestIdentifier::from_descriptor(child, Some(parent.unique_id.clone())))
            .collect();
        self.children.insert(parent.unique_id.clone(), identifiers);

        for child in &parent.children {
            self.index_children(child);
        }
    }

    /// Root identifiers, one per participating engine
    pub fn roots(&self) -> &[TestIdentifier] {
        &self.roots
    }

    /// Direct children of `parent` in the order the engine reported them
    pub fn children(&self, parent: &TestIdentifier) -> &[TestIdentifier] {
        self.children_of(parent.unique_id())
    }

    pub fn children_of(&self, parent_id: &UniqueId) -> &[TestIdentifier] {
        self.children
            .get(parent_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of identifiers below the roots, at any depth
    pub fn descendant_count(&self) -> usize {
        self.children.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}
