//! Discovery launcher
//!
//! Hands discovery requests to the registered engines and assembles the plan.

use tracing::{debug, warn};

use super::identifier::UniqueId;
use super::plan::TestPlan;
use super::request::{DiscoveryRequest, EngineFilter};
use super::TestEngine;
use crate::error::EngineError;

/// Registry of engines taking part in discovery
#[derive(Default)]
pub struct Launcher {
    engines: Vec<Box<dyn TestEngine>>,
}

impl Launcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an engine; ids must be unique
    pub fn register(&mut self, engine: Box<dyn TestEngine>) -> Result<(), EngineError> {
        if self.engines.iter().any(|e| e.id() == engine.id()) {
            return Err(EngineError::DuplicateEngine(engine.id().to_string()));
        }
        debug!("Registered engine {}", engine.id());
        self.engines.push(engine);
        Ok(())
    }

    /// Builder-style registration
    pub fn with_engine(mut self, engine: impl TestEngine + 'static) -> Result<Self, EngineError> {
        self.register(Box::new(engine))?;
        Ok(self)
    }

    /// Ids of registered engines in registration order
    pub fn engine_ids(&self) -> Vec<&str> {
        self.engines.iter().map(|e| e.id()).collect()
    }

    /// Run discovery on every engine passing the request's filters.
    ///
    /// Engine errors are returned unchanged. A root whose id differs from the
    /// one handed to the engine is rejected.
    pub fn discover(&self, request: &DiscoveryRequest) -> Result<TestPlan, EngineError> {
        self.warn_unknown_engines(request);

        let mut roots = Vec::new();
        for engine in &self.engines {
            if !request.engine_included(engine.id()) {
                debug!("Engine {} excluded by request filters", engine.id());
                continue;
            }

            let expected = UniqueId::for_engine(engine.id());
            let root = engine.discover(request, expected.clone())?;
            if root.unique_id != expected {
                return Err(EngineError::RootMismatch {
                    engine_id: engine.id().to_string(),
                    expected: expected.to_string(),
                    actual: root.unique_id.to_string(),
                });
            }
            debug!(
                "Engine {} discovered {} containers",
                engine.id(),
                root.children.len()
            );
            roots.push(root);
        }

        Ok(TestPlan::from_roots(roots))
    }

    fn warn_unknown_engines(&self, request: &DiscoveryRequest) {
        for filter in request.filters() {
            if let EngineFilter::Include(ids) = filter {
                for id in ids {
                    if !self.engines.iter().any(|e| e.id() == id) {
                        warn!("Included engine '{}' is not registered", id);
                    }
                }
            }
        }
    }
}
