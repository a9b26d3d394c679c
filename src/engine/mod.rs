//! Discovery engines
//!
//! Engines enumerate test units for a [`DiscoveryRequest`] and report them as
//! a descriptor tree. The [`Launcher`] runs every registered engine that
//! passes the request's filters and assembles their trees into a
//! [`TestPlan`].

mod identifier;
mod launcher;
pub mod manifest;
mod plan;
mod request;

pub use identifier::{
    ClassSource, MethodSource, Segment, TestDescriptor, TestIdentifier, TestSource, UniqueId,
    ENGINE_SEGMENT,
};
pub use launcher::Launcher;
pub use manifest::ManifestEngine;
pub use plan::TestPlan;
pub use request::{
    absolute_path, DiscoveryRequest, DiscoveryRequestBuilder, DiscoverySelector, EngineFilter,
};

use crate::error::EngineError;

/// A pluggable test discovery engine
pub trait TestEngine {
    /// Unique engine id, e.g. `junit-jupiter`
    fn id(&self) -> &str;

    /// Discover test units for `request` below the engine root `root`
    fn discover(&self, request: &DiscoveryRequest, root: UniqueId) -> Result<TestDescriptor, EngineError>;
}
