//! Test collection
//!
//! Runs discovery for the configured artifact directory inside an isolated
//! execution context and maps the resulting plan to host items.

mod guard;
mod mapper;

pub use guard::ensure_compatible;
pub use mapper::{fully_qualified_name, to_item};

use std::sync::Arc;
use tracing::{debug, info};

use crate::config::CollectorConfig;
use crate::context::{self, ExecutionContext};
use crate::engine::{DiscoveryRequest, DiscoverySelector, EngineFilter, Launcher, TestPlan};
use crate::error::CollectorError;
use crate::models::DiscoveryResult;
use crate::utils::PhaseTimer;

/// Collects available tests through a [`Launcher`]
pub struct TestCollector {
    config: CollectorConfig,
    launcher: Launcher,
}

impl TestCollector {
    pub fn new(config: CollectorConfig, launcher: Launcher) -> Self {
        Self { config, launcher }
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    pub fn launcher(&self) -> &Launcher {
        &self.launcher
    }

    /// Discover tests, restricted to `engines` unless the list is empty.
    ///
    /// Returns the shared empty result when the artifact directory does not
    /// exist. Fails with [`CollectorError::IncompatibleEngine`] if any
    /// participating engine must run as a suite delegate instead.
    pub fn collect_tests<S: AsRef<str>>(&self, engines: &[S]) -> Result<Arc<DiscoveryResult>, CollectorError> {
        let artifact_directory = self.config.artifact_directory();
        if !artifact_directory.exists() {
            debug!(
                "Artifact directory {} does not exist, nothing to discover",
                artifact_directory.display()
            );
            return Ok(DiscoveryResult::empty());
        }

        let discovery_context = ExecutionContext::child(
            self.config.execution_context().clone(),
            self.config.search_path().to_vec(),
        );

        context::with_context(discovery_context, || self.collect_in_context(engines)).map(Arc::new)
    }

    fn collect_in_context<S: AsRef<str>>(&self, engines: &[S]) -> Result<DiscoveryResult, CollectorError> {
        let mut timer = PhaseTimer::start("discovery");
        let request = self.build_request(engines);
        timer.phase("request");
        let plan = self.launcher.discover(&request)?;
        timer.phase("launch");
        let result = map_plan(&plan)?;
        timer.phase("mapping");

        info!(
            "Discovered {} test containers in {} ({} engines, {}ms)",
            result.len(),
            self.config.artifact_directory().display(),
            plan.roots().len(),
            timer.total().as_millis()
        );
        Ok(result)
    }

    fn build_request<S: AsRef<str>>(&self, engines: &[S]) -> DiscoveryRequest {
        let artifact_directory = self.config.artifact_directory();
        let mut builder = DiscoveryRequest::builder()
            .selector(DiscoverySelector::classpath_roots([artifact_directory]))
            .selector(DiscoverySelector::directory(artifact_directory));

        if !engines.is_empty() {
            builder = builder.filter(EngineFilter::include_engines(
                engines.iter().map(|e| e.as_ref().to_string()),
            ));
        }

        builder.build()
    }
}

/// Map every direct child of every root to an item, root order then child order.
///
/// The first incompatible root aborts the mapping.
pub fn map_plan(plan: &TestPlan) -> Result<DiscoveryResult, CollectorError> {
    let mut items = Vec::new();

    for root in plan.roots() {
        ensure_compatible(root)?;

        for identifier in plan.children(root) {
            let item = to_item(identifier);
            debug!("{} -> {}", identifier.unique_id(), item.fully_qualified_name());
            items.push(item);
        }
    }

    Ok(DiscoveryResult::new(items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ManifestEngine, TestDescriptor, TestEngine, TestSource, UniqueId};
    use crate::error::EngineError;
    use std::cell::RefCell;
    use std::path::{Path, PathBuf};
    use std::rc::Rc;
    use tempfile::tempdir;

    #[derive(Default)]
    struct Observed {
        contexts: Vec<Vec<PathBuf>>,
        requests: Vec<DiscoveryRequest>,
    }

    struct FakeEngine {
        id: &'static str,
        children: Vec<TestSource>,
        observed: Rc<RefCell<Observed>>,
    }

    impl FakeEngine {
        fn new(id: &'static str, children: Vec<TestSource>, observed: &Rc<RefCell<Observed>>) -> Self {
            Self {
                id,
                children,
                observed: observed.clone(),
            }
        }
    }

    impl TestEngine for FakeEngine {
        fn id(&self) -> &str {
            self.id
        }

        fn discover(&self, request: &DiscoveryRequest, root: UniqueId) -> Result<TestDescriptor, EngineError> {
            let mut observed = self.observed.borrow_mut();
            observed.contexts.push(
                context::current()
                    .search_path_chain()
                    .into_iter()
                    .map(Path::to_path_buf)
                    .collect(),
            );
            observed.requests.push(request.clone());

            let mut descriptor = TestDescriptor::new(root.clone(), self.id);
            for (i, source) in self.children.iter().enumerate() {
                descriptor.add_child(
                    TestDescriptor::new(root.append("child", i.to_string()), format!("{}-{i}", self.id))
                        .with_source(source.clone()),
                );
            }
            Ok(descriptor)
        }
    }

    struct BrokenEngine;

    impl TestEngine for BrokenEngine {
        fn id(&self) -> &str {
            "broken"
        }

        fn discover(&self, _request: &DiscoveryRequest, _root: UniqueId) -> Result<TestDescriptor, EngineError> {
            Err(EngineError::Failed {
                engine_id: "broken".to_string(),
                message: "malformed class file".to_string(),
            })
        }
    }

    fn config_for(dir: &Path) -> CollectorConfig {
        CollectorConfig::builder()
            .search_path_entries([dir.join("lib")])
            .artifact_directory(dir)
            .build()
            .unwrap()
    }

    fn names(result: &DiscoveryResult) -> Vec<&str> {
        result.items().iter().map(|i| i.fully_qualified_name()).collect()
    }

    #[test]
    fn test_missing_directory_returns_shared_empty() {
        let observed = Rc::new(RefCell::new(Observed::default()));
        let launcher = Launcher::new()
            .with_engine(FakeEngine::new("e", vec![TestSource::class("a.A")], &observed))
            .unwrap();
        let config = CollectorConfig::builder()
            .artifact_directory("/definitely/not/here")
            .build()
            .unwrap();
        let collector = TestCollector::new(config, launcher);

        let all = collector.collect_tests::<&str>(&[]).unwrap();
        let filtered = collector.collect_tests(&["e"]).unwrap();
        assert!(Arc::ptr_eq(&all, &DiscoveryResult::empty()));
        assert!(Arc::ptr_eq(&filtered, &DiscoveryResult::empty()));
        assert!(observed.borrow().requests.is_empty());
    }

    #[test]
    fn test_items_in_root_then_child_order() {
        let dir = tempdir().unwrap();
        let observed = Rc::new(RefCell::new(Observed::default()));
        let launcher = Launcher::new()
            .with_engine(FakeEngine::new(
                "first",
                vec![
                    TestSource::class("z.Last"),
                    TestSource::method("a.First", "run", "int"),
                ],
                &observed,
            ))
            .unwrap()
            .with_engine(FakeEngine::new("empty", vec![], &observed))
            .unwrap()
            .with_engine(FakeEngine::new("second", vec![TestSource::other("file:x")], &observed))
            .unwrap();

        let collector = TestCollector::new(config_for(dir.path()), launcher);
        let result = collector.collect_tests::<&str>(&[]).unwrap();

        assert_eq!(names(&result), vec!["z.Last", "a.First#run(int)", "second-0"]);
        assert!(!DiscoveryResult::is_shared_empty(&result));
    }

    #[test]
    fn test_request_selects_artifact_directory() {
        let dir = tempdir().unwrap();
        let observed = Rc::new(RefCell::new(Observed::default()));
        let launcher = Launcher::new()
            .with_engine(FakeEngine::new("e", vec![], &observed))
            .unwrap();
        let collector = TestCollector::new(config_for(dir.path()), launcher);
        collector.collect_tests::<&str>(&[]).unwrap();

        let observed = observed.borrow();
        let request = &observed.requests[0];
        assert!(request.filters().is_empty());
        assert_eq!(request.selectors().len(), 2);
        assert_eq!(request.directories(), vec![dir.path()]);
        assert!(matches!(&request.selectors()[0], DiscoverySelector::ClasspathRoots(roots) if roots.len() == 1));
        assert!(matches!(&request.selectors()[1], DiscoverySelector::Directory(d) if d == dir.path()));
    }

    #[test]
    fn test_allow_list_restricts_engines() {
        let dir = tempdir().unwrap();
        let observed = Rc::new(RefCell::new(Observed::default()));
        let launcher = Launcher::new()
            .with_engine(FakeEngine::new("junit-jupiter", vec![TestSource::class("j.J")], &observed))
            .unwrap()
            .with_engine(FakeEngine::new("junit-vintage", vec![TestSource::class("v.V")], &observed))
            .unwrap();
        let collector = TestCollector::new(config_for(dir.path()), launcher);

        let result = collector.collect_tests(&["junit-vintage"]).unwrap();
        assert_eq!(names(&result), vec!["v.V"]);
        assert_eq!(
            observed.borrow().requests[0].filters(),
            &[EngineFilter::include_engines(["junit-vintage"])]
        );
    }

    #[test]
    fn test_incompatible_engine_aborts() {
        let dir = tempdir().unwrap();
        let observed = Rc::new(RefCell::new(Observed::default()));
        let launcher = Launcher::new()
            .with_engine(FakeEngine::new("junit-jupiter", vec![TestSource::class("j.J")], &observed))
            .unwrap()
            .with_engine(FakeEngine::new("Cucumber", vec![TestSource::class("c.C")], &observed))
            .unwrap();
        let collector = TestCollector::new(config_for(dir.path()), launcher);

        let before = context::current();
        let err = collector.collect_tests::<&str>(&[]).unwrap_err();
        assert_eq!(err.engine_id(), Some("Cucumber"));
        assert!(Arc::ptr_eq(&before, &context::current()));

        let allowed = collector.collect_tests(&["junit-jupiter"]).unwrap();
        assert_eq!(names(&allowed), vec!["j.J"]);
    }

    #[test]
    fn test_discovery_runs_in_isolated_context() {
        let dir = tempdir().unwrap();
        let observed = Rc::new(RefCell::new(Observed::default()));
        let launcher = Launcher::new()
            .with_engine(FakeEngine::new("e", vec![], &observed))
            .unwrap();
        let base = Arc::new(ExecutionContext::new("host", vec![PathBuf::from("/host/lib")]));
        let config = CollectorConfig::builder()
            .execution_context(base)
            .search_path_entries(["/deps/engine.jar"])
            .artifact_directory(dir.path())
            .build()
            .unwrap();
        let collector = TestCollector::new(config, launcher);

        let before = context::current();
        collector.collect_tests::<&str>(&[]).unwrap();
        assert!(Arc::ptr_eq(&before, &context::current()));

        assert_eq!(
            observed.borrow().contexts[0],
            vec![PathBuf::from("/host/lib"), PathBuf::from("/deps/engine.jar")]
        );
    }

    #[test]
    fn test_engine_error_propagates_and_restores_context() {
        let dir = tempdir().unwrap();
        let launcher = Launcher::new().with_engine(BrokenEngine).unwrap();
        let collector = TestCollector::new(config_for(dir.path()), launcher);

        let before = context::current();
        let err = collector.collect_tests::<&str>(&[]).unwrap_err();
        assert!(matches!(err, CollectorError::Engine(EngineError::Failed { .. })));
        assert_eq!(err.to_string(), "Engine 'broken' failed during discovery: malformed class file");
        assert!(Arc::ptr_eq(&before, &context::current()));
    }

    #[test]
    fn test_manifest_engines_end_to_end() {
        let dir = tempdir().unwrap();
        let lib = dir.path().join("lib");
        std::fs::create_dir(&lib).unwrap();
        std::fs::write(
            dir.path().join("jupiter.tests.yaml"),
            "engine: junit-jupiter\ninclude: [common.tests.yaml]\ntests:\n  - class: com.acme.FooTest\n  - class: com.acme.Foo\n    method: bar\n    parameter_types: java.lang.String\n",
        )
        .unwrap();
        std::fs::write(lib.join("common.tests.yaml"), "tests:\n  - name: Common Checks\n").unwrap();
        std::fs::write(
            dir.path().join("vintage.tests.json"),
            r#"{"engine": "junit-vintage", "tests": [{"class": "com.acme.LegacyTest"}]}"#,
        )
        .unwrap();

        let launcher = Launcher::new()
            .with_engine(ManifestEngine::new("junit-jupiter"))
            .unwrap()
            .with_engine(ManifestEngine::new("junit-vintage"))
            .unwrap();
        let collector = TestCollector::new(config_for(dir.path()), launcher);

        let result = collector.collect_tests::<&str>(&[]).unwrap();
        assert_eq!(
            names(&result),
            vec![
                "com.acme.FooTest",
                "com.acme.Foo#bar(java.lang.String)",
                "Common Checks",
                "com.acme.LegacyTest"
            ]
        );
    }

    #[test]
    fn test_manifest_cucumber_engine_rejected() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("features.tests.yaml"),
            "engine: cucumber\ntests:\n  - name: login.feature\n    kind: file\n",
        )
        .unwrap();

        let launcher = Launcher::new()
            .with_engine(ManifestEngine::new("junit-jupiter"))
            .unwrap()
            .with_engine(ManifestEngine::new("cucumber"))
            .unwrap();
        let collector = TestCollector::new(config_for(dir.path()), launcher);

        let err = collector.collect_tests::<&str>(&[]).unwrap_err();
        assert!(matches!(err, CollectorError::IncompatibleEngine { ref engine_id } if engine_id == "cucumber"));
    }

    #[test]
    fn test_map_plan_root_without_children() {
        let plan = TestPlan::from_roots(vec![TestDescriptor::new(UniqueId::for_engine("e"), "e")]);
        assert!(map_plan(&plan).unwrap().is_empty());
    }

    #[test]
    fn test_map_plan_ignores_grandchildren() {
        let root = UniqueId::for_engine("junit-jupiter");
        let class_id = root.append("class", "com.acme.FooTest");
        let class = TestDescriptor::new(class_id.clone(), "FooTest")
            .with_source(TestSource::class("com.acme.FooTest"))
            .with_child(
                TestDescriptor::new(class_id.append("method", "first()"), "first()")
                    .with_source(TestSource::method("com.acme.FooTest", "first", "")),
            )
            .with_child(
                TestDescriptor::new(class_id.append("method", "second(int)"), "second(int)")
                    .with_source(TestSource::method("com.acme.FooTest", "second", "int")),
            );
        let plan = TestPlan::from_roots(vec![TestDescriptor::new(root, "JUnit Jupiter").with_child(class)]);

        let result = map_plan(&plan).unwrap();
        let direct_children = plan.children(&plan.roots()[0]).len();
        assert_eq!(direct_children, 1);
        assert_eq!(result.len(), direct_children);
        assert_eq!(result.items()[0].fully_qualified_name(), "com.acme.FooTest");
        assert_eq!(plan.descendant_count(), 3);
    }
}
