//! Scoped replacement of the ambient execution context

use std::cell::RefCell;
use std::sync::Arc;
use tracing::trace;

use super::ExecutionContext;

thread_local! {
    static CURRENT: RefCell<Arc<ExecutionContext>> = RefCell::new(ExecutionContext::system());
}

/// The ambient execution context of the calling thread
pub fn current() -> Arc<ExecutionContext> {
    CURRENT.with(|cell| cell.borrow().clone())
}

fn replace(context: Arc<ExecutionContext>) -> Arc<ExecutionContext> {
    CURRENT.with(|cell| cell.replace(context))
}

/// Guard that restores the previous ambient context on drop
#[must_use = "the previous context is restored as soon as the scope is dropped"]
pub struct ContextScope {
    previous: Option<Arc<ExecutionContext>>,
}

impl ContextScope {
    /// Install `context` as the ambient context until the guard is dropped
    pub fn enter(context: Arc<ExecutionContext>) -> Self {
        trace!("Entering execution context {}", context);
        let previous = replace(context);
        Self {
            previous: Some(previous),
        }
    }
}

impl Drop for ContextScope {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            trace!("Restoring execution context {}", previous);
            replace(previous);
        }
    }
}

/// Run `f` with `context` installed as the ambient context.
///
/// The previous context is restored on every exit path, including errors
/// returned by `f` and panics unwinding through it.
pub fn with_context<T>(context: Arc<ExecutionContext>, f: impl FnOnce() -> T) -> T {
    let _scope = ContextScope::enter(context);
    f()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn named(name: &str) -> Arc<ExecutionContext> {
        Arc::new(ExecutionContext::new(name, vec![PathBuf::from(name)]))
    }

    #[test]
    fn test_with_context_installs_and_restores() {
        let before = current();
        let inner = with_context(named("inner"), || current().name().to_string());
        assert_eq!(inner, "inner");
        assert!(Arc::ptr_eq(&before, &current()));
    }

    #[test]
    fn test_restores_on_error() {
        let before = current();
        let result: Result<(), String> = with_context(named("failing"), || {
            assert_eq!(current().name(), "failing");
            Err("boom".to_string())
        });
        assert!(result.is_err());
        assert!(Arc::ptr_eq(&before, &current()));
    }

    #[test]
    fn test_restores_on_panic() {
        let before = current();
        let outcome = std::panic::catch_unwind(|| {
            with_context(named("panicking"), || panic!("engine blew up"));
        });
        assert!(outcome.is_err());
        assert!(Arc::ptr_eq(&before, &current()));
    }

    #[test]
    fn test_nested_scopes_restore_in_order() {
        let before = current();
        {
            let _outer = ContextScope::enter(named("outer"));
            {
                let _inner = ContextScope::enter(named("inner"));
                assert_eq!(current().name(), "inner");
            }
            assert_eq!(current().name(), "outer");
        }
        assert!(Arc::ptr_eq(&before, &current()));
    }

    #[test]
    fn test_contexts_are_thread_local() {
        let _scope = ContextScope::enter(named("main-thread"));
        let other = std::thread::spawn(|| current().name().to_string())
            .join()
            .unwrap();
        assert_eq!(other, super::super::SYSTEM_CONTEXT);
        assert_eq!(current().name(), "main-thread");
    }
}
