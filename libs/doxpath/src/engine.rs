//! Main path engine
//!
//! Compiles path strings (memoized in an LRU cache) and evaluates them
//! against a tree. One engine can be shared across threads.

use crate::ast::Path;
use crate::error::Result;
use crate::eval::Evaluator;
use crate::parser::Parser;
use crate::result::QueryResult;
use crate::transforms::TransformRegistry;
use crate::tree::Value;
use lru::LruCache;
use std::borrow::Cow;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};

const DEFAULT_CACHE_CAPACITY: usize = 1000;

#[derive(Clone)]
pub struct Engine {
    transforms: Arc<TransformRegistry>,
    cache: Arc<Mutex<LruCache<String, Arc<Path>>>>,
}

impl Engine {
    /// Create an engine that resolves `@name` segments through `transforms`.
    pub fn new(transforms: TransformRegistry) -> Self {
        Self::with_cache_capacity(transforms, DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_cache_capacity(transforms: TransformRegistry, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            transforms: Arc::new(transforms),
            cache: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    pub fn transforms(&self) -> &TransformRegistry {
        &self.transforms
    }

    // ============================================================================
    // Compilation
    // ============================================================================

    /// Compile a path expression, reusing a cached copy when available.
    pub fn compile(&self, path: &str) -> Result<Arc<Path>> {
        {
            let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(plan) = cache.get(path) {
                return Ok(Arc::clone(plan));
            }
        }

        let plan = Arc::new(Parser::new(path, &self.transforms).parse()?);

        {
            let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            cache.put(path.to_string(), Arc::clone(&plan));
        }

        Ok(plan)
    }

    // ============================================================================
    // Evaluation
    // ============================================================================

    /// Evaluate a compiled path against a borrowed root.
    pub fn evaluate<'a>(&self, path: &Path, root: &'a Value) -> QueryResult<'a> {
        let (value, style) = Evaluator::new(&self.transforms).eval_path(path, Cow::Borrowed(root));
        QueryResult::new(value, style)
    }

    /// Evaluate a compiled path against a root the caller hands over.
    pub fn evaluate_owned(&self, path: &Path, root: Value) -> QueryResult<'static> {
        let (value, style) = Evaluator::new(&self.transforms).eval_path(path, Cow::Owned(root));
        QueryResult::new(value, style)
    }

    /// Compile and evaluate; syntax errors are returned.
    pub fn query<'a>(&self, root: &'a Value, path: &str) -> Result<QueryResult<'a>> {
        let plan = self.compile(path)?;
        Ok(self.evaluate(&plan, root))
    }

    /// Compile and evaluate; a path that does not compile matches nothing.
    pub fn get<'a>(&self, root: &'a Value, path: &str) -> QueryResult<'a> {
        match self.query(root, path) {
            Ok(result) => result,
            Err(e) => {
                tracing::debug!(path, error = %e, "path did not compile");
                QueryResult::missing()
            }
        }
    }

    /// Like [`get`](Self::get) for an owned root.
    pub fn get_owned(&self, root: Value, path: &str) -> QueryResult<'static> {
        match self.compile(path) {
            Ok(plan) => self.evaluate_owned(&plan, root),
            Err(e) => {
                tracing::debug!(path, error = %e, "path did not compile");
                QueryResult::missing()
            }
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(TransformRegistry::builtin())
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("transforms", &self.transforms.names())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use serde_json::json;

    #[test]
    fn compile_is_cached() {
        let engine = Engine::default();
        let a = engine.compile("a.b").unwrap();
        let b = engine.compile("a.b").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn tiny_cache_still_works() {
        let engine = Engine::with_cache_capacity(TransformRegistry::builtin(), 0);
        let root = json!({"a": 1, "b": 2});
        assert_eq!(engine.get(&root, "a").int(), 1);
        assert_eq!(engine.get(&root, "b").int(), 2);
        assert_eq!(engine.get(&root, "a").int(), 1);
    }

    #[test]
    fn query_reports_errors_get_does_not() {
        let engine = Engine::default();
        let root = json!({"a": 1});
        assert_eq!(
            engine.query(&root, "@unknown").unwrap_err(),
            Error::TransformNotFound("unknown".into())
        );
        assert!(!engine.get(&root, "@unknown").exists());
    }

    #[test]
    fn borrowed_results_point_into_the_tree() {
        let engine = Engine::default();
        let root = json!({"a": {"b": [10, 20]}});
        let res = engine.get(&root, "a.b");
        assert!(std::ptr::eq(res.value().unwrap(), &root["a"]["b"]));
    }

    #[test]
    fn owned_roots() {
        let engine = Engine::default();
        let res = engine.get_owned(json!([[1], [2, 2]]), "@flatten|@dedup");
        assert_eq!(res.value(), Some(&json!([1, 2])));
    }

    #[test]
    fn engine_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
    }
}
