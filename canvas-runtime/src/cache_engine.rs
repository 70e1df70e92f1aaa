//! Cache Policy Engine (drives C1 against a pluggable store at runtime).
//!
//! [`CacheKeyRegistry`] only derives keys; this module is where the five
//! [`CachePolicy`] variants actually gate reads and writes
//! against a [`CacheStore`].

use std::sync::Arc;

use async_trait::async_trait;

use canvas_domain::cache::CacheKeyRegistry;
use canvas_domain::entities::PipelineContext;
use canvas_domain::error::CanvasError;
use canvas_domain::value_objects::{CacheKey, TypeName};

/// A pluggable cache backend. Runtime crates supply the concrete store
/// (in-memory, Redis, etc.); the policy engine only ever talks to this
/// trait, matching the teacher's infrastructure-behind-a-domain-port style.
#[async_trait]
pub trait CacheStore<Value>: Send + Sync {
    async fn get(&self, key: &CacheKey) -> Result<Option<Value>, CanvasError>;
    async fn put(&self, key: &CacheKey, value: Value) -> Result<(), CanvasError>;
}

/// The outcome of [`CachePolicyEngine::resolve`], telling the caller
/// whether it must still compute the value.
pub enum CacheOutcome<Value> {
    /// Found in the cache; no computation needed.
    Hit(Value),
    /// Not in cache (or policy doesn't read); caller must compute.
    Miss,
}

pub struct CachePolicyEngine<Item, Value> {
    registry: CacheKeyRegistry<Item>,
    store: Arc<dyn CacheStore<Value>>,
}

impl<Item, Value> CachePolicyEngine<Item, Value> {
    pub fn new(registry: CacheKeyRegistry<Item>, store: Arc<dyn CacheStore<Value>>) -> Self {
        Self { registry, store }
    }

    /// Resolves against the cache per `context.cache_policy`:
    /// - REQUIRE: miss is an error, not a `Miss` outcome.
    /// - BYPASS: never reads, returns `Miss` unconditionally.
    /// - CACHE_ONLY: never reads either (it only populates on write).
    /// - PREFER / WRITE_THROUGH: read-through, falling back to `Miss`.
    ///
    /// Returns `None` for the key when no strategy could derive one —
    /// callers treat an undeterminable key the same as cache-bypass.
    pub async fn resolve(&self, item: &Item, context: &PipelineContext, target_type: &TypeName) -> Result<(Option<CacheKey>, CacheOutcome<Value>), CanvasError> {
        let policy = context.cache_policy;
        let key = self.registry.resolve(item, context, target_type);

        if !policy.reads_cache() {
            return Ok((key, CacheOutcome::Miss));
        }

        let Some(key) = key else {
            if policy.fails_on_miss() {
                return Err(CanvasError::invalid_input(format!("REQUIRE cache policy could not derive a cache key for '{target_type}'")));
            }
            return Ok((None, CacheOutcome::Miss));
        };

        match self.store.get(&key).await? {
            Some(value) => Ok((Some(key), CacheOutcome::Hit(value))),
            None if policy.fails_on_miss() => Err(CanvasError::permanent(format!("cache policy REQUIRE missed key '{key}'"))),
            None => Ok((Some(key), CacheOutcome::Miss)),
        }
    }

    /// Writes `value` under `key` if the policy populates the cache (spec
    /// §4.1: everything but BYPASS writes-through on a miss).
    pub async fn populate(&self, context: &PipelineContext, key: &CacheKey, value: Value) -> Result<(), CanvasError> {
        if context.cache_policy.writes_cache() {
            self.store.put(key, value).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas_domain::cache::CacheKeyStrategy;
    use canvas_domain::value_objects::CachePolicy;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    struct Item {
        fingerprint: String,
    }

    struct FixedStrategy;
    impl CacheKeyStrategy<Item> for FixedStrategy {
        fn resolve(&self, item: &Item, _context: &PipelineContext) -> Option<CacheKey> {
            CacheKey::build("com.acme.Thing", &item.fingerprint, "")
        }
        fn supports_target(&self, _target_type: &TypeName) -> bool {
            true
        }
        fn priority(&self) -> i32 {
            1
        }
        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[derive(Default)]
    struct InMemoryStore {
        entries: Mutex<HashMap<String, String>>,
    }

    #[async_trait]
    impl CacheStore<String> for InMemoryStore {
        async fn get(&self, key: &CacheKey) -> Result<Option<String>, CanvasError> {
            Ok(self.entries.lock().get(key.as_str()).cloned())
        }
        async fn put(&self, key: &CacheKey, value: String) -> Result<(), CanvasError> {
            self.entries.lock().insert(key.as_str().to_string(), value);
            Ok(())
        }
    }

    fn ty() -> TypeName {
        TypeName::parse("com.acme.Thing").unwrap()
    }

    fn engine() -> (CachePolicyEngine<Item, String>, Arc<InMemoryStore>) {
        let mut registry = CacheKeyRegistry::new();
        registry.register(Arc::new(FixedStrategy));
        let store = Arc::new(InMemoryStore::default());
        (CachePolicyEngine::new(registry, store.clone()), store)
    }

    #[tokio::test]
    async fn bypass_never_reads() {
        let (engine, store) = engine();
        store.put(&CacheKey::build("com.acme.Thing", "fp", "").unwrap(), "v".into()).await.unwrap();
        let ctx = PipelineContext::new(CachePolicy::Bypass);
        let item = Item { fingerprint: "fp".into() };
        let (_, outcome) = engine.resolve(&item, &ctx, &ty()).await.unwrap();
        assert!(matches!(outcome, CacheOutcome::Miss));
    }

    #[tokio::test]
    async fn require_errors_on_miss() {
        let (engine, _store) = engine();
        let ctx = PipelineContext::new(CachePolicy::Require);
        let item = Item { fingerprint: "fp".into() };
        assert!(engine.resolve(&item, &ctx, &ty()).await.is_err());
    }

    #[tokio::test]
    async fn prefer_hits_after_populate() {
        let (engine, _store) = engine();
        let ctx = PipelineContext::new(CachePolicy::Prefer);
        let item = Item { fingerprint: "fp".into() };
        let (key, outcome) = engine.resolve(&item, &ctx, &ty()).await.unwrap();
        assert!(matches!(outcome, CacheOutcome::Miss));
        let key = key.unwrap();
        engine.populate(&ctx, &key, "computed".into()).await.unwrap();
        let (_, outcome) = engine.resolve(&item, &ctx, &ty()).await.unwrap();
        assert!(matches!(outcome, CacheOutcome::Hit(v) if v == "computed"));
    }

    #[tokio::test]
    async fn cache_only_never_reads_but_still_writes() {
        let (engine, store) = engine();
        let ctx = PipelineContext::new(CachePolicy::CacheOnly);
        let item = Item { fingerprint: "fp".into() };
        let (key, outcome) = engine.resolve(&item, &ctx, &ty()).await.unwrap();
        assert!(matches!(outcome, CacheOutcome::Miss));
        engine.populate(&ctx, &key.unwrap(), "computed".into()).await.unwrap();
        assert!(store.entries.lock().contains_key("com.acme.Thing::fp"));
    }
}
