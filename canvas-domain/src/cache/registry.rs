use std::sync::Arc;

use crate::cache::strategy::CacheKeyStrategy;
use crate::entities::PipelineContext;
use crate::value_objects::{CacheKey, TypeName};

/// Priority-ordered registry of [`CacheKeyStrategy`] implementations.
///
/// Strategies are kept sorted by descending priority at registration time
/// (registries are small and built once at startup, so there is no benefit
/// to a heap over a sorted `Vec`).
pub struct CacheKeyRegistry<Item> {
    strategies: Vec<Arc<dyn CacheKeyStrategy<Item>>>,
}

impl<Item> Default for CacheKeyRegistry<Item> {
    fn default() -> Self {
        Self { strategies: Vec::new() }
    }
}

impl<Item> CacheKeyRegistry<Item> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, strategy: Arc<dyn CacheKeyStrategy<Item>>) {
        self.strategies.push(strategy);
        self.strategies.sort_by(|a, b| b.priority().cmp(&a.priority()));
    }

    /// Resolution contract: iterate strategies in descending
    /// priority; the first strategy that both supports `target_type` and
    /// returns a non-empty key wins. If no targeted strategy matches, a
    /// single non-targeted fallback pass is allowed — i.e. the first
    /// strategy (regardless of `supports_target`) that returns a key.
    pub fn resolve(&self, item: &Item, context: &PipelineContext, target_type: &TypeName) -> Option<CacheKey> {
        for strategy in &self.strategies {
            if strategy.supports_target(target_type) {
                if let Some(key) = strategy.resolve(item, context) {
                    return Some(key);
                }
            }
        }
        // Fallback pass: only reached when no targeted strategy matched.
        for strategy in &self.strategies {
            if !strategy.supports_target(target_type) {
                if let Some(key) = strategy.resolve(item, context) {
                    return Some(key);
                }
            }
        }
        None
    }
}
