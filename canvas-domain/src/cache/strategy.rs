use crate::entities::PipelineContext;
use crate::value_objects::{CacheKey, TypeName};

/// A pluggable cache key derivation strategy.
///
/// Strategies are consulted in descending [`CacheKeyStrategy::priority`]
/// order by [`super::CacheKeyRegistry`]; the first strategy that both
/// supports the expected target type and returns a non-empty key wins.
pub trait CacheKeyStrategy<Item>: Send + Sync {
    /// Computes a cache key for `item` in the given context, or `None` if
    /// this strategy cannot derive one (e.g. it lacks the fingerprint it
    /// needs — spec §4.1: "MUST return empty, not a partial key").
    fn resolve(&self, item: &Item, context: &PipelineContext) -> Option<CacheKey>;

    /// Whether this strategy applies to the given target type.
    fn supports_target(&self, target_type: &TypeName) -> bool;

    /// Higher priority strategies are tried first.
    fn priority(&self) -> i32;

    /// Human-readable strategy name, used in diagnostics.
    fn name(&self) -> &str;
}
