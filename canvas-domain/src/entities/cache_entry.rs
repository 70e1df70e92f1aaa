use crate::value_objects::CacheKey;

/// A deterministic mapping from a [`CacheKey`] to a domain item.
///
/// `Value` is generic because the cache registry is domain-type agnostic;
/// concrete stores (runtime crate) serialize/deserialize as needed.
#[derive(Debug, Clone)]
pub struct CacheEntry<Value> {
    pub key: CacheKey,
    pub value: Value,
}

impl<Value> CacheEntry<Value> {
    pub fn new(key: CacheKey, value: Value) -> Self {
        Self { key, value }
    }
}
