//! A concrete [`CacheKeyStrategy`] built on a content hash (spec §4.1's
//! own example fingerprint: "e.g., content hash, URL, tokens hash").
//!
//! Most cacheable items in a pipeline reduce to "hash the bytes that
//! determine the output"; this strategy covers that common case so every
//! pipeline doesn't need to hand-roll a `Sha256` strategy from scratch.

use sha2::{Digest, Sha256};

use crate::entities::PipelineContext;
use crate::value_objects::{CacheKey, TypeName};

use super::strategy::CacheKeyStrategy;

/// Items this strategy can fingerprint: anything that can hand back the
/// bytes whose hash determines cache identity (e.g. a document's raw
/// content, a canonicalised request payload).
pub trait ContentAddressable {
    /// The bytes to hash, or `None` when this item has nothing stable to
    /// fingerprint yet — propagated as "no key" per spec §4.1, never a
    /// partial key.
    fn content_bytes(&self) -> Option<&[u8]>;
}

/// Hashes [`ContentAddressable::content_bytes`] with SHA-256 and embeds the
/// result, the target type's canonical name, and any active version tag
/// from the [`PipelineContext`].
pub struct ContentHashStrategy {
    target_type: TypeName,
    priority: i32,
}

impl ContentHashStrategy {
    pub fn new(target_type: TypeName, priority: i32) -> Self {
        Self { target_type, priority }
    }
}

impl<Item: ContentAddressable> CacheKeyStrategy<Item> for ContentHashStrategy {
    fn resolve(&self, item: &Item, context: &PipelineContext) -> Option<CacheKey> {
        let bytes = item.content_bytes()?;
        let digest = Sha256::digest(bytes);
        let fingerprint = hex::encode(digest);
        CacheKey::build(self.target_type.canonical(), &fingerprint, &context.version_tags.fingerprint())
    }

    fn supports_target(&self, target_type: &TypeName) -> bool {
        target_type == &self.target_type
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn name(&self) -> &str {
        "content-hash"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::{CachePolicy, VersionTags};

    struct Doc {
        body: Option<Vec<u8>>,
    }

    impl ContentAddressable for Doc {
        fn content_bytes(&self) -> Option<&[u8]> {
            self.body.as_deref()
        }
    }

    fn ty() -> TypeName {
        TypeName::parse("com.acme.Doc").unwrap()
    }

    #[test]
    fn missing_content_yields_no_key() {
        let strategy = ContentHashStrategy::new(ty(), 0);
        let ctx = PipelineContext::new(CachePolicy::Prefer);
        assert!(strategy.resolve(&Doc { body: None }, &ctx).is_none());
    }

    #[test]
    fn same_bytes_produce_the_same_key() {
        let strategy = ContentHashStrategy::new(ty(), 0);
        let ctx = PipelineContext::new(CachePolicy::Prefer);
        let a = strategy.resolve(&Doc { body: Some(b"hello".to_vec()) }, &ctx).unwrap();
        let b = strategy.resolve(&Doc { body: Some(b"hello".to_vec()) }, &ctx).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn version_tag_changes_invalidate_the_key() {
        let strategy = ContentHashStrategy::new(ty(), 0);
        let ctx_v1 = PipelineContext::new(CachePolicy::Prefer).with_version_tags(VersionTags::new("v1", "m1"));
        let ctx_v2 = PipelineContext::new(CachePolicy::Prefer).with_version_tags(VersionTags::new("v2", "m1"));
        let doc = Doc { body: Some(b"hello".to_vec()) };
        let key_v1 = strategy.resolve(&doc, &ctx_v1).unwrap();
        let key_v2 = strategy.resolve(&doc, &ctx_v2).unwrap();
        assert_ne!(key_v1, key_v2);
    }

    #[test]
    fn key_embeds_target_type_name() {
        let strategy = ContentHashStrategy::new(ty(), 0);
        let ctx = PipelineContext::new(CachePolicy::Prefer);
        let key = strategy.resolve(&Doc { body: Some(b"hello".to_vec()) }, &ctx).unwrap();
        assert!(key.contains("com.acme.Doc"));
    }
}
