use serde::{Deserialize, Serialize};

/// The five cache policies enumerated in spec §4.1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CachePolicy {
    /// Miss → fail pipeline.
    Require,
    /// Miss → compute, then write-through.
    Prefer,
    /// Ignore cache entirely, don't populate.
    Bypass,
    /// Populate but don't read.
    CacheOnly,
    /// Read-and-populate on miss.
    WriteThrough,
}

impl CachePolicy {
    pub fn reads_cache(&self) -> bool {
        !matches!(self, Self::Bypass | Self::CacheOnly)
    }

    pub fn writes_cache(&self) -> bool {
        !matches!(self, Self::Bypass)
    }

    /// Whether a miss under this policy should fail the pipeline instead of
    /// falling through to computing the value.
    pub fn fails_on_miss(&self) -> bool {
        matches!(self, Self::Require)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_fails_on_miss_others_do_not() {
        assert!(CachePolicy::Require.fails_on_miss());
        assert!(!CachePolicy::Prefer.fails_on_miss());
        assert!(!CachePolicy::Bypass.fails_on_miss());
    }

    #[test]
    fn bypass_neither_reads_nor_writes() {
        assert!(!CachePolicy::Bypass.reads_cache());
        assert!(!CachePolicy::Bypass.writes_cache());
    }

    #[test]
    fn cache_only_writes_without_reading() {
        assert!(!CachePolicy::CacheOnly.reads_cache());
        assert!(CachePolicy::CacheOnly.writes_cache());
    }
}
