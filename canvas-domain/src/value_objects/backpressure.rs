use serde::{Deserialize, Serialize};

/// Default bounded-channel capacity when none is configured (spec §4.9,
/// §8 boundary behavior).
pub const DEFAULT_CAPACITY: usize = 256;

/// The overflow policy applied at every stream boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverflowStrategy {
    /// Accumulate up to the bounded capacity.
    Buffer,
    /// Discard the newest item on overflow.
    Drop,
}

/// A normalised backpressure policy: strategy plus a positive capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackpressurePolicy {
    pub strategy: OverflowStrategy,
    pub capacity: usize,
}

impl BackpressurePolicy {
    /// Normalises an optionally-absent strategy token and a possibly
    /// non-positive capacity per spec §4.9 / §8: null/blank/unknown
    /// strategy → BUFFER; capacity ≤ 0 → default (256).
    pub fn normalise(strategy_token: Option<&str>, capacity: i64) -> Self {
        let strategy = match strategy_token.map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("drop") => OverflowStrategy::Drop,
            Some(s) if s.eq_ignore_ascii_case("buffer") => OverflowStrategy::Buffer,
            _ => OverflowStrategy::Buffer,
        };
        let capacity = if capacity <= 0 { DEFAULT_CAPACITY } else { capacity as usize };
        Self { strategy, capacity }
    }
}

impl Default for BackpressurePolicy {
    fn default() -> Self {
        Self::normalise(None, 0)
    }
}
