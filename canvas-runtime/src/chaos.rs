//! Test-only chaos markers.
//!
//! `__FAIL_TRANSIENT_N__` and `__FAIL_PERMANENT__` embedded in a payload are
//! honoured only when [`ChaosGate::enabled`] is set; otherwise they are
//! ordinary data and MUST NOT be interpreted. These markers must never be
//! accepted from untrusted inputs — callers gate them behind an explicit
//! test/staging flag, never production config.

use std::collections::HashMap;

use parking_lot::Mutex;

const TRANSIENT_PREFIX: &str = "__FAIL_TRANSIENT_";
const TRANSIENT_SUFFIX: &str = "__";
const PERMANENT_MARKER: &str = "__FAIL_PERMANENT__";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChaosMarker {
    Transient { budget: u32 },
    Permanent,
}

/// Parses a chaos marker out of a raw payload string, if present.
pub fn parse_marker(payload: &str) -> Option<ChaosMarker> {
    if payload.contains(PERMANENT_MARKER) {
        return Some(ChaosMarker::Permanent);
    }
    let start = payload.find(TRANSIENT_PREFIX)?;
    let rest = &payload[start + TRANSIENT_PREFIX.len()..];
    let end = rest.find(TRANSIENT_SUFFIX)?;
    let budget: u32 = rest[..end].parse().ok()?;
    Some(ChaosMarker::Transient { budget })
}

/// Gate controlling whether chaos markers are honoured at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChaosGate {
    pub enabled: bool,
}

/// Per-key transient attempt counters, tracked by `(doc_id, marker_value)`
///. Cleared on success or permanent parking so a later
/// invocation with the same doc id starts its retry budget fresh.
#[derive(Default)]
pub struct ChaosCounters {
    attempts: Mutex<HashMap<(String, String), u32>>,
}

impl ChaosCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments and returns the attempt count so far for `(doc_id,
    /// marker)`, e.g. to compare against the marker's declared budget.
    pub fn record_attempt(&self, doc_id: &str, marker: &str) -> u32 {
        let mut attempts = self.attempts.lock();
        let counter = attempts.entry((doc_id.to_string(), marker.to_string())).or_insert(0);
        *counter += 1;
        *counter
    }

    /// Clears the counter for `(doc_id, marker)` on success or permanent
    /// parking.
    pub fn clear(&self, doc_id: &str, marker: &str) {
        self.attempts.lock().remove(&(doc_id.to_string(), marker.to_string()));
    }

    #[cfg(test)]
    fn attempts_for(&self, doc_id: &str, marker: &str) -> u32 {
        *self.attempts.lock().get(&(doc_id.to_string(), marker.to_string())).unwrap_or(&0)
    }
}
