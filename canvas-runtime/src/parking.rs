//! Parking Lot.
//!
//! Permanent failures and exhausted-retry transient failures are parked
//! here instead of being dropped: an append-only, bounded record of what
//! failed and why, inspectable without replaying the stream.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use ulid::Ulid;

use canvas_domain::error::FailureKind;

#[derive(Debug, Clone)]
pub struct ParkedItem {
    /// Time-sortable so an operator paging through a snapshot sees parked
    /// items in the order they landed, independent of `parked_at`'s clock
    /// resolution.
    pub record_id: Ulid,
    pub external_id: String,
    pub kind: FailureKind,
    pub message: String,
    pub parked_at: DateTime<Utc>,
}

/// Bounded append-only sink. Once `capacity` is reached, further parks are
/// dropped with a warning rather than evicting older records — parked items
/// are evidence for an operator, not a cache.
pub struct ParkingLot {
    capacity: usize,
    items: Mutex<Vec<ParkedItem>>,
}

impl ParkingLot {
    pub fn new(capacity: usize) -> Self {
        Self { capacity, items: Mutex::new(Vec::new()) }
    }

    /// Parks `item`, returning `false` (and logging) if the lot is full.
    pub fn park(&self, external_id: impl Into<String>, kind: FailureKind, message: impl Into<String>, now: DateTime<Utc>) -> bool {
        let mut items = self.items.lock();
        if items.len() >= self.capacity {
            tracing::warn!(capacity = self.capacity, "parking lot full; dropping parked item");
            return false;
        }
        items.push(ParkedItem { record_id: Ulid::new(), external_id: external_id.into(), kind, message: message.into(), parked_at: now });
        true
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> Vec<ParkedItem> {
        self.items.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z").unwrap().with_timezone(&Utc)
    }

    #[test]
    fn parks_until_capacity_then_drops() {
        let lot = ParkingLot::new(1);
        assert!(lot.park("a", FailureKind::PermanentFailure, "boom", now()));
        assert!(!lot.park("b", FailureKind::PermanentFailure, "boom again", now()));
        assert_eq!(lot.len(), 1);
    }

    #[test]
    fn snapshot_reflects_parked_items() {
        let lot = ParkingLot::new(4);
        lot.park("a", FailureKind::PermanentFailure, "boom", now());
        let snap = lot.snapshot();
        assert_eq!(snap.len(), 1);
        assert_eq!(snap[0].external_id, "a");
    }
}
