//! Persisted operational blocking entity (§3, §4.8).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use domain::BlockingScope;
use shared::BlockingId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationalBlocking {
    pub id: BlockingId,
    pub scope: BlockingScope,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub reason: String,
}

impl OperationalBlocking {
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start < end && self.end > start
    }
}

/// Fields needed to persist a new blocking; id is assigned at insertion.
#[derive(Debug, Clone)]
pub struct NewOperationalBlocking {
    pub scope: BlockingScope,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_blocking_overlaps_half_open_window() {
        let b = OperationalBlocking {
            id: BlockingId::new(),
            scope: BlockingScope::Business,
            start: Utc.with_ymd_and_hms(2026, 7, 31, 10, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2026, 7, 31, 14, 0, 0).unwrap(),
            reason: "maintenance".to_string(),
        };
        assert!(b.overlaps(
            Utc.with_ymd_and_hms(2026, 7, 31, 13, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 7, 31, 15, 0, 0).unwrap()
        ));
        assert!(!b.overlaps(
            Utc.with_ymd_and_hms(2026, 7, 31, 14, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 7, 31, 15, 0, 0).unwrap()
        ));
    }
}
