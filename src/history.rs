use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::benchmark::Benchmarks;
use crate::types::FootprintResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FootprintRecord {
    pub footprint_id: Uuid,
    pub result: FootprintResult,
    pub benchmarks: Benchmarks,
}

/// Append-only footprint history of one session, kept ordered by
/// `calculated_at`. The most recent record wins for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FootprintHistory {
    records: Vec<FootprintRecord>,
}

impl FootprintHistory {
    pub fn new() -> Self {
        FootprintHistory::default()
    }

    /// Stores a result and returns its id. Out-of-order timestamps are placed
    /// after every record with an equal or earlier timestamp.
    pub fn record(&mut self, result: FootprintResult, benchmarks: Benchmarks) -> Uuid {
        let footprint_id = Uuid::new_v4();
        let at = result.calculated_at;
        let pos = self.records.partition_point(|r| r.result.calculated_at <= at);
        self.records.insert(
            pos,
            FootprintRecord {
                footprint_id,
                result,
                benchmarks,
            },
        );
        footprint_id
    }

    pub fn latest(&self) -> Option<&FootprintRecord> {
        self.records.last()
    }

    pub fn get(&self, footprint_id: Uuid) -> Option<&FootprintRecord> {
        self.records.iter().find(|r| r.footprint_id == footprint_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Up to `limit` most recent records, oldest first.
    pub fn recent(&self, limit: usize) -> &[FootprintRecord] {
        let start = self.records.len().saturating_sub(limit);
        &self.records[start..]
    }

    pub fn iter(&self) -> impl Iterator<Item = &FootprintRecord> {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CategoryEmissions, CategoryResult};
    use chrono::{TimeZone, Utc};

    fn result(day: u32, food: f64) -> FootprintResult {
        let mut e = CategoryEmissions::default();
        e.food = CategoryResult::new(food);
        FootprintResult::from_emissions(e, Utc.with_ymd_and_hms(2025, 5, day, 9, 0, 0).unwrap())
    }

    fn benchmarks() -> Benchmarks {
        Benchmarks {
            local_average: 4800.0,
            national_average: 4800.0,
            global_target: 2000.0,
            percentile: 50,
        }
    }

    #[test]
    fn latest_is_most_recent_by_timestamp() {
        let mut h = FootprintHistory::new();
        h.record(result(3, 300.0), benchmarks());
        let early = h.record(result(1, 100.0), benchmarks());
        h.record(result(2, 200.0), benchmarks());

        assert_eq!(h.len(), 3);
        assert_eq!(h.latest().unwrap().result.total_emissions, 300.0);
        assert_eq!(h.iter().next().unwrap().footprint_id, early);
    }

    #[test]
    fn recent_returns_tail_in_ascending_order() {
        let mut h = FootprintHistory::new();
        for day in 1..=5 {
            h.record(result(day, day as f64), benchmarks());
        }
        let tail: Vec<f64> = h.recent(3).iter().map(|r| r.result.total_emissions).collect();
        assert_eq!(tail, vec![3.0, 4.0, 5.0]);
        assert_eq!(h.recent(12).len(), 5);
    }
}
