//! Launch statistics used for usage sorting.

use crate::Result;
use crate::host::UsageStats;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

const HOUR_MS: u64 = 60 * 60 * 1000;

/// Get current timestamp in milliseconds.
// u128 millis fits in u64 for realistic timestamps (until year 584942417)
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
    /// Total launches
    #[serde(default)]
    pub count: u32,

    /// Last launch in milliseconds since epoch
    #[serde(default)]
    pub last_used: u64,
}

impl UsageRecord {
    /// `count * recency multiplier`, where the multiplier drops from 4 (last
    /// hour) to 2 (last day), 1 (last week) and 0.5 (older).
    // Elapsed hours only feed a coarse bucket, precision loss is irrelevant
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn score(&self, now: u64) -> f64 {
        if self.count == 0 {
            return 0.0;
        }

        let hours_since_use = now.saturating_sub(self.last_used) as f64 / HOUR_MS as f64;
        let recency_multiplier = if hours_since_use < 1.0 {
            4.0
        } else if hours_since_use < 24.0 {
            2.0
        } else if hours_since_use < 168.0 {
            1.0
        } else {
            0.5
        };

        f64::from(self.count) * recency_multiplier
    }
}

/// Per-app launch counts with recency, persisted as JSON.
#[derive(Debug, Default)]
pub struct UsageTracker {
    records: RefCell<HashMap<String, UsageRecord>>,
}

impl UsageTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_records(records: HashMap<String, UsageRecord>) -> Self {
        Self {
            records: RefCell::new(records),
        }
    }

    /// Load records from `path`. A missing file yields an empty tracker.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid JSON.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let records: HashMap<String, UsageRecord> = serde_json::from_str(&content)?;
        Ok(Self::with_records(records))
    }

    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(&*self.records.borrow())?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn record_launch_at(&self, id: &str, now: u64) {
        let mut records = self.records.borrow_mut();
        let record = records.entry(id.to_string()).or_default();
        record.count = record.count.saturating_add(1);
        record.last_used = now;
    }

    #[must_use]
    pub fn record(&self, id: &str) -> Option<UsageRecord> {
        self.records.borrow().get(id).cloned()
    }

    /// Ranking at a fixed time. Higher scores rank first; unknown ids score 0.
    #[must_use]
    pub fn compare_at(&self, a: &str, b: &str, now: u64) -> Option<Ordering> {
        let records = self.records.borrow();
        let (ra, rb) = (records.get(a), records.get(b));
        if ra.is_none() && rb.is_none() {
            return None;
        }

        let score_a = ra.map_or(0.0, |r| r.score(now));
        let score_b = rb.map_or(0.0, |r| r.score(now));
        Some(score_b.total_cmp(&score_a))
    }
}

impl UsageStats for UsageTracker {
    fn compare(&self, a: &str, b: &str) -> Option<Ordering> {
        self.compare_at(a, b, now_millis())
    }

    fn comparator(&self) -> Box<dyn Fn(&str, &str) -> Option<Ordering> + '_> {
        let now = now_millis();
        Box::new(move |a, b| self.compare_at(a, b, now))
    }

    fn record_launch(&self, id: &str) {
        self.record_launch_at(id, now_millis());
    }
}
