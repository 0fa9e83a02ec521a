// Zone count snapshots
//
// The editor and dashboard read the same backend resource through two
// different response contracts, kept as separate types.
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Editor view of `/zone_counts`: totals keyed by label, alerts precomputed
/// by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorSnapshot {
    pub total: i64,
    pub zones: IndexMap<String, i64>,
    pub alerts: Vec<String>,
}

/// One entry of the dashboard view of `/zone_counts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneReading {
    pub label: String,
    pub count: i64,
    pub threshold: i64,
}

impl ZoneReading {
    pub fn new(label: impl Into<String>, count: i64, threshold: i64) -> Self {
        Self {
            label: label.into(),
            count,
            threshold,
        }
    }

    pub fn exceeds_threshold(&self) -> bool {
        self.count > self.threshold
    }

    pub fn alert(&self) -> Option<String> {
        self.exceeds_threshold()
            .then(|| format!("⚠ Zone '{}' exceeded threshold!", self.label))
    }
}
