use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Unit id -> count.
pub type UnitCounts = BTreeMap<String, u64>;

/// Fleet of one report label. `initial >= remaining` per unit is expected but
/// not enforced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetRecord {
    #[serde(default)]
    pub initial: UnitCounts,
    #[serde(default, rename = "final")]
    pub remaining: UnitCounts,
}

impl FleetRecord {
    pub fn add_initial(&mut self, unit: &str, qty: u64) {
        *self.initial.entry(unit.to_string()).or_insert(0) += qty;
    }

    pub fn add_remaining(&mut self, unit: &str, qty: u64) {
        *self.remaining.entry(unit.to_string()).or_insert(0) += qty;
    }

    pub fn initial_of(&self, unit: &str) -> u64 {
        self.initial.get(unit).copied().unwrap_or(0)
    }

    pub fn remaining_of(&self, unit: &str) -> u64 {
        self.remaining.get(unit).copied().unwrap_or(0)
    }

    /// Per-unit losses (`initial - final`, floored at 0); units without losses are omitted.
    pub fn losses(&self) -> UnitCounts {
        self.initial
            .iter()
            .filter_map(|(unit, initial)| {
                let lost = initial.saturating_sub(self.remaining_of(unit));
                (lost > 0).then(|| (unit.clone(), lost))
            })
            .collect()
    }

    /// Units whose final count exceeds the initial one (parse anomalies).
    pub fn anomalies(&self) -> Vec<&str> {
        self.remaining
            .iter()
            .filter(|(unit, remaining)| **remaining > self.initial_of(unit))
            .map(|(unit, _)| unit.as_str())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.initial.is_empty() && self.remaining.is_empty()
    }
}
