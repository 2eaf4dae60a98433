//! Cost table used by the loss and weight calculations. Starts from the catalog
//! and accepts per-unit overrides (universe speed tweaks, event discounts).

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::units::UNITS;
use crate::config::ConfigError;
use crate::resources::Resources;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostTable {
    costs: BTreeMap<String, Resources>,
}

impl Default for CostTable {
    fn default() -> Self {
        Self {
            costs: UNITS
                .iter()
                .map(|unit| (unit.id.to_string(), unit.cost))
                .collect(),
        }
    }
}

/// One override entry. In YAML either `[metal, crystal, deuterium]` or a map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CostEntry {
    Triple([f64; 3]),
    Named(Resources),
}

impl From<CostEntry> for Resources {
    fn from(entry: CostEntry) -> Self {
        match entry {
            CostEntry::Triple([m, c, d]) => Resources::new(m, c, d),
            CostEntry::Named(r) => r,
        }
    }
}

impl CostTable {
    pub fn empty() -> Self {
        Self {
            costs: BTreeMap::new(),
        }
    }

    /// Cost of one unit; unknown ids cost nothing.
    pub fn get(&self, unit_id: &str) -> Resources {
        self.costs.get(unit_id).copied().unwrap_or_default()
    }

    pub fn set(&mut self, unit_id: impl Into<String>, cost: Resources) {
        self.costs.insert(unit_id.into(), cost);
    }

    pub fn with_overrides<I, K>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, Resources)>,
        K: Into<String>,
    {
        for (id, cost) in overrides {
            self.set(id, cost);
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Resources)> {
        self.costs.iter().map(|(id, cost)| (id.as_str(), cost))
    }
}

/// Parse an override document (YAML or JSON).
pub fn parse_cost_overrides(raw: &str) -> Result<BTreeMap<String, Resources>, serde_yaml::Error> {
    let parsed: BTreeMap<String, CostEntry> = serde_yaml::from_str(raw)?;
    Ok(parsed.into_iter().map(|(id, entry)| (id, entry.into())).collect())
}

pub fn load_cost_overrides(path: impl AsRef<Path>) -> Result<BTreeMap<String, Resources>, ConfigError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_cost_overrides(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
