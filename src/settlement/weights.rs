//! Resource losses and sharing weights from unit counts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::CostTable;
use crate::report::UnitCounts;
use crate::resources::Resources;

/// `Σ lost[u] × cost[u]` per resource.
pub fn resource_losses(lost: &UnitCounts, costs: &CostTable) -> Resources {
    lost.iter()
        .map(|(unit, count)| costs.get(unit) * (*count as f64))
        .sum()
}

/// `Σ inField[u] × totalCost[u]`.
pub fn fleet_weight(in_field: &UnitCounts, costs: &CostTable) -> f64 {
    in_field
        .iter()
        .map(|(unit, count)| costs.get(unit).total() * (*count as f64))
        .sum()
}

/// Normalized shares; a zero (or non-positive) total yields all zeros.
pub fn shares(weights: &[f64]) -> Vec<f64> {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return vec![0.0; weights.len()];
    }
    weights.iter().map(|w| w / total).collect()
}

/// Parse `"Name=1, Other=2"`. Parts without `=` or with a non-numeric value
/// are skipped.
pub fn parse_weight_overrides(raw: &str) -> BTreeMap<String, f64> {
    raw.split(',')
        .filter_map(|part| {
            let (name, value) = part.split_once('=')?;
            let value = value.trim().parse::<f64>().ok()?;
            Some((name.trim().to_string(), value))
        })
        .collect()
}

/// Manual weights as accepted on input: the text syntax or a JSON map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WeightOverrides {
    Text(String),
    Map(BTreeMap<String, f64>),
}

impl WeightOverrides {
    pub fn into_map(self) -> BTreeMap<String, f64> {
        match self {
            WeightOverrides::Text(raw) => parse_weight_overrides(&raw),
            WeightOverrides::Map(map) => map,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(entries: &[(&str, u64)]) -> UnitCounts {
        entries.iter().map(|(u, c)| (u.to_string(), *c)).collect()
    }

    #[test]
    fn losses_are_cost_weighted() {
        let costs = CostTable::default();
        let lost = counts(&[("light_fighter", 10), ("cruiser", 1)]);
        assert_eq!(resource_losses(&lost, &costs), Resources::new(50_000.0, 17_000.0, 2_000.0));
    }

    #[test]
    fn unknown_units_weigh_nothing() {
        let costs = CostTable::default();
        let field = counts(&[("warp_core", 50), ("small_cargo", 2)]);
        assert_eq!(fleet_weight(&field, &costs), 8_000.0);
    }

    #[test]
    fn zero_total_weight_gives_zero_shares() {
        assert_eq!(shares(&[0.0, 0.0]), vec![0.0, 0.0]);
        assert_eq!(shares(&[1.0, 3.0]), vec![0.25, 0.75]);
        assert!(shares(&[]).is_empty());
    }

    #[test]
    fn weight_text_syntax() {
        let parsed = parse_weight_overrides(" Nova = 2, Vega=0.5, broken, Orion=x ");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed["Nova"], 2.0);
        assert_eq!(parsed["Vega"], 0.5);
        assert!(parse_weight_overrides("").is_empty());
    }

    #[test]
    fn overrides_from_json_map_or_text() {
        let from_text: WeightOverrides = serde_json::from_str("\"A=1\"").expect("text");
        let from_map: WeightOverrides = serde_json::from_str("{\"A\": 1.0}").expect("map");
        assert_eq!(from_text.into_map(), from_map.into_map());
    }
}
