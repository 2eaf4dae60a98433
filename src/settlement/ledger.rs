//! Per-player reconciliation: losses, weight, share and signed due.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::CostTable;
use crate::report::UnitCounts;
use crate::resources::Resources;
use crate::settlement::hybrid::hybrid_due;
use crate::settlement::weights::{fleet_weight, resource_losses, shares};

/// Weight of a player left out of a manual override.
pub const DEFAULT_MANUAL_WEIGHT: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerLedger {
    pub name: String,
    pub losses: Resources,
    pub in_field: UnitCounts,
    pub weight: f64,
    pub share: f64,
    pub recycled: Resources,
    pub due: Resources,
}

/// Entry for `player`: exact label first, then the first label equal
/// ignoring case.
pub fn lookup<'m, V>(map: &'m BTreeMap<String, V>, player: &str) -> Option<&'m V> {
    map.get(player).or_else(|| {
        let wanted = player.to_lowercase();
        map.iter()
            .find(|(label, _)| label.to_lowercase() == wanted)
            .map(|(_, value)| value)
    })
}

/// Reconcile the managed `players`. Labels in the maps that match no player
/// are ignored; players without entries lost and recycled nothing.
pub fn reconcile(
    players: &[String],
    losses: &BTreeMap<String, UnitCounts>,
    in_field: &BTreeMap<String, UnitCounts>,
    recycled: &BTreeMap<String, Resources>,
    costs: &CostTable,
    weights: Option<&BTreeMap<String, f64>>,
) -> Vec<PlayerLedger> {
    let empty = UnitCounts::new();
    let loss_triples: Vec<Resources> = players
        .iter()
        .map(|p| resource_losses(lookup(losses, p).unwrap_or(&empty), costs))
        .collect();
    let recycled_triples: Vec<Resources> = players
        .iter()
        .map(|p| lookup(recycled, p).copied().unwrap_or_default())
        .collect();
    let field: Vec<UnitCounts> = players
        .iter()
        .map(|p| lookup(in_field, p).cloned().unwrap_or_default())
        .collect();
    let player_weights: Vec<f64> = match weights {
        Some(manual) => players
            .iter()
            .map(|p| lookup(manual, p).copied().unwrap_or(DEFAULT_MANUAL_WEIGHT))
            .collect(),
        None => field.iter().map(|units| fleet_weight(units, costs)).collect(),
    };
    let player_shares = shares(&player_weights);
    let dues = hybrid_due(&loss_triples, &recycled_triples, &player_shares);

    players
        .iter()
        .zip(field)
        .enumerate()
        .map(|(i, (name, in_field))| PlayerLedger {
            name: name.clone(),
            losses: loss_triples[i],
            in_field,
            weight: player_weights[i],
            share: player_shares[i],
            recycled: recycled_triples[i],
            due: dues[i],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units(entries: &[(&str, u64)]) -> UnitCounts {
        entries.iter().map(|(u, c)| (u.to_string(), *c)).collect()
    }

    #[test]
    fn labels_match_exactly_then_ignoring_case() {
        let map = BTreeMap::from([("NOVA".to_string(), 1), ("Nova".to_string(), 2)]);
        assert_eq!(lookup(&map, "Nova"), Some(&2));
        assert_eq!(lookup(&map, "nova"), Some(&1));
        assert_eq!(lookup(&map, "Vega"), None);
    }

    #[test]
    fn unknown_labels_are_ignored() {
        let players = vec!["Nova".to_string()];
        let losses = BTreeMap::from([
            ("Nova".to_string(), units(&[("light_fighter", 1)])),
            ("Stranger".to_string(), units(&[("deathstar", 1)])),
        ]);
        let ledger = reconcile(&players, &losses, &BTreeMap::new(), &BTreeMap::new(), &CostTable::default(), None);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].losses, Resources::new(3_000.0, 1_000.0, 0.0));
        assert_eq!(ledger[0].share, 0.0);
        assert_eq!(ledger[0].due, Resources::new(3_000.0, 1_000.0, 0.0));
    }

    #[test]
    fn manual_weights_default_missing_players_to_one() {
        let players = vec!["Nova".to_string(), "Vega".to_string()];
        let weights = BTreeMap::from([("nova".to_string(), 3.0)]);
        let recycled = BTreeMap::from([("Vega".to_string(), Resources::new(4_000.0, 0.0, 0.0))]);
        let ledger = reconcile(
            &players,
            &BTreeMap::new(),
            &BTreeMap::new(),
            &recycled,
            &CostTable::default(),
            Some(&weights),
        );
        assert_eq!(ledger[0].weight, 3.0);
        assert_eq!(ledger[1].weight, 1.0);
        assert_eq!(ledger[0].due, Resources::new(3_000.0, 0.0, 0.0));
        assert_eq!(ledger[1].due, Resources::new(-3_000.0, 0.0, 0.0));
    }

    #[test]
    fn fleet_weights_drive_shares() {
        let players = vec!["Nova".to_string(), "Vega".to_string()];
        let in_field = BTreeMap::from([
            ("Nova".to_string(), units(&[("small_cargo", 3)])),
            ("Vega".to_string(), units(&[("small_cargo", 1)])),
        ]);
        let ledger = reconcile(&players, &BTreeMap::new(), &in_field, &BTreeMap::new(), &CostTable::default(), None);
        assert_eq!(ledger[0].share, 0.75);
        assert_eq!(ledger[1].share, 0.25);
    }
}
