//! End-to-end settlement: parsed report and manual entries in, per-player
//! balances and aggregated transfers out.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::catalog::CostEntry;
use crate::config::{ConfigError, Settings};
use crate::report::{normalize_payload, parse_combat_report, BattleMeta, FleetsByLabel, UnitCounts};
use crate::resources::Resources;
use crate::settlement::ledger::{reconcile, PlayerLedger};
use crate::settlement::solver::{settle_resources, AggregatedTransfer};
use crate::settlement::transport::{ships_needed, TransportPreset};
use crate::settlement::weights::WeightOverrides;

#[derive(Debug, Error)]
pub enum SettlementError {
    #[error("at least one player is required")]
    NoPlayers,
    #[error("player '{0}' is listed more than once")]
    DuplicatePlayer(String),
    #[error("tolerance must be a finite non-negative number, got {0}")]
    InvalidTolerance(f64),
    #[error("weight for '{0}' must be a finite non-negative number")]
    NegativeWeight(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Fleet entered by hand; replaces the parsed record of the same player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManualFleet {
    #[serde(default)]
    pub lost: UnitCounts,
    #[serde(default)]
    pub in_field: UnitCounts,
}

/// Resources a player collected, by collector type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RecycledClaim {
    #[serde(default)]
    pub recyclers: Resources,
    #[serde(default)]
    pub pathfinders: Resources,
}

impl RecycledClaim {
    pub fn total(&self) -> Resources {
        self.recyclers + self.pathfinders
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettlementRequest {
    pub players: Vec<String>,
    /// Raw report payload (plain text, HTML or XML envelope).
    #[serde(default)]
    pub report: Option<String>,
    #[serde(default)]
    pub manual: BTreeMap<String, ManualFleet>,
    #[serde(default)]
    pub recycled: BTreeMap<String, RecycledClaim>,
    #[serde(default)]
    pub weights: Option<WeightOverrides>,
    #[serde(default)]
    pub tolerance: Option<f64>,
    #[serde(default)]
    pub transport: Option<TransportPreset>,
    #[serde(default)]
    pub cost_overrides: BTreeMap<String, CostEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSettlement {
    pub name: String,
    pub losses: Resources,
    pub recycled: Resources,
    pub weight: f64,
    pub share: f64,
    pub due: Resources,
    pub to_give: Resources,
    pub to_receive: Resources,
    pub ships: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementReport {
    pub players: Vec<PlayerSettlement>,
    pub transfers: Vec<AggregatedTransfer>,
    pub fleets: FleetsByLabel,
    pub meta: BattleMeta,
    pub transport: TransportPreset,
    pub capacity: u64,
    pub tolerance: f64,
}

fn validate(request: &SettlementRequest, tolerance: f64) -> Result<(), SettlementError> {
    if request.players.is_empty() {
        return Err(SettlementError::NoPlayers);
    }
    let mut seen = HashSet::new();
    for player in &request.players {
        if !seen.insert(player.to_lowercase()) {
            return Err(SettlementError::DuplicatePlayer(player.clone()));
        }
    }
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(SettlementError::InvalidTolerance(tolerance));
    }
    Ok(())
}

fn player_summary(ledger: &PlayerLedger, transfers: &[AggregatedTransfer], capacity: u64) -> PlayerSettlement {
    let to_give: Resources = transfers
        .iter()
        .filter(|t| t.from == ledger.name)
        .map(AggregatedTransfer::amounts)
        .sum();
    let to_receive: Resources = transfers
        .iter()
        .filter(|t| t.to == ledger.name)
        .map(AggregatedTransfer::amounts)
        .sum();
    PlayerSettlement {
        name: ledger.name.clone(),
        losses: ledger.losses,
        recycled: ledger.recycled,
        weight: ledger.weight,
        share: ledger.share,
        due: ledger.due,
        to_give,
        to_receive,
        ships: ships_needed(to_give.total().max(to_receive.total()), capacity),
    }
}

pub fn run_settlement(request: SettlementRequest, settings: &Settings) -> Result<SettlementReport, SettlementError> {
    let tolerance = request.tolerance.unwrap_or(settings.tolerance);
    validate(&request, tolerance)?;
    let transport = request.transport.unwrap_or(settings.transport);
    let capacity = transport.capacity();

    let costs = settings
        .cost_table()?
        .with_overrides(request.cost_overrides.iter().map(|(id, entry)| (id.clone(), Resources::from(*entry))));

    let parsed = request
        .report
        .as_deref()
        .map(|raw| parse_combat_report(&normalize_payload(raw)))
        .unwrap_or_default();

    let mut losses: BTreeMap<String, UnitCounts> = BTreeMap::new();
    let mut in_field: BTreeMap<String, UnitCounts> = BTreeMap::new();
    for (label, fleet) in &parsed.fleets {
        losses.insert(label.clone(), fleet.losses());
        in_field.insert(label.clone(), fleet.initial.clone());
    }
    for (name, manual) in &request.manual {
        losses.insert(name.clone(), manual.lost.clone());
        in_field.insert(name.clone(), manual.in_field.clone());
    }
    let recycled: BTreeMap<String, Resources> = request
        .recycled
        .iter()
        .map(|(name, claim)| (name.clone(), claim.total()))
        .collect();

    let weights = request.weights.clone().map(WeightOverrides::into_map);
    if let Some(manual) = &weights {
        if let Some((name, _)) = manual.iter().find(|(_, w)| !w.is_finite() || **w < 0.0) {
            return Err(SettlementError::NegativeWeight(name.clone()));
        }
    }

    let ledger = reconcile(&request.players, &losses, &in_field, &recycled, &costs, weights.as_ref());
    let balances: Vec<(String, Resources)> = ledger.iter().map(|p| (p.name.clone(), p.due)).collect();
    let transfers = settle_resources(&balances, tolerance, capacity);
    let players = ledger
        .iter()
        .map(|p| player_summary(p, &transfers, capacity))
        .collect::<Vec<_>>();

    debug!(
        players = players.len(),
        fleets = parsed.fleets.len(),
        manual = request.manual.len(),
        "settlement inputs"
    );
    info!(transfers = transfers.len(), transport = %transport, "settlement computed");

    Ok(SettlementReport {
        players,
        transfers,
        fleets: parsed.fleets,
        meta: parsed.meta,
        transport,
        capacity,
        tolerance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(players: &[&str]) -> SettlementRequest {
        SettlementRequest {
            players: players.iter().map(|p| p.to_string()).collect(),
            ..SettlementRequest::default()
        }
    }

    #[test]
    fn rejects_empty_and_duplicate_rosters() {
        let settings = Settings::default();
        assert!(matches!(run_settlement(request(&[]), &settings), Err(SettlementError::NoPlayers)));
        assert!(matches!(
            run_settlement(request(&["Nova", "nova"]), &settings),
            Err(SettlementError::DuplicatePlayer(name)) if name == "nova"
        ));
    }

    #[test]
    fn rejects_negative_tolerance_and_weights() {
        let settings = Settings::default();
        let mut req = request(&["Nova"]);
        req.tolerance = Some(-1.0);
        assert!(matches!(run_settlement(req, &settings), Err(SettlementError::InvalidTolerance(_))));

        let mut req = request(&["Nova"]);
        req.weights = Some(WeightOverrides::Text("Nova=-2".to_string()));
        assert!(matches!(run_settlement(req, &settings), Err(SettlementError::NegativeWeight(_))));
    }

    #[test]
    fn manual_entries_and_claims_produce_transfers() {
        let mut req = request(&["Nova", "Vega"]);
        req.manual.insert(
            "Nova".to_string(),
            ManualFleet {
                lost: UnitCounts::from([("light_fighter".to_string(), 10)]),
                in_field: UnitCounts::from([("light_fighter".to_string(), 10)]),
            },
        );
        req.manual.insert(
            "Vega".to_string(),
            ManualFleet {
                lost: UnitCounts::new(),
                in_field: UnitCounts::from([("light_fighter".to_string(), 10)]),
            },
        );
        req.recycled.insert(
            "Vega".to_string(),
            RecycledClaim {
                recyclers: Resources::new(50_000.0, 10_000.0, 0.0),
                pathfinders: Resources::new(10_000.0, 0.0, 0.0),
            },
        );

        let report = run_settlement(req, &Settings::default()).expect("settlement");
        // gain = 60k - 30k metal, 10k - 10k crystal; split evenly.
        assert_eq!(report.players[0].due, Resources::new(45_000.0, 10_000.0, 0.0));
        assert_eq!(report.players[1].due, Resources::new(-45_000.0, -10_000.0, 0.0));
        assert_eq!(report.transfers.len(), 1);
        assert_eq!(report.transfers[0].from, "Vega");
        assert_eq!(report.transfers[0].total, 55_000.0);
        assert_eq!(report.transfers[0].ships, 3);
        assert_eq!(report.players[1].to_give.total(), 55_000.0);
        assert_eq!(report.players[0].ships, 3);
    }
}
