//! Greedy debt settlement: largest debtor pays largest creditor until every
//! balance is within tolerance.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::resources::{Resource, Resources};
use crate::settlement::transport::ships_needed;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: String,
    pub to: String,
    pub amount: f64,
}

/// Transfers for one resource. Balances are signed (positive = owed to the
/// player). Produces at most `creditors + debtors - 1` transfers.
pub fn settle(balances: &[(String, f64)], tolerance: f64) -> Vec<Transfer> {
    let mut creditors: Vec<(&str, f64)> = balances
        .iter()
        .filter(|(_, b)| *b > tolerance)
        .map(|(name, b)| (name.as_str(), *b))
        .collect();
    let mut debtors: Vec<(&str, f64)> = balances
        .iter()
        .filter(|(_, b)| *b < -tolerance)
        .map(|(name, b)| (name.as_str(), -*b))
        .collect();
    // sort_by is stable: ties keep input order.
    creditors.sort_by(|a, b| b.1.total_cmp(&a.1));
    debtors.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut transfers = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < debtors.len() && j < creditors.len() {
        let amount = debtors[i].1.min(creditors[j].1);
        if amount > tolerance {
            transfers.push(Transfer {
                from: debtors[i].0.to_string(),
                to: creditors[j].0.to_string(),
                amount,
            });
        }
        debtors[i].1 -= amount;
        creditors[j].1 -= amount;
        if debtors[i].1 <= tolerance {
            i += 1;
        }
        if creditors[j].1 <= tolerance {
            j += 1;
        }
    }
    trace!(transfers = transfers.len(), "settled one resource");
    transfers
}

/// Summed transfers of one payer/payee pair across the three resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedTransfer {
    pub from: String,
    pub to: String,
    pub metal: f64,
    pub crystal: f64,
    pub deuterium: f64,
    pub total: f64,
    pub ships: u64,
}

impl AggregatedTransfer {
    pub fn amounts(&self) -> Resources {
        Resources::new(self.metal, self.crystal, self.deuterium)
    }
}

/// Settle each resource independently, then merge pairs in order of first
/// appearance (metal, then crystal, then deuterium).
pub fn settle_resources(
    balances: &[(String, Resources)],
    tolerance: f64,
    capacity: u64,
) -> Vec<AggregatedTransfer> {
    let mut merged: Vec<(String, String, Resources)> = Vec::new();
    for resource in Resource::ALL {
        let column: Vec<(String, f64)> = balances
            .iter()
            .map(|(name, due)| (name.clone(), due.get(resource)))
            .collect();
        for transfer in settle(&column, tolerance) {
            let slot = match merged
                .iter()
                .position(|(from, to, _)| *from == transfer.from && *to == transfer.to)
            {
                Some(idx) => &mut merged[idx].2,
                None => {
                    merged.push((transfer.from, transfer.to, Resources::ZERO));
                    let last = merged.len() - 1;
                    &mut merged[last].2
                }
            };
            slot.set(resource, slot.get(resource) + transfer.amount);
        }
    }

    merged
        .into_iter()
        .map(|(from, to, amounts)| AggregatedTransfer {
            from,
            to,
            metal: amounts.metal,
            crystal: amounts.crystal,
            deuterium: amounts.deuterium,
            total: amounts.total(),
            ships: ships_needed(amounts.total(), capacity),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balances(entries: &[(&str, f64)]) -> Vec<(String, f64)> {
        entries.iter().map(|(n, b)| (n.to_string(), *b)).collect()
    }

    #[test]
    fn one_debtor_two_creditors() {
        let out = settle(&balances(&[("A", 300.0), ("B", 100.0), ("C", -400.0)]), 0.5);
        assert_eq!(
            out,
            vec![
                Transfer {
                    from: "C".into(),
                    to: "A".into(),
                    amount: 300.0
                },
                Transfer {
                    from: "C".into(),
                    to: "B".into(),
                    amount: 100.0
                },
            ]
        );
    }

    #[test]
    fn balances_within_tolerance_are_left_alone() {
        assert!(settle(&balances(&[("A", 0.4), ("B", -0.4)]), 0.5).is_empty());
    }

    #[test]
    fn ties_keep_input_order() {
        let out = settle(&balances(&[("B", 50.0), ("A", 50.0), ("C", -100.0)]), 0.5);
        let payees: Vec<_> = out.iter().map(|t| t.to.as_str()).collect();
        assert_eq!(payees, vec!["B", "A"]);
    }

    #[test]
    fn pairs_are_merged_across_resources() {
        let balances = vec![
            ("A".to_string(), Resources::new(1_000.0, 500.0, 0.0)),
            ("B".to_string(), Resources::new(-1_000.0, -500.0, 0.0)),
        ];
        let out = settle_resources(&balances, 0.5, 5_000);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].from, "B");
        assert_eq!(out[0].to, "A");
        assert_eq!(out[0].amounts(), Resources::new(1_000.0, 500.0, 0.0));
        assert_eq!(out[0].total, 1_500.0);
        assert_eq!(out[0].ships, 1);
    }
}
