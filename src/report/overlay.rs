//! Post-battle reconciliation: recover final fleets from the after-battle
//! block and let them replace whatever the primary pass built.

use tracing::debug;

use crate::catalog::AliasTable;
use crate::report::fleet::FleetRecord;
use crate::report::markers::{classify, HeaderForm, LineKind};
use crate::report::parser::{apply_unit_line, FleetsByLabel};
use crate::report::shapes::{match_unit_line, BattleStage};

/// Fleets recovered after the first after-battle marker, or `None` when the
/// report has no such marker.
///
/// Only labels with at least one matched unit line are returned, so a fleet
/// that was wiped out keeps its primary-pass record.
pub fn post_battle_pass(lines: &[&str], aliases: &AliasTable) -> Option<FleetsByLabel> {
    let start = lines
        .iter()
        .position(|line| matches!(classify(line), LineKind::AfterBattle))?;

    let mut recovered = FleetsByLabel::new();
    let mut current: Option<String> = None;
    for line in &lines[start + 1..] {
        match classify(line) {
            LineKind::Header(header) => {
                current = match header.form {
                    HeaderForm::Attacker | HeaderForm::Defender | HeaderForm::TrailingDefender => {
                        Some(header.label)
                    }
                    HeaderForm::AllAttackers => None,
                };
            }
            LineKind::Terminal | LineKind::Destroyed => current = None,
            LineKind::Other(text) => {
                let Some(label) = &current else {
                    continue;
                };
                if let Some(unit_line) = match_unit_line(text, BattleStage::AfterBattle, aliases) {
                    let fleet = recovered.entry(label.clone()).or_insert_with(FleetRecord::default);
                    apply_unit_line(fleet, unit_line);
                }
            }
            LineKind::Blank | LineKind::AfterBattle => {}
        }
    }
    debug!(fleets = recovered.len(), "post-battle pass");
    Some(recovered)
}

/// Replace whole primary records with the authoritative ones, by exact label.
pub fn overlay(mut primary: FleetsByLabel, authoritative: FleetsByLabel) -> FleetsByLabel {
    for (label, record) in authoritative {
        primary.insert(label, record);
    }
    primary
}
