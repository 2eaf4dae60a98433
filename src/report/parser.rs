//! Primary combat report pass: a section state machine over normalized lines.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::catalog::AliasTable;
use crate::report::fleet::FleetRecord;
use crate::report::markers::{classify, LineKind};
use crate::report::meta::{extract_meta, BattleMeta};
use crate::report::overlay::{overlay, post_battle_pass};
use crate::report::shapes::{match_unit_line, BattleStage, UnitLine};

/// Fleets keyed by the label exactly as written in the report.
pub type FleetsByLabel = BTreeMap<String, FleetRecord>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    PreBattle,
    PostBattle,
}

impl From<BattleStage> for Phase {
    fn from(stage: BattleStage) -> Self {
        match stage {
            BattleStage::BeforeBattle => Phase::PreBattle,
            BattleStage::AfterBattle => Phase::PostBattle,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserState {
    Scanning,
    InSection { label: String, phase: Phase },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedReport {
    pub fleets: FleetsByLabel,
    pub meta: BattleMeta,
}

/// Parse context carried through the primary pass.
#[derive(Debug)]
pub struct ReportParser<'a> {
    aliases: &'a AliasTable,
    stage: BattleStage,
    state: ParserState,
    fleets: FleetsByLabel,
}

impl<'a> ReportParser<'a> {
    pub fn new(aliases: &'a AliasTable) -> Self {
        Self {
            aliases,
            stage: BattleStage::BeforeBattle,
            state: ParserState::Scanning,
            fleets: FleetsByLabel::new(),
        }
    }

    pub fn stage(&self) -> BattleStage {
        self.stage
    }

    pub fn state(&self) -> &ParserState {
        &self.state
    }

    pub fn feed(&mut self, line: &str) {
        match classify(line) {
            LineKind::Blank => {}
            LineKind::AfterBattle => self.stage = BattleStage::AfterBattle,
            LineKind::Terminal => self.state = ParserState::Scanning,
            LineKind::Header(header) => {
                self.fleets.entry(header.label.clone()).or_default();
                self.state = ParserState::InSection {
                    label: header.label,
                    phase: self.stage.into(),
                };
            }
            LineKind::Destroyed => {
                if let ParserState::InSection { label, .. } = &self.state {
                    trace!(label = %label, "destroyed marker");
                }
            }
            LineKind::Other(text) => self.feed_unit_line(text),
        }
    }

    fn feed_unit_line(&mut self, text: &str) {
        let ParserState::InSection { label, .. } = &self.state else {
            return;
        };
        let Some(unit_line) = match_unit_line(text, self.stage, self.aliases) else {
            trace!(line = text, "unrecognized line");
            return;
        };
        let fleet = self.fleets.entry(label.clone()).or_default();
        apply_unit_line(fleet, unit_line);
    }

    pub fn finish(self) -> FleetsByLabel {
        self.fleets
    }
}

pub(crate) fn apply_unit_line(fleet: &mut FleetRecord, unit_line: UnitLine) {
    match unit_line {
        UnitLine::Summary {
            unit,
            final_qty,
            loss,
        }
        | UnitLine::PostBattle {
            unit,
            final_qty,
            loss,
        } => {
            fleet.add_remaining(unit, final_qty);
            fleet.add_initial(unit, final_qty + loss);
        }
        UnitLine::PreBattle { unit, qty } => fleet.add_initial(unit, qty),
    }
}

pub fn primary_pass(lines: &[&str], aliases: &AliasTable) -> FleetsByLabel {
    let mut parser = ReportParser::new(aliases);
    for line in lines {
        parser.feed(line);
    }
    parser.finish()
}

/// Parse normalized report text with the built-in alias table.
///
/// Total over any input: unrecognized lines are skipped, never reported.
pub fn parse_combat_report(text: &str) -> ParsedReport {
    parse_with_aliases(text, AliasTable::builtin())
}

pub fn parse_with_aliases(text: &str, aliases: &AliasTable) -> ParsedReport {
    let lines: Vec<&str> = text.lines().collect();
    let primary = primary_pass(&lines, aliases);
    let fleets = match post_battle_pass(&lines, aliases) {
        Some(authoritative) => overlay(primary, authoritative),
        None => primary,
    };
    let meta = extract_meta(lines.iter().copied());

    for (label, fleet) in &fleets {
        let anomalies = fleet.anomalies();
        if !anomalies.is_empty() {
            debug!(label = %label, units = ?anomalies, "final count exceeds initial count");
        }
    }
    debug!(
        lines = lines.len(),
        fleets = fleets.len(),
        debris = meta.debris.is_some(),
        loot = meta.loot.is_some(),
        "parsed combat report"
    );

    ParsedReport { fleets, meta }
}
