//! Unit-quantity line shapes.
//!
//! The unit name is found by an explicit longest-prefix scan over whitespace
//! tokens; only the remainder after the name is matched with a pattern.

use std::sync::OnceLock;

use regex::Regex;

use crate::catalog::AliasTable;
use crate::report::amount::{parse_amount, parse_count};

/// Whether the after-battle marker has been seen. Once `AfterBattle`, it stays so.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BattleStage {
    #[default]
    BeforeBattle,
    AfterBattle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitLine {
    /// `<name> <final> <delta>`; `initial = final + loss`.
    Summary {
        unit: &'static str,
        final_qty: u64,
        loss: u64,
    },
    /// `<name> <final> ( <delta> )`.
    PostBattle {
        unit: &'static str,
        final_qty: u64,
        loss: u64,
    },
    /// `<name> <qty>`.
    PreBattle { unit: &'static str, qty: u64 },
}

const QTY: &str = r"\d{1,3}(?:[.,]\d{3})+|\d+";

fn summary_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"^({QTY})\s+(-\s*(?:{QTY})|=|-|±0|\+0|0)$")).expect("valid summary pattern")
    })
}

fn post_battle_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"^({QTY})\s*\(\s*([+-]?\s*(?:{QTY})|=|-|±0)\s*\)$"))
            .expect("valid post-battle pattern")
    })
}

fn pre_battle_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&format!(r"^({QTY})$")).expect("valid pre-battle pattern"))
}

/// Magnitude of a signed delta token; no-change markers are 0.
fn delta_magnitude(token: &str) -> u64 {
    let compact: String = token.chars().filter(|c| !c.is_whitespace()).collect();
    if matches!(compact.as_str(), "=" | "-" | "±0" | "+0") {
        return 0;
    }
    parse_amount(&compact).unsigned_abs()
}

fn match_remainder(unit: &'static str, rest: &str, stage: BattleStage) -> Option<UnitLine> {
    match stage {
        BattleStage::AfterBattle => {
            let caps = post_battle_re().captures(rest)?;
            Some(UnitLine::PostBattle {
                unit,
                final_qty: parse_count(&caps[1]),
                loss: delta_magnitude(&caps[2]),
            })
        }
        BattleStage::BeforeBattle => {
            if let Some(caps) = summary_re().captures(rest) {
                return Some(UnitLine::Summary {
                    unit,
                    final_qty: parse_count(&caps[1]),
                    loss: delta_magnitude(&caps[2]),
                });
            }
            let caps = pre_battle_re().captures(rest)?;
            Some(UnitLine::PreBattle {
                unit,
                qty: parse_count(&caps[1]),
            })
        }
    }
}

/// Match a unit-quantity line for the current battle stage.
///
/// Split points are tried from the longest candidate name down; the first
/// name that resolves and whose remainder fits an applicable shape wins.
pub fn match_unit_line(line: &str, stage: BattleStage, aliases: &AliasTable) -> Option<UnitLine> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 2 {
        return None;
    }
    let longest = (tokens.len() - 1).min(aliases.max_tokens());
    for split in (1..=longest).rev() {
        let name = tokens[..split].join(" ");
        let Some(unit) = aliases.resolve(name.trim_end_matches(':')) else {
            continue;
        };
        let rest = tokens[split..].join(" ");
        if let Some(matched) = match_remainder(unit, &rest, stage) {
            return Some(matched);
        }
    }
    None
}
