//! Battle-wide metadata: debris field, loot and the recycled-the-field flag.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::report::amount::parse_amount;
use crate::resources::{Resource, Resources};

/// Each field is set by the first matching line only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BattleMeta {
    #[serde(default)]
    pub debris: Option<Resources>,
    #[serde(default)]
    pub loot: Option<Resources>,
    #[serde(default)]
    pub field_recycled: bool,
}

fn debris_keyword_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(debris|float|detriti|rottami)").expect("valid debris pattern"))
}

fn loot_keyword_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(captur|loot|plunder|bottino|catturat|saccheggi|razzi)").expect("valid loot pattern")
    })
}

fn recycled_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)(recycled the (whole|entire) (debris )?field|ha riciclato (l'intero|tutto il) campo)",
        )
        .expect("valid recycled pattern")
    })
}

/// `1.200 metal` or `Metal: 1.200`, for each of the three resources.
fn amount_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)(\d[\d.,]*)\s+(?:units of\s+)?(metal|metallo|crystal|cristallo|deuterium|deuterio)|\b(metal|metallo|crystal|cristallo|deuterium|deuterio)\s*:?\s*(\d[\d.,]*)",
        )
        .expect("valid amount pattern")
    })
}

fn resource_for_word(word: &str) -> Option<Resource> {
    match word.to_ascii_lowercase().as_str() {
        "metal" | "metallo" => Some(Resource::Metal),
        "crystal" | "cristallo" => Some(Resource::Crystal),
        "deuterium" | "deuterio" => Some(Resource::Deuterium),
        _ => None,
    }
}

/// Resource amounts named on one line; `None` if the line names none.
pub fn resource_triple(line: &str) -> Option<Resources> {
    let mut found = false;
    let mut triple = Resources::ZERO;
    for caps in amount_re().captures_iter(line) {
        let (amount, word) = match (caps.get(1), caps.get(2), caps.get(3), caps.get(4)) {
            (Some(amount), Some(word), _, _) => (amount.as_str(), word.as_str()),
            (_, _, Some(word), Some(amount)) => (amount.as_str(), word.as_str()),
            _ => continue,
        };
        let Some(resource) = resource_for_word(word) else {
            continue;
        };
        let amount = amount.trim_end_matches(['.', ',']);
        triple.set(resource, parse_amount(amount) as f64);
        found = true;
    }
    found.then_some(triple)
}

/// Single pass over all lines; independent of the section state machine.
pub fn extract_meta<'a, I>(lines: I) -> BattleMeta
where
    I: IntoIterator<Item = &'a str>,
{
    let mut meta = BattleMeta::default();
    for line in lines {
        if meta.debris.is_none() && debris_keyword_re().is_match(line) {
            meta.debris = resource_triple(line);
        }
        if meta.loot.is_none() && loot_keyword_re().is_match(line) {
            meta.loot = resource_triple(line);
        }
        if !meta.field_recycled && recycled_re().is_match(line) {
            meta.field_recycled = true;
        }
        if meta.debris.is_some() && meta.loot.is_some() && meta.field_recycled {
            break;
        }
    }
    meta
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_debris_line() {
        let meta = extract_meta(["At these space coordinates now float 1.200.000 metal and 800.000 crystal."]);
        assert_eq!(meta.debris, Some(Resources::new(1_200_000.0, 800_000.0, 0.0)));
        assert_eq!(meta.loot, None);
    }

    #[test]
    fn loot_line_with_three_resources() {
        let meta = extract_meta([
            "The attacker has won the battle! He captured 100.000 metal, 50.000 crystal and 10.000 deuterium.",
        ]);
        assert_eq!(meta.loot, Some(Resources::new(100_000.0, 50_000.0, 10_000.0)));
    }

    #[test]
    fn label_first_form_and_italian_words() {
        let meta = extract_meta(["Campo detriti: Metallo 3.000, Cristallo 1.500, Deuterio 0"]);
        assert_eq!(meta.debris, Some(Resources::new(3_000.0, 1_500.0, 0.0)));
    }

    #[test]
    fn first_match_wins_per_field() {
        let meta = extract_meta([
            "Debris field: 10 metal, 20 crystal",
            "Debris field: 99 metal, 99 crystal",
            "Nova recycled the whole field",
        ]);
        assert_eq!(meta.debris, Some(Resources::new(10.0, 20.0, 0.0)));
        assert!(meta.field_recycled);
    }

    #[test]
    fn keyword_without_amounts_does_not_lock_the_field() {
        let meta = extract_meta(["Debris field report", "Debris field: 5 metal"]);
        assert_eq!(meta.debris, Some(Resources::new(5.0, 0.0, 0.0)));
    }
}
