//! Reader for PHP `print_r` dumps of a combat report, as served by the
//! API-reader raw output page.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::report::amount::parse_amount;
use crate::report::meta::BattleMeta;
use crate::report::normalize::decode_entities;
use crate::resources::Resources;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DumpError {
    #[error("raw output block not found in response")]
    BlockNotFound,
}

fn key_value_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*\[(.*?)\]\s*=>\s*(.*)$").expect("valid key/value pattern"))
}

fn pre_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<pre[^>]*>(.*?)</pre>").expect("valid pre pattern"))
}

fn int_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^-?\d+$").expect("valid int pattern"))
}

fn float_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^-?\d+\.\d+$").expect("valid float pattern"))
}

fn parse_scalar(raw: &str) -> Value {
    let s = raw.trim();
    if s.is_empty() {
        return Value::Null;
    }
    if int_re().is_match(s) {
        if let Ok(n) = s.parse::<i64>() {
            return Value::Number(n.into());
        }
        return Value::String(s.to_string());
    }
    if float_re().is_match(s) {
        if let Some(n) = s.parse::<f64>().ok().and_then(Number::from_f64) {
            return Value::Number(n);
        }
        return Value::String(s.to_string());
    }
    match s.to_ascii_lowercase().as_str() {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::String(s.to_string()),
    }
}

/// Store `value` under `key`; inside arrays numeric keys are positions and
/// anything else is appended as a one-entry object.
fn set_in(container: &mut Value, key: String, value: Value) {
    match container {
        Value::Array(items) => match key.parse::<usize>() {
            Ok(idx) => {
                if items.len() <= idx {
                    items.resize(idx + 1, Value::Null);
                }
                items[idx] = value;
            }
            Err(_) => {
                let mut entry = Map::new();
                entry.insert(key, value);
                items.push(Value::Object(entry));
            }
        },
        Value::Object(map) => {
            map.insert(key, value);
        }
        _ => {}
    }
}

struct Frame {
    key: String,
    value: Value,
}

/// Parse `print_r` output into a JSON tree. The outermost object is the root;
/// unparsable lines are skipped and unclosed containers are attached as-is.
pub fn parse_print_r(text: &str) -> Value {
    let mut root = Value::Object(Map::new());
    let mut stack: Vec<Frame> = Vec::new();

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() || matches!(line, "..." | "stdClass Object" | "Array" | "(") {
            continue;
        }
        if line == ")" {
            if let Some(frame) = stack.pop() {
                let parent = stack.last_mut().map(|f| &mut f.value).unwrap_or(&mut root);
                set_in(parent, frame.key, frame.value);
            }
            continue;
        }
        let Some(caps) = key_value_re().captures(raw_line) else {
            continue;
        };
        let key = caps[1].to_string();
        let value = caps[2].trim();
        match value {
            "Array" => stack.push(Frame {
                key,
                value: Value::Array(Vec::new()),
            }),
            "stdClass Object" => stack.push(Frame {
                key,
                value: Value::Object(Map::new()),
            }),
            scalar => {
                let parent = stack.last_mut().map(|f| &mut f.value).unwrap_or(&mut root);
                set_in(parent, key, parse_scalar(scalar));
            }
        }
    }

    while let Some(frame) = stack.pop() {
        let parent = stack.last_mut().map(|f| &mut f.value).unwrap_or(&mut root);
        set_in(parent, frame.key, frame.value);
    }
    root
}

/// Dump text from an API-reader page: the first `<pre>` block, or everything
/// from the first `stdClass Object` on.
pub fn extract_print_r_block(html: &str) -> Result<String, DumpError> {
    if let Some(caps) = pre_block_re().captures(html) {
        return Ok(decode_entities(&caps[1]));
    }
    html.find("stdClass Object")
        .map(|idx| html[idx..].to_string())
        .ok_or(DumpError::BlockNotFound)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DumpGeneric {
    pub cr_id: Option<Value>,
    pub event_time: Option<Value>,
    pub combat_coordinates: Option<Value>,
    pub combat_rounds: Option<Value>,
    pub winner: Option<Value>,
    pub moon_chance: Option<f64>,
    pub loot_percentage: Option<f64>,
    pub loot: Option<Resources>,
    pub units_lost_attackers: Option<f64>,
    pub units_lost_defenders: Option<f64>,
    pub debris: Option<Resources>,
    pub wreckfield: Option<Resources>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DumpAttacker {
    pub name: String,
    pub tag: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DumpSummary {
    pub generic: DumpGeneric,
    pub attackers: Vec<DumpAttacker>,
}

impl DumpSummary {
    pub fn to_battle_meta(&self) -> BattleMeta {
        BattleMeta {
            debris: self.generic.debris,
            loot: self.generic.loot,
            field_recycled: false,
        }
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.chars().any(|c| c.is_ascii_digit()) => Some(parse_amount(s) as f64),
        _ => None,
    }
}

fn present(generic: &Map<String, Value>, key: &str) -> Option<Value> {
    generic.get(key).filter(|v| !v.is_null()).cloned()
}

fn triple(generic: &Map<String, Value>, prefix: &str) -> Option<Resources> {
    let parts = ["metal", "crystal", "deuterium"].map(|r| generic.get(&format!("{prefix}_{r}")).and_then(number));
    if parts.iter().all(Option::is_none) {
        return None;
    }
    let [metal, crystal, deuterium] = parts.map(|p| p.unwrap_or(0.0));
    Some(Resources::new(metal, crystal, deuterium))
}

/// Battle facts and the attacker roster (unique owners sorted by name, each
/// with the first alliance tag seen).
pub fn summarize_dump(tree: &Value) -> DumpSummary {
    let empty = Map::new();
    let generic = tree.get("generic").and_then(Value::as_object).unwrap_or(&empty);

    let mut roster: BTreeMap<String, String> = BTreeMap::new();
    let attackers = tree.get("attackers").and_then(Value::as_array);
    for attacker in attackers.into_iter().flatten().filter_map(Value::as_object) {
        let Some(name) = attacker.get("fleet_owner").and_then(Value::as_str) else {
            continue;
        };
        if name.is_empty() {
            continue;
        }
        let tag = attacker
            .get("fleet_owner_alliance_tag")
            .and_then(Value::as_str)
            .unwrap_or_default();
        roster.entry(name.to_string()).or_insert_with(|| tag.to_string());
    }

    DumpSummary {
        generic: DumpGeneric {
            cr_id: present(generic, "cr_id"),
            event_time: present(generic, "event_time"),
            combat_coordinates: present(generic, "combat_coordinates"),
            combat_rounds: present(generic, "combat_rounds"),
            winner: present(generic, "winner"),
            moon_chance: generic.get("moon_chance").and_then(number),
            loot_percentage: generic.get("loot_percentage").and_then(number),
            loot: triple(generic, "loot"),
            units_lost_attackers: generic.get("units_lost_attackers").and_then(number),
            units_lost_defenders: generic.get("units_lost_defenders").and_then(number),
            debris: triple(generic, "debris"),
            wreckfield: triple(generic, "wreckfield"),
        },
        attackers: roster
            .into_iter()
            .map(|(name, tag)| DumpAttacker { name, tag })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &str = "stdClass Object
(
    [generic] => stdClass Object
        (
            [cr_id] => cr-abc
            [combat_rounds] => 6
            [moon_chance] => 12.5
            [winner] => attacker
            [debris_metal] => 120000
            [debris_crystal] => 80000
            [loot_metal] => 5000
        )

    [attackers] => Array
        (
            [0] => stdClass Object
                (
                    [fleet_owner] => Vega
                    [fleet_owner_alliance_tag] => ZEN
                )

            [1] => stdClass Object
                (
                    [fleet_owner] => Nova
                    [fleet_owner_alliance_tag] =>
                )

            [2] => stdClass Object
                (
                    [fleet_owner] => Vega
                    [fleet_owner_alliance_tag] => OTHER
                )

        )

)";

    #[test]
    fn nested_objects_and_arrays() {
        let tree = parse_print_r(DUMP);
        assert_eq!(tree["generic"]["cr_id"], "cr-abc");
        assert_eq!(tree["generic"]["combat_rounds"], 6);
        assert_eq!(tree["generic"]["moon_chance"], 12.5);
        assert_eq!(tree["attackers"][1]["fleet_owner"], "Nova");
        assert_eq!(tree["attackers"][1]["fleet_owner_alliance_tag"], Value::Null);
    }

    #[test]
    fn summary_roster_is_sorted_and_keeps_first_tag() {
        let summary = summarize_dump(&parse_print_r(DUMP));
        let names: Vec<_> = summary.attackers.iter().map(|a| (a.name.as_str(), a.tag.as_str())).collect();
        assert_eq!(names, vec![("Nova", ""), ("Vega", "ZEN")]);
        assert_eq!(summary.generic.debris, Some(Resources::new(120_000.0, 80_000.0, 0.0)));
        assert_eq!(summary.generic.loot, Some(Resources::new(5_000.0, 0.0, 0.0)));
        assert_eq!(summary.generic.wreckfield, None);
        assert_eq!(summary.to_battle_meta().debris, summary.generic.debris);
    }

    #[test]
    fn non_numeric_array_keys_are_appended() {
        let tree = parse_print_r("Array\n(\n[list] => Array\n(\n[x] => 1\n[2] => two\n)\n)");
        assert_eq!(tree["list"][0]["x"], 1);
        assert_eq!(tree["list"][2], "two");
    }

    #[test]
    fn block_from_pre_or_marker() {
        let html = "<html><pre class=\"raw\">[a] =&gt; 1</pre></html>";
        assert_eq!(extract_print_r_block(html), Ok("[a] => 1".to_string()));
        let html = "<p>x</p>stdClass Object\n(\n)";
        assert_eq!(extract_print_r_block(html), Ok("stdClass Object\n(\n)".to_string()));
        assert_eq!(extract_print_r_block("<p>nothing</p>"), Err(DumpError::BlockNotFound));
    }
}
