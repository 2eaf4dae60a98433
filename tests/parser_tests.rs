use crsplit::catalog::{collapse_whitespace, resolve_alias, AliasTable};
use crsplit::report::{normalize_payload, parse_combat_report, ALL_ATTACKERS_LABEL};
use crsplit::resources::Resources;

const CLASSIC_EN: &str = include_str!("fixtures/reports/classic_en.txt");
const CLASSIC_IT: &str = include_str!("fixtures/reports/classic_it.txt");
const SUMMARY_EN: &str = include_str!("fixtures/reports/summary_en.txt");
const ENVELOPE_XML: &str = include_str!("fixtures/reports/envelope.xml");

#[test]
fn summary_line_gives_final_and_initial_counts() {
    let report = parse_combat_report("Attacker Nova\nLight Fighter 8,690,366 -782,497");
    let nova = &report.fleets["Nova"];
    assert_eq!(nova.remaining_of("light_fighter"), 8_690_366);
    assert_eq!(nova.initial_of("light_fighter"), 9_472_863);
}

#[test]
fn post_battle_line_gives_final_and_initial_counts() {
    let report = parse_combat_report("After the battle...\nAttacker Nova\nLight Fighter 2,961,733 ( -265,176 )");
    let nova = &report.fleets["Nova"];
    assert_eq!(nova.remaining_of("light_fighter"), 2_961_733);
    assert_eq!(nova.initial_of("light_fighter"), 3_226_909);
}

#[test]
fn post_battle_section_overrides_primary_counts() {
    let text = "Attacker Nova\nCruiser 100\nAfter the battle...\nAttacker Nova\nCruiser 40 ( -60 )";
    let report = parse_combat_report(text);
    let nova = &report.fleets["Nova"];
    assert_eq!(nova.initial_of("cruiser"), 100);
    assert_eq!(nova.remaining_of("cruiser"), 40);
}

#[test]
fn unknown_units_are_ignored() {
    let report = parse_combat_report("Attacker Nova\nWarp Core 12\nCruiser 3");
    let nova = &report.fleets["Nova"];
    assert_eq!(nova.initial.len(), 1);
    assert_eq!(nova.initial_of("cruiser"), 3);
}

#[test]
fn alias_resolution_ignores_whitespace_runs() {
    let label = "Light   Fighter";
    assert_eq!(resolve_alias(label), resolve_alias(&collapse_whitespace(label)));
    assert_eq!(resolve_alias(label), Some("light_fighter"));
    assert_eq!(AliasTable::builtin().resolve("light fighter"), None);
}

#[test]
fn classic_english_report() {
    let report = parse_combat_report(CLASSIC_EN);
    assert_eq!(report.fleets.len(), 3);

    let nova = &report.fleets["Nova"];
    assert_eq!(nova.initial_of("small_cargo"), 10);
    assert_eq!(nova.remaining_of("small_cargo"), 10);
    assert_eq!(nova.initial_of("cruiser"), 100);
    assert_eq!(nova.remaining_of("cruiser"), 40);
    assert_eq!(nova.losses().get("cruiser"), Some(&60));

    let orion = &report.fleets["Orion"];
    assert_eq!(orion.initial_of("light_fighter"), 500);
    assert_eq!(orion.remaining_of("light_fighter"), 350);

    // Wiped out: pre-battle counts survive, nothing remains.
    let vega = &report.fleets["Vega"];
    assert_eq!(vega.initial_of("battleship"), 20);
    assert_eq!(vega.initial_of("rocket_launcher"), 200);
    assert!(vega.remaining.is_empty());

    assert_eq!(report.meta.loot, Some(Resources::new(100_000.0, 50_000.0, 10_000.0)));
    assert_eq!(report.meta.debris, Some(Resources::new(1_200_000.0, 800_000.0, 0.0)));
    assert!(report.meta.field_recycled);
}

#[test]
fn classic_italian_report() {
    let report = parse_combat_report(CLASSIC_IT);
    let nova = &report.fleets["Nova"];
    assert_eq!(nova.initial_of("light_fighter"), 1_000);
    assert_eq!(nova.remaining_of("light_fighter"), 700);
    assert_eq!(nova.initial_of("battlecruiser"), 50);
    assert_eq!(nova.remaining_of("battlecruiser"), 50);
    assert_eq!(report.fleets["Vega"].initial_of("rocket_launcher"), 300);
    assert_eq!(report.meta.debris, Some(Resources::new(3_000.0, 1_500.0, 0.0)));
    assert!(!report.meta.field_recycled);
}

#[test]
fn summary_layout_report() {
    let report = parse_combat_report(SUMMARY_EN);
    let all = &report.fleets[ALL_ATTACKERS_LABEL];
    assert_eq!(all.initial_of("light_fighter"), 9_472_863);
    assert_eq!(all.remaining_of("cruiser"), 1_500);
    assert_eq!(all.initial_of("cruiser"), 1_500);
    assert_eq!(all.initial.len(), 2);

    let vega = &report.fleets["Vega"];
    assert_eq!(vega.initial_of("battleship"), 2_300);
    assert_eq!(vega.remaining_of("battleship"), 2_000);
    assert_eq!(report.meta.debris, Some(Resources::new(120_000.0, 80_000.0, 0.0)));
    assert_eq!(report.meta.loot, None);
}

#[test]
fn xml_envelope_is_unwrapped_before_parsing() {
    let report = parse_combat_report(&normalize_payload(ENVELOPE_XML));
    assert_eq!(report.fleets["Nova"].initial_of("cruiser"), 100);
    assert_eq!(report.fleets["Nova"].remaining_of("cruiser"), 40);
    assert_eq!(report.fleets["Vega"].initial_of("bomber"), 3);
    assert_eq!(report.fleets["Vega"].remaining_of("bomber"), 3);
}

#[test]
fn garbage_input_parses_to_nothing() {
    for text in ["", "\n\n", "<<<>>>", "Attacker", "Cruiser -5", "After the battle"] {
        let report = parse_combat_report(text);
        assert!(report.fleets.values().all(|f| f.is_empty()), "input {text:?}");
    }
}
