//! Free-text unit labels (English, Italian, classic report abbreviations) mapped to canonical ids.
//!
//! Lookup is case-sensitive exact match after whitespace collapsing.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::catalog::units::UNITS;

/// Extra labels per canonical id. Each unit's catalog `name` is always an alias too.
const EXTRA_ALIASES: &[(&str, &[&str])] = &[
    ("small_cargo", &["Small Cargo Ship", "S.Cargo", "Cargo Leggero", "Cargo leggero"]),
    ("large_cargo", &["Large Cargo Ship", "L.Cargo", "Cargo Pesante", "Cargo pesante"]),
    ("light_fighter", &["L.Fighter", "Caccia Leggero", "Caccia leggero"]),
    ("heavy_fighter", &["H.Fighter", "Caccia Pesante", "Caccia pesante"]),
    ("cruiser", &["Incrociatore"]),
    ("battleship", &["Battleships", "Nave da Battaglia", "Nave da battaglia"]),
    ("colony_ship", &["Col. Ship", "Colonizzatrice", "Nave Colonizzatrice"]),
    ("recycler", &["Recy.", "Riciclatrice", "Riciclatrici"]),
    ("espionage_probe", &["Esp.Probe", "Esp. Probe", "Sonda Spia", "Sonda spia"]),
    ("bomber", &["Bombardiere"]),
    ("solar_satellite", &["Sol. Sat", "Sol.Sat", "Satellite Solare", "Satellite solare"]),
    ("destroyer", &["Dest.", "Corazzata"]),
    ("deathstar", &["Death Star", "Deathst.", "Morte Nera"]),
    ("battlecruiser", &["Battlecr.", "Incrociatore da Battaglia", "Incrociatore da battaglia"]),
    ("pathfinder", &["Esploratore"]),
    ("rocket_launcher", &["R.Launcher", "Lanciamissili"]),
    ("light_laser", &["L.Laser", "Laser Leggero", "Laser leggero"]),
    ("heavy_laser", &["H.Laser", "Laser Pesante", "Laser pesante"]),
    ("gauss_cannon", &["Gauss", "Cannone Gauss"]),
    ("ion_cannon", &["Ion C.", "Cannone Ionico"]),
    ("plasma_turret", &["Plasma", "Cannone al Plasma"]),
    ("small_shield_dome", &["S.Dome", "Cupola Scudo Piccola"]),
    ("large_shield_dome", &["L.Dome", "Cupola Scudo Potenziata"]),
];

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    by_label: HashMap<String, &'static str>,
    max_tokens: usize,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared table built from the catalog; constructed once.
    pub fn builtin() -> &'static AliasTable {
        static TABLE: OnceLock<AliasTable> = OnceLock::new();
        TABLE.get_or_init(|| {
            let mut table = AliasTable::new();
            for unit in UNITS {
                table.insert(unit.name, unit.id);
            }
            for (id, labels) in EXTRA_ALIASES {
                for label in labels.iter() {
                    table.insert(label, id);
                }
            }
            table
        })
    }

    pub fn insert(&mut self, label: &str, unit_id: &'static str) {
        let key = collapse_whitespace(label);
        if key.is_empty() {
            return;
        }
        self.max_tokens = self.max_tokens.max(key.split(' ').count());
        self.by_label.insert(key, unit_id);
    }

    pub fn resolve(&self, label: &str) -> Option<&'static str> {
        self.by_label.get(&collapse_whitespace(label)).copied()
    }

    /// Word count of the longest registered label; bounds the longest-prefix scan.
    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    pub fn len(&self) -> usize {
        self.by_label.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_label.is_empty()
    }

    /// Labels registered for `unit_id`, sorted.
    pub fn labels_for(&self, unit_id: &str) -> Vec<&str> {
        let mut labels: Vec<&str> = self
            .by_label
            .iter()
            .filter(|(_, id)| **id == unit_id)
            .map(|(label, _)| label.as_str())
            .collect();
        labels.sort_unstable();
        labels
    }
}

pub fn resolve_alias(label: &str) -> Option<&'static str> {
    AliasTable::builtin().resolve(label)
}
