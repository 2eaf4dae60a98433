//! Canonical unit list with base construction costs.

use serde::Serialize;

use crate::resources::Resources;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitCategory {
    Ship,
    Defense,
}

/// Immutable catalog entry. `game_id` is the numeric technology id used by the
/// game's API exports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UnitType {
    pub id: &'static str,
    pub game_id: u16,
    pub name: &'static str,
    pub category: UnitCategory,
    pub cost: Resources,
}

impl UnitType {
    pub fn total_cost(&self) -> f64 {
        self.cost.total()
    }
}

const fn ship(id: &'static str, game_id: u16, name: &'static str, m: f64, c: f64, d: f64) -> UnitType {
    UnitType {
        id,
        game_id,
        name,
        category: UnitCategory::Ship,
        cost: Resources::new(m, c, d),
    }
}

const fn defense(id: &'static str, game_id: u16, name: &'static str, m: f64, c: f64, d: f64) -> UnitType {
    UnitType {
        id,
        game_id,
        name,
        category: UnitCategory::Defense,
        cost: Resources::new(m, c, d),
    }
}

pub const UNITS: &[UnitType] = &[
    ship("small_cargo", 202, "Small Cargo", 2_000.0, 2_000.0, 0.0),
    ship("large_cargo", 203, "Large Cargo", 6_000.0, 6_000.0, 0.0),
    ship("light_fighter", 204, "Light Fighter", 3_000.0, 1_000.0, 0.0),
    ship("heavy_fighter", 205, "Heavy Fighter", 6_000.0, 4_000.0, 0.0),
    ship("cruiser", 206, "Cruiser", 20_000.0, 7_000.0, 2_000.0),
    ship("battleship", 207, "Battleship", 45_000.0, 15_000.0, 0.0),
    ship("colony_ship", 208, "Colony Ship", 10_000.0, 20_000.0, 10_000.0),
    ship("recycler", 209, "Recycler", 10_000.0, 6_000.0, 2_000.0),
    ship("espionage_probe", 210, "Espionage Probe", 0.0, 1_000.0, 0.0),
    ship("bomber", 211, "Bomber", 50_000.0, 25_000.0, 15_000.0),
    ship("solar_satellite", 212, "Solar Satellite", 0.0, 2_000.0, 500.0),
    ship("destroyer", 213, "Destroyer", 60_000.0, 50_000.0, 15_000.0),
    ship("deathstar", 214, "Deathstar", 5_000_000.0, 4_000_000.0, 1_000_000.0),
    ship("battlecruiser", 215, "Battlecruiser", 30_000.0, 40_000.0, 15_000.0),
    ship("crawler", 217, "Crawler", 2_000.0, 2_000.0, 1_000.0),
    ship("reaper", 218, "Reaper", 85_000.0, 55_000.0, 20_000.0),
    ship("pathfinder", 219, "Pathfinder", 8_000.0, 15_000.0, 8_000.0),
    defense("rocket_launcher", 401, "Rocket Launcher", 2_000.0, 0.0, 0.0),
    defense("light_laser", 402, "Light Laser", 1_500.0, 500.0, 0.0),
    defense("heavy_laser", 403, "Heavy Laser", 6_000.0, 2_000.0, 0.0),
    defense("gauss_cannon", 404, "Gauss Cannon", 20_000.0, 15_000.0, 2_000.0),
    defense("ion_cannon", 405, "Ion Cannon", 5_000.0, 3_000.0, 0.0),
    defense("plasma_turret", 406, "Plasma Turret", 50_000.0, 50_000.0, 30_000.0),
    defense("small_shield_dome", 407, "Small Shield Dome", 10_000.0, 10_000.0, 0.0),
    defense("large_shield_dome", 408, "Large Shield Dome", 50_000.0, 50_000.0, 0.0),
];

pub fn unit_by_id(id: &str) -> Option<&'static UnitType> {
    UNITS.iter().find(|unit| unit.id == id)
}

pub fn unit_by_game_id(game_id: u16) -> Option<&'static UnitType> {
    UNITS.iter().find(|unit| unit.game_id == game_id)
}
