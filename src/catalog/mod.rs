//! Static reference data: units, costs and the locale alias table.

mod aliases;
mod costs;
mod units;

pub use aliases::{collapse_whitespace, resolve_alias, AliasTable};
pub use costs::{load_cost_overrides, parse_cost_overrides, CostEntry, CostTable};
pub use units::{unit_by_game_id, unit_by_id, UnitCategory, UnitType, UNITS};
