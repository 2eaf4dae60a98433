pub mod amount;
pub mod envelope;
pub mod fleet;
pub mod markers;
pub mod meta;
pub mod normalize;
pub mod overlay;
pub mod parser;
pub mod raw_dump;
pub mod shapes;

pub use amount::{parse_amount, parse_count};
pub use envelope::{normalize_payload, unwrap_envelope, EnvelopeError};
pub use fleet::{FleetRecord, UnitCounts};
pub use markers::{classify, Header, HeaderForm, LineKind, ALL_ATTACKERS_LABEL};
pub use meta::{extract_meta, resource_triple, BattleMeta};
pub use normalize::{decode_entities, normalize};
pub use overlay::{overlay, post_battle_pass};
pub use parser::{
    parse_combat_report, parse_with_aliases, primary_pass, FleetsByLabel, ParsedReport,
    ParserState, Phase, ReportParser,
};
pub use raw_dump::{
    extract_print_r_block, parse_print_r, summarize_dump, DumpAttacker, DumpError, DumpGeneric,
    DumpSummary,
};
pub use shapes::{match_unit_line, BattleStage, UnitLine};
