pub mod hybrid;
pub mod ledger;
pub mod pipeline;
pub mod solver;
pub mod transport;
pub mod weights;

pub use hybrid::{hybrid_due, pooled_gain};
pub use ledger::{lookup, reconcile, PlayerLedger, DEFAULT_MANUAL_WEIGHT};
pub use pipeline::{
    run_settlement, ManualFleet, PlayerSettlement, RecycledClaim, SettlementError,
    SettlementReport, SettlementRequest,
};
pub use solver::{settle, settle_resources, AggregatedTransfer, Transfer};
pub use transport::{ships_needed, TransportPreset, UnknownPreset};
pub use weights::{fleet_weight, parse_weight_overrides, resource_losses, shares, WeightOverrides};
