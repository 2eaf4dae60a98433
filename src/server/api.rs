use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{AliasTable, UnitCategory, UNITS};
use crate::config::Settings;
use crate::report::{
    extract_print_r_block, normalize_payload, parse_combat_report, parse_print_r, summarize_dump,
    DumpError, DumpSummary, ParsedReport,
};
use crate::resources::Resources;
use crate::settlement::{run_settlement, settle, SettlementError, SettlementRequest, Transfer};

#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    pub field: &'static str,
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationErrorResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub errors: Vec<ValidationIssue>,
}

impl ValidationErrorResponse {
    fn new(errors: Vec<ValidationIssue>) -> Self {
        Self {
            status: "error",
            message: "Validation failed",
            errors,
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request body: {0}")]
    Parse(serde_json::Error),
    #[error("Validation failed")]
    Validation(ValidationErrorResponse),
    #[error(transparent)]
    Settlement(#[from] SettlementError),
    #[error(transparent)]
    Dump(#[from] DumpError),
    #[error("failed to serialize response: {0}")]
    Serialize(serde_json::Error),
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value).map_err(ApiError::Serialize)
}

fn validation_failure(errors: Vec<ValidationIssue>) -> Result<(), ApiError> {
    if errors.is_empty() {
        return Ok(());
    }
    Err(ApiError::Validation(ValidationErrorResponse::new(errors)))
}

pub fn health_payload() -> Result<String, ApiError> {
    to_json(&serde_json::json!({
        "status": "ok",
        "service": "crsplit-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[derive(Debug, Clone, Serialize)]
pub struct UnitListItem {
    pub id: &'static str,
    pub game_id: u16,
    pub name: &'static str,
    pub category: UnitCategory,
    pub cost: Resources,
    pub aliases: Vec<String>,
}

pub fn units_payload() -> Result<String, ApiError> {
    let aliases = AliasTable::builtin();
    let units: Vec<UnitListItem> = UNITS
        .iter()
        .map(|unit| UnitListItem {
            id: unit.id,
            game_id: unit.game_id,
            name: unit.name,
            category: unit.category,
            cost: unit.cost,
            aliases: aliases.labels_for(unit.id).into_iter().map(str::to_string).collect(),
        })
        .collect();
    to_json(&serde_json::json!({ "units": units }))
}

#[derive(Debug, Clone, Serialize)]
pub struct ParseResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub report: ParsedReport,
}

/// Body is the raw report payload: plain text, HTML, or an XML envelope.
pub fn parse_payload(body: &str) -> Result<String, ApiError> {
    if body.trim().is_empty() {
        validation_failure(vec![ValidationIssue {
            field: "body",
            messages: vec!["report text must not be empty".to_string()],
        }])?;
    }
    let report = parse_combat_report(&normalize_payload(body));
    to_json(&ParseResponse { status: "ok", report })
}

fn validate_settlement_request(request: &SettlementRequest) -> Result<(), ApiError> {
    let mut errors = Vec::new();
    if request.players.is_empty() {
        errors.push(ValidationIssue {
            field: "players",
            messages: vec!["must list at least one player".to_string()],
        });
    }
    let blank: Vec<String> = request
        .players
        .iter()
        .enumerate()
        .filter(|(_, p)| p.trim().is_empty())
        .map(|(i, _)| format!("entry {i} must not be blank"))
        .collect();
    if !blank.is_empty() {
        errors.push(ValidationIssue {
            field: "players",
            messages: blank,
        });
    }
    if let Some(tolerance) = request.tolerance {
        if !tolerance.is_finite() || tolerance < 0.0 {
            errors.push(ValidationIssue {
                field: "tolerance",
                messages: vec!["must be a non-negative number".to_string()],
            });
        }
    }
    validation_failure(errors)
}

pub fn reconcile_payload(body: &str, settings: &Settings) -> Result<String, ApiError> {
    let request: SettlementRequest = serde_json::from_str(body).map_err(ApiError::Parse)?;
    validate_settlement_request(&request)?;
    let report = run_settlement(request, settings)?;
    to_json(&serde_json::json!({ "status": "ok", "settlement": report }))
}

#[derive(Debug, Clone, Deserialize)]
pub struct Balance {
    pub player: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SettleRequest {
    pub balances: Vec<Balance>,
    pub tolerance: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SettleResponse {
    pub status: &'static str,
    pub tolerance: f64,
    pub transfers: Vec<Transfer>,
}

pub fn settle_payload(body: &str, settings: &Settings) -> Result<String, ApiError> {
    let request: SettleRequest = serde_json::from_str(body).map_err(ApiError::Parse)?;
    let tolerance = request.tolerance.unwrap_or(settings.tolerance);

    let mut errors = Vec::new();
    if !tolerance.is_finite() || tolerance < 0.0 {
        errors.push(ValidationIssue {
            field: "tolerance",
            messages: vec!["must be a non-negative number".to_string()],
        });
    }
    let bad: Vec<String> = request
        .balances
        .iter()
        .filter(|b| !b.amount.is_finite())
        .map(|b| format!("amount for '{}' must be finite", b.player))
        .collect();
    if !bad.is_empty() {
        errors.push(ValidationIssue {
            field: "balances",
            messages: bad,
        });
    }
    validation_failure(errors)?;

    let balances: Vec<(String, f64)> = request
        .balances
        .into_iter()
        .map(|b| (b.player, b.amount))
        .collect();
    to_json(&SettleResponse {
        status: "ok",
        tolerance,
        transfers: settle(&balances, tolerance),
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct RawDumpResponse {
    pub status: &'static str,
    pub summary: DumpSummary,
    pub raw: serde_json::Value,
}

/// Body is either the dump itself or the API-reader page that embeds it.
pub fn raw_dump_payload(body: &str) -> Result<String, ApiError> {
    let block = if body.trim_start().starts_with('<') {
        extract_print_r_block(body)?
    } else {
        body.to_string()
    };
    let raw = parse_print_r(&block);
    let summary = summarize_dump(&raw);
    to_json(&RawDumpResponse {
        status: "ok",
        summary,
        raw,
    })
}
