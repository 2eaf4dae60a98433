use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportPreset {
    SmallCargo,
    #[default]
    LargeCargo,
}

impl TransportPreset {
    pub const fn capacity(self) -> u64 {
        match self {
            TransportPreset::SmallCargo => 5_000,
            TransportPreset::LargeCargo => 25_000,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransportPreset::SmallCargo => "small_cargo",
            TransportPreset::LargeCargo => "large_cargo",
        }
    }
}

impl fmt::Display for TransportPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPreset(pub String);

impl fmt::Display for UnknownPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown transport preset '{}'", self.0)
    }
}

impl std::error::Error for UnknownPreset {}

impl FromStr for TransportPreset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        match key.as_str() {
            "smallcargo" | "sc" | "small" => Ok(TransportPreset::SmallCargo),
            "largecargo" | "lc" | "large" => Ok(TransportPreset::LargeCargo),
            _ => Err(UnknownPreset(s.to_string())),
        }
    }
}

/// Cargo ships needed to move `payload`. The payload is first rounded to
/// whole resource units; non-positive payloads and zero capacity need none.
pub fn ships_needed(payload: f64, capacity: u64) -> u64 {
    let payload = payload.round();
    if !payload.is_finite() || payload <= 0.0 || capacity == 0 {
        return 0;
    }
    (payload / capacity as f64).ceil() as u64
}
