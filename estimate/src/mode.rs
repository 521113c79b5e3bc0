use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How the fee figures behind an estimate are sourced.
/// The aggregation rule is identical in both modes; only the upstream
/// population of bases and extras differs.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FeeEstimateMode {
    /// Fees may depend on current ledger state (existing accounts, tokens...)
    #[default]
    State,
    /// Fees computed from transaction structure alone, no state lookup
    Intrinsic,
}

impl FeeEstimateMode {
    /// Check if this mode may consult ledger state
    pub fn is_state(&self) -> bool {
        matches!(self, FeeEstimateMode::State)
    }

    /// Check if this mode is purely structural
    pub fn is_intrinsic(&self) -> bool {
        matches!(self, FeeEstimateMode::Intrinsic)
    }
}
