use serde::{Deserialize, Serialize};

use crate::{aggregator, error::FeeEstimateError, mode::FeeEstimateMode};

mod builder;

pub use builder::{ComponentBreakdown, ExtraBreakdown, FeeBreakdown};


/// An additional named fee line item beyond a component's base fee
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct FeeExtra {
    name: String,
    subtotal: u64,
}

impl FeeExtra {
    pub fn new(name: String, subtotal: u64) -> Self {
        Self { name, subtotal }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn subtotal(&self) -> u64 {
        self.subtotal
    }
}

/// One fee component (node or service): a base fee plus an ordered
/// sequence of extras
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct FeeEstimate {
    base: u64,
    #[serde(default)]
    extras: Vec<FeeExtra>,
}

impl FeeEstimate {
    pub fn new(base: u64, extras: Vec<FeeExtra>) -> Self {
        Self { base, extras }
    }

    pub fn base(&self) -> u64 {
        self.base
    }

    pub fn extras(&self) -> &[FeeExtra] {
        &self.extras
    }

    /// Base plus the sum of all extra subtotals
    pub fn subtotal(&self) -> Result<u64, FeeEstimateError> {
        aggregator::component_subtotal(self)
    }
}

/// The network charge: the node subtotal scaled by a network multiplier
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NetworkFeeEstimate {
    multiplier: u64,
    subtotal: u64,
}

impl NetworkFeeEstimate {
    pub fn new(multiplier: u64, subtotal: u64) -> Self {
        Self { multiplier, subtotal }
    }

    pub fn multiplier(&self) -> u64 {
        self.multiplier
    }

    pub fn subtotal(&self) -> u64 {
        self.subtotal
    }
}

/// Complete fee estimate for a transaction
/// Immutable once produced; `total` and the network subtotal are derived
/// fields and must satisfy the composition invariants (see `verify`)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct FeeEstimateResponse {
    network: NetworkFeeEstimate,
    node: FeeEstimate,
    service: FeeEstimate,
    mode: FeeEstimateMode,
    #[serde(default)]
    notes: Vec<String>,
    total: u64,
}

impl FeeEstimateResponse {
    pub(crate) fn new(
        network: NetworkFeeEstimate,
        node: FeeEstimate,
        service: FeeEstimate,
        mode: FeeEstimateMode,
        notes: Vec<String>,
        total: u64,
    ) -> Self {
        Self {
            network,
            node,
            service,
            mode,
            notes,
            total,
        }
    }

    pub fn network(&self) -> &NetworkFeeEstimate {
        &self.network
    }

    pub fn node(&self) -> &FeeEstimate {
        &self.node
    }

    pub fn service(&self) -> &FeeEstimate {
        &self.service
    }

    pub fn mode(&self) -> FeeEstimateMode {
        self.mode
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Check both composition invariants:
    /// network subtotal == node subtotal * multiplier, and
    /// total == network + node + service subtotals
    pub fn verify(&self) -> Result<(), FeeEstimateError> {
        aggregator::verify_response(self)
    }

    /// Combine per-chunk estimates of a chunked transaction into one
    /// aggregated response
    pub fn aggregate_chunks(chunks: &[FeeEstimateResponse]) -> Result<Self, FeeEstimateError> {
        aggregator::aggregate_chunks(chunks)
    }
}
