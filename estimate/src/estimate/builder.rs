//! Raw fee breakdowns as delivered by the query-execution layer.
//! Amounts arrive as signed integers so that out-of-range wire values are
//! representable here and rejected explicitly, instead of disappearing
//! into a deserialization error.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    aggregator,
    config::{MAX_FEE_EXTRAS, MAX_NOTES},
    error::{FeeComponentKind, FeeEstimateError},
    mode::FeeEstimateMode,
};

use super::{FeeEstimate, FeeEstimateResponse, FeeExtra, NetworkFeeEstimate};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtraBreakdown {
    pub name: String,
    pub subtotal: i64,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ComponentBreakdown {
    pub base: i64,
    #[serde(default)]
    pub extras: Vec<ExtraBreakdown>,
}

impl ComponentBreakdown {
    pub fn new(base: i64) -> Self {
        Self {
            base,
            extras: Vec::new(),
        }
    }

    pub fn with_extra(mut self, name: &str, subtotal: i64) -> Self {
        self.extras.push(ExtraBreakdown {
            name: name.to_owned(),
            subtotal,
        });
        self
    }

    // Negative amounts and oversized extras lists are the two ways a raw
    // component can be malformed
    fn validate(self, component: FeeComponentKind) -> Result<FeeEstimate, FeeEstimateError> {
        if self.extras.len() > MAX_FEE_EXTRAS {
            return Err(FeeEstimateError::LimitExceeded(
                "fee extras",
                self.extras.len(),
                MAX_FEE_EXTRAS,
            ));
        }

        let base = amount(self.base, component)?;
        let extras = self
            .extras
            .into_iter()
            .map(|extra| Ok(FeeExtra::new(extra.name, amount(extra.subtotal, component)?)))
            .collect::<Result<Vec<_>, FeeEstimateError>>()?;

        Ok(FeeEstimate::new(base, extras))
    }
}

fn amount(value: i64, component: FeeComponentKind) -> Result<u64, FeeEstimateError> {
    u64::try_from(value).map_err(|_| FeeEstimateError::NegativeAmount { component, value })
}

/// The input boundary of the estimation core: the already-resolved fee
/// figures for one transaction, before subtotals and the total are derived
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct FeeBreakdown {
    #[serde(default)]
    pub mode: Option<FeeEstimateMode>,
    pub multiplier: Option<i64>,
    pub node: Option<ComponentBreakdown>,
    pub service: Option<ComponentBreakdown>,
    #[serde(default)]
    pub notes: Vec<String>,
}

impl FeeBreakdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: FeeEstimateMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_multiplier(mut self, multiplier: i64) -> Self {
        self.multiplier = Some(multiplier);
        self
    }

    pub fn with_node(mut self, node: ComponentBreakdown) -> Self {
        self.node = Some(node);
        self
    }

    pub fn with_service(mut self, service: ComponentBreakdown) -> Self {
        self.service = Some(service);
        self
    }

    pub fn with_note(mut self, note: &str) -> Self {
        self.notes.push(note.to_owned());
        self
    }

    /// Validate the breakdown and derive the network subtotal and the
    /// grand total. Fails fast on the first missing component or negative
    /// amount; mode defaults to state when unspecified.
    pub fn build(self) -> Result<FeeEstimateResponse, FeeEstimateError> {
        let multiplier = self
            .multiplier
            .ok_or(FeeEstimateError::MissingComponent(FeeComponentKind::Network))?;
        let node = self
            .node
            .ok_or(FeeEstimateError::MissingComponent(FeeComponentKind::Node))?;
        let service = self
            .service
            .ok_or(FeeEstimateError::MissingComponent(FeeComponentKind::Service))?;

        if self.notes.len() > MAX_NOTES {
            return Err(FeeEstimateError::LimitExceeded(
                "notes",
                self.notes.len(),
                MAX_NOTES,
            ));
        }

        let multiplier = amount(multiplier, FeeComponentKind::Network)?;
        let node = node.validate(FeeComponentKind::Node)?;
        let service = service.validate(FeeComponentKind::Service)?;
        let mode = self.mode.unwrap_or_default();

        let node_subtotal = aggregator::component_subtotal(&node)?;
        let service_subtotal = aggregator::component_subtotal(&service)?;
        let network = NetworkFeeEstimate::new(
            multiplier,
            aggregator::network_subtotal(node_subtotal, multiplier)?,
        );

        let total = network
            .subtotal()
            .checked_add(node_subtotal)
            .and_then(|sum| sum.checked_add(service_subtotal))
            .ok_or(FeeEstimateError::Overflow)?;

        debug!(
            "fee estimate built: mode {} node {} service {} network {} total {}",
            mode,
            node_subtotal,
            service_subtotal,
            network.subtotal(),
            total
        );

        Ok(FeeEstimateResponse::new(
            network, node, service, mode, self.notes, total,
        ))
    }
}
