//! Pure composition rules for fee estimates.
//! No I/O and no shared state; every function reads its input value and
//! produces a new output, so concurrent callers need no coordination.

use log::trace;

use crate::{
    config::MAX_CHUNKS,
    error::{FeeComponentKind, FeeEstimateError},
    estimate::{FeeEstimate, FeeEstimateResponse, NetworkFeeEstimate},
};

/// Subtotal of one component: base plus the sum of all extra subtotals.
/// An empty extras sequence yields the base alone.
pub fn component_subtotal(estimate: &FeeEstimate) -> Result<u64, FeeEstimateError> {
    estimate.extras().iter().try_fold(estimate.base(), |acc, extra| {
        acc.checked_add(extra.subtotal())
            .ok_or(FeeEstimateError::Overflow)
    })
}

/// Network subtotal derived from the node subtotal.
/// A multiplier of 0 yields 0 regardless of the node subtotal.
pub fn network_subtotal(node_subtotal: u64, multiplier: u64) -> Result<u64, FeeEstimateError> {
    node_subtotal
        .checked_mul(multiplier)
        .ok_or(FeeEstimateError::Overflow)
}

/// Grand total across all three components
pub fn response_total(response: &FeeEstimateResponse) -> Result<u64, FeeEstimateError> {
    let node_subtotal = component_subtotal(response.node())?;
    let service_subtotal = component_subtotal(response.service())?;

    response
        .network()
        .subtotal()
        .checked_add(node_subtotal)
        .and_then(|sum| sum.checked_add(service_subtotal))
        .ok_or(FeeEstimateError::Overflow)
}

/// Check the two invariants every well-formed response must satisfy:
/// the network derivation and the total consistency
pub fn verify_response(response: &FeeEstimateResponse) -> Result<(), FeeEstimateError> {
    let node_subtotal = component_subtotal(response.node())?;

    let expected_network = network_subtotal(node_subtotal, response.network().multiplier())?;
    if response.network().subtotal() != expected_network {
        return Err(FeeEstimateError::SubtotalMismatch {
            component: FeeComponentKind::Network,
            expected: expected_network,
            found: response.network().subtotal(),
        });
    }

    let expected_total = response_total(response)?;
    if response.total() != expected_total {
        return Err(FeeEstimateError::TotalMismatch {
            expected: expected_total,
            found: response.total(),
        });
    }

    Ok(())
}

/// Combine per-chunk estimates into a single response by summation:
/// bases are summed, extras concatenated in chunk order, notes appended.
/// Every chunk must carry the same network multiplier and mode, which is
/// what keeps both invariants exact on the summed response.
pub fn aggregate_chunks(
    chunks: &[FeeEstimateResponse],
) -> Result<FeeEstimateResponse, FeeEstimateError> {
    let first = chunks
        .first()
        .ok_or(FeeEstimateError::ChunkMismatch("empty chunk sequence"))?;

    if chunks.len() > MAX_CHUNKS {
        return Err(FeeEstimateError::LimitExceeded(
            "chunks",
            chunks.len(),
            MAX_CHUNKS,
        ));
    }

    let multiplier = first.network().multiplier();
    let mode = first.mode();

    let mut node_base: u64 = 0;
    let mut node_extras = Vec::new();
    let mut service_base: u64 = 0;
    let mut service_extras = Vec::new();
    let mut notes = Vec::new();

    for chunk in chunks {
        if chunk.network().multiplier() != multiplier {
            return Err(FeeEstimateError::ChunkMismatch(
                "network multiplier differs across chunks",
            ));
        }
        if chunk.mode() != mode {
            return Err(FeeEstimateError::ChunkMismatch(
                "estimation mode differs across chunks",
            ));
        }
        verify_response(chunk)?;

        node_base = node_base
            .checked_add(chunk.node().base())
            .ok_or(FeeEstimateError::Overflow)?;
        node_extras.extend_from_slice(chunk.node().extras());

        service_base = service_base
            .checked_add(chunk.service().base())
            .ok_or(FeeEstimateError::Overflow)?;
        service_extras.extend_from_slice(chunk.service().extras());

        notes.extend_from_slice(chunk.notes());
    }

    let node = FeeEstimate::new(node_base, node_extras);
    let service = FeeEstimate::new(service_base, service_extras);

    let node_subtotal = component_subtotal(&node)?;
    let service_subtotal = component_subtotal(&service)?;
    let network = NetworkFeeEstimate::new(multiplier, network_subtotal(node_subtotal, multiplier)?);

    let total = network
        .subtotal()
        .checked_add(node_subtotal)
        .and_then(|sum| sum.checked_add(service_subtotal))
        .ok_or(FeeEstimateError::Overflow)?;

    trace!(
        "aggregated {} chunks: node {} service {} total {}",
        chunks.len(),
        node_subtotal,
        service_subtotal,
        total
    );

    Ok(FeeEstimateResponse::new(
        network, node, service, mode, notes, total,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimate::FeeExtra;

    fn estimate(base: u64, extras: &[u64]) -> FeeEstimate {
        let extras = extras
            .iter()
            .enumerate()
            .map(|(i, subtotal)| FeeExtra::new(format!("extra_{}", i), *subtotal))
            .collect();
        FeeEstimate::new(base, extras)
    }

    #[test]
    fn test_subtotal_empty_extras_is_base() {
        let subtotal = component_subtotal(&estimate(100, &[])).unwrap();
        assert_eq!(subtotal, 100);
    }

    #[test]
    fn test_subtotal_sums_extras() {
        let subtotal = component_subtotal(&estimate(100, &[20, 5])).unwrap();
        assert_eq!(subtotal, 125);
    }

    #[test]
    fn test_subtotal_zero_everything() {
        let subtotal = component_subtotal(&estimate(0, &[])).unwrap();
        assert_eq!(subtotal, 0);
    }

    #[test]
    fn test_subtotal_overflow_detected() {
        let result = component_subtotal(&estimate(u64::MAX, &[1]));
        assert_eq!(result, Err(FeeEstimateError::Overflow));
    }

    #[test]
    fn test_network_subtotal_scaling() {
        assert_eq!(network_subtotal(125, 3).unwrap(), 375);
        assert_eq!(network_subtotal(125, 1).unwrap(), 125);
    }

    #[test]
    fn test_network_subtotal_zero_multiplier() {
        // Multiplier 0 zeroes the network charge no matter the node subtotal
        assert_eq!(network_subtotal(u64::MAX, 0).unwrap(), 0);
    }

    #[test]
    fn test_network_subtotal_overflow_detected() {
        let result = network_subtotal(u64::MAX, 2);
        assert_eq!(result, Err(FeeEstimateError::Overflow));
    }

    #[test]
    fn test_verify_accepts_consistent_response() {
        let node = estimate(100, &[20, 5]);
        let service = estimate(50, &[]);
        let network = NetworkFeeEstimate::new(3, 375);
        let response = FeeEstimateResponse::new(
            network,
            node,
            service,
            Default::default(),
            Vec::new(),
            550,
        );
        assert!(verify_response(&response).is_ok());
    }

    #[test]
    fn test_verify_rejects_bad_network_subtotal() {
        let response = FeeEstimateResponse::new(
            NetworkFeeEstimate::new(3, 300),
            estimate(100, &[20, 5]),
            estimate(50, &[]),
            Default::default(),
            Vec::new(),
            475,
        );
        assert_eq!(
            verify_response(&response),
            Err(FeeEstimateError::SubtotalMismatch {
                component: FeeComponentKind::Network,
                expected: 375,
                found: 300,
            })
        );
    }

    #[test]
    fn test_verify_rejects_bad_total() {
        let response = FeeEstimateResponse::new(
            NetworkFeeEstimate::new(3, 375),
            estimate(100, &[20, 5]),
            estimate(50, &[]),
            Default::default(),
            Vec::new(),
            551,
        );
        assert_eq!(
            verify_response(&response),
            Err(FeeEstimateError::TotalMismatch {
                expected: 550,
                found: 551,
            })
        );
    }

    #[test]
    fn test_verify_idempotent() {
        // Pure function: same immutable input, same outcome every time
        let response = FeeEstimateResponse::new(
            NetworkFeeEstimate::new(2, 250),
            estimate(100, &[25]),
            estimate(75, &[]),
            Default::default(),
            Vec::new(),
            450,
        );
        for _ in 0..10 {
            assert!(verify_response(&response).is_ok());
            assert_eq!(response_total(&response).unwrap(), 450);
        }
    }

    fn chunk(node_base: u64, service_base: u64, multiplier: u64) -> FeeEstimateResponse {
        let network = NetworkFeeEstimate::new(multiplier, node_base * multiplier);
        let total = node_base * multiplier + node_base + service_base;
        FeeEstimateResponse::new(
            network,
            estimate(node_base, &[]),
            estimate(service_base, &[]),
            Default::default(),
            Vec::new(),
            total,
        )
    }

    #[test]
    fn test_aggregate_single_chunk_is_identity() {
        let single = chunk(100, 50, 3);
        let aggregated = aggregate_chunks(std::slice::from_ref(&single)).unwrap();
        assert_eq!(aggregated, single);
    }

    #[test]
    fn test_aggregate_uniform_chunks_scales_totals() {
        let chunks = vec![chunk(100, 50, 3); 5];
        let aggregated = aggregate_chunks(&chunks).unwrap();
        assert_eq!(aggregated.node().base(), 500);
        assert_eq!(aggregated.service().base(), 250);
        assert_eq!(aggregated.network().subtotal(), 1500);
        assert_eq!(aggregated.total(), 5 * chunks[0].total());
        assert!(aggregated.verify().is_ok());
    }

    #[test]
    fn test_aggregate_empty_chunks_rejected() {
        let result = aggregate_chunks(&[]);
        assert_eq!(
            result,
            Err(FeeEstimateError::ChunkMismatch("empty chunk sequence"))
        );
    }

    #[test]
    fn test_aggregate_mismatched_multiplier_rejected() {
        let chunks = vec![chunk(100, 50, 3), chunk(100, 50, 2)];
        assert_eq!(
            aggregate_chunks(&chunks),
            Err(FeeEstimateError::ChunkMismatch(
                "network multiplier differs across chunks"
            ))
        );
    }

    #[test]
    fn test_aggregate_mismatched_mode_rejected() {
        use crate::mode::FeeEstimateMode;

        let state_chunk = chunk(100, 50, 3);
        let intrinsic_chunk = FeeEstimateResponse::new(
            NetworkFeeEstimate::new(3, 300),
            estimate(100, &[]),
            estimate(50, &[]),
            FeeEstimateMode::Intrinsic,
            Vec::new(),
            450,
        );
        assert_eq!(
            aggregate_chunks(&[state_chunk, intrinsic_chunk]),
            Err(FeeEstimateError::ChunkMismatch(
                "estimation mode differs across chunks"
            ))
        );
    }

    #[test]
    fn test_aggregate_too_many_chunks_rejected() {
        let chunks = vec![chunk(1, 1, 1); MAX_CHUNKS + 1];
        assert_eq!(
            aggregate_chunks(&chunks),
            Err(FeeEstimateError::LimitExceeded(
                "chunks",
                MAX_CHUNKS + 1,
                MAX_CHUNKS
            ))
        );
    }

    #[test]
    fn test_aggregate_rejects_inconsistent_chunk() {
        let mut chunks = vec![chunk(100, 50, 3)];
        // Second chunk carries a corrupted network subtotal
        chunks.push(FeeEstimateResponse::new(
            NetworkFeeEstimate::new(3, 299),
            estimate(100, &[]),
            estimate(50, &[]),
            Default::default(),
            Vec::new(),
            449,
        ));
        assert!(matches!(
            aggregate_chunks(&chunks),
            Err(FeeEstimateError::SubtotalMismatch { .. })
        ));
    }
}
