//! Metrics recorded by the bridge engine.

use crate::{BridgeError, MessageStatus, WithdrawalProof};

/// Container for the bridge engine's metric names.
#[derive(Debug, Clone)]
pub struct Metrics;

impl Metrics {
    /// Total number of status queries, labelled by the resulting status.
    pub const STATUS_QUERY_TOTAL: &'static str = "kona_bridge_status_query_total";
    /// Total number of failed status queries.
    pub const STATUS_QUERY_ERROR_TOTAL: &'static str = "kona_bridge_status_query_error_total";
    /// Total number of withdrawal proofs built.
    pub const PROOF_BUILD_SUCCESS_TOTAL: &'static str = "kona_bridge_proof_build_success_total";
    /// Total number of failed withdrawal proof builds.
    pub const PROOF_BUILD_ERROR_TOTAL: &'static str = "kona_bridge_proof_build_error_total";
    /// Number of storage trie nodes in built withdrawal proofs.
    pub const PROOF_NODES: &'static str = "kona_bridge_proof_nodes";

    /// Describes and zeroes every metric.
    pub fn init() {
        Self::describe();
        Self::zero();
    }

    fn describe() {
        metrics::describe_counter!(
            Self::STATUS_QUERY_TOTAL,
            metrics::Unit::Count,
            "Total number of message status queries, by resulting status",
        );
        metrics::describe_counter!(
            Self::STATUS_QUERY_ERROR_TOTAL,
            metrics::Unit::Count,
            "Total number of message status queries that failed",
        );
        metrics::describe_counter!(
            Self::PROOF_BUILD_SUCCESS_TOTAL,
            metrics::Unit::Count,
            "Total number of withdrawal proofs built",
        );
        metrics::describe_counter!(
            Self::PROOF_BUILD_ERROR_TOTAL,
            metrics::Unit::Count,
            "Total number of withdrawal proof builds that failed",
        );
        metrics::describe_histogram!(
            Self::PROOF_NODES,
            metrics::Unit::Count,
            "Number of storage trie nodes in a withdrawal proof",
        );
    }

    fn zero() {
        metrics::counter!(Self::STATUS_QUERY_ERROR_TOTAL).increment(0);
        metrics::counter!(Self::PROOF_BUILD_SUCCESS_TOTAL).increment(0);
        metrics::counter!(Self::PROOF_BUILD_ERROR_TOTAL).increment(0);
    }

    pub(crate) fn record_status_query(result: &Result<MessageStatus, BridgeError>) {
        match result {
            Ok(status) => {
                metrics::counter!(Self::STATUS_QUERY_TOTAL, "status" => status.to_string())
                    .increment(1);
            }
            Err(_) => metrics::counter!(Self::STATUS_QUERY_ERROR_TOTAL).increment(1),
        }
    }

    pub(crate) fn record_proof_build(result: &Result<Option<WithdrawalProof>, BridgeError>) {
        match result {
            Ok(Some(proof)) => {
                metrics::counter!(Self::PROOF_BUILD_SUCCESS_TOTAL).increment(1);
                metrics::histogram!(Self::PROOF_NODES).record(proof.storage_proof.len() as f64);
            }
            Ok(None) => {}
            Err(_) => metrics::counter!(Self::PROOF_BUILD_ERROR_TOTAL).increment(1),
        }
    }
}
