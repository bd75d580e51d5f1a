//! Classification of JSON-RPC errors into [`ChainViewError`]s.

use alloy_primitives::Bytes;
use alloy_transport::TransportError;
use kona_bridge::ChainViewError;

/// Substrings nodes use to report that state at the requested block has been pruned.
const MISSING_STATE_MESSAGES: &[&str] = &[
    "missing trie node",
    "header not found",
    "historical state",
    "state is not available",
    "distance to target block exceeds maximum proof window",
];

/// The failure category of a JSON-RPC error response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcErrorKind {
    /// The node lacks state at the requested block.
    MissingState,
    /// The call reverted.
    Reverted,
    /// Anything else.
    Other,
}

/// Classifies a JSON-RPC error response by its message.
pub fn classify_rpc_error(message: &str) -> RpcErrorKind {
    let message = message.to_ascii_lowercase();
    if message.contains("execution reverted") {
        return RpcErrorKind::Reverted;
    }
    if MISSING_STATE_MESSAGES.iter().any(|m| message.contains(m)) {
        return RpcErrorKind::MissingState;
    }
    RpcErrorKind::Other
}

/// Maps a transport error raised while reading `block` into a [`ChainViewError`].
pub(crate) fn chain_view_error(err: TransportError, block: Option<u64>) -> ChainViewError {
    let Some(payload) = err.as_error_resp() else {
        return ChainViewError::transport(err);
    };

    match (classify_rpc_error(&payload.message), block) {
        (RpcErrorKind::Reverted, _) => {
            ChainViewError::Reverted(payload.as_revert_data().unwrap_or_else(Bytes::new))
        }
        (RpcErrorKind::MissingState, Some(block)) => {
            ChainViewError::MissingState { block, reason: payload.message.to_string() }
        }
        _ => ChainViewError::transport(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::geth_pruned(
        "missing trie node 0x1234 (path ) state 0x5678 is not available",
        RpcErrorKind::MissingState
    )]
    #[case::header("header not found", RpcErrorKind::MissingState)]
    #[case::reth_pruned("historical state 0xabc is not available", RpcErrorKind::MissingState)]
    #[case::proof_window(
        "distance to target block exceeds maximum proof window",
        RpcErrorKind::MissingState
    )]
    #[case::revert("execution reverted: L2OutputOracle: cannot get output", RpcErrorKind::Reverted)]
    #[case::revert_upper("Execution Reverted", RpcErrorKind::Reverted)]
    #[case::rate_limit("rate limit exceeded", RpcErrorKind::Other)]
    fn test_classify(#[case] message: &str, #[case] expected: RpcErrorKind) {
        assert_eq!(classify_rpc_error(message), expected);
    }
}
