//! Error types for the bridge engine.

use alloy_primitives::{Address, B256, Bytes};
use core::time::Duration;
use thiserror::Error;

/// A [Result] type for the [BridgeError].
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Errors surfaced by the bridge engine.
///
/// Every variant is either retryable against the same data source (see
/// [`BridgeError::is_retryable`]) or final for the transaction it was raised for.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// A fixed-width input to the hash codec had the wrong length.
    #[error(transparent)]
    InvalidInputLength(#[from] HashCodecError),
    /// A `MessagePassed` log did not have the expected shape.
    #[error("Malformed withdrawal log: {0}")]
    MalformedWithdrawalLog(#[from] WithdrawalLogError),
    /// The receipt failed or carries no `MessagePassed` log.
    #[error("No withdrawal log found in transaction {0}")]
    NoWithdrawalLogFound(B256),
    /// A `TransactionDeposited` log did not have the expected shape.
    #[error("Malformed deposit log: {0}")]
    MalformedDepositLog(#[from] DepositLogError),
    /// The receipt carries no `TransactionDeposited` log.
    #[error("No deposit log found in transaction {0}")]
    NoDepositLogFound(B256),
    /// A recomputed commitment disagrees with the one recorded on chain.
    #[error("Proof binding mismatch: {0}")]
    ProofBindingMismatch(#[from] ProofBindingError),
    /// A bounded wait ran out of time.
    #[error("Timed out after {0:?}")]
    Timeout(Duration),
    /// A wait was cancelled by its caller.
    #[error("Wait cancelled")]
    Cancelled,
    /// The chain view failed to serve a request.
    #[error("Chain view unavailable: {0}")]
    ChainViewUnavailable(#[source] ChainViewError),
    /// The chain view does not hold the historical state needed at the given block.
    #[error("Historical state unavailable at block {block}: {reason}")]
    HistoricalStateUnavailable {
        /// The block at which state was requested.
        block: u64,
        /// The reason reported by the chain view.
        reason: String,
    },
    /// Neither chain knows the given transaction.
    #[error("Transaction {0} not found on either chain")]
    TransactionNotFound(B256),
    /// The transaction carries neither a deposit nor a withdrawal log.
    #[error("Transaction {0} does not initiate a cross-domain message")]
    UnknownDirection(B256),
    /// A deposit reached its terminal failure state.
    #[error("Deposit initiated by {0} failed")]
    DepositFailed(B256),
    /// No bridge adapter moves the given token pair.
    #[error("Token pair ({l1_token}, {l2_token}) not supported by bridge")]
    UnsupportedTokenPair {
        /// The L1 token.
        l1_token: Address,
        /// The L2 token.
        l2_token: Address,
    },
    /// A contract call returned data that could not be decoded.
    #[error("Contract return data decoding failed: {0}")]
    ContractDecode(#[from] alloy_sol_types::Error),
}

impl BridgeError {
    /// Returns `true` if the same request may succeed when retried later against the same
    /// data source.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::ChainViewUnavailable(_))
    }
}

impl From<ChainViewError> for BridgeError {
    fn from(err: ChainViewError) -> Self {
        match err {
            ChainViewError::MissingState { block, reason } => {
                Self::HistoricalStateUnavailable { block, reason }
            }
            err => Self::ChainViewUnavailable(err),
        }
    }
}

/// Errors raised by the [`crate::hash`] codec on malformed fixed-width input.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Invalid input length for {field}: expected {expected} bytes, got {actual}")]
pub struct HashCodecError {
    /// The name of the offending field.
    pub field: &'static str,
    /// The expected length in bytes.
    pub expected: usize,
    /// The supplied length in bytes.
    pub actual: usize,
}

/// Shape errors in a `MessagePassed` log.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WithdrawalLogError {
    /// The first topic is not the `MessagePassed` signature.
    #[error("Unexpected event signature: {0:?}")]
    InvalidSignature(Option<B256>),
    /// An indexed field is missing.
    #[error("Missing topic for `{0}`")]
    MissingTopic(&'static str),
    /// The log data is shorter than the fixed head.
    #[error("Log data too short: {len} bytes, expected at least {min}")]
    DataTooShort {
        /// The actual data length.
        len: usize,
        /// The minimum data length.
        min: usize,
    },
    /// The payload offset or length points outside the log data.
    #[error("Payload out of bounds: offset {offset}, length {length}, data {data_len} bytes")]
    PayloadOutOfBounds {
        /// The payload offset word.
        offset: u64,
        /// The payload length word.
        length: u64,
        /// The data length.
        data_len: usize,
    },
    /// A word that must fit a machine integer does not.
    #[error("Word `{0}` does not fit in 64 bits")]
    WordOverflow(&'static str),
    /// The committed withdrawal hash disagrees with the hash of the decoded fields.
    #[error("Withdrawal hash mismatch: log {logged}, computed {computed}")]
    HashMismatch {
        /// The hash carried in the log.
        logged: B256,
        /// The hash of the decoded fields.
        computed: B256,
    },
}

/// Shape errors in a `TransactionDeposited` log.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DepositLogError {
    /// The log could not be ABI-decoded as a `TransactionDeposited` event.
    #[error("Invalid event: {0}")]
    InvalidEvent(String),
    /// The deposit version is not supported.
    #[error("Unsupported deposit version {0}")]
    UnsupportedVersion(B256),
    /// The opaque data is shorter than the fixed head.
    #[error("Opaque data too short: {0} bytes")]
    OpaqueDataTooShort(usize),
    /// The log is missing its position in the block.
    #[error("Log index unavailable")]
    MissingLogIndex,
}

/// Disagreements between a locally assembled proof and on-chain commitments.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProofBindingError {
    /// The output root preimage does not hash to the proposed output root.
    #[error("Output root mismatch: proposed {proposed}, computed {computed}")]
    OutputRoot {
        /// The output root recorded by the oracle.
        proposed: B256,
        /// The hash of the assembled output root proof.
        computed: B256,
    },
    /// The storage proof does not verify against the message passer storage root.
    #[error("Storage proof invalid for slot {slot}: {reason}")]
    StorageProof {
        /// The storage slot being proven.
        slot: B256,
        /// The verification failure.
        reason: String,
    },
    /// The message passer does not record the withdrawal as sent.
    #[error("Withdrawal {0} is not recorded by the message passer")]
    MessageNotSent(B256),
}

/// Errors raised by a [`crate::ChainView`] implementation.
#[derive(Error, Debug)]
pub enum ChainViewError {
    /// The underlying transport failed.
    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn core::error::Error + Send + Sync>),
    /// The node does not hold the state required at the given block.
    #[error("Missing state at block {block}: {reason}")]
    MissingState {
        /// The block at which state was requested.
        block: u64,
        /// The node's explanation.
        reason: String,
    },
    /// A read-only call reverted.
    #[error("Call reverted: {0}")]
    Reverted(Bytes),
    /// The node returned a response that could not be interpreted.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    /// The node does not serve the header of a block yet.
    #[error("Header of block {0} is not available yet")]
    HeaderNotFound(u64),
}

impl ChainViewError {
    /// Wraps a transport-level error.
    pub fn transport<E>(err: E) -> Self
    where
        E: core::error::Error + Send + Sync + 'static,
    {
        Self::Transport(Box::new(err))
    }
}
