//! Collaborator traits at the boundary of the bridge engine.

use crate::{BridgeResult, ChainViewError, HeaderInfo, ReceiptInfo, StorageProof};
use alloy_primitives::{Address, B256, Bytes, U256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use core::fmt::Debug;
use std::sync::Arc;

/// Read access to a single chain.
///
/// One view is held per layer. Every method is a remote read; implementations must not
/// cache results that can change between calls.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait ChainView: Debug + Send + Sync {
    /// Returns the number of the latest block.
    async fn block_number(&self) -> Result<u64, ChainViewError>;

    /// Returns the header of block `number`, or `None` if the block does not exist yet.
    async fn header_by_number(&self, number: u64) -> Result<Option<HeaderInfo>, ChainViewError>;

    /// Returns the receipt of transaction `hash`, or `None` if it is not included.
    async fn receipt_by_hash(&self, hash: B256) -> Result<Option<ReceiptInfo>, ChainViewError>;

    /// Returns a storage inclusion proof for `slot` of `address` at block `number`.
    ///
    /// Implementations must fail with [`ChainViewError::MissingState`] when the state at
    /// `number` has been pruned.
    async fn storage_proof(
        &self,
        address: Address,
        slot: B256,
        number: u64,
    ) -> Result<StorageProof, ChainViewError>;

    /// Executes a read-only call against `to` at block `number`, or at the latest block.
    async fn call(
        &self,
        to: Address,
        input: Bytes,
        number: Option<u64>,
    ) -> Result<Bytes, ChainViewError>;
}

#[async_trait]
impl<T: ChainView + ?Sized> ChainView for Arc<T> {
    async fn block_number(&self) -> Result<u64, ChainViewError> {
        (**self).block_number().await
    }

    async fn header_by_number(&self, number: u64) -> Result<Option<HeaderInfo>, ChainViewError> {
        (**self).header_by_number(number).await
    }

    async fn receipt_by_hash(&self, hash: B256) -> Result<Option<ReceiptInfo>, ChainViewError> {
        (**self).receipt_by_hash(hash).await
    }

    async fn storage_proof(
        &self,
        address: Address,
        slot: B256,
        number: u64,
    ) -> Result<StorageProof, ChainViewError> {
        (**self).storage_proof(address, slot, number).await
    }

    async fn call(
        &self,
        to: Address,
        input: Bytes,
        number: Option<u64>,
    ) -> Result<Bytes, ChainViewError> {
        (**self).call(to, input, number).await
    }
}

/// Executes the typed read-only `call` against `to` and decodes its return data.
pub(crate) async fn sol_call<V, C>(
    view: &V,
    to: Address,
    call: C,
    number: Option<u64>,
) -> BridgeResult<C::Return>
where
    V: ChainView + ?Sized,
    C: SolCall + Send,
{
    let output = view.call(to, call.abi_encode().into(), number).await?;
    Ok(C::abi_decode_returns(&output)?)
}

/// An unsigned transaction request built by [`crate::BridgeCalls`] or an adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallRequest {
    /// The called contract.
    pub to: Address,
    /// The calldata.
    pub input: Bytes,
    /// The ether value attached to the call.
    pub value: U256,
    /// An explicit gas limit, or `None` to estimate.
    pub gas_limit: Option<u64>,
}

impl CallRequest {
    /// Creates a call to `to` with `input` and no value.
    pub fn new(to: Address, input: impl Into<Bytes>) -> Self {
        Self { to, input: input.into(), ..Default::default() }
    }

    /// Attaches `value` to the call.
    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    /// Sets an explicit gas limit.
    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }
}

/// Signs, sends and awaits transactions on one chain.
///
/// The engine never calls this itself: it produces [`CallRequest`]s that callers submit.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait TransactionSubmitter: Debug + Send + Sync {
    /// Signs and broadcasts `request`, returning the transaction hash.
    async fn send_transaction(&self, request: CallRequest) -> Result<B256, ChainViewError>;

    /// Waits until transaction `hash` is included and returns its receipt.
    async fn wait_for_receipt(&self, hash: B256) -> Result<ReceiptInfo, ChainViewError>;
}
