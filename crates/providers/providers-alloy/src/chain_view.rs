//! A [`ChainView`] over a JSON-RPC node.

use crate::{
    errors::chain_view_error,
    receipt::{header_info, receipt_info},
};
use alloy_eips::{BlockId, BlockNumberOrTag};
use alloy_network::AnyNetwork;
use alloy_primitives::{Address, B256, Bytes, TxKind};
use alloy_provider::{Provider, RootProvider};
use alloy_rpc_types_eth::{TransactionInput, TransactionRequest};
use alloy_serde::WithOtherFields;
use async_trait::async_trait;
use kona_bridge::{ChainView, ChainViewError, HeaderInfo, ReceiptInfo, StorageProof};
use url::Url;

/// A [`ChainView`] backed by an alloy [`RootProvider`].
///
/// The provider is typed over [`AnyNetwork`] so that rollup receipts, including those of
/// deposit transactions, decode without a rollup-specific network.
#[derive(Debug, Clone)]
pub struct AlloyChainView {
    provider: RootProvider<AnyNetwork>,
}

impl AlloyChainView {
    /// Creates a view over `provider`.
    pub const fn new(provider: RootProvider<AnyNetwork>) -> Self {
        Self { provider }
    }

    /// Creates a view over an HTTP endpoint.
    pub fn new_http(url: Url) -> Self {
        Self::new(RootProvider::new_http(url))
    }

    /// Returns the inner provider.
    pub const fn provider(&self) -> &RootProvider<AnyNetwork> {
        &self.provider
    }
}

#[async_trait]
impl ChainView for AlloyChainView {
    async fn block_number(&self) -> Result<u64, ChainViewError> {
        self.provider.get_block_number().await.map_err(|e| chain_view_error(e, None))
    }

    async fn header_by_number(&self, number: u64) -> Result<Option<HeaderInfo>, ChainViewError> {
        trace!(target: "providers_alloy", number, "Fetching header");
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Number(number))
            .await
            .map_err(|e| chain_view_error(e, Some(number)))?;
        Ok(block.as_ref().map(header_info))
    }

    async fn receipt_by_hash(&self, hash: B256) -> Result<Option<ReceiptInfo>, ChainViewError> {
        trace!(target: "providers_alloy", %hash, "Fetching receipt");
        let receipt = self
            .provider
            .get_transaction_receipt(hash)
            .await
            .map_err(|e| chain_view_error(e, None))?;
        Ok(receipt.map(|r| receipt_info(&r.inner)))
    }

    async fn storage_proof(
        &self,
        address: Address,
        slot: B256,
        number: u64,
    ) -> Result<StorageProof, ChainViewError> {
        debug!(target: "providers_alloy", %address, %slot, number, "Fetching storage proof");
        let response = self
            .provider
            .get_proof(address, vec![slot])
            .number(number)
            .await
            .map_err(|e| chain_view_error(e, Some(number)))?;

        let entry = response
            .storage_proof
            .into_iter()
            .find(|p| p.key.as_b256() == slot)
            .ok_or_else(|| ChainViewError::InvalidResponse(format!("no proof for slot {slot}")))?;
        Ok(StorageProof {
            address: response.address,
            storage_root: response.storage_hash,
            key: slot,
            value: entry.value,
            proof: entry.proof,
        })
    }

    async fn call(
        &self,
        to: Address,
        input: Bytes,
        number: Option<u64>,
    ) -> Result<Bytes, ChainViewError> {
        let request = WithOtherFields::new(TransactionRequest {
            to: Some(TxKind::Call(to)),
            input: TransactionInput::new(input),
            ..Default::default()
        });
        let call = self.provider.call(request);
        let call = match number {
            Some(number) => call.block(BlockId::number(number)),
            None => call,
        };
        call.await.map_err(|e| chain_view_error(e, number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{U64, U256};
    use alloy_rpc_client::RpcClient;
    use alloy_transport::mock::*;
    use serde_json::json;

    fn mocked() -> (AlloyChainView, Asserter) {
        let asserter = Asserter::new();
        let transport = MockTransport::new(asserter.clone());
        let client = RpcClient::new(transport, false);
        (AlloyChainView::new(RootProvider::new(client)), asserter)
    }

    #[tokio::test]
    async fn test_block_number() {
        let (view, asserter) = mocked();
        asserter.push_success(&U64::from(42));
        assert_eq!(view.block_number().await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_unknown_receipt() {
        let (view, asserter) = mocked();
        asserter.push_success(&serde_json::Value::Null);
        assert_eq!(view.receipt_by_hash(B256::repeat_byte(1)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_storage_proof() {
        let (view, asserter) = mocked();
        let slot = B256::repeat_byte(0x42);
        let passer = Address::repeat_byte(0x16);
        asserter.push_success(&json!({
            "address": passer,
            "balance": "0x0",
            "codeHash": B256::ZERO,
            "nonce": "0x0",
            "storageHash": B256::repeat_byte(0x99),
            "accountProof": [],
            "storageProof": [{ "key": slot, "value": "0x1", "proof": ["0xc0"] }],
        }));

        let proof = view.storage_proof(passer, slot, 200).await.unwrap();
        assert_eq!(proof.address, passer);
        assert_eq!(proof.storage_root, B256::repeat_byte(0x99));
        assert_eq!(proof.value, U256::from(1));
        assert_eq!(proof.proof, vec![Bytes::from_static(&[0xc0])]);
    }

    #[tokio::test]
    async fn test_pruned_state() {
        let (view, asserter) = mocked();
        asserter.push_failure_msg("missing trie node 0x1234 (path )");
        let err = view.storage_proof(Address::ZERO, B256::ZERO, 7).await.unwrap_err();
        assert!(matches!(err, ChainViewError::MissingState { block: 7, .. }));
    }

    #[tokio::test]
    async fn test_reverted_call() {
        let (view, asserter) = mocked();
        asserter.push_failure_msg("execution reverted");
        let err = view.call(Address::ZERO, Bytes::new(), None).await.unwrap_err();
        assert!(matches!(err, ChainViewError::Reverted(_)));
    }

    #[tokio::test]
    async fn test_other_errors_are_transport() {
        let (view, asserter) = mocked();
        asserter.push_failure_msg("rate limit exceeded");
        let err = view.block_number().await.unwrap_err();
        assert!(matches!(err, ChainViewError::Transport(_)));
    }
}
