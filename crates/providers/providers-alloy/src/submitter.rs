//! A [`TransactionSubmitter`] signing with a local key.

use crate::{errors::chain_view_error, receipt::receipt_info};
use alloy_network::{AnyNetwork, EthereumWallet};
use alloy_primitives::{Address, B256, TxKind};
use alloy_provider::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder};
use alloy_rpc_types_eth::{TransactionInput, TransactionRequest};
use alloy_serde::WithOtherFields;
use alloy_signer_local::{LocalSignerError, PrivateKeySigner};
use async_trait::async_trait;
use kona_bridge::{CallRequest, ChainViewError, ReceiptInfo, TransactionSubmitter};
use thiserror::Error;
use url::Url;

/// Errors constructing an [`AlloyTxSubmitter`].
#[derive(Error, Debug)]
pub enum SubmitterError {
    /// The private key could not be parsed.
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(#[from] LocalSignerError),
}

/// Submits transactions through a JSON-RPC node, signing them with a local private key.
///
/// Nonce, gas and chain id are filled in by the provider.
#[derive(Debug, Clone)]
pub struct AlloyTxSubmitter {
    provider: DynProvider<AnyNetwork>,
    address: Address,
}

impl AlloyTxSubmitter {
    /// Creates a submitter sending to `url`, signing with `signer`.
    pub fn new_http(url: Url, signer: PrivateKeySigner) -> Self {
        let address = signer.address();
        let provider = ProviderBuilder::new()
            .network::<AnyNetwork>()
            .wallet(EthereumWallet::from(signer))
            .connect_http(url)
            .erased();
        Self { provider, address }
    }

    /// Creates a submitter sending to `url`, signing with the hex-encoded `private_key`.
    pub fn from_private_key(url: Url, private_key: &str) -> Result<Self, SubmitterError> {
        let signer = private_key.trim().parse::<PrivateKeySigner>()?;
        Ok(Self::new_http(url, signer))
    }

    /// Returns the address transactions are sent from.
    pub const fn address(&self) -> Address {
        self.address
    }
}

#[async_trait]
impl TransactionSubmitter for AlloyTxSubmitter {
    async fn send_transaction(&self, request: CallRequest) -> Result<B256, ChainViewError> {
        let tx = WithOtherFields::new(TransactionRequest {
            from: Some(self.address),
            to: Some(TxKind::Call(request.to)),
            input: TransactionInput::new(request.input),
            value: Some(request.value),
            gas: request.gas_limit,
            ..Default::default()
        });
        let pending =
            self.provider.send_transaction(tx).await.map_err(|e| chain_view_error(e, None))?;
        let hash = *pending.tx_hash();
        info!(target: "providers_alloy", %hash, to = %request.to, "Sent transaction");
        Ok(hash)
    }

    async fn wait_for_receipt(&self, hash: B256) -> Result<ReceiptInfo, ChainViewError> {
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), hash)
            .get_receipt()
            .await
            .map_err(ChainViewError::transport)?;
        let receipt = receipt_info(&receipt.inner);
        debug!(
            target: "providers_alloy",
            %hash,
            block = receipt.block_number,
            status = receipt.status,
            "Transaction included"
        );
        Ok(receipt)
    }
}
