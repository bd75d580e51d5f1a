//! Withdrawal proof construction.

use crate::{
    BridgeConfig, BridgeError, BridgeResult, ChainView, ChainViewError, OutputOracle,
    OutputProposal, OutputRootProof, ProofBindingError, ReceiptInfo, WithdrawalMessage,
    WithdrawalProof,
};
use alloy_primitives::{Address, B256, U256, keccak256};
use alloy_trie::{Nibbles, proof::verify_proof};

/// Builds the proofs `proveWithdrawalTransaction` requires.
///
/// A withdrawal is proven against the first output proposal at or past its L2 block. The
/// builder fetches the proposal's L2 header and the message passer's storage proof at that
/// block, checks the storage proof against the message passer's storage root and checks that
/// the assembled output root preimage hashes to the proposed output root.
#[derive(Debug)]
pub struct WithdrawalProofBuilder<L1, L2> {
    oracle: OutputOracle<L1>,
    l2: L2,
    message_passer: Address,
}

impl<L1, L2> WithdrawalProofBuilder<L1, L2>
where
    L1: ChainView,
    L2: ChainView,
{
    /// Creates a builder reading proposals through `l1` and state through `l2`.
    pub fn new(l1: L1, l2: L2, config: &BridgeConfig) -> Self {
        Self {
            oracle: OutputOracle::new(l1, config.contracts.l2_output_oracle),
            l2,
            message_passer: config.contracts.l2_to_l1_message_passer,
        }
    }

    /// Decodes the withdrawal initiated by `receipt` and proves it.
    ///
    /// Returns `None` for the proof while no output proposal covers the withdrawal.
    pub async fn build(
        &self,
        receipt: &ReceiptInfo,
    ) -> BridgeResult<(WithdrawalMessage, Option<WithdrawalProof>)> {
        let message = WithdrawalMessage::from_receipt(receipt, self.message_passer)?;
        let proof = self.prove(&message).await?;
        Ok((message, proof))
    }

    /// Fetches the receipt of the L2 transaction `tx_hash` and proves its withdrawal.
    pub async fn build_for_transaction(
        &self,
        tx_hash: B256,
    ) -> BridgeResult<(WithdrawalMessage, Option<WithdrawalProof>)> {
        let receipt = self
            .l2
            .receipt_by_hash(tx_hash)
            .await?
            .ok_or(BridgeError::TransactionNotFound(tx_hash))?;
        self.build(&receipt).await
    }

    /// Proves `message` against the first output proposal covering it.
    ///
    /// Returns `None` while no proposal covers the withdrawal's L2 block.
    pub async fn prove(
        &self,
        message: &WithdrawalMessage,
    ) -> BridgeResult<Option<WithdrawalProof>> {
        let result = self.try_prove(message).await;
        #[cfg(feature = "metrics")]
        crate::Metrics::record_proof_build(&result);
        result
    }

    async fn try_prove(
        &self,
        message: &WithdrawalMessage,
    ) -> BridgeResult<Option<WithdrawalProof>> {
        let Some(output) = self.oracle.covering_output(message.block_number).await? else {
            debug!(
                target: "bridge::proof",
                withdrawal_hash = %message.withdrawal_hash,
                l2_block = message.block_number,
                "No output proposal covers the withdrawal yet"
            );
            return Ok(None);
        };
        self.prove_against(message, &output).await.map(Some)
    }

    /// Proves `message` against a given `output` proposal.
    pub async fn prove_against(
        &self,
        message: &WithdrawalMessage,
        output: &OutputProposal,
    ) -> BridgeResult<WithdrawalProof> {
        let block = output.l2_block_number;
        let header =
            self.l2.header_by_number(block).await?.ok_or(ChainViewError::HeaderNotFound(block))?;

        let slot = message.storage_slot();
        let storage = self.l2.storage_proof(self.message_passer, slot, block).await?;
        if storage.value != U256::from(1) {
            return Err(ProofBindingError::MessageNotSent(message.withdrawal_hash).into());
        }
        verify_proof(
            storage.storage_root,
            Nibbles::unpack(keccak256(slot)),
            Some(alloy_rlp::encode(storage.value)),
            &storage.proof,
        )
        .map_err(|e| ProofBindingError::StorageProof { slot, reason: e.to_string() })?;

        let proof = WithdrawalProof {
            output_index: output.index,
            output_root_proof: OutputRootProof::v0(
                header.state_root,
                storage.storage_root,
                header.hash,
            ),
            storage_proof: storage.proof,
        };
        if let Err(err) = proof.verify_binding(output) {
            warn!(
                target: "bridge::proof",
                withdrawal_hash = %message.withdrawal_hash,
                output_index = output.index,
                %err,
                "Assembled proof does not match the proposed output root"
            );
            return Err(err.into());
        }

        info!(
            target: "bridge::proof",
            withdrawal_hash = %message.withdrawal_hash,
            output_index = output.index,
            l2_block = block,
            nodes = proof.storage_proof.len(),
            "Built withdrawal proof"
        );
        Ok(proof)
    }
}
