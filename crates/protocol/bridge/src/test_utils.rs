//! Test utilities for the bridge engine.

use crate::{
    ChainView, ChainViewError, HeaderInfo, OutputProposal, ReceiptInfo, StorageProof,
    bindings::{L2OutputOracle, OptimismPortal, Types},
    covering_output_index,
};
use alloy_primitives::{
    Address, B256, Bytes, U256, keccak256,
    map::{HashMap, HashSet},
};
use alloy_sol_types::SolCall;
use alloy_trie::{HashBuilder, Nibbles, proof::ProofRetainer};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};

/// An in-memory [`ChainView`] holding the state of one chain.
///
/// Read-only calls are answered by selector, regardless of the called address, from the
/// oracle and portal state kept alongside the blocks. Clones share state, so a test can keep
/// a handle and move the chain forward while components read from it.
#[derive(Debug, Clone, Default)]
pub struct TestChainView {
    inner: Arc<Mutex<TestChainState>>,
}

#[derive(Debug, Default)]
struct TestChainState {
    block_number: u64,
    headers: HashMap<u64, HeaderInfo>,
    receipts: HashMap<B256, ReceiptInfo>,
    storage_proofs: HashMap<(Address, B256, u64), StorageProof>,
    pruned_below: u64,
    outputs: Vec<OutputProposal>,
    proven: HashMap<B256, (B256, u64, u64)>,
    finalized: HashSet<B256>,
    finalization_period: u64,
    finalization_period_reads: usize,
    failing_calls: usize,
}

impl TestChainView {
    fn state(&self) -> MutexGuard<'_, TestChainState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Sets the latest block number.
    pub fn set_block_number(&self, number: u64) {
        self.state().block_number = number;
    }

    /// Inserts a header, advancing the latest block number if needed.
    pub fn insert_header(&self, header: HeaderInfo) {
        let mut state = self.state();
        state.block_number = state.block_number.max(header.number);
        state.headers.insert(header.number, header);
    }

    /// Inserts a receipt.
    pub fn insert_receipt(&self, receipt: ReceiptInfo) {
        self.state().receipts.insert(receipt.transaction_hash, receipt);
    }

    /// Inserts a storage proof served at `number`.
    pub fn insert_storage_proof(&self, number: u64, proof: StorageProof) {
        self.state().storage_proofs.insert((proof.address, proof.key, number), proof);
    }

    /// Drops the state of every block below `number`.
    pub fn prune_state_below(&self, number: u64) {
        self.state().pruned_below = number;
    }

    /// Appends an output proposal to the oracle, returning its index.
    pub fn push_output(&self, l2_block_number: u64, output_root: B256, timestamp: u64) -> u64 {
        let mut state = self.state();
        let index = state.outputs.len() as u64;
        state.outputs.push(OutputProposal { index, l2_block_number, output_root, timestamp });
        index
    }

    /// Records a proof for `withdrawal_hash` in the portal.
    pub fn prove_withdrawal(
        &self,
        withdrawal_hash: B256,
        output_root: B256,
        timestamp: u64,
        output_index: u64,
    ) {
        self.state().proven.insert(withdrawal_hash, (output_root, timestamp, output_index));
    }

    /// Marks `withdrawal_hash` as finalized in the portal.
    pub fn finalize_withdrawal(&self, withdrawal_hash: B256) {
        self.state().finalized.insert(withdrawal_hash);
    }

    /// Sets the oracle's finalization period.
    pub fn set_finalization_period(&self, seconds: u64) {
        self.state().finalization_period = seconds;
    }

    /// Returns how many times the finalization period was read.
    pub fn finalization_period_reads(&self) -> usize {
        self.state().finalization_period_reads
    }

    /// Makes the next `n` calls fail with a transport error.
    pub fn fail_next_calls(&self, n: usize) {
        self.state().failing_calls = n;
    }

    fn answer(state: &mut TestChainState, input: &[u8]) -> Result<Bytes, ChainViewError> {
        let selector: [u8; 4] = input
            .get(..4)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| ChainViewError::InvalidResponse("missing selector".into()))?;
        let invalid = |e: alloy_sol_types::Error| ChainViewError::InvalidResponse(e.to_string());

        let output = match selector {
            L2OutputOracle::latestBlockNumberCall::SELECTOR => {
                let latest = state.outputs.last().map(|o| o.l2_block_number).unwrap_or_default();
                L2OutputOracle::latestBlockNumberCall::abi_encode_returns(&U256::from(latest))
            }
            L2OutputOracle::getL2OutputIndexAfterCall::SELECTOR => {
                let call = L2OutputOracle::getL2OutputIndexAfterCall::abi_decode(input)
                    .map_err(invalid)?;
                let block = u64::try_from(call._l2BlockNumber).unwrap_or(u64::MAX);
                let index = covering_output_index(&state.outputs, block)
                    .ok_or_else(|| ChainViewError::Reverted(Bytes::new()))?;
                L2OutputOracle::getL2OutputIndexAfterCall::abi_encode_returns(&U256::from(index))
            }
            L2OutputOracle::getL2OutputCall::SELECTOR => {
                let call = L2OutputOracle::getL2OutputCall::abi_decode(input).map_err(invalid)?;
                let output = usize::try_from(call._l2OutputIndex)
                    .ok()
                    .and_then(|i| state.outputs.get(i))
                    .ok_or_else(|| ChainViewError::Reverted(Bytes::new()))?;
                L2OutputOracle::getL2OutputCall::abi_encode_returns(&Types::OutputProposal {
                    outputRoot: output.output_root,
                    timestamp: output.timestamp.into(),
                    l2BlockNumber: output.l2_block_number.into(),
                })
            }
            L2OutputOracle::FINALIZATION_PERIOD_SECONDSCall::SELECTOR => {
                state.finalization_period_reads += 1;
                L2OutputOracle::FINALIZATION_PERIOD_SECONDSCall::abi_encode_returns(&U256::from(
                    state.finalization_period,
                ))
            }
            OptimismPortal::provenWithdrawalsCall::SELECTOR => {
                let call =
                    OptimismPortal::provenWithdrawalsCall::abi_decode(input).map_err(invalid)?;
                let (output_root, timestamp, index) =
                    state.proven.get(&call._withdrawalHash).copied().unwrap_or_default();
                OptimismPortal::provenWithdrawalsCall::abi_encode_returns(
                    &OptimismPortal::provenWithdrawalsReturn {
                        outputRoot: output_root,
                        timestamp: timestamp.into(),
                        l2OutputIndex: index.into(),
                    },
                )
            }
            OptimismPortal::finalizedWithdrawalsCall::SELECTOR => {
                let call =
                    OptimismPortal::finalizedWithdrawalsCall::abi_decode(input).map_err(invalid)?;
                OptimismPortal::finalizedWithdrawalsCall::abi_encode_returns(
                    &state.finalized.contains(&call._withdrawalHash),
                )
            }
            _ => return Err(ChainViewError::Reverted(Bytes::new())),
        };
        Ok(output.into())
    }
}

#[async_trait]
impl ChainView for TestChainView {
    async fn block_number(&self) -> Result<u64, ChainViewError> {
        Ok(self.state().block_number)
    }

    async fn header_by_number(&self, number: u64) -> Result<Option<HeaderInfo>, ChainViewError> {
        Ok(self.state().headers.get(&number).copied())
    }

    async fn receipt_by_hash(&self, hash: B256) -> Result<Option<ReceiptInfo>, ChainViewError> {
        Ok(self.state().receipts.get(&hash).cloned())
    }

    async fn storage_proof(
        &self,
        address: Address,
        slot: B256,
        number: u64,
    ) -> Result<StorageProof, ChainViewError> {
        let state = self.state();
        if number < state.pruned_below {
            return Err(ChainViewError::MissingState {
                block: number,
                reason: "missing trie node".to_string(),
            });
        }
        Ok(state.storage_proofs.get(&(address, slot, number)).cloned().unwrap_or_else(|| {
            StorageProof { address, key: slot, ..Default::default() }
        }))
    }

    async fn call(
        &self,
        _to: Address,
        input: Bytes,
        _number: Option<u64>,
    ) -> Result<Bytes, ChainViewError> {
        let mut state = self.state();
        if state.failing_calls > 0 {
            state.failing_calls -= 1;
            return Err(ChainViewError::transport(std::io::Error::other("connection reset")));
        }
        Self::answer(&mut state, &input)
    }
}

/// Builds a storage trie in which every slot in `slots` holds `1`, returning its root and the
/// proof for `target`.
pub fn storage_trie_proof(slots: &[B256], target: B256) -> (B256, Vec<Bytes>) {
    let mut leaves: Vec<(Nibbles, Vec<u8>)> = slots
        .iter()
        .map(|slot| (Nibbles::unpack(keccak256(slot)), alloy_rlp::encode(U256::from(1))))
        .collect();
    leaves.sort_by(|a, b| a.0.cmp(&b.0));

    let target_path = Nibbles::unpack(keccak256(target));
    let mut builder =
        HashBuilder::default().with_proof_retainer(ProofRetainer::from_iter([target_path]));
    for (path, value) in &leaves {
        builder.add_leaf(*path, value);
    }
    let root = builder.root();
    let proof = builder
        .take_proof_nodes()
        .matching_nodes_sorted(&target_path)
        .into_iter()
        .map(|(_, node)| node)
        .collect();
    (root, proof)
}
