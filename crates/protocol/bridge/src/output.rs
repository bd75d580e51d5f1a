//! Output proposals and the proofs that bind withdrawals to them.

use crate::{OUTPUT_ROOT_VERSION_V0, ProofBindingError, bindings::Types, hash};
use alloy_primitives::{B256, Bytes};

/// An L2 output proposal recorded by the `L2OutputOracle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutputProposal {
    /// The position of the proposal in the oracle.
    pub index: u64,
    /// The L2 block the output commits to.
    pub l2_block_number: u64,
    /// The proposed output root.
    pub output_root: B256,
    /// The L1 timestamp at which the proposal was submitted.
    pub timestamp: u64,
}

impl OutputProposal {
    /// Builds a proposal from the oracle's representation.
    pub fn from_sol(index: u64, proposal: &Types::OutputProposal) -> Self {
        Self {
            index,
            l2_block_number: saturating_u64(proposal.l2BlockNumber),
            output_root: proposal.outputRoot,
            timestamp: saturating_u64(proposal.timestamp),
        }
    }
}

fn saturating_u64(value: u128) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

/// Returns the index of the first proposal covering `l2_block_number`, that is the smallest
/// index whose L2 block is at or past it.
///
/// `proposals` must be ordered by index, which the oracle guarantees also orders them by L2
/// block.
pub fn covering_output_index(proposals: &[OutputProposal], l2_block_number: u64) -> Option<u64> {
    let pos = proposals.partition_point(|p| p.l2_block_number < l2_block_number);
    proposals.get(pos).map(|p| p.index)
}

/// The preimage of an output root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutputRootProof {
    /// The output root version.
    pub version: B256,
    /// The L2 world-state root.
    pub state_root: B256,
    /// The storage root of the `L2ToL1MessagePasser`.
    pub message_passer_storage_root: B256,
    /// The L2 block hash.
    pub latest_block_hash: B256,
}

impl OutputRootProof {
    /// Creates a version 0 proof.
    pub const fn v0(
        state_root: B256,
        message_passer_storage_root: B256,
        latest_block_hash: B256,
    ) -> Self {
        Self {
            version: OUTPUT_ROOT_VERSION_V0,
            state_root,
            message_passer_storage_root,
            latest_block_hash,
        }
    }

    /// Hashes the preimage into its output root.
    pub fn output_root(&self) -> B256 {
        hash::output_root(
            self.version,
            self.state_root,
            self.message_passer_storage_root,
            self.latest_block_hash,
        )
    }

    /// Returns the portal's representation of the proof.
    pub const fn to_sol(&self) -> Types::OutputRootProof {
        Types::OutputRootProof {
            version: self.version,
            stateRoot: self.state_root,
            messagePasserStorageRoot: self.message_passer_storage_root,
            latestBlockhash: self.latest_block_hash,
        }
    }
}

/// Everything `proveWithdrawalTransaction` needs besides the withdrawal itself.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WithdrawalProof {
    /// The index of the covering output proposal.
    pub output_index: u64,
    /// The preimage of the covering output root.
    pub output_root_proof: OutputRootProof,
    /// The storage trie nodes proving the withdrawal's `sentMessages` entry.
    pub storage_proof: Vec<Bytes>,
}

impl WithdrawalProof {
    /// Checks that the proof's output root preimage hashes to the proposal's output root.
    pub fn verify_binding(&self, proposal: &OutputProposal) -> Result<(), ProofBindingError> {
        let computed = self.output_root_proof.output_root();
        if computed != proposal.output_root {
            return Err(ProofBindingError::OutputRoot { proposed: proposal.output_root, computed });
        }
        Ok(())
    }
}
