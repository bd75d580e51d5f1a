//! Chain data served by a [`crate::ChainView`].

use alloy_primitives::{Address, B256, Bytes, Log, U256};

/// The header fields the engine reads from a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeaderInfo {
    /// The block number.
    pub number: u64,
    /// The block hash.
    pub hash: B256,
    /// The world-state root after executing the block.
    pub state_root: B256,
    /// The block timestamp, in seconds.
    pub timestamp: u64,
}

/// A log together with its position in the block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptLog {
    /// The log itself.
    pub log: Log,
    /// The index of the log within its block, if known.
    pub log_index: Option<u64>,
}

/// A transaction receipt.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReceiptInfo {
    /// The hash of the transaction.
    pub transaction_hash: B256,
    /// The hash of the including block.
    pub block_hash: B256,
    /// The number of the including block.
    pub block_number: u64,
    /// Whether execution succeeded.
    pub status: bool,
    /// The called address, `None` for contract creations.
    pub to: Option<Address>,
    /// The logs emitted by the transaction.
    pub logs: Vec<ReceiptLog>,
}

impl ReceiptInfo {
    /// Returns the logs emitted by `address`.
    pub fn logs_from(&self, address: Address) -> impl Iterator<Item = &ReceiptLog> {
        self.logs.iter().filter(move |l| l.log.address == address)
    }
}

/// A storage inclusion proof for a single slot, as returned by `eth_getProof`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StorageProof {
    /// The account the proof is for.
    pub address: Address,
    /// The account's storage root.
    pub storage_root: B256,
    /// The storage slot.
    pub key: B256,
    /// The stored value.
    pub value: U256,
    /// The trie nodes from the storage root to the slot's leaf.
    pub proof: Vec<Bytes>,
}
