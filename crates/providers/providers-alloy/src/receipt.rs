//! Conversions from RPC responses into engine types.

use alloy_consensus::TxReceipt;
use alloy_network::AnyRpcBlock;
use alloy_rpc_types_eth::{Log, TransactionReceipt};
use kona_bridge::{HeaderInfo, ReceiptInfo, ReceiptLog};

pub(crate) fn receipt_info<E>(receipt: &TransactionReceipt<E>) -> ReceiptInfo
where
    E: TxReceipt<Log = Log>,
{
    ReceiptInfo {
        transaction_hash: receipt.transaction_hash,
        block_hash: receipt.block_hash.unwrap_or_default(),
        block_number: receipt.block_number.unwrap_or_default(),
        status: receipt.inner.status(),
        to: receipt.to,
        logs: receipt
            .inner
            .logs()
            .iter()
            .map(|log| ReceiptLog { log: log.inner.clone(), log_index: log.log_index })
            .collect(),
    }
}

pub(crate) fn header_info(block: &AnyRpcBlock) -> HeaderInfo {
    let header = &block.header;
    HeaderInfo {
        number: header.number,
        hash: header.hash,
        state_root: header.state_root,
        timestamp: header.timestamp,
    }
}
