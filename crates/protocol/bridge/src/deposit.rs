//! Deposits initiated through the `OptimismPortal`, and the L2 transactions they derive.

use crate::{
    BridgeError, BridgeResult, DEPOSIT_TX_TYPE, DepositLogError, ReceiptInfo,
    bindings::OptimismPortal::TransactionDeposited, hash,
};
use alloy_primitives::{Address, B256, Bytes, Log, U256, keccak256};
use alloy_rlp::{EMPTY_STRING_CODE, Encodable, Header};
use alloy_sol_types::SolEvent;

/// The size of the fixed head of version 0 opaque data: mint, value, gas limit and the
/// creation flag.
const OPAQUE_DATA_HEAD_LEN: usize = 32 + 32 + 8 + 1;

/// An L1 to L2 message, reconstructed from its `TransactionDeposited` log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositMessage {
    /// The L1 account the deposit is sent from, aliased if it is a contract.
    pub from: Address,
    /// The L2 recipient, `None` for contract creations.
    pub to: Option<Address>,
    /// The ether minted on L2.
    pub mint: U256,
    /// The ether value of the L2 call.
    pub value: U256,
    /// The gas limit of the L2 transaction.
    pub gas_limit: u64,
    /// The calldata or init code of the L2 transaction.
    pub data: Bytes,
    /// The L1 transaction that initiated the deposit.
    pub l1_tx_hash: B256,
    /// The hash of the L1 block that includes the deposit.
    pub l1_block_hash: B256,
    /// The number of the L1 block that includes the deposit.
    pub l1_block_number: u64,
    /// The index of the deposit log within its L1 block.
    pub log_index: u64,
}

impl DepositMessage {
    /// Extracts the first deposit emitted by `portal` in `receipt`.
    pub fn from_receipt(receipt: &ReceiptInfo, portal: Address) -> BridgeResult<Self> {
        let entry = receipt
            .logs_from(portal)
            .find(|l| l.log.topics().first() == Some(&TransactionDeposited::SIGNATURE_HASH))
            .ok_or(BridgeError::NoDepositLogFound(receipt.transaction_hash))?;

        Self::from_log(
            &entry.log,
            receipt.transaction_hash,
            receipt.block_hash,
            receipt.block_number,
            entry.log_index,
        )
        .map_err(Into::into)
    }

    /// Decodes a version 0 `TransactionDeposited` log.
    pub fn from_log(
        log: &Log,
        l1_tx_hash: B256,
        l1_block_hash: B256,
        l1_block_number: u64,
        log_index: Option<u64>,
    ) -> Result<Self, DepositLogError> {
        let event = TransactionDeposited::decode_log_data(&log.data)
            .map_err(|e| DepositLogError::InvalidEvent(e.to_string()))?;
        if !event.version.is_zero() {
            return Err(DepositLogError::UnsupportedVersion(B256::from(event.version)));
        }
        let log_index = log_index.ok_or(DepositLogError::MissingLogIndex)?;

        let opaque = event.opaqueData.as_ref();
        if opaque.len() < OPAQUE_DATA_HEAD_LEN {
            return Err(DepositLogError::OpaqueDataTooShort(opaque.len()));
        }
        let mint = U256::from_be_slice(&opaque[..32]);
        let value = U256::from_be_slice(&opaque[32..64]);
        let mut gas = [0u8; 8];
        gas.copy_from_slice(&opaque[64..72]);
        let is_creation = opaque[72] != 0;

        Ok(Self {
            from: event.from,
            to: (!is_creation).then_some(event.to),
            mint,
            value,
            gas_limit: u64::from_be_bytes(gas),
            data: Bytes::copy_from_slice(&opaque[OPAQUE_DATA_HEAD_LEN..]),
            l1_tx_hash,
            l1_block_hash,
            l1_block_number,
            log_index,
        })
    }

    /// Encodes the message as the `TransactionDeposited` log `portal` would emit.
    pub fn to_log(&self, portal: Address) -> Log {
        let mut opaque = Vec::with_capacity(OPAQUE_DATA_HEAD_LEN + self.data.len());
        opaque.extend_from_slice(&self.mint.to_be_bytes::<32>());
        opaque.extend_from_slice(&self.value.to_be_bytes::<32>());
        opaque.extend_from_slice(&self.gas_limit.to_be_bytes());
        opaque.push(u8::from(self.to.is_none()));
        opaque.extend_from_slice(&self.data);

        let event = TransactionDeposited {
            from: self.from,
            to: self.to.unwrap_or_default(),
            version: U256::ZERO,
            opaqueData: opaque.into(),
        };
        Log { address: portal, data: event.encode_log_data() }
    }

    /// Returns the source hash binding the deposit to its position in the L1 chain.
    pub fn source_hash(&self) -> B256 {
        hash::user_deposit_source_hash(self.l1_block_hash, self.log_index)
    }

    /// Returns the EIP-2718 envelope of the L2 deposit transaction.
    pub fn encoded_transaction(&self) -> Bytes {
        let source_hash = self.source_hash();
        let mut payload = Vec::with_capacity(128 + self.data.len());
        source_hash.encode(&mut payload);
        self.from.encode(&mut payload);
        match self.to {
            Some(to) => to.encode(&mut payload),
            None => payload.push(EMPTY_STRING_CODE),
        }
        self.mint.encode(&mut payload);
        self.value.encode(&mut payload);
        self.gas_limit.encode(&mut payload);
        // User deposits are never system transactions.
        false.encode(&mut payload);
        self.data.encode(&mut payload);

        let header = Header { list: true, payload_length: payload.len() };
        let mut out = Vec::with_capacity(1 + header.length() + payload.len());
        out.push(DEPOSIT_TX_TYPE);
        header.encode(&mut out);
        out.extend_from_slice(&payload);
        out.into()
    }

    /// Predicts the hash of the L2 transaction this deposit derives, available before the
    /// rollup has processed the deposit.
    pub fn l2_transaction_hash(&self) -> B256 {
        keccak256(self.encoded_transaction())
    }
}
