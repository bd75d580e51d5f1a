//! Withdrawals initiated through the `L2ToL1MessagePasser`.

use crate::{
    BridgeError, BridgeResult, MIN_MESSAGE_PASSED_DATA_LEN, ReceiptInfo, WithdrawalLogError,
    bindings::{L2ToL1MessagePasser::MessagePassed, Types},
    hash,
};
use alloy_primitives::{Address, B256, Bytes, Log, U256};
use alloy_sol_types::{SolEvent, SolValue};

/// An L2 to L1 message, reconstructed from its `MessagePassed` log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalMessage {
    /// The versioned message passer nonce.
    pub nonce: U256,
    /// The L2 account that initiated the withdrawal.
    pub sender: Address,
    /// The L1 account to call.
    pub target: Address,
    /// The ether value to release on L1.
    pub value: U256,
    /// The minimum gas limit of the L1 call.
    pub gas_limit: U256,
    /// The calldata of the L1 call.
    pub data: Bytes,
    /// The withdrawal hash committed to by the log.
    pub withdrawal_hash: B256,
    /// The L2 transaction that initiated the withdrawal.
    pub tx_hash: B256,
    /// The L2 block that includes the initiating transaction.
    pub block_number: u64,
    /// The index of the log within its block, if known.
    pub log_index: Option<u64>,
}

impl WithdrawalMessage {
    /// Recomputes the withdrawal hash from the message fields.
    pub fn hash(&self) -> B256 {
        hash::message_hash(
            self.nonce,
            self.sender,
            self.target,
            self.value,
            self.gas_limit,
            &self.data,
        )
    }

    /// Returns the slot of the message passer's `sentMessages` entry for this withdrawal.
    pub fn storage_slot(&self) -> B256 {
        hash::storage_slot(self.withdrawal_hash)
    }

    /// Returns the gas limit as the `uint32` accepted by the bridges, saturating.
    pub fn min_gas_limit(&self) -> u32 {
        u32::try_from(self.gas_limit).unwrap_or(u32::MAX)
    }

    /// Returns the portal's view of this withdrawal.
    pub fn to_transaction(&self) -> Types::WithdrawalTransaction {
        Types::WithdrawalTransaction {
            nonce: self.nonce,
            sender: self.sender,
            target: self.target,
            value: self.value,
            gasLimit: self.gas_limit,
            data: self.data.clone(),
        }
    }

    /// Extracts the first withdrawal emitted by `message_passer` in `receipt`.
    pub fn from_receipt(receipt: &ReceiptInfo, message_passer: Address) -> BridgeResult<Self> {
        if !receipt.status {
            debug!(
                target: "bridge::proof",
                tx_hash = %receipt.transaction_hash,
                "Withdrawal transaction reverted"
            );
            return Err(BridgeError::NoWithdrawalLogFound(receipt.transaction_hash));
        }

        let entry = receipt
            .logs_from(message_passer)
            .find(|l| l.log.topics().first() == Some(&MessagePassed::SIGNATURE_HASH))
            .ok_or(BridgeError::NoWithdrawalLogFound(receipt.transaction_hash))?;

        Ok(Self::from_log(
            &entry.log,
            receipt.transaction_hash,
            receipt.block_number,
            entry.log_index,
        )?)
    }

    /// Decodes a `MessagePassed` log.
    ///
    /// The indexed nonce, sender and target are read from topics one to three. The data holds
    /// the value, the gas limit, the offset of the payload, the withdrawal hash and, at the
    /// offset, the length-prefixed payload. The decoded fields must hash to the logged
    /// withdrawal hash.
    pub fn from_log(
        log: &Log,
        tx_hash: B256,
        block_number: u64,
        log_index: Option<u64>,
    ) -> Result<Self, WithdrawalLogError> {
        let topics = log.topics();
        match topics.first() {
            Some(sig) if *sig == MessagePassed::SIGNATURE_HASH => {}
            other => return Err(WithdrawalLogError::InvalidSignature(other.copied())),
        }
        let nonce = topics.get(1).ok_or(WithdrawalLogError::MissingTopic("nonce"))?;
        let sender = topics.get(2).ok_or(WithdrawalLogError::MissingTopic("sender"))?;
        let target = topics.get(3).ok_or(WithdrawalLogError::MissingTopic("target"))?;

        let data = log.data.data.as_ref();
        if data.len() < MIN_MESSAGE_PASSED_DATA_LEN {
            return Err(WithdrawalLogError::DataTooShort {
                len: data.len(),
                min: MIN_MESSAGE_PASSED_DATA_LEN,
            });
        }

        let value = U256::from_be_slice(word(data, 0));
        let gas_limit = U256::from_be_slice(word(data, 1));
        let offset = small_word(word(data, 2), "offset")?;
        let withdrawal_hash = B256::from_slice(word(data, 3));

        let out_of_bounds = |length: u64| WithdrawalLogError::PayloadOutOfBounds {
            offset,
            length,
            data_len: data.len(),
        };
        let length_start = usize::try_from(offset).map_err(|_| out_of_bounds(0))?;
        let length_end = length_start.checked_add(32).ok_or_else(|| out_of_bounds(0))?;
        let length_word = data.get(length_start..length_end).ok_or_else(|| out_of_bounds(0))?;
        let length = small_word(length_word, "length")?;
        let payload = usize::try_from(length)
            .ok()
            .and_then(|len| length_end.checked_add(len))
            .and_then(|end| data.get(length_end..end))
            .ok_or_else(|| out_of_bounds(length))?;

        let message = Self {
            nonce: U256::from_be_bytes(nonce.0),
            sender: Address::from_word(*sender),
            target: Address::from_word(*target),
            value,
            gas_limit,
            data: Bytes::copy_from_slice(payload),
            withdrawal_hash,
            tx_hash,
            block_number,
            log_index,
        };

        let computed = message.hash();
        if computed != withdrawal_hash {
            return Err(WithdrawalLogError::HashMismatch { logged: withdrawal_hash, computed });
        }

        trace!(
            target: "bridge::proof",
            %withdrawal_hash,
            nonce = %message.nonce,
            block_number,
            "Decoded withdrawal log"
        );
        Ok(message)
    }

    /// Encodes the message as the `MessagePassed` log `message_passer` would emit.
    pub fn to_log(&self, message_passer: Address) -> Log {
        let topics = vec![
            MessagePassed::SIGNATURE_HASH,
            B256::from(self.nonce),
            self.sender.into_word(),
            self.target.into_word(),
        ];
        let data = (self.value, self.gas_limit, self.data.clone(), self.withdrawal_hash)
            .abi_encode_params();
        Log::new_unchecked(message_passer, topics, data.into())
    }
}

/// Returns the `index`-th 32-byte word of `data`. The caller checks the bounds.
fn word(data: &[u8], index: usize) -> &[u8] {
    &data[index * 32..(index + 1) * 32]
}

fn small_word(word: &[u8], name: &'static str) -> Result<u64, WithdrawalLogError> {
    u64::try_from(U256::from_be_slice(word)).map_err(|_| WithdrawalLogError::WordOverflow(name))
}
