//! Direction-agnostic view of a cross-domain message.

use crate::{DepositMessage, WithdrawalMessage};
use alloy_primitives::B256;
use derive_more::{Display, From};

/// The direction a message travels in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum MessageDirection {
    /// A deposit, from the settlement layer to the rollup.
    #[display("L1->L2")]
    L1ToL2,
    /// A withdrawal, from the rollup to the settlement layer.
    #[display("L2->L1")]
    L2ToL1,
}

/// A message reconstructed from the logs of its initiating transaction.
#[derive(Debug, Clone, PartialEq, Eq, From)]
pub enum CrossDomainMessage {
    /// A deposit.
    Deposit(DepositMessage),
    /// A withdrawal.
    Withdrawal(WithdrawalMessage),
}

impl CrossDomainMessage {
    /// Returns the direction of the message.
    pub const fn direction(&self) -> MessageDirection {
        match self {
            Self::Deposit(_) => MessageDirection::L1ToL2,
            Self::Withdrawal(_) => MessageDirection::L2ToL1,
        }
    }

    /// Returns the hash of the transaction that initiated the message.
    pub const fn origin_tx_hash(&self) -> B256 {
        match self {
            Self::Deposit(d) => d.l1_tx_hash,
            Self::Withdrawal(w) => w.tx_hash,
        }
    }

    /// Returns the block on the origin chain that includes the message.
    pub const fn origin_block_number(&self) -> u64 {
        match self {
            Self::Deposit(d) => d.l1_block_number,
            Self::Withdrawal(w) => w.block_number,
        }
    }

    /// Returns the identity the destination chain tracks the message by: the withdrawal hash
    /// for withdrawals, the derived L2 transaction hash for deposits.
    pub fn message_hash(&self) -> B256 {
        match self {
            Self::Deposit(d) => d.l2_transaction_hash(),
            Self::Withdrawal(w) => w.withdrawal_hash,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, Bytes, U256};

    #[test]
    fn test_direction_and_identity() {
        let mut withdrawal = WithdrawalMessage {
            nonce: U256::from(1),
            sender: Address::repeat_byte(1),
            target: Address::repeat_byte(2),
            value: U256::ZERO,
            gas_limit: U256::from(100_000),
            data: Bytes::new(),
            withdrawal_hash: B256::ZERO,
            tx_hash: B256::repeat_byte(3),
            block_number: 12,
            log_index: None,
        };
        withdrawal.withdrawal_hash = withdrawal.hash();
        let msg = CrossDomainMessage::from(withdrawal.clone());
        assert_eq!(msg.direction(), MessageDirection::L2ToL1);
        assert_eq!(msg.message_hash(), withdrawal.withdrawal_hash);
        assert_eq!(msg.origin_tx_hash(), B256::repeat_byte(3));
        assert_eq!(msg.origin_block_number(), 12);
        assert_eq!(msg.direction().to_string(), "L2->L1");
    }
}
