//! Deposit Hash Subcommand

use crate::flags::GlobalArgs;
use alloy_primitives::B256;
use clap::Parser;
use kona_bridge::{BridgeError, ChainView, DepositMessage, hash::user_deposit_source_hash};

/// The `deposit-hash` Subcommand
///
/// Computes the L2 identity of a deposit. Given the initiating L1 transaction, prints the
/// deposit's source hash and the hash of the L2 deposit transaction. Given a block hash and
/// log index, prints the source hash alone without touching the network.
///
/// # Usage
///
/// ```sh
/// bridge deposit-hash --tx-hash <TX_HASH> [FLAGS] [OPTIONS]
/// bridge deposit-hash --block-hash <HASH> --log-index <INDEX>
/// ```
#[derive(Parser, Debug, Clone)]
#[command(about = "Computes the L2 transaction hash of a deposit")]
pub struct DepositHashCommand {
    /// The L1 transaction that initiated the deposit.
    #[arg(
        long,
        conflicts_with_all = ["block_hash", "log_index"],
        required_unless_present = "block_hash"
    )]
    pub tx_hash: Option<B256>,
    /// The hash of the L1 block containing the deposit log.
    #[arg(long, requires = "log_index")]
    pub block_hash: Option<B256>,
    /// The index of the deposit log within its L1 block.
    #[arg(long, requires = "block_hash")]
    pub log_index: Option<u64>,
}

impl DepositHashCommand {
    /// Runs the subcommand.
    pub async fn run(self, args: &GlobalArgs) -> anyhow::Result<()> {
        if let (Some(block_hash), Some(log_index)) = (self.block_hash, self.log_index) {
            println!("source hash: {}", user_deposit_source_hash(block_hash, log_index));
            return Ok(());
        }
        let Some(tx_hash) = self.tx_hash else {
            anyhow::bail!("Either --tx-hash or --block-hash and --log-index are required");
        };

        let config = args.bridge_config()?;
        let receipt = args
            .l1_view()?
            .receipt_by_hash(tx_hash)
            .await?
            .ok_or(BridgeError::TransactionNotFound(tx_hash))?;
        let deposit = DepositMessage::from_receipt(&receipt, config.contracts.optimism_portal)?;
        println!("source hash: {}", deposit.source_hash());
        println!("l2 tx hash:  {}", deposit.l2_transaction_hash());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_an_identity() {
        assert!(DepositHashCommand::try_parse_from(["deposit-hash"]).is_err());
    }

    #[test]
    fn test_block_hash_requires_log_index() {
        let hash = B256::repeat_byte(0x33).to_string();
        let argv = ["deposit-hash", "--block-hash", hash.as_str()];
        assert!(DepositHashCommand::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_tx_hash_conflicts_with_block_hash() {
        let hash = B256::repeat_byte(0x33).to_string();
        assert!(
            DepositHashCommand::try_parse_from([
                "deposit-hash",
                "--tx-hash",
                hash.as_str(),
                "--block-hash",
                hash.as_str(),
                "--log-index",
                "1",
            ])
            .is_err()
        );
    }

    #[tokio::test]
    async fn test_offline_source_hash() {
        let hash = B256::repeat_byte(0x33).to_string();
        let cmd = DepositHashCommand::try_parse_from([
            "deposit-hash",
            "--block-hash",
            hash.as_str(),
            "--log-index",
            "1",
        ])
        .unwrap();
        cmd.run(&GlobalArgs::default()).await.unwrap();
    }
}
