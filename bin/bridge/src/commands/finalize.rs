//! Finalize Subcommand

use crate::{commands::submit_or_print, flags::GlobalArgs};
use alloy_primitives::B256;
use clap::Parser;
use kona_bridge::{
    BridgeCalls, BridgeError, ChainView, MessageStatus, MessageStatusTracker, WithdrawalMessage,
};

/// The `finalize` Subcommand
///
/// Submits `finalizeWithdrawalTransaction` for a proven withdrawal whose challenge period has
/// elapsed.
///
/// # Usage
///
/// ```sh
/// bridge finalize <TX_HASH> [--private-key <KEY>] [FLAGS] [OPTIONS]
/// ```
#[derive(Parser, Debug, Clone)]
#[command(about = "Finalizes a proven withdrawal on L1")]
pub struct FinalizeCommand {
    /// The L2 transaction that initiated the withdrawal.
    pub tx_hash: B256,
    /// Hex-encoded key signing the L1 transaction. Prints the unsigned call if unset.
    #[arg(long, env = "BRIDGE_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,
    /// Skip the check that the withdrawal is ready for relay.
    #[arg(long)]
    pub force: bool,
}

impl FinalizeCommand {
    /// Runs the subcommand.
    pub async fn run(self, args: &GlobalArgs) -> anyhow::Result<()> {
        let config = args.bridge_config()?;
        let l2 = args.l2_view()?;
        let receipt = l2
            .receipt_by_hash(self.tx_hash)
            .await?
            .ok_or(BridgeError::TransactionNotFound(self.tx_hash))?;
        let message =
            WithdrawalMessage::from_receipt(&receipt, config.contracts.l2_to_l1_message_passer)?;

        if !self.force {
            let tracker = MessageStatusTracker::new(args.l1_view()?, l2, &config);
            let status = tracker.withdrawal_status(&message).await?;
            if status != MessageStatus::ReadyForRelay {
                anyhow::bail!(
                    "Withdrawal {} is {status}, not {}",
                    message.withdrawal_hash,
                    MessageStatus::ReadyForRelay
                );
            }
        }

        let request = BridgeCalls::new(config).finalize_withdrawal(&message);
        let submitter = self.private_key.map(|key| args.l1_submitter(&key)).transpose()?;
        submit_or_print(submitter, request).await
    }
}
