//! Prove Subcommand

use crate::{commands::submit_or_print, flags::GlobalArgs};
use alloy_primitives::B256;
use clap::Parser;
use kona_bridge::{BridgeCalls, WithdrawalProofBuilder};

/// The `prove` Subcommand
///
/// Builds the withdrawal proof for an L2 withdrawal transaction and submits
/// `proveWithdrawalTransaction` to the `OptimismPortal`.
///
/// # Usage
///
/// ```sh
/// bridge prove <TX_HASH> [--private-key <KEY>] [FLAGS] [OPTIONS]
/// ```
#[derive(Parser, Debug, Clone)]
#[command(about = "Proves a withdrawal on L1")]
pub struct ProveCommand {
    /// The L2 transaction that initiated the withdrawal.
    pub tx_hash: B256,
    /// Hex-encoded key signing the L1 transaction. Prints the unsigned call if unset.
    #[arg(long, env = "BRIDGE_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,
}

impl ProveCommand {
    /// Runs the subcommand.
    pub async fn run(self, args: &GlobalArgs) -> anyhow::Result<()> {
        let config = args.bridge_config()?;
        let builder = WithdrawalProofBuilder::new(args.l1_view()?, args.l2_view()?, &config);

        let (message, proof) = builder.build_for_transaction(self.tx_hash).await?;
        let Some(proof) = proof else {
            anyhow::bail!(
                "No output proposal covers L2 block {} yet; withdrawal {} cannot be proven",
                message.block_number,
                message.withdrawal_hash
            );
        };
        tracing::info!(
            target: "bridge",
            withdrawal_hash = %message.withdrawal_hash,
            output_index = proof.output_index,
            nodes = proof.storage_proof.len(),
            "Built withdrawal proof"
        );

        let request = BridgeCalls::new(config).prove_withdrawal(&message, &proof);
        let submitter = self.private_key.map(|key| args.l1_submitter(&key)).transpose()?;
        submit_or_print(submitter, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prove() {
        let hash = B256::repeat_byte(0x11);
        let raw = hash.to_string();
        let cmd =
            ProveCommand::try_parse_from(["prove", raw.as_str(), "--private-key", "0x01"]).unwrap();
        assert_eq!(cmd.tx_hash, hash);
        assert_eq!(cmd.private_key.as_deref(), Some("0x01"));
    }
}
