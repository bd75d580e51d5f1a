//! Status Subcommand

use crate::flags::GlobalArgs;
use alloy_primitives::B256;
use clap::{Parser, ValueEnum};
use kona_bridge::{MessageStatus, MessageStatusTracker};

/// A [`MessageStatus`] as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    /// `UNCONFIRMED_L1_TO_L2`
    UnconfirmedL1ToL2,
    /// `FAILED_L1_TO_L2`
    FailedL1ToL2,
    /// `STATE_ROOT_NOT_PUBLISHED`
    StateRootNotPublished,
    /// `READY_TO_PROVE`
    ReadyToProve,
    /// `IN_CHALLENGE_PERIOD`
    InChallengePeriod,
    /// `READY_FOR_RELAY`
    ReadyForRelay,
    /// `RELAYED`
    Relayed,
}

impl From<StatusArg> for MessageStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::UnconfirmedL1ToL2 => Self::UnconfirmedL1ToL2,
            StatusArg::FailedL1ToL2 => Self::FailedL1ToL2,
            StatusArg::StateRootNotPublished => Self::StateRootNotPublished,
            StatusArg::ReadyToProve => Self::ReadyToProve,
            StatusArg::InChallengePeriod => Self::InChallengePeriod,
            StatusArg::ReadyForRelay => Self::ReadyForRelay,
            StatusArg::Relayed => Self::Relayed,
        }
    }
}

/// The `status` Subcommand
///
/// Prints the lifecycle status of the deposit or withdrawal initiated by a transaction.
///
/// # Usage
///
/// ```sh
/// bridge status <TX_HASH> [FLAGS] [OPTIONS]
/// ```
#[derive(Parser, Debug, Clone)]
#[command(about = "Prints the status of a cross-domain message")]
pub struct StatusCommand {
    /// The L1 or L2 transaction that initiated the message.
    pub tx_hash: B256,
}

impl StatusCommand {
    /// Runs the subcommand.
    pub async fn run(self, args: &GlobalArgs) -> anyhow::Result<()> {
        let config = args.bridge_config()?;
        let tracker = MessageStatusTracker::new(args.l1_view()?, args.l2_view()?, &config);
        let status = tracker.message_status(self.tx_hash).await?;
        println!("{status}");
        Ok(())
    }
}
