//! Wait Subcommand

use crate::{commands::StatusArg, flags::GlobalArgs};
use alloy_primitives::B256;
use clap::Parser;
use core::time::Duration;
use kona_bridge::{MessageStatusTracker, PollOptions};
use tokio_util::sync::CancellationToken;

/// The `wait` Subcommand
///
/// Polls the status of a cross-domain message until it reaches a target status, or any later
/// one. Pressing ctrl-c cancels the wait.
///
/// # Usage
///
/// ```sh
/// bridge wait <TX_HASH> --status <STATUS> [FLAGS] [OPTIONS]
/// ```
#[derive(Parser, Debug, Clone)]
#[command(about = "Waits for a cross-domain message to reach a status")]
pub struct WaitCommand {
    /// The L1 or L2 transaction that initiated the message.
    pub tx_hash: B256,
    /// The status to wait for.
    #[arg(long, value_enum, default_value = "relayed")]
    pub status: StatusArg,
    /// Seconds between polls.
    #[arg(long, default_value_t = 4)]
    pub interval: u64,
    /// Factor the poll interval grows by after every attempt.
    #[arg(long, default_value_t = 1)]
    pub backoff: u32,
    /// Upper bound of the poll interval, in seconds.
    #[arg(long, default_value_t = 60)]
    pub max_interval: u64,
    /// Seconds to wait before giving up. Waits forever if unset.
    #[arg(long)]
    pub timeout: Option<u64>,
}

impl WaitCommand {
    /// Returns the poll options described by the flags.
    pub fn poll_options(&self) -> PollOptions {
        let options = PollOptions::every(Duration::from_secs(self.interval))
            .with_backoff(self.backoff, Duration::from_secs(self.max_interval));
        match self.timeout {
            Some(secs) => options.with_timeout(Duration::from_secs(secs)),
            None => options,
        }
    }

    /// Runs the subcommand.
    pub async fn run(self, args: &GlobalArgs) -> anyhow::Result<()> {
        let config = args.bridge_config()?;
        let tracker = MessageStatusTracker::new(args.l1_view()?, args.l2_view()?, &config);

        let cancel = CancellationToken::new();
        let guard = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                guard.cancel();
            }
        });

        let status = tracker
            .wait_for_status(self.tx_hash, self.status.into(), &self.poll_options(), &cancel)
            .await?;
        println!("{status}");
        Ok(())
    }
}
