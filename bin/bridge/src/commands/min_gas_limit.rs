//! Min Gas Limit Subcommand

use crate::flags::GlobalArgs;
use alloy_primitives::Bytes;
use clap::{Parser, ValueEnum};
use kona_bridge::BridgeConfig;

/// The chain a message is relayed on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum GasDestination {
    /// A withdrawal relayed on L1.
    #[default]
    L1,
    /// A deposit relayed on L2.
    L2,
}

/// The `min-gas-limit` Subcommand
///
/// Prints the minimum gas limit a relayed message needs on its destination chain.
///
/// # Usage
///
/// ```sh
/// bridge min-gas-limit (--data <HEX> | --len <BYTES>) [--to l1|l2] [FLAGS] [OPTIONS]
/// ```
#[derive(Parser, Debug, Clone)]
#[command(about = "Prints the minimum relay gas limit of a message")]
pub struct MinGasLimitCommand {
    /// The relayed calldata.
    #[arg(long, conflicts_with = "len", required_unless_present = "len")]
    pub data: Option<Bytes>,
    /// The length of the relayed calldata, in bytes.
    #[arg(long)]
    pub len: Option<usize>,
    /// The chain the message is relayed on.
    #[arg(long, value_enum, default_value_t = GasDestination::L1)]
    pub to: GasDestination,
}

impl MinGasLimitCommand {
    /// Returns the minimum gas limit under `config`.
    pub fn min_gas_limit(&self, config: &BridgeConfig) -> u64 {
        let len = self.data.as_ref().map_or(self.len.unwrap_or_default(), |data| data.len());
        match self.to {
            GasDestination::L1 => config.l1_min_gas_limit(len),
            GasDestination::L2 => config.l2_min_gas_limit(len),
        }
    }

    /// Runs the subcommand.
    pub fn run(self, args: &GlobalArgs) -> anyhow::Result<()> {
        let config = args.bridge_config()?;
        println!("{}", self.min_gas_limit(&config));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sepolia() -> BridgeConfig {
        BridgeConfig { l1_chain_id: 11155111, l2_chain_id: 11155420, ..Default::default() }
    }

    #[rstest]
    #[case::empty_to_l1(&["min-gas-limit", "--len", "0"], 1_300_873)]
    #[case::empty_to_l2(&["min-gas-limit", "--len", "0", "--to", "l2"], 1_335_873)]
    #[case::data_to_l1(&["min-gas-limit", "--data", "0xdeadbeef"], 1_300_873 + 4 * 16)]
    fn test_min_gas_limit(#[case] argv: &[&str], #[case] expected: u64) {
        let cmd = MinGasLimitCommand::try_parse_from(argv).unwrap();
        assert_eq!(cmd.min_gas_limit(&sepolia()), expected);
    }

    #[test]
    fn test_data_conflicts_with_len() {
        assert!(
            MinGasLimitCommand::try_parse_from(["min-gas-limit", "--data", "0x00", "--len", "1"])
                .is_err()
        );
    }
}
