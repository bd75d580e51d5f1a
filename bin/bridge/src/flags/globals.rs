//! Global arguments for the CLI.

use crate::config::load_config;
use anyhow::Context;
use clap::Parser;
use kona_bridge::BridgeConfig;
use kona_cli::{LogArgs, MetricsArgs};
use kona_providers_alloy::{AlloyChainView, AlloyTxSubmitter};
use std::path::PathBuf;
use url::Url;

/// Global arguments for the CLI.
#[derive(Parser, Default, Clone, Debug)]
pub struct GlobalArgs {
    /// Logging arguments.
    #[command(flatten)]
    pub log_args: LogArgs,
    /// Prometheus CLI arguments.
    #[command(flatten)]
    pub metrics: MetricsArgs,
    /// Path to the TOML bridge deployment config.
    #[arg(long, short = 'c', global = true, env = "KONA_BRIDGE_CONFIG")]
    pub config: Option<PathBuf>,
    /// URL of the L1 execution client RPC API.
    #[arg(long, visible_alias = "l1", global = true, env = "L1_ETH_RPC")]
    pub l1_rpc: Option<Url>,
    /// URL of the L2 execution client RPC API.
    #[arg(long, visible_alias = "l2", global = true, env = "L2_ETH_RPC")]
    pub l2_rpc: Option<Url>,
}

impl GlobalArgs {
    /// Loads the bridge config named by `--config`.
    pub fn bridge_config(&self) -> anyhow::Result<BridgeConfig> {
        let path = self.config.as_ref().context("Missing --config")?;
        load_config(path)
    }

    /// Returns a view of the L1 chain.
    pub fn l1_view(&self) -> anyhow::Result<AlloyChainView> {
        let url = self.l1_rpc.clone().context("Missing --l1-rpc")?;
        Ok(AlloyChainView::new_http(url))
    }

    /// Returns a view of the L2 chain.
    pub fn l2_view(&self) -> anyhow::Result<AlloyChainView> {
        let url = self.l2_rpc.clone().context("Missing --l2-rpc")?;
        Ok(AlloyChainView::new_http(url))
    }

    /// Returns a submitter sending L1 transactions signed by `private_key`.
    pub fn l1_submitter(&self, private_key: &str) -> anyhow::Result<AlloyTxSubmitter> {
        let url = self.l1_rpc.clone().context("Missing --l1-rpc")?;
        Ok(AlloyTxSubmitter::from_private_key(url, private_key)?)
    }
}
