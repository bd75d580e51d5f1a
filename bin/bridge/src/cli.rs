//! Contains the bridge CLI.

use crate::{
    commands::{
        DepositHashCommand, FinalizeCommand, MinGasLimitCommand, ProveCommand, StatusCommand,
        WaitCommand,
    },
    flags::GlobalArgs,
};
use anyhow::Result;
use clap::{Parser, Subcommand};
use kona_cli::cli_styles;

/// Subcommands for the CLI.
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Prints the status of a cross-domain message.
    Status(StatusCommand),
    /// Waits for a cross-domain message to reach a status.
    Wait(WaitCommand),
    /// Proves a withdrawal on L1.
    Prove(ProveCommand),
    /// Finalizes a proven withdrawal on L1.
    Finalize(FinalizeCommand),
    /// Computes the L2 transaction hash of a deposit.
    DepositHash(DepositHashCommand),
    /// Prints the minimum relay gas limit of a message.
    MinGasLimit(MinGasLimitCommand),
}

/// The bridge CLI.
#[derive(Parser, Clone, Debug)]
#[command(author, version, about, styles = cli_styles(), long_about = None)]
pub struct Cli {
    /// The subcommand to run.
    #[command(subcommand)]
    pub subcommand: Commands,
    /// Global arguments for the CLI.
    #[command(flatten)]
    pub global: GlobalArgs,
}

impl Cli {
    /// Runs the CLI.
    pub fn run(self) -> Result<()> {
        self.init_stack()?;

        let Self { subcommand, global } = self;
        match subcommand {
            Commands::MinGasLimit(cmd) => cmd.run(&global),
            Commands::Status(cmd) => Self::run_until_ctrl_c(cmd.run(&global)),
            Commands::Wait(cmd) => Self::run_until_ctrl_c(cmd.run(&global)),
            Commands::Prove(cmd) => Self::run_until_ctrl_c(cmd.run(&global)),
            Commands::Finalize(cmd) => Self::run_until_ctrl_c(cmd.run(&global)),
            Commands::DepositHash(cmd) => Self::run_until_ctrl_c(cmd.run(&global)),
        }
    }

    /// Initializes the tracing subscriber and, if enabled, the Prometheus exporter.
    pub fn init_stack(&self) -> Result<()> {
        self.global.log_args.init_tracing()?;
        if let Some(addr) = self.global.metrics.init_metrics()? {
            kona_bridge::Metrics::init();
            tracing::info!(target: "bridge", %addr, "Serving Prometheus metrics");
        }
        Ok(())
    }

    /// Runs `fut` to completion on a fresh runtime.
    pub fn run_until_ctrl_c<F>(fut: F) -> Result<()>
    where
        F: std::future::Future<Output = Result<()>>,
    {
        let rt = Self::tokio_runtime()?;
        rt.block_on(fut)
    }

    /// Creates a new default tokio multi-thread [Runtime](tokio::runtime::Runtime) with all
    /// features enabled.
    pub fn tokio_runtime() -> Result<tokio::runtime::Runtime, std::io::Error> {
        tokio::runtime::Builder::new_multi_thread().enable_all().build()
    }
}
