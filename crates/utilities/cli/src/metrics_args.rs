//! Prometheus metrics arguments.

use crate::{CliResult, init_prometheus_server};
use clap::Args;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Configuration for the Prometheus exporter.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct MetricsArgs {
    /// Serve Prometheus metrics.
    #[arg(long = "metrics.enabled", global = true, env = "KONA_METRICS_ENABLED")]
    pub enabled: bool,
    /// The address the metrics server listens on.
    #[arg(
        long = "metrics.addr",
        default_value = "0.0.0.0",
        global = true,
        env = "KONA_METRICS_ADDR"
    )]
    pub addr: IpAddr,
    /// The port the metrics server listens on.
    #[arg(long = "metrics.port", default_value_t = 9090, global = true, env = "KONA_METRICS_PORT")]
    pub port: u16,
}

impl Default for MetricsArgs {
    fn default() -> Self {
        Self { enabled: false, addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED), port: 9090 }
    }
}

impl MetricsArgs {
    /// Starts the metrics server if enabled, returning its address.
    pub fn init_metrics(&self) -> CliResult<Option<SocketAddr>> {
        if !self.enabled {
            return Ok(None);
        }
        Ok(Some(init_prometheus_server(self.addr, self.port)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        metrics: MetricsArgs,
    }

    #[test]
    fn test_defaults() {
        let cli = TestCli::try_parse_from(["test"]).unwrap();
        assert_eq!(cli.metrics, MetricsArgs::default());
        assert_eq!(cli.metrics.init_metrics().unwrap(), None);
    }

    #[test]
    fn test_custom_port() {
        let argv = ["test", "--metrics.enabled", "--metrics.port", "9191"];
        let cli = TestCli::try_parse_from(argv).unwrap();
        assert!(cli.metrics.enabled);
        assert_eq!(cli.metrics.port, 9191);
    }
}
