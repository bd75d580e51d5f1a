//! Log arguments and tracing subscriber initialization.

use crate::CliResult;
use clap::{ArgAction, Args, ValueEnum};
use tracing_subscriber::{EnvFilter, Layer, filter::LevelFilter, fmt, prelude::*};

/// The format of emitted log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human readable lines.
    #[default]
    Full,
    /// One JSON object per line.
    Json,
}

/// Logging arguments shared by every binary.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct LogArgs {
    /// Verbosity level. `-v` enables debug logs, `-vv` trace logs.
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbosity: u8,
    /// Only log warnings and errors.
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbosity")]
    pub quiet: bool,
    /// The log format.
    #[arg(long = "log.format", value_enum, default_value_t = LogFormat::Full, global = true)]
    pub log_format: LogFormat,
}

impl LogArgs {
    /// Returns the default level implied by the verbosity flags.
    pub const fn level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::WARN;
        }
        match self.verbosity {
            0 => LevelFilter::INFO,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }

    /// Installs the global tracing subscriber.
    ///
    /// Directives in `RUST_LOG` take precedence over the verbosity flags.
    pub fn init_tracing(&self) -> CliResult<()> {
        let filter = EnvFilter::builder()
            .with_default_directive(self.level().into())
            .parse(std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default())?;

        let layer = match self.log_format {
            LogFormat::Full => fmt::layer().with_target(true).boxed(),
            LogFormat::Json => fmt::layer().json().with_target(true).boxed(),
        };
        tracing_subscriber::registry().with(layer.with_filter(filter)).try_init()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use rstest::rstest;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        log: LogArgs,
    }

    #[rstest]
    #[case::default(&["test"], LevelFilter::INFO)]
    #[case::debug(&["test", "-v"], LevelFilter::DEBUG)]
    #[case::trace(&["test", "-vvv"], LevelFilter::TRACE)]
    #[case::quiet(&["test", "-q"], LevelFilter::WARN)]
    fn test_level(#[case] args: &[&str], #[case] expected: LevelFilter) {
        let cli = TestCli::try_parse_from(args).unwrap();
        assert_eq!(cli.log.level(), expected);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(TestCli::try_parse_from(["test", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_log_format() {
        let cli = TestCli::try_parse_from(["test", "--log.format", "json"]).unwrap();
        assert_eq!(cli.log.log_format, LogFormat::Json);
    }
}
