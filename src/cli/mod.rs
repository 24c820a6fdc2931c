//! Command-line interface definitions.
//!
//! The CLI is a thin provider of targets, ports and configuration for the
//! scanning engine. Anything not given as a flag is asked for interactively.

mod prompt;
mod scan;

pub use prompt::{prompt_line, prompt_missing};
pub use scan::execute;

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// portscout - a concurrent TCP connect port scanner.
#[derive(Parser, Debug)]
#[command(name = "portscout")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A concurrent TCP port scanner", long_about = None)]
#[command(after_help = "Examples:\n  \
    portscout -t 192.168.1.1 -p 1-1000\n  \
    portscout -t 192.168.1.1,192.168.1.2 -p 80,443,8080\n  \
    portscout -t scanme.nmap.org -p 1-100,443,8080-8090 -w 200")]
pub struct Cli {
    /// Target IP(s), hostname(s) or CIDR block(s), comma-separated
    #[arg(short, long, value_name = "TARGETS")]
    pub targets: Option<String>,

    /// Ports to scan (e.g. "1-1000", "80,443", "1-100,8080-8090")
    #[arg(short, long, value_name = "PORTS")]
    pub ports: Option<String>,

    /// Number of concurrent connection attempts [default: 100]
    #[arg(short, long, value_name = "N")]
    pub workers: Option<usize>,

    /// Connection timeout in seconds [default: 1.0]
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<f64>,

    /// Output format for the final report
    #[arg(short, long, value_enum, default_value = "plain")]
    pub output: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only print the final report
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Do not draw a progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Path to a settings file (JSON)
    #[arg(long, value_name = "PATH", env = "PORTSCOUT_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable plain text
    #[default]
    Plain,
    /// JSON structured output
    Json,
    /// CSV format for data analysis
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "portscout", "-t", "10.0.0.1,10.0.0.2", "-p", "22,80", "-w", "50", "--timeout", "0.5",
            "-o", "json", "-vv",
        ])
        .unwrap();

        assert_eq!(cli.targets.as_deref(), Some("10.0.0.1,10.0.0.2"));
        assert_eq!(cli.ports.as_deref(), Some("22,80"));
        assert_eq!(cli.workers, Some(50));
        assert_eq!(cli.timeout, Some(0.5));
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_defaults_leave_inputs_unset() {
        let cli = Cli::try_parse_from(["portscout"]).unwrap();
        assert!(cli.targets.is_none());
        assert!(cli.ports.is_none());
        assert_eq!(cli.output, OutputFormat::Plain);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["portscout", "-q", "-v"]).is_err());
    }
}
