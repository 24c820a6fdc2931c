//! # portscout - a concurrent TCP port scanner
//!
//! Given target hosts and a set of ports, portscout finds which ports
//! accept a TCP connection within a bounded time, names the likely
//! service on each open port, and reports the results per target.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use portscout::scanner::{ScanConfig, Session, TcpProber};
//! use portscout::types::PortSet;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let ports: PortSet = "22,80,443,8000-8100".parse().unwrap();
//!     let config = ScanConfig::default();
//!     let session = Session::new(config.clone(), Arc::new(TcpProber::new(config.timeout())));
//!
//!     let report = session.run(&["127.0.0.1".to_string()], &ports).await;
//!     print!("{}", portscout::output::render(&report));
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - ports, the port set parser, and target lists
//! - [`services`] - port to service name lookup
//! - [`scanner`] - the `Prober` trait, the TCP prober, the per-target
//!   coordinator and the multi-target session
//! - [`output`] - the summary report and plain/JSON/CSV printers
//! - [`config`] - the optional settings file
//! - [`cli`] - the command-line front end
//! - [`error`] - error types

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod scanner;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use error::{CliError, ConfigError, ProbeError};
pub use scanner::{
    probe, scan, ProbeResult, Prober, ScanConfig, ScanReport, Session, TargetResult, TargetStatus,
};
pub use types::{Port, PortSet, TargetSpec};
