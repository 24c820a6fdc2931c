//! Prober trait abstraction and per-run configuration.
//!
//! The coordinator only talks to a [`Prober`], so the TCP implementation
//! can be swapped for a simulated one in tests.

use crate::error::{ConfigError, ConfigResult, ProbeError};
use crate::types::Port;
use async_trait::async_trait;
use std::net::IpAddr;
use std::num::NonZeroUsize;
use std::time::Duration;

/// Outcome of a single connection attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResult {
    /// The connection was accepted.
    Open { port: Port, service: String },
    /// Refused or timed out. `cause` is kept for diagnostics only.
    Closed { port: Port, cause: ProbeError },
    /// Anything else, including an unresolvable host.
    Error { port: Port, error: ProbeError },
}

impl ProbeResult {
    /// Classify a failed attempt.
    pub fn failed(port: Port, error: ProbeError) -> Self {
        if error.is_closed() {
            Self::Closed { port, cause: error }
        } else {
            Self::Error { port, error }
        }
    }

    pub fn port(&self) -> Port {
        match self {
            Self::Open { port, .. } | Self::Closed { port, .. } | Self::Error { port, .. } => *port,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }

    /// Whether this outcome condemns the whole host rather than one port.
    pub fn is_host_failure(&self) -> bool {
        matches!(
            self,
            Self::Error {
                error: ProbeError::HostUnresolvable(_),
                ..
            }
        )
    }
}

/// Parameters shared read-only by every probe of a run.
///
/// Fields are private so that a zero-sized pool or a zero timeout can
/// only be rejected, never constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    timeout: Duration,
    workers: NonZeroUsize,
    show_progress: bool,
}

impl ScanConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);
    pub const DEFAULT_WORKERS: usize = 100;

    /// Create a validated configuration.
    pub fn new(timeout: Duration, workers: usize) -> ConfigResult<Self> {
        let workers = NonZeroUsize::new(workers).ok_or(ConfigError::InvalidWorkers)?;
        if timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout);
        }
        Ok(Self {
            timeout,
            workers,
            show_progress: false,
        })
    }

    /// Enable or disable the progress bar.
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Upper bound on each connection attempt and on name resolution.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Maximum number of probes in flight at once. Always at least 1.
    pub fn workers(&self) -> usize {
        self.workers.get()
    }

    /// Whether a progress bar is drawn while a target is scanned.
    pub fn show_progress(&self) -> bool {
        self.show_progress
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            timeout: Self::DEFAULT_TIMEOUT,
            workers: NonZeroUsize::new(Self::DEFAULT_WORKERS).unwrap_or(NonZeroUsize::MIN),
            show_progress: false,
        }
    }
}

/// A connection-attempt strategy.
///
/// Implementations must be safe to call concurrently and must not mutate
/// shared state: everything they learn goes into the return value.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Resolve a target to the address its probes connect to.
    ///
    /// Any error means the host is unresolvable.
    async fn resolve(&self, host: &str) -> Result<IpAddr, ProbeError>;

    /// Attempt one connection to `addr:port`. Never panics on network
    /// failure; every outcome is a value.
    async fn probe(&self, addr: IpAddr, port: Port) -> ProbeResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn port(n: u16) -> Port {
        Port::new(n).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = ScanConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(1));
        assert_eq!(config.workers(), 100);
        assert!(!config.show_progress());
    }

    #[test]
    fn test_config_validation() {
        assert!(matches!(
            ScanConfig::new(Duration::from_secs(1), 0),
            Err(ConfigError::InvalidWorkers)
        ));
        assert!(matches!(
            ScanConfig::new(Duration::ZERO, 10),
            Err(ConfigError::InvalidTimeout)
        ));
        let config = ScanConfig::new(Duration::from_millis(250), 10)
            .unwrap()
            .with_progress(true);
        assert_eq!(config.workers(), 10);
        assert!(config.show_progress());
    }

    #[test]
    fn test_failed_classification() {
        let refused = ProbeResult::failed(port(81), ProbeError::ConnectionRefused);
        assert!(matches!(refused, ProbeResult::Closed { .. }));
        assert!(!refused.is_open());

        let timeout = ProbeResult::failed(port(82), ProbeError::Timeout);
        assert!(matches!(timeout, ProbeResult::Closed { .. }));

        let unresolved = ProbeResult::failed(port(83), ProbeError::HostUnresolvable("x".into()));
        assert!(unresolved.is_host_failure());
        assert_eq!(unresolved.port(), port(83));

        let other = ProbeResult::failed(port(84), ProbeError::Other("reset".into()));
        assert!(matches!(other, ProbeResult::Error { .. }));
        assert!(!other.is_host_failure());
    }
}
