//! TCP connect prober.
//!
//! Uses the operating system's `connect()` through tokio. The connection
//! is dropped as soon as it is established; no data is exchanged.

use crate::error::ProbeError;
use crate::scanner::traits::{ProbeResult, Prober};
use crate::services;
use crate::types::Port;
use async_trait::async_trait;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, trace};
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::system_conf::read_system_conf;
use trust_dns_resolver::TokioAsyncResolver;

/// TCP connect prober. Needs no elevated privileges.
pub struct TcpProber {
    timeout: Duration,
    resolver: TokioAsyncResolver,
}

impl TcpProber {
    /// Create a prober whose connection attempts and DNS lookups are each
    /// bounded by `timeout`.
    ///
    /// The system resolver configuration is used when it can be read,
    /// otherwise the resolver library defaults.
    pub fn new(timeout: Duration) -> Self {
        let (config, mut opts) = read_system_conf().unwrap_or_else(|e| {
            debug!(error = %e, "system resolver config unavailable, using defaults");
            (ResolverConfig::default(), ResolverOpts::default())
        });
        opts.timeout = timeout;
        opts.attempts = 1;

        Self {
            timeout,
            resolver: TokioAsyncResolver::tokio(config, opts),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn attempt_connect(&self, addr: SocketAddr) -> Result<(), ProbeError> {
        match timeout(self.timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => {
                drop(stream);
                Ok(())
            }
            Ok(Err(e)) => Err(ProbeError::from_io(&e)),
            Err(_) => Err(ProbeError::Timeout),
        }
    }
}

#[async_trait]
impl Prober for TcpProber {
    async fn resolve(&self, host: &str) -> Result<IpAddr, ProbeError> {
        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(ip);
        }

        // Empty labels can never resolve; skip the DNS round trip.
        if host.trim_end_matches('.').split('.').any(str::is_empty) {
            return Err(ProbeError::HostUnresolvable(format!("{host}: malformed name")));
        }

        let lookup = timeout(self.timeout, self.resolver.lookup_ip(host))
            .await
            .map_err(|_| ProbeError::HostUnresolvable(format!("{host}: lookup timed out")))?
            .map_err(|e| ProbeError::HostUnresolvable(format!("{host}: {e}")))?;

        lookup
            .iter()
            .next()
            .ok_or_else(|| ProbeError::HostUnresolvable(format!("{host}: no addresses found")))
    }

    async fn probe(&self, addr: IpAddr, port: Port) -> ProbeResult {
        match self.attempt_connect(SocketAddr::new(addr, port.as_u16())).await {
            Ok(()) => ProbeResult::Open {
                port,
                service: services::resolve(port).to_string(),
            },
            Err(e) => {
                trace!(%addr, %port, cause = %e, "port not open");
                ProbeResult::failed(port, e)
            }
        }
    }
}

/// Probe a single `host:port`, resolving the host first.
///
/// An unresolvable host yields `ProbeResult::Error` with
/// [`ProbeError::HostUnresolvable`].
pub async fn probe(host: &str, port: Port, timeout: Duration) -> ProbeResult {
    let prober = TcpProber::new(timeout);
    match prober.resolve(host).await {
        Ok(addr) => prober.probe(addr, port).await,
        Err(e) => ProbeResult::failed(port, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_open_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = Port::new(listener.local_addr().unwrap().port()).unwrap();

        let result = probe("127.0.0.1", port, Duration::from_secs(1)).await;
        assert!(result.is_open());
        assert_eq!(result.port(), port);
    }

    #[tokio::test]
    async fn test_closed_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = Port::new(listener.local_addr().unwrap().port()).unwrap();
        drop(listener);

        let prober = TcpProber::new(Duration::from_millis(500));
        let result = prober.probe(IpAddr::V4(Ipv4Addr::LOCALHOST), port).await;

        // Refused on loopback; a local firewall might turn it into a timeout.
        assert!(matches!(result, ProbeResult::Closed { .. }));
    }

    #[tokio::test]
    async fn test_resolve_ip_literal() {
        let prober = TcpProber::new(Duration::from_secs(1));
        assert_eq!(
            prober.resolve("::1").await.unwrap(),
            "::1".parse::<IpAddr>().unwrap()
        );
    }

    #[tokio::test]
    async fn test_resolve_malformed_name_is_unresolvable() {
        let prober = TcpProber::new(Duration::from_secs(1));
        for name in ["nonexistent..example", ".leading", "."] {
            assert!(matches!(
                prober.resolve(name).await,
                Err(ProbeError::HostUnresolvable(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_open_port_service_name() {
        let prober = TcpProber::new(Duration::from_secs(1));
        assert_eq!(prober.timeout(), Duration::from_secs(1));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = Port::new(listener.local_addr().unwrap().port()).unwrap();

        match prober.probe(IpAddr::V4(Ipv4Addr::LOCALHOST), port).await {
            ProbeResult::Open { service, .. } => {
                assert_eq!(service, services::resolve(port));
            }
            other => panic!("expected open port, got {other:?}"),
        }
    }
}
