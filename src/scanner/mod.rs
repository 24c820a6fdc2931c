//! Scanner module - the probing engine.
//!
//! [`scan`] fans one probe per port out over a bounded pool for a single
//! target; [`Session`] walks a list of targets in order.

pub mod report;
pub mod session;
pub mod tcp;
pub mod traits;

use crate::types::PortSet;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub use report::{OpenPort, ScanReport, TargetResult, TargetStatus};
pub use session::Session;
pub use tcp::{probe, TcpProber};
pub use traits::{ProbeResult, Prober, ScanConfig};

/// Scan every port in `ports` on one host.
///
/// The host is resolved once up front; if that fails no probes are
/// submitted. At most `config.workers()` probes are in flight at any
/// instant. Results arrive in completion order and are sorted by port
/// before returning. Cancellation stops new probes, abandons in-flight
/// ones, and yields an `Interrupted` result holding what was found so far.
pub async fn scan(
    host: &str,
    ports: &PortSet,
    config: &ScanConfig,
    prober: &dyn Prober,
    cancel: &CancellationToken,
) -> TargetResult {
    let start_time = Instant::now();
    let mut result = TargetResult::new(host);

    let resolved = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            return finish(result.with_status(TargetStatus::Interrupted), start_time);
        }
        resolved = prober.resolve(host) => resolved,
    };

    let addr = match resolved {
        Ok(addr) => addr,
        Err(e) => {
            warn!(host, error = %e, "could not resolve host");
            return finish(result.with_status(TargetStatus::Unresolved), start_time);
        }
    };
    result.address = Some(addr);
    info!(host, %addr, ports = ports.len(), workers = config.workers(), "scanning target");

    let progress = progress_bar(config, ports.len());

    // Shared between workers; everything else is read-only.
    let open_ports = Mutex::new(Vec::new());
    let completed = AtomicUsize::new(0);
    let host_failed = AtomicBool::new(false);

    {
        let open_ports = &open_ports;
        let completed = &completed;
        let host_failed = &host_failed;
        let progress = &progress;

        stream::iter(ports.iter())
            .for_each_concurrent(config.workers(), move |port| async move {
                if cancel.is_cancelled() || host_failed.load(Ordering::Acquire) {
                    return;
                }

                let outcome = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return,
                    outcome = prober.probe(addr, port) => outcome,
                };

                completed.fetch_add(1, Ordering::Relaxed);
                progress.inc(1);

                match outcome {
                    ProbeResult::Open { port, service } => {
                        info!(host, %port, service = %service, "open port");
                        progress.println(format!("[+] Port {:<6} OPEN    Service: {}", port, service));
                        open_ports.lock().await.push(OpenPort { port, service });
                    }
                    failure if failure.is_host_failure() => {
                        warn!(host, port = %failure.port(), "host became unresolvable, abandoning target");
                        host_failed.store(true, Ordering::Release);
                    }
                    ProbeResult::Error { port, error } => {
                        debug!(host, %port, error = %error, "probe failed");
                    }
                    ProbeResult::Closed { .. } => {}
                }
            })
            .await;
    }

    progress.finish_and_clear();

    result.ports_scanned = completed.into_inner();
    if host_failed.into_inner() {
        return finish(result.with_status(TargetStatus::Unresolved), start_time);
    }

    let mut open_ports = open_ports.into_inner();
    open_ports.sort_by_key(|p| p.port);
    result.open_ports = open_ports;

    if result.ports_scanned < ports.len() && cancel.is_cancelled() {
        result.status = TargetStatus::Interrupted;
    }

    finish(result, start_time)
}

fn finish(mut result: TargetResult, start_time: Instant) -> TargetResult {
    result.duration_ms = start_time.elapsed().as_millis() as u64;
    info!(
        host = %result.target,
        status = %result.status,
        open = result.open_ports.len(),
        scanned = result.ports_scanned,
        duration_ms = result.duration_ms,
        "target finished"
    );
    result
}

fn progress_bar(config: &ScanConfig, total: usize) -> ProgressBar {
    if !config.show_progress() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
    ) {
        pb.set_style(style.progress_chars("=>-"));
    }
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProbeError;
    use crate::services;
    use crate::types::Port;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::net::{IpAddr, Ipv4Addr};
    use std::time::Duration;

    /// Accepts connections on a fixed set of ports and refuses the rest.
    struct FakeHost {
        open: HashSet<u16>,
        resolvable: bool,
    }

    impl FakeHost {
        fn with_open(ports: &[u16]) -> Self {
            Self {
                open: ports.iter().copied().collect(),
                resolvable: true,
            }
        }
    }

    #[async_trait]
    impl Prober for FakeHost {
        async fn resolve(&self, host: &str) -> Result<IpAddr, ProbeError> {
            if self.resolvable {
                Ok(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1)))
            } else {
                Err(ProbeError::HostUnresolvable(host.to_string()))
            }
        }

        async fn probe(&self, _addr: IpAddr, port: Port) -> ProbeResult {
            tokio::task::yield_now().await;
            if self.open.contains(&port.as_u16()) {
                ProbeResult::Open {
                    port,
                    service: services::resolve(port).to_string(),
                }
            } else {
                ProbeResult::failed(port, ProbeError::ConnectionRefused)
            }
        }
    }

    fn config(workers: usize) -> ScanConfig {
        ScanConfig::new(Duration::from_millis(200), workers).unwrap()
    }

    #[tokio::test]
    async fn test_sorted_regardless_of_pool_size() {
        let ports: PortSet = "1-1000".parse().unwrap();
        let prober = FakeHost::with_open(&[443, 22, 80]);

        for workers in [1, 10, 1000] {
            let result = scan(
                "fake",
                &ports,
                &config(workers),
                &prober,
                &CancellationToken::new(),
            )
            .await;
            assert!(result.is_complete());
            assert_eq!(
                result.ports(),
                vec![(22, "ssh"), (80, "http"), (443, "https")],
                "workers = {workers}"
            );
            assert_eq!(result.ports_scanned, 1000);
        }
    }

    #[tokio::test]
    async fn test_no_open_ports_is_not_an_error() {
        let ports: PortSet = "1-50".parse().unwrap();
        let result = scan(
            "fake",
            &ports,
            &config(8),
            &FakeHost::with_open(&[]),
            &CancellationToken::new(),
        )
        .await;
        assert!(result.is_complete());
        assert!(!result.is_unresolved());
        assert!(result.open_ports.is_empty());
    }

    #[tokio::test]
    async fn test_unresolvable_host_submits_nothing() {
        let ports: PortSet = "1-1000".parse().unwrap();
        let prober = FakeHost {
            open: HashSet::new(),
            resolvable: false,
        };
        let result = scan("nowhere", &ports, &config(10), &prober, &CancellationToken::new()).await;
        assert!(result.is_unresolved());
        assert!(result.open_ports.is_empty());
        assert_eq!(result.ports_scanned, 0);
        assert!(result.address.is_none());
    }

    #[tokio::test]
    async fn test_pre_cancelled_scan_is_interrupted() {
        let ports: PortSet = "1-10".parse().unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = scan("fake", &ports, &config(4), &FakeHost::with_open(&[1]), &cancel).await;
        assert_eq!(result.status, TargetStatus::Interrupted);
        assert_eq!(result.ports_scanned, 0);
    }
}
