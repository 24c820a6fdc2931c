//! Multi-target scan session.
//!
//! Targets are scanned one after another so the connection count stays
//! bounded by the worker pool. Each target runs in its own task; a panic
//! while scanning one target is recorded against that target and the
//! session moves on.

use super::{scan, Prober, ScanConfig, ScanReport, TargetResult, TargetStatus};
use crate::types::PortSet;
use chrono::Utc;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

pub struct Session {
    config: ScanConfig,
    prober: Arc<dyn Prober>,
    cancel: CancellationToken,
}

impl Session {
    pub fn new(config: ScanConfig, prober: Arc<dyn Prober>) -> Self {
        Self {
            config,
            prober,
            cancel: CancellationToken::new(),
        }
    }

    /// Use an externally owned cancellation token (e.g. wired to Ctrl-C).
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that stops the session when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Scan `targets` in order.
    pub async fn run(&self, targets: &[String], ports: &PortSet) -> ScanReport {
        self.run_with(targets, ports, |_| {}).await
    }

    /// Scan `targets` in order, calling `on_target` as each one finishes.
    ///
    /// After cancellation no further target is started. The report holds
    /// every finished target plus the interrupted one, if any.
    pub async fn run_with<F>(&self, targets: &[String], ports: &PortSet, mut on_target: F) -> ScanReport
    where
        F: FnMut(&TargetResult),
    {
        let mut report = ScanReport::new();
        let ports = Arc::new(ports.clone());

        for target in targets {
            if self.cancel.is_cancelled() {
                break;
            }

            let result = self.scan_isolated(target, &ports).await;
            on_target(&result);
            report.targets.push(result);
        }

        report.completed_at = Utc::now();
        report.interrupted = report.targets.len() < targets.len()
            || report
                .targets
                .iter()
                .any(|t| t.status == TargetStatus::Interrupted);

        if report.interrupted {
            info!(
                finished = report.targets.len(),
                requested = targets.len(),
                "session interrupted"
            );
        }

        report
    }

    async fn scan_isolated(&self, host: &str, ports: &Arc<PortSet>) -> TargetResult {
        let task = {
            let host = host.to_string();
            let ports = Arc::clone(ports);
            let config = self.config.clone();
            let prober = Arc::clone(&self.prober);
            let cancel = self.cancel.clone();

            tokio::spawn(async move { scan(&host, &ports, &config, prober.as_ref(), &cancel).await })
        };

        match task.await {
            Ok(result) => result,
            Err(e) => {
                error!(host, error = %e, "scan failed");
                TargetResult::failed(host, e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProbeError;
    use crate::scanner::ProbeResult;
    use crate::types::Port;
    use async_trait::async_trait;
    use std::net::{IpAddr, Ipv4Addr};

    /// Resolves `"ok"` hosts, refuses every port, and panics on `"boom"`.
    struct Scripted;

    #[async_trait]
    impl Prober for Scripted {
        async fn resolve(&self, host: &str) -> Result<IpAddr, ProbeError> {
            match host {
                "boom" => panic!("resolver exploded"),
                "missing" => Err(ProbeError::HostUnresolvable(host.to_string())),
                _ => Ok(IpAddr::V4(Ipv4Addr::LOCALHOST)),
            }
        }

        async fn probe(&self, _addr: IpAddr, port: Port) -> ProbeResult {
            ProbeResult::failed(port, ProbeError::ConnectionRefused)
        }
    }

    fn session() -> Session {
        Session::new(ScanConfig::default(), Arc::new(Scripted))
    }

    fn targets(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_targets_keep_order() {
        let ports: PortSet = "1-20".parse().unwrap();
        let report = session()
            .run(&targets(&["ok-b", "missing", "ok-a"]), &ports)
            .await;

        let names: Vec<&str> = report.targets.iter().map(|t| t.target.as_str()).collect();
        assert_eq!(names, vec!["ok-b", "missing", "ok-a"]);
        assert!(report.targets[1].is_unresolved());
        assert!(report.targets[0].is_complete());
        assert!(!report.interrupted);
    }

    #[tokio::test]
    async fn test_failed_target_does_not_abort_session() {
        let ports: PortSet = "80".parse().unwrap();
        let report = session().run(&targets(&["boom", "ok"]), &ports).await;

        assert_eq!(report.targets.len(), 2);
        assert!(matches!(report.targets[0].status, TargetStatus::Failed { .. }));
        assert!(report.targets[1].is_complete());
    }

    #[tokio::test]
    async fn test_cancel_between_targets() {
        let ports: PortSet = "1-5".parse().unwrap();
        let session = session();
        let cancel = session.cancellation_token();

        let report = session
            .run_with(&targets(&["ok-1", "ok-2", "ok-3"]), &ports, |_| cancel.cancel())
            .await;

        assert_eq!(report.targets.len(), 1);
        assert_eq!(report.targets[0].target, "ok-1");
        assert!(report.targets[0].is_complete());
        assert!(report.interrupted);
    }
}
