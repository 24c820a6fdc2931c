//! Aggregated scan results.

use crate::types::Port;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::net::IpAddr;

/// A confirmed-open port and its best-effort service name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenPort {
    pub port: Port,
    pub service: String,
}

impl OpenPort {
    pub fn new(port: Port, service: impl Into<String>) -> Self {
        Self {
            port,
            service: service.into(),
        }
    }
}

/// How a target's scan ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TargetStatus {
    /// Every requested port was probed.
    Complete,
    /// The host name could not be resolved; no ports were reported.
    Unresolved,
    /// Cancelled part-way; the open ports found so far are kept.
    Interrupted,
    /// The scan of this target failed unexpectedly.
    Failed { reason: String },
}

impl fmt::Display for TargetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Complete => write!(f, "complete"),
            Self::Unresolved => write!(f, "unresolved"),
            Self::Interrupted => write!(f, "interrupted"),
            Self::Failed { reason } => write!(f, "failed: {}", reason),
        }
    }
}

/// Result of scanning one target. Immutable once the coordinator returns it.
#[derive(Debug, Clone, Serialize)]
pub struct TargetResult {
    /// Target exactly as given by the user.
    pub target: String,
    /// Address the probes connected to, when resolution succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<IpAddr>,
    #[serde(flatten)]
    pub status: TargetStatus,
    /// Open ports, ascending.
    pub open_ports: Vec<OpenPort>,
    /// Number of probes that ran to completion.
    pub ports_scanned: usize,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl TargetResult {
    /// Start a result for `target`; the coordinator fills in the rest.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            address: None,
            status: TargetStatus::Complete,
            open_ports: Vec::new(),
            ports_scanned: 0,
            started_at: Utc::now(),
            duration_ms: 0,
        }
    }

    /// A host that could not be resolved.
    pub fn unresolved(target: impl Into<String>) -> Self {
        Self::new(target).with_status(TargetStatus::Unresolved)
    }

    /// A target whose scan failed for an unexpected reason.
    pub fn failed(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(target).with_status(TargetStatus::Failed {
            reason: reason.into(),
        })
    }

    pub fn with_status(mut self, status: TargetStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_unresolved(&self) -> bool {
        self.status == TargetStatus::Unresolved
    }

    pub fn is_complete(&self) -> bool {
        self.status == TargetStatus::Complete
    }

    /// The open ports as `(port, service)` pairs.
    pub fn ports(&self) -> Vec<(u16, &str)> {
        self.open_ports
            .iter()
            .map(|p| (p.port.as_u16(), p.service.as_str()))
            .collect()
    }
}

/// Results of a whole session, one entry per target in scan order.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    /// True when the session was cancelled before every target ran.
    pub interrupted: bool,
    pub targets: Vec<TargetResult>,
}

impl ScanReport {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            started_at: now,
            completed_at: now,
            interrupted: false,
            targets: Vec::new(),
        }
    }

    /// Total open ports across all targets.
    pub fn total_open(&self) -> usize {
        self.targets.iter().map(|t| t.open_ports.len()).sum()
    }
}

impl Default for ScanReport {
    fn default() -> Self {
        Self::new()
    }
}
