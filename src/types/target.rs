//! Target list parsing.
//!
//! Accepts a comma-separated list whose entries are IP addresses,
//! hostnames, or CIDR blocks. CIDR blocks expand to their host addresses.
//! Name resolution is deferred to scan time so that an unresolvable host
//! becomes a per-target result instead of a fatal error.

use ipnetwork::IpNetwork;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use tracing::warn;

/// Error type for target parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    #[error("invalid target format: {0}")]
    InvalidFormat(String),
    #[error("invalid CIDR notation: {0}")]
    InvalidCidr(String),
    #[error("CIDR range too large: {0} addresses (max: {1})")]
    CidrTooLarge(u128, u128),
}

/// One entry of a target list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSpec {
    /// A single IP address.
    Single(IpAddr),
    /// A CIDR network range.
    Cidr(IpNetwork),
    /// A hostname, resolved when its scan starts.
    Hostname(String),
}

impl TargetSpec {
    /// Maximum number of hosts allowed in a CIDR range.
    pub const MAX_CIDR_HOSTS: u128 = 65536;

    /// Parse a target specification from a string.
    pub fn parse(s: &str) -> Result<Self, TargetError> {
        let s = s.trim();

        if let Ok(ip) = s.parse::<IpAddr>() {
            return Ok(Self::Single(ip));
        }

        if s.contains('/') {
            let network: IpNetwork = s
                .parse()
                .map_err(|_| TargetError::InvalidCidr(s.to_string()))?;

            let host_count = network_size(&network);
            if host_count > Self::MAX_CIDR_HOSTS {
                return Err(TargetError::CidrTooLarge(host_count, Self::MAX_CIDR_HOSTS));
            }

            return Ok(Self::Cidr(network));
        }

        // Anything else is a name; DNS decides whether it exists.
        if s.is_empty() || s.chars().any(char::is_whitespace) {
            return Err(TargetError::InvalidFormat(s.to_string()));
        }
        Ok(Self::Hostname(s.to_string()))
    }

    /// Expand into the host strings the session scans, in order.
    ///
    /// IPv4 network and broadcast addresses are dropped for prefixes
    /// shorter than /31.
    pub fn hosts(&self) -> Vec<String> {
        match self {
            Self::Single(ip) => vec![ip.to_string()],
            Self::Hostname(name) => vec![name.clone()],
            Self::Cidr(network) => network
                .iter()
                .filter(|ip| match (network, ip) {
                    (IpNetwork::V4(net), IpAddr::V4(addr)) if net.prefix() < 31 => {
                        *addr != net.network() && *addr != net.broadcast()
                    }
                    _ => true,
                })
                .map(|ip| ip.to_string())
                .collect(),
        }
    }
}

impl FromStr for TargetSpec {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TargetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(ip) => write!(f, "{}", ip),
            Self::Cidr(network) => write!(f, "{}", network),
            Self::Hostname(hostname) => write!(f, "{}", hostname),
        }
    }
}

/// Parse a comma-separated target list into the ordered hosts to scan.
///
/// Invalid entries are logged and skipped. Duplicates are kept so the
/// report mirrors what the user asked for.
pub fn parse_targets(input: &str) -> (Vec<String>, Vec<TargetError>) {
    let mut hosts = Vec::new();
    let mut rejected = Vec::new();

    for entry in input.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        match TargetSpec::parse(entry) {
            Ok(spec) => hosts.extend(spec.hosts()),
            Err(e) => {
                warn!(entry, error = %e, "skipping target");
                rejected.push(e);
            }
        }
    }

    (hosts, rejected)
}

fn network_size(network: &IpNetwork) -> u128 {
    match network {
        IpNetwork::V4(net) => u128::from(net.size()),
        IpNetwork::V6(net) => {
            let prefix = u32::from(net.prefix());
            if prefix == 0 {
                u128::MAX
            } else {
                1u128 << (128 - prefix)
            }
        }
    }
}
