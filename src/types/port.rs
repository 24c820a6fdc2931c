//! Port numbers and the port set parser.
//!
//! `Port` is always in 1-65535. `PortSet` is the canonical, sorted and
//! duplicate-free collection of ports built from a textual specification
//! such as `"22,80,443,8000-8100"`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// A validated network port number (1-65535).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Port(u16);

impl Port {
    /// Minimum valid port number.
    pub const MIN: u16 = 1;
    /// Maximum valid port number.
    pub const MAX: u16 = 65535;

    /// Create a new Port from a u16, returning None for port 0.
    #[inline]
    pub const fn new(port: u16) -> Option<Self> {
        if port >= Self::MIN {
            Some(Self(port))
        } else {
            None
        }
    }

    /// Get the raw port number.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl TryFrom<u16> for Port {
    type Error = PortError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(PortError::OutOfRange(u32::from(value)))
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

/// Reasons a port token is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("invalid port: {0}")]
    InvalidFormat(String),
    #[error("port {0} is out of valid range (1-65535)")]
    OutOfRange(u32),
    #[error("invalid port range: start ({0}) > end ({1})")]
    InvalidRange(u16, u16),
    #[error("empty port specification")]
    Empty,
}

/// An inclusive range of ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRange {
    start: Port,
    end: Port,
}

impl PortRange {
    /// Create a new port range. `start` must not exceed `end`.
    pub fn new(start: Port, end: Port) -> Result<Self, PortError> {
        if start > end {
            Err(PortError::InvalidRange(start.0, end.0))
        } else {
            Ok(Self { start, end })
        }
    }

    /// A range containing a single port.
    pub const fn single(port: Port) -> Self {
        Self {
            start: port,
            end: port,
        }
    }

    pub const fn start(&self) -> Port {
        self.start
    }

    pub const fn end(&self) -> Port {
        self.end
    }

    /// Iterate over all ports in this range.
    pub fn iter(&self) -> impl Iterator<Item = Port> {
        (self.start.0..=self.end.0).map(Port)
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Outcome of parsing a port specification: the ports that were accepted
/// and every token that was skipped.
#[derive(Debug, Clone, Default)]
pub struct ParsedPorts {
    pub ports: PortSet,
    pub rejected: Vec<PortError>,
}

/// Ascending, duplicate-free set of ports to scan.
///
/// Accepted syntax is a comma-separated list of tokens, each either a
/// single port (`"80"`) or an inclusive range (`"8000-8100"`). Whitespace
/// around tokens and range bounds is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PortSet {
    ports: Vec<Port>,
}

impl PortSet {
    /// An empty set.
    pub const fn new() -> Self {
        Self { ports: Vec::new() }
    }

    /// Parse a specification, skipping malformed tokens.
    ///
    /// Malformed tokens never abort parsing; they are collected in
    /// [`ParsedPorts::rejected`] and logged. An empty result is the
    /// caller's problem to reject.
    pub fn parse(input: &str) -> ParsedPorts {
        let mut ports = Vec::new();
        let mut rejected = Vec::new();

        for token in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            match parse_token(token) {
                Ok(range) => ports.extend(range.iter()),
                Err(e) => {
                    warn!(token, error = %e, "skipping port token");
                    rejected.push(e);
                }
            }
        }

        ParsedPorts {
            ports: Self::from_ports(ports),
            rejected,
        }
    }

    /// Build a set from arbitrary ports, sorting and removing duplicates.
    pub fn from_ports(ports: impl IntoIterator<Item = Port>) -> Self {
        let mut ports: Vec<Port> = ports.into_iter().collect();
        ports.sort_unstable();
        ports.dedup();
        Self { ports }
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    pub fn as_slice(&self) -> &[Port] {
        &self.ports
    }

    pub fn iter(&self) -> impl Iterator<Item = Port> + '_ {
        self.ports.iter().copied()
    }

    pub fn contains(&self, port: Port) -> bool {
        self.ports.binary_search(&port).is_ok()
    }

    /// Collapse consecutive ports back into ranges.
    pub fn ranges(&self) -> Vec<PortRange> {
        let mut ranges: Vec<PortRange> = Vec::new();
        for &port in &self.ports {
            match ranges.last_mut() {
                Some(last) if last.end.0.checked_add(1) == Some(port.0) => last.end = port,
                _ => ranges.push(PortRange::single(port)),
            }
        }
        ranges
    }
}

impl FromStr for PortSet {
    type Err = PortError;

    /// Lenient parse that only fails when no port survives.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = Self::parse(s);
        if parsed.ports.is_empty() {
            return Err(PortError::Empty);
        }
        Ok(parsed.ports)
    }
}

impl fmt::Display for PortSet {
    /// Canonical rendering, e.g. `22,80,8000-8002`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.ranges().iter().map(|r| r.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}

fn parse_token(token: &str) -> Result<PortRange, PortError> {
    match token.split_once('-') {
        Some((start, end)) => {
            let start = parse_port(start.trim(), token)?;
            let end = parse_port(end.trim(), token)?;
            PortRange::new(start, end)
        }
        None => parse_port(token, token).map(PortRange::single),
    }
}

fn parse_port(literal: &str, token: &str) -> Result<Port, PortError> {
    let value: u32 = literal
        .parse()
        .map_err(|_| PortError::InvalidFormat(token.to_string()))?;
    u16::try_from(value)
        .ok()
        .and_then(Port::new)
        .ok_or(PortError::OutOfRange(value))
}
