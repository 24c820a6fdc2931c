//! Core type definitions using newtype patterns for type safety.
//!
//! These types keep invalid ports and targets out of the scanning engine.

mod port;
mod target;

pub use port::{ParsedPorts, Port, PortError, PortRange, PortSet};
pub use target::{parse_targets, TargetError, TargetSpec};
