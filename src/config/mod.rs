//! Configuration management for portscout.
//!
//! Provides the optional XDG settings file that supplies defaults for
//! the command-line front end.

mod settings;

pub use settings::{Paths, Settings};
