//! CLI interface for netpick
//!
//! Argument parsing for the `netpick` binary.

pub mod args;

pub use args::{Cli, Commands};
