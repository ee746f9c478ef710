//! netpick core library
//!
//! Shared types and error handling for the netpick interface selection
//! crates: the device snapshot handed in by enumeration and the error
//! taxonomy used by capture, routing and selection.

pub mod error;
pub mod interface;

// Re-export commonly used types
pub use error::{Error, Result};
pub use interface::{Address, AddressFamily, DeviceList, NetworkInterface};
