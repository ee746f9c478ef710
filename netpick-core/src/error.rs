//! Error types for netpick

use thiserror::Error;

/// Result type alias for netpick operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for netpick
///
/// None of these escape the public selection operations: probing, route
/// resolution and ranking all degrade to a neutral value and log the error.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No device with this index in the current snapshot
    #[error("Device index {0} not found")]
    DeviceNotFound(usize),

    /// Capture device could not be opened
    #[error("Failed to open device '{device}': {reason}")]
    OpenFailed { device: String, reason: String },

    /// Capture error after the device was opened (filter, read)
    #[error("Packet capture error: {0}")]
    Capture(String),

    /// Device enumeration failed
    #[error("Device enumeration failed: {0}")]
    Enumeration(String),

    /// Route query could not be executed
    #[error("Route command failed: {0}")]
    RouteCommand(String),

    /// Route table output had no usable default route
    #[error("Route table parse failure: {0}")]
    RouteParse(String),
}

impl Error {
    /// Create an open failure for a device
    pub fn open_failed<D: Into<String>, R: ToString>(device: D, reason: R) -> Self {
        Error::OpenFailed {
            device: device.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a route parse failure with a custom message
    pub fn route_parse<S: Into<String>>(msg: S) -> Self {
        Error::RouteParse(msg.into())
    }
}
