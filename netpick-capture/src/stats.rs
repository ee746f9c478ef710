//! Probe results and statistics

use std::fmt;
use std::time::Duration;

/// Why a probe stopped counting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeTermination {
    /// The observation window ran out; the normal ending
    WindowElapsed,
    /// The index is not in the snapshot or has no name
    DeviceNotFound,
    /// The device could not be opened or the filter could not be attached
    OpenFailed,
    /// A read failed mid-window; packets counted so far are kept
    ReadError,
    /// The blocking probe task panicked or was cancelled
    Aborted,
}

impl fmt::Display for ProbeTermination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ProbeTermination::WindowElapsed => "window elapsed",
            ProbeTermination::DeviceNotFound => "device not found",
            ProbeTermination::OpenFailed => "open failed",
            ProbeTermination::ReadError => "read error",
            ProbeTermination::Aborted => "aborted",
        };
        f.write_str(text)
    }
}

/// Outcome of one traffic probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    /// Device index the probe ran against
    pub interface_index: usize,
    /// Packets delivered during the window
    pub packet_count: u64,
    /// Sum of on-wire packet lengths
    pub byte_count: u64,
    /// Time between opening the device and releasing it
    pub elapsed: Duration,
    /// How the probe ended
    pub termination: ProbeTermination,
}

impl ProbeResult {
    /// A probe that never observed anything
    pub fn empty(interface_index: usize, termination: ProbeTermination) -> Self {
        Self {
            interface_index,
            packet_count: 0,
            byte_count: 0,
            elapsed: Duration::ZERO,
            termination,
        }
    }

    /// Whether any packet was seen
    pub fn is_live(&self) -> bool {
        self.packet_count > 0
    }

    /// Packets per second over the elapsed time
    pub fn packets_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.packet_count as f64 / secs
        } else {
            0.0
        }
    }

    /// Format the result as a human-readable string
    pub fn format(&self) -> String {
        format!(
            "Device {}: {} packets ({} bytes) in {:.2}s, {:.2} pps [{}]",
            self.interface_index,
            self.packet_count,
            self.byte_count,
            self.elapsed.as_secs_f64(),
            self.packets_per_second(),
            self.termination
        )
    }
}
