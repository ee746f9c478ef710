//! Packet capture layer for netpick
//!
//! This crate wraps pcap for the two things interface selection needs from a
//! capture library: enumerating devices and briefly listening on one of them.
//!
//! ## Features
//!
//! - **Device Enumeration**: one indexed snapshot of every capture device
//! - **BPF Filters**: filter builders, `ip and tcp` by default
//! - **Traffic Probe**: bounded-time packet counting that never fails
//! - **Pluggable Backend**: probes go through the `CaptureOpener` trait
//!
//! ## Example
//!
//! ```no_run
//! use netpick_capture::{list_devices, CaptureConfig, TrafficProbe};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let devices = list_devices()?;
//! let probe = TrafficProbe::pcap(CaptureConfig::default());
//!
//! for iface in &devices {
//!     let packets = probe.detect_traffic(iface.index, &devices).await;
//!     println!("{}: {} packets", iface, packets);
//! }
//! # Ok(())
//! # }
//! ```

pub mod capture;
pub mod filters;
pub mod interface;
pub mod probe;
pub mod stats;

// Re-export main types
pub use capture::{CaptureConfig, CaptureOpener, PacketEvent, PacketSource, PcapOpener};
pub use interface::list_devices;
pub use probe::TrafficProbe;
pub use stats::{ProbeResult, ProbeTermination};
