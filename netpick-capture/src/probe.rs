//! Bounded-time traffic probe
//!
//! A probe opens one device, counts what the filter lets through for a fixed
//! window and releases the handle again. It never fails: every problem ends
//! the probe early with zero (or the packets counted so far).

use netpick_core::DeviceList;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::capture::{CaptureConfig, CaptureOpener, PacketEvent, PcapOpener};
use crate::stats::{ProbeResult, ProbeTermination};

/// Counts live packets on a device for a bounded window
#[derive(Clone)]
pub struct TrafficProbe {
    opener: Arc<dyn CaptureOpener>,
    config: CaptureConfig,
}

impl TrafficProbe {
    /// Create a probe over any capture opener
    pub fn new(opener: Arc<dyn CaptureOpener>, config: CaptureConfig) -> Self {
        Self { opener, config }
    }

    /// Create a probe over libpcap with the given configuration
    pub fn pcap(config: CaptureConfig) -> Self {
        Self::new(Arc::new(PcapOpener::new()), config)
    }

    /// Count packets seen on `index` during the window
    pub async fn detect_traffic(&self, index: usize, devices: &DeviceList) -> u64 {
        self.probe(index, devices).await.packet_count
    }

    /// Run one probe and return the full result
    pub async fn probe(&self, index: usize, devices: &DeviceList) -> ProbeResult {
        let name = match devices.get(index) {
            Some(iface) if !iface.name.is_empty() => iface.name.clone(),
            _ => {
                warn!("Invalid device index: {}", index);
                return ProbeResult::empty(index, ProbeTermination::DeviceNotFound);
            }
        };

        let opener = Arc::clone(&self.opener);
        let config = self.config.clone();

        let task = tokio::task::spawn_blocking(move || {
            count_packets(opener.as_ref(), index, &name, &config)
        });

        match task.await {
            Ok(result) => result,
            Err(e) => {
                warn!("Probe task for device {} did not complete: {}", index, e);
                ProbeResult::empty(index, ProbeTermination::Aborted)
            }
        }
    }
}

/// Blocking probe loop; the source is dropped before this returns
fn count_packets(
    opener: &dyn CaptureOpener,
    index: usize,
    device: &str,
    config: &CaptureConfig,
) -> ProbeResult {
    let started = Instant::now();

    debug!("Attempting to open device: {}", device);
    let mut source = match opener.open(device, config) {
        Ok(source) => source,
        Err(e) => {
            warn!(
                "Failed to open device {} ({}). Elevated privileges may be required.",
                device, e
            );
            let mut result = ProbeResult::empty(index, ProbeTermination::OpenFailed);
            result.elapsed = started.elapsed();
            return result;
        }
    };

    let deadline = started + config.window;
    let mut packet_count: u64 = 0;
    let mut byte_count: u64 = 0;

    let termination = loop {
        let now = Instant::now();
        if now >= deadline {
            break ProbeTermination::WindowElapsed;
        }

        match source.next_event(deadline - now) {
            Ok(PacketEvent::Packet { len }) => {
                packet_count += 1;
                byte_count += len as u64;
            }
            Ok(PacketEvent::Timeout) => continue,
            Err(e) => {
                warn!("Probe on {} stopped early: {}", device, e);
                break ProbeTermination::ReadError;
            }
        }
    };

    drop(source);

    let result = ProbeResult {
        interface_index: index,
        packet_count,
        byte_count,
        elapsed: started.elapsed(),
        termination,
    };
    info!("Device {} detected {} packets", index, packet_count);
    result
}
