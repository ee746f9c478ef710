//! Capture primitive: configuration, the opener seam and the pcap backend

use netpick_core::{Error, Result};
use pcap::{Active, Capture};
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

use crate::filters;

/// Default snapshot length (maximum bytes per packet)
const DEFAULT_SNAPLEN: i32 = 65535;

/// Default kernel buffer size (1 MiB)
const DEFAULT_BUFFER_SIZE: i32 = 1024 * 1024;

/// Default read timeout for one poll of the device (milliseconds)
const DEFAULT_READ_TIMEOUT_MS: i32 = 100;

/// Default observation window for a traffic probe (milliseconds)
const DEFAULT_WINDOW_MS: u64 = 3000;

/// Configuration for opening a device and probing it
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// BPF filter applied right after opening
    pub filter: String,
    /// Maximum bytes to capture per packet
    pub snaplen: i32,
    /// Kernel buffer size in bytes
    pub buffer_size: i32,
    /// Poll interval in milliseconds while the device is idle
    pub read_timeout_ms: i32,
    /// Enable promiscuous mode
    pub promiscuous: bool,
    /// Enable immediate mode (deliver packets immediately)
    pub immediate_mode: bool,
    /// How long a probe observes the device
    pub window: Duration,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            filter: filters::ip_tcp_filter(),
            snaplen: DEFAULT_SNAPLEN,
            buffer_size: DEFAULT_BUFFER_SIZE,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            promiscuous: true,
            immediate_mode: true,
            window: Duration::from_millis(DEFAULT_WINDOW_MS),
        }
    }
}

impl CaptureConfig {
    /// Set the BPF filter
    pub fn with_filter<S: Into<String>>(mut self, filter: S) -> Self {
        self.filter = filter.into();
        self
    }

    /// Set the observation window
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Set the read timeout
    pub fn with_read_timeout(mut self, timeout_ms: i32) -> Self {
        self.read_timeout_ms = timeout_ms;
        self
    }

    /// Idle poll interval: at least 1 ms and never longer than the window
    pub fn poll_interval(&self) -> Duration {
        let timeout_ms = u64::try_from(self.read_timeout_ms).unwrap_or(0).max(1);
        Duration::from_millis(timeout_ms).min(self.window)
    }
}

/// Outcome of one poll of an open device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketEvent {
    /// A packet matching the filter arrived
    Packet {
        /// Original length on the wire
        len: usize,
    },
    /// Nothing arrived within the allowed wait
    Timeout,
}

/// An open capture handle
///
/// Dropping the source releases the underlying OS handle.
pub trait PacketSource: Send {
    /// Wait at most `max_wait` and report what arrived
    fn next_event(&mut self, max_wait: Duration) -> Result<PacketEvent>;
}

/// Opens capture devices
pub trait CaptureOpener: Send + Sync {
    /// Open `device` with the filter and buffers from `config`
    ///
    /// On error nothing stays open.
    fn open(&self, device: &str, config: &CaptureConfig) -> Result<Box<dyn PacketSource>>;
}

/// Opener backed by libpcap / Npcap
#[derive(Debug, Clone, Copy, Default)]
pub struct PcapOpener;

impl PcapOpener {
    /// Create a new pcap opener
    pub fn new() -> Self {
        Self
    }
}

impl CaptureOpener for PcapOpener {
    fn open(&self, device: &str, config: &CaptureConfig) -> Result<Box<dyn PacketSource>> {
        debug!("Opening pcap capture on {}", device);

        let mut capture = Capture::from_device(device)
            .map_err(|e| Error::open_failed(device, e))?
            .promisc(config.promiscuous)
            .snaplen(config.snaplen)
            .immediate_mode(config.immediate_mode);

        if config.buffer_size > 0 {
            capture = capture.buffer_size(config.buffer_size);
        }

        // Non-blocking, so an idle link cannot hold a read past the window
        let mut capture = capture
            .open()
            .and_then(|capture| capture.setnonblock())
            .map_err(|e| Error::open_failed(device, e))?;

        // A failed filter drops `capture` here, closing the handle
        if !config.filter.is_empty() {
            capture
                .filter(&config.filter, true)
                .map_err(|e| Error::Capture(format!("Failed to apply filter: {}", e)))?;
            debug!("Applied filter: {}", config.filter);
        }

        info!("Capture opened on {}", device);
        Ok(Box::new(PcapSource {
            device: device.to_string(),
            capture,
            poll_interval: config.poll_interval(),
        }))
    }
}

/// Active pcap handle
struct PcapSource {
    device: String,
    capture: Capture<Active>,
    poll_interval: Duration,
}

impl PacketSource for PcapSource {
    fn next_event(&mut self, max_wait: Duration) -> Result<PacketEvent> {
        match self.capture.next_packet() {
            Ok(packet) => Ok(PacketEvent::Packet {
                len: packet.header.len as usize,
            }),
            // Nothing buffered; idle for one poll, the caller polls again
            Err(pcap::Error::TimeoutExpired) => {
                thread::sleep(self.poll_interval.min(max_wait));
                Ok(PacketEvent::Timeout)
            }
            Err(e) => Err(Error::Capture(format!("Read failed on {}: {}", self.device, e))),
        }
    }
}

impl Drop for PcapSource {
    fn drop(&mut self) {
        debug!("Releasing capture handle on {}", self.device);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_config_default() {
        let config = CaptureConfig::default();
        assert_eq!(config.filter, "ip and tcp");
        assert_eq!(config.snaplen, DEFAULT_SNAPLEN);
        assert_eq!(config.buffer_size, 1024 * 1024);
        assert_eq!(config.read_timeout_ms, DEFAULT_READ_TIMEOUT_MS);
        assert_eq!(config.window, Duration::from_millis(3000));
        assert!(config.promiscuous);
        assert!(config.immediate_mode);
    }

    #[test]
    fn test_capture_config_builders() {
        let config = CaptureConfig::default()
            .with_filter("tcp port 443")
            .with_window(Duration::from_millis(250))
            .with_read_timeout(20);
        assert_eq!(config.filter, "tcp port 443");
        assert_eq!(config.window, Duration::from_millis(250));
        assert_eq!(config.read_timeout_ms, 20);
    }

    #[test]
    fn test_poll_interval_bounds() {
        let window = Duration::from_millis(100);
        let zero = CaptureConfig::default().with_window(window).with_read_timeout(0);
        assert_eq!(zero.poll_interval(), Duration::from_millis(1));

        let negative = CaptureConfig::default().with_window(window).with_read_timeout(-5);
        assert_eq!(negative.poll_interval(), Duration::from_millis(1));

        let long = CaptureConfig::default().with_window(window).with_read_timeout(10_000);
        assert_eq!(long.poll_interval(), window);

        assert_eq!(
            CaptureConfig::default().poll_interval(),
            Duration::from_millis(100)
        );
    }

    #[test]
    fn test_open_nonexistent_device() {
        let result = PcapOpener::new().open("nonexistent_interface_xyz", &CaptureConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_open_loopback() {
        let config = CaptureConfig::default().with_read_timeout(10);
        let opener = PcapOpener::new();
        let result = opener
            .open("lo0", &config)
            .or_else(|_| opener.open("lo", &config))
            .or_else(|_| opener.open("\\Device\\NPF_Loopback", &config));

        // This might fail if not running with permissions
        match result {
            Ok(mut source) => {
                let event = source.next_event(Duration::from_millis(10));
                assert!(event.is_ok());
            }
            Err(e) => {
                println!("Could not open capture (may need privileges): {}", e);
            }
        }
    }
}
