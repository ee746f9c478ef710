//! Two-phase default device selection
//!
//! Phase one trusts the OS default route once a probe confirms the device is
//! live. Phase two probes the best-scored candidates one after another and
//! picks the busiest. If neither confirms anything the answer is `None`.

use netpick_capture::{CaptureConfig, CaptureOpener, PcapOpener, TrafficProbe};
use netpick_core::DeviceList;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::classifier::{Classifier, KeywordTables};
use crate::route::{RoutePrintProvider, RouteResolver, RoutingTableProvider};
use crate::scoring::{Candidate, ScoringEngine};

/// Default number of candidates probed in the fallback phase
const DEFAULT_MAX_CANDIDATES: usize = 5;

/// Configuration for a `Selector`
#[derive(Debug, Clone)]
pub struct SelectorConfig {
    /// How many top-scored candidates the fallback phase probes
    pub max_candidates: usize,
    /// Probe settings (filter, buffers, window)
    pub capture: CaptureConfig,
    /// Keyword tables for classification
    pub keywords: KeywordTables,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            max_candidates: DEFAULT_MAX_CANDIDATES,
            capture: CaptureConfig::default(),
            keywords: KeywordTables::default(),
        }
    }
}

/// A fallback candidate after probing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbedCandidate {
    pub interface_index: usize,
    pub score: u32,
    pub packet_count: u64,
}

/// Order probed candidates: most packets, then highest score, then lowest index
pub fn rank_probed(results: &mut [ProbedCandidate]) {
    results.sort_by(|a, b| {
        b.packet_count
            .cmp(&a.packet_count)
            .then_with(|| b.score.cmp(&a.score))
            .then_with(|| a.interface_index.cmp(&b.interface_index))
    });
}

/// Picks the interface most likely to carry live traffic
#[derive(Clone)]
pub struct Selector {
    engine: ScoringEngine,
    resolver: RouteResolver,
    probe: TrafficProbe,
    max_candidates: usize,
}

impl Selector {
    /// Create a selector over explicit collaborators
    pub fn new(
        config: SelectorConfig,
        routes: Arc<dyn RoutingTableProvider>,
        opener: Arc<dyn CaptureOpener>,
    ) -> Self {
        Self {
            engine: ScoringEngine::new(Classifier::new(config.keywords)),
            resolver: RouteResolver::new(routes),
            probe: TrafficProbe::new(opener, config.capture),
            max_candidates: config.max_candidates,
        }
    }

    /// Create a selector using `route print` and libpcap
    pub fn with_system(config: SelectorConfig) -> Self {
        Self::new(
            config,
            Arc::new(RoutePrintProvider::new()),
            Arc::new(PcapOpener::new()),
        )
    }

    pub fn classifier(&self) -> &Classifier {
        self.engine.classifier()
    }

    pub fn probe(&self) -> &TrafficProbe {
        &self.probe
    }

    /// Scored candidates, best first
    pub fn find_suitable_devices(&self, devices: &DeviceList) -> Vec<Candidate> {
        self.engine.find_suitable_devices(devices)
    }

    /// Device carrying the OS default route, if it can be matched
    pub async fn find_by_route(&self, devices: &DeviceList) -> Option<usize> {
        self.resolver.find_by_route(devices).await
    }

    /// Packets seen on `index` during one probe window
    pub async fn detect_traffic(&self, index: usize, devices: &DeviceList) -> u64 {
        self.probe.detect_traffic(index, devices).await
    }

    /// Fallback phase: probe the top candidates and pick the busiest
    pub async fn find_best_device_by_testing(&self, devices: &DeviceList) -> Option<usize> {
        info!("Testing multiple network devices to find the best one...");

        let candidates = self.find_suitable_devices(devices);
        if candidates.is_empty() {
            info!("No suitable devices found for packet capture");
            return None;
        }

        info!(
            "Found {} suitable devices, testing traffic detection...",
            candidates.len()
        );

        let mut results = Vec::with_capacity(self.max_candidates.min(candidates.len()));
        for candidate in candidates.iter().take(self.max_candidates) {
            info!("Testing {}", candidate);
            let packet_count = self
                .probe
                .detect_traffic(candidate.interface_index, devices)
                .await;
            results.push(ProbedCandidate {
                interface_index: candidate.interface_index,
                score: candidate.score,
                packet_count,
            });
        }

        rank_probed(&mut results);
        debug!("Probe ranking: {:?}", results);

        let best = results.first()?;
        info!(
            "Selected device {} with {} packets detected",
            best.interface_index, best.packet_count
        );
        Some(best.interface_index)
    }

    /// Route phase, then fallback phase
    pub async fn find_default_network_device(&self, devices: &DeviceList) -> Option<usize> {
        info!("Auto detecting default network interface...");

        if devices.is_empty() {
            warn!("No network devices to choose from");
            return None;
        }

        info!("Attempting to find interface via route table...");
        if let Some(index) = self.find_by_route(devices).await {
            if let Some(iface) = devices.get(index) {
                info!("Using adapter from route table: {}", iface);
            }

            let result = self.probe.probe(index, devices).await;
            info!(
                "Route-based device {} detected {} packets",
                index, result.packet_count
            );
            if result.is_live() {
                return Some(index);
            }
        }

        info!("Route-based detection failed or device not suitable, trying fallback methods...");

        match self.find_best_device_by_testing(devices).await {
            Some(index) => {
                if let Some(iface) = devices.get(index) {
                    info!("Using best available device: {}", iface);
                }
                Some(index)
            }
            None => {
                warn!("Could not find a suitable network interface.");
                None
            }
        }
    }
}
