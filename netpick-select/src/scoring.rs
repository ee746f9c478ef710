//! Preference scoring for suitable interfaces

use netpick_core::{DeviceList, NetworkInterface};
use std::fmt;
use tracing::{debug, info};

use crate::classifier::Classifier;
use crate::suitability::is_suitable_for_capture;

const VPN_BONUS: u32 = 100;
const PER_ADDRESS_BONUS: u32 = 10;
const PUBLIC_ADDRESS_BONUS: u32 = 50;
const IPV4_BONUS: u32 = 25;

/// A suitable interface together with its score
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub interface_index: usize,
    pub score: u32,
    /// Display name the score was computed from
    pub name: String,
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Device {} (score: {}): {}",
            self.interface_index, self.score, self.name
        )
    }
}

/// Ranks interfaces that pass the suitability gate
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    classifier: Classifier,
}

impl ScoringEngine {
    pub fn new(classifier: Classifier) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Score one interface; a pure function of its name and addresses
    pub fn score(&self, iface: &NetworkInterface) -> u32 {
        let name = iface.display_name();
        let mut score = 0;

        if self.classifier.is_vpn_adapter(name) {
            score += VPN_BONUS;
        }

        score += PER_ADDRESS_BONUS * iface.addresses.len() as u32;

        if iface.addresses.iter().any(|address| address.is_public()) {
            score += PUBLIC_ADDRESS_BONUS;
        }

        if iface.addresses.iter().any(|address| address.is_ipv4_shaped()) {
            score += IPV4_BONUS;
        }

        score
    }

    /// All suitable interfaces, best first; equal scores keep ascending index
    pub fn find_suitable_devices(&self, devices: &DeviceList) -> Vec<Candidate> {
        let mut candidates: Vec<Candidate> = devices
            .iter()
            .filter(|iface| {
                is_suitable_for_capture(&self.classifier, iface.display_name(), iface)
            })
            .map(|iface| {
                let candidate = Candidate {
                    interface_index: iface.index,
                    score: self.score(iface),
                    name: iface.display_name().to_string(),
                };
                if self.classifier.is_vpn_adapter(&candidate.name) {
                    info!("VPN adapter detected: {}", iface);
                }
                debug!("{}", candidate);
                candidate
            })
            .collect();

        candidates.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.interface_index.cmp(&b.interface_index))
        });

        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wireguard_score() {
        let engine = ScoringEngine::default();
        let iface = NetworkInterface::new(0, "wg0")
            .with_description("WireGuard Tunnel")
            .with_address("10.8.0.2");

        // 100 VPN + 10 one address + 0 not public + 25 IPv4
        assert_eq!(engine.score(&iface), 135);
        assert_eq!(engine.score(&iface), 135);
    }

    #[test]
    fn test_public_dual_stack_score() {
        let engine = ScoringEngine::default();
        let iface = NetworkInterface::new(1, "eth0")
            .with_description("Intel(R) Ethernet Connection")
            .with_address("203.0.113.7")
            .with_address("fe80::1");

        // 20 two addresses + 50 public + 25 IPv4
        assert_eq!(engine.score(&iface), 95);
    }

    #[test]
    fn test_coarse_172_rule() {
        let engine = ScoringEngine::default();
        let iface = NetworkInterface::new(2, "eth0").with_address("172.217.3.110");

        // 172.x is never public: 10 one address + 25 IPv4
        assert_eq!(engine.score(&iface), 35);
    }

    #[test]
    fn test_vpn_without_addresses_scores_bonus_only() {
        let engine = ScoringEngine::default();
        let iface = NetworkInterface::new(3, "ppp0");
        assert_eq!(engine.score(&iface), 100);
    }

    #[test]
    fn test_find_suitable_devices_empty() {
        let engine = ScoringEngine::default();
        assert!(engine.find_suitable_devices(&DeviceList::new()).is_empty());
    }

    #[test]
    fn test_find_suitable_devices_ranking() {
        let engine = ScoringEngine::default();
        let devices: DeviceList = vec![
            NetworkInterface::new(0, "lo").with_description("Adapter for loopback traffic capture"),
            NetworkInterface::new(1, "eth0")
                .with_description("Realtek PCIe GbE")
                .with_address("192.168.1.42"),
            NetworkInterface::new(2, "wg0")
                .with_description("WireGuard Tunnel")
                .with_address("10.8.0.2"),
            NetworkInterface::new(3, "vmnet1")
                .with_description("VMware Network Adapter VMnet1")
                .with_address("192.168.56.1"),
            NetworkInterface::new(4, "eth1")
                .with_description("Intel(R) I211")
                .with_address("192.168.0.7"),
        ]
        .into_iter()
        .collect();

        let candidates = engine.find_suitable_devices(&devices);
        let ranked: Vec<(usize, u32)> = candidates
            .iter()
            .map(|c| (c.interface_index, c.score))
            .collect();

        // Ties at 35 are ordered by ascending index
        assert_eq!(ranked, vec![(2, 135), (1, 35), (4, 35)]);
        assert_eq!(candidates[0].name, "WireGuard Tunnel");
    }
}
