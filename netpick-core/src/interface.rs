//! Network interface snapshot types

use std::collections::btree_map::{self, BTreeMap};
use std::fmt;
use std::net::IpAddr;

/// Address prefixes treated as non-public.
///
/// `172.` covers the whole 172.0.0.0/8 range, not only 172.16.0.0/12.
const NON_PUBLIC_PREFIXES: [&str; 5] = ["192.168.", "10.", "172.", "127.", "169.254."];

const LINK_LOCAL_PREFIX: &str = "169.254.";

/// Address family of an interface address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    Ipv4,
    Ipv6,
    /// Anything the enumeration primitive reports that is not IP
    Other,
}

/// One address assigned to an interface, kept in its textual form
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    /// Address as reported by enumeration (e.g. "192.168.1.10", "fe80::1")
    pub addr: String,
    /// Address family
    pub family: AddressFamily,
}

impl Address {
    /// Create a new address
    pub fn new<S: Into<String>>(addr: S, family: AddressFamily) -> Self {
        Self {
            addr: addr.into(),
            family,
        }
    }

    /// Create an address, guessing the family from its text
    pub fn parse<S: Into<String>>(addr: S) -> Self {
        let addr = addr.into();
        let family = match addr.parse::<IpAddr>() {
            Ok(IpAddr::V4(_)) => AddressFamily::Ipv4,
            Ok(IpAddr::V6(_)) => AddressFamily::Ipv6,
            Err(_) => AddressFamily::Other,
        };
        Self { addr, family }
    }

    /// Not loopback (`127.0.0.1`, `::1`) and not link-local (`169.254.*`)
    pub fn is_routable(&self) -> bool {
        !self.addr.is_empty()
            && self.addr != "127.0.0.1"
            && self.addr != "::1"
            && !self.addr.starts_with(LINK_LOCAL_PREFIX)
    }

    /// Coarse prefix check for a public address
    pub fn is_public(&self) -> bool {
        !self.addr.is_empty()
            && !NON_PUBLIC_PREFIXES
                .iter()
                .any(|prefix| self.addr.starts_with(prefix))
    }

    /// Whether the text looks like IPv4 (contains no `:`)
    pub fn is_ipv4_shaped(&self) -> bool {
        !self.addr.is_empty() && !self.addr.contains(':')
    }
}

impl From<IpAddr> for Address {
    fn from(ip: IpAddr) -> Self {
        let family = match ip {
            IpAddr::V4(_) => AddressFamily::Ipv4,
            IpAddr::V6(_) => AddressFamily::Ipv6,
        };
        Self {
            addr: ip.to_string(),
            family,
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.addr)
    }
}

/// Network interface as seen by one enumeration call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkInterface {
    /// Position in the enumeration snapshot
    pub index: usize,
    /// Raw OS identifier (e.g. "eth0", "\\Device\\NPF_{...}")
    pub name: String,
    /// Human-readable label, if the OS provides one
    pub description: Option<String>,
    /// Assigned addresses, in enumeration order
    pub addresses: Vec<Address>,
}

impl NetworkInterface {
    /// Create a new interface with no description
    pub fn new<S: Into<String>>(index: usize, name: S) -> Self {
        Self {
            index,
            name: name.into(),
            description: None,
            addresses: Vec::new(),
        }
    }

    /// Set the description
    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Append an address, inferring its family
    pub fn with_address<S: Into<String>>(mut self, addr: S) -> Self {
        self.addresses.push(Address::parse(addr));
        self
    }

    /// Description when present, otherwise the raw name
    pub fn display_name(&self) -> &str {
        match self.description.as_deref() {
            Some(desc) if !desc.is_empty() => desc,
            _ => &self.name,
        }
    }

    /// Whether any address equals `addr` exactly
    pub fn has_address(&self, addr: &str) -> bool {
        self.addresses.iter().any(|a| a.addr == addr)
    }
}

impl fmt::Display for NetworkInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.index, self.display_name())
    }
}

/// One enumeration snapshot, keyed by device index
///
/// Indices are only meaningful within the snapshot they came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceList {
    devices: BTreeMap<usize, NetworkInterface>,
}

impl DeviceList {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an interface under its own index, replacing any previous entry
    pub fn insert(&mut self, iface: NetworkInterface) {
        self.devices.insert(iface.index, iface);
    }

    /// Look up an interface by index
    pub fn get(&self, index: usize) -> Option<&NetworkInterface> {
        self.devices.get(&index)
    }

    /// Iterate interfaces in ascending index order
    pub fn iter(&self) -> btree_map::Values<'_, usize, NetworkInterface> {
        self.devices.values()
    }

    /// Number of interfaces
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Check if the snapshot is empty
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

impl FromIterator<NetworkInterface> for DeviceList {
    fn from_iter<T: IntoIterator<Item = NetworkInterface>>(iter: T) -> Self {
        let mut list = DeviceList::new();
        for iface in iter {
            list.insert(iface);
        }
        list
    }
}

impl<'a> IntoIterator for &'a DeviceList {
    type Item = &'a NetworkInterface;
    type IntoIter = btree_map::Values<'a, usize, NetworkInterface>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn test_address_family_inference() {
        assert_eq!(Address::parse("10.0.0.1").family, AddressFamily::Ipv4);
        assert_eq!(Address::parse("fe80::1").family, AddressFamily::Ipv6);
        assert_eq!(Address::parse("not-an-ip").family, AddressFamily::Other);
    }

    #[test]
    fn test_from_ip_addr() {
        let v4 = Address::from(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 5)));
        assert_eq!(v4.addr, "192.168.1.5");
        assert_eq!(v4.family, AddressFamily::Ipv4);

        let v6 = Address::from(IpAddr::V6(Ipv6Addr::LOCALHOST));
        assert_eq!(v6.addr, "::1");
        assert_eq!(v6.family, AddressFamily::Ipv6);
    }

    #[test]
    fn test_routable() {
        assert!(Address::parse("192.168.1.5").is_routable());
        assert!(Address::parse("fe80::1").is_routable());
        assert!(!Address::parse("127.0.0.1").is_routable());
        assert!(!Address::parse("::1").is_routable());
        assert!(!Address::parse("169.254.10.1").is_routable());
        assert!(!Address::parse("").is_routable());
    }

    #[test]
    fn test_public_prefixes() {
        assert!(Address::parse("8.8.8.8").is_public());
        assert!(Address::parse("2001:db8::1").is_public());
        assert!(!Address::parse("192.168.0.1").is_public());
        assert!(!Address::parse("10.8.0.2").is_public());
        assert!(!Address::parse("127.0.0.1").is_public());
        assert!(!Address::parse("169.254.1.1").is_public());
        // Whole 172.x range counts as private, including 172.32.0.0 and up
        assert!(!Address::parse("172.217.0.46").is_public());
    }

    #[test]
    fn test_ipv4_shaped() {
        assert!(Address::parse("10.0.0.1").is_ipv4_shaped());
        assert!(!Address::parse("fe80::1").is_ipv4_shaped());
        assert!(!Address::parse("").is_ipv4_shaped());
    }

    #[test]
    fn test_display_name_fallback() {
        let plain = NetworkInterface::new(0, "eth0");
        assert_eq!(plain.display_name(), "eth0");

        let described = NetworkInterface::new(1, "\\Device\\NPF_{ABC}")
            .with_description("Intel(R) Ethernet Connection");
        assert_eq!(described.display_name(), "Intel(R) Ethernet Connection");

        let empty = NetworkInterface::new(2, "wlan0").with_description("");
        assert_eq!(empty.display_name(), "wlan0");
    }

    #[test]
    fn test_device_list_ordering() {
        let list: DeviceList = vec![
            NetworkInterface::new(3, "c"),
            NetworkInterface::new(1, "a"),
            NetworkInterface::new(2, "b"),
        ]
        .into_iter()
        .collect();

        let indices: Vec<usize> = list.iter().map(|iface| iface.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
        assert_eq!(list.get(2).map(|iface| iface.name.as_str()), Some("b"));
        assert!(list.get(9).is_none());
    }

    #[test]
    fn test_has_address() {
        let iface = NetworkInterface::new(0, "eth0")
            .with_address("192.168.1.10")
            .with_address("fe80::1");
        assert!(iface.has_address("192.168.1.10"));
        assert!(!iface.has_address("192.168.1.1"));
    }
}
