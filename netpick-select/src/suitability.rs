//! Gate deciding whether an interface may be considered at all

use netpick_core::NetworkInterface;

use crate::classifier::Classifier;

/// Whether `iface`, labelled `name`, may be used for packet capture
///
/// First matching rule wins:
/// 1. excluded names are rejected, even when they also look like a VPN
/// 2. VPN names are accepted without looking at addresses
/// 3. remaining virtual names are rejected
/// 4. anything else needs one address that is neither loopback nor link-local
pub fn is_suitable_for_capture(
    classifier: &Classifier,
    name: &str,
    iface: &NetworkInterface,
) -> bool {
    let flags = classifier.classify(name);

    if flags.is_excluded {
        return false;
    }

    if flags.is_vpn {
        return true;
    }

    if flags.is_virtual {
        return false;
    }

    iface.addresses.iter().any(|address| address.is_routable())
}
