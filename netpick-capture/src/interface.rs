//! Capture device enumeration

use netpick_core::{Address, DeviceList, Error, NetworkInterface, Result};
use pcap::Device;
use tracing::debug;

fn to_interface(index: usize, device: Device) -> NetworkInterface {
    let addresses: Vec<Address> = device
        .addresses
        .iter()
        .map(|address| Address::from(address.addr))
        .collect();

    NetworkInterface {
        index,
        name: device.name,
        description: device.desc,
        addresses,
    }
}

/// List all capture devices as one snapshot, indexed by enumeration order
///
/// Indices are positions in the capture library's device list, so they line
/// up with what a capture consumer sees when it enumerates the same way.
pub fn list_devices() -> Result<DeviceList> {
    let devices = Device::list().map_err(|e| Error::Enumeration(e.to_string()))?;

    if devices.is_empty() {
        return Err(Error::Enumeration(
            "No capture devices found. Are you running with sufficient privileges?".to_string(),
        ));
    }

    let list: DeviceList = devices
        .into_iter()
        .enumerate()
        .map(|(index, device)| to_interface(index, device))
        .collect();

    debug!("Enumerated {} capture devices", list.len());
    Ok(list)
}
