//! Network device lookup for the link-layer sink.

use pnet::datalink::{self, MacAddr, NetworkInterface};

use crate::error::{CraftError, Result};

/// Find an interface by exact name.
pub fn find(name: &str) -> Result<NetworkInterface> {
    datalink::interfaces()
        .into_iter()
        .find(|iface| iface.name == name)
        .ok_or_else(|| CraftError::Device(format!("no such interface: {name}")))
}

/// Pick the first running, non-loopback interface that has a hardware
/// address — the fallback when the user gave a source MAC but no device.
pub fn auto_select() -> Result<NetworkInterface> {
    datalink::interfaces()
        .into_iter()
        .find(|iface| {
            iface.is_up()
                && !iface.is_loopback()
                && iface.mac.is_some_and(|mac| mac != MacAddr::zero())
        })
        .ok_or_else(|| {
            CraftError::Device("device not specified and unable to select one automatically".into())
        })
}

/// The hardware address of a named interface.
pub fn mac_of(name: &str) -> Result<[u8; 6]> {
    let iface = find(name)?;
    let mac = iface
        .mac
        .ok_or_else(|| CraftError::Device(format!("cannot retrieve hardware address of {name}")))?;
    Ok(mac.octets())
}
