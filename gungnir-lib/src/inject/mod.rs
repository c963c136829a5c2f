//! The one-shot packet injector: fixed-stack RIP frames and the sinks that
//! emit them.

pub mod device;
mod rip;
mod sink;

pub use rip::{
    EtherSpec, Ipv4Spec, RipInjection, RipSpec, UdpSpec, ETH_HEADER_SIZE, IP_HEADER_SIZE,
    RIP2_MCAST, RIP_HEADER_SIZE, RIP_PORT, UDP_HEADER_SIZE,
};
pub use sink::{InjectionSink, LinkSink, RawIpSink};

use tracing::{info, warn};

use crate::error::{CraftError, Result};

/// Open the sink an injection asks for: a link channel on its device, or a
/// raw IP socket towards its destination.
pub fn open_sink(spec: &RipInjection) -> Result<Box<dyn InjectionSink>> {
    if spec.link_mode {
        let device = spec
            .device
            .as_deref()
            .ok_or_else(|| CraftError::Device("link mode requires a device name".into()))?;
        Ok(Box::new(LinkSink::open(device)?))
    } else {
        Ok(Box::new(RawIpSink::open(spec.ip.dst)?))
    }
}

/// Hand one finished frame to a sink.
///
/// A short write is warned about, not failed: the datagram that left is on
/// the wire either way, and the written count goes back to the caller.
pub fn submit(sink: &mut dyn InjectionSink, frame: &[u8]) -> Result<usize> {
    let n = sink.inject(frame)?;
    if n == frame.len() {
        info!(bytes = n, "packet injected");
    } else {
        warn!(wrote = n, frame = frame.len(), "incomplete packet injection");
    }
    Ok(n)
}
