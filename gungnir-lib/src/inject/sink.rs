//! Injection sinks: where a finished frame goes.

use std::net::{Ipv4Addr, SocketAddrV4};

use pnet::datalink::{self, Channel, DataLinkSender};
use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use tracing::debug;

use crate::error::{CraftError, Result};
use crate::inject::device;

/// Largest IPv4 packet; the raw sink's send buffer is raised to this so a
/// maximum-size datagram never blocks on kernel buffering.
const MAX_IP_PACKET: usize = 65535;

/// A destination that accepts one finished frame per call.
///
/// The write is a single atomic operation; the returned count is the bytes
/// the kernel took, which callers compare against the frame length to
/// detect a short write.
pub trait InjectionSink {
    fn inject(&mut self, frame: &[u8]) -> Result<usize>;
}

/// Raw IPv4 socket sink. The frame must start at the IP header; the kernel
/// fills the IP checksum on the way out (`IPPROTO_RAW` implies header
/// inclusion).
pub struct RawIpSink {
    socket: Socket,
    dst: SocketAddrV4,
}

impl RawIpSink {
    pub fn open(dst: Ipv4Addr) -> Result<Self> {
        let socket = Socket::new(Domain::IPV4, Type::RAW, Some(Protocol::from(libc::IPPROTO_RAW)))
            .map_err(|e| CraftError::Sink(format!("cannot open raw IP socket: {e}")))?;
        socket
            .set_send_buffer_size(MAX_IP_PACKET)
            .map_err(|e| CraftError::Sink(format!("cannot size raw socket send buffer: {e}")))?;
        debug!(%dst, "raw IP sink open");
        Ok(Self { socket, dst: SocketAddrV4::new(dst, 0) })
    }
}

impl InjectionSink for RawIpSink {
    fn inject(&mut self, frame: &[u8]) -> Result<usize> {
        Ok(self.socket.send_to(frame, &SockAddr::from(self.dst))?)
    }
}

/// Link-layer sink over a datalink channel bound to one device. The frame
/// must start at the Ethernet header.
pub struct LinkSink {
    tx: Box<dyn DataLinkSender>,
}

impl LinkSink {
    pub fn open(device: &str) -> Result<Self> {
        let iface = device::find(device)?;
        let channel = datalink::channel(&iface, datalink::Config::default())
            .map_err(|e| CraftError::Sink(format!("cannot open link channel on {device}: {e}")))?;
        let tx = match channel {
            Channel::Ethernet(tx, _rx) => tx,
            _ => {
                return Err(CraftError::Sink(format!(
                    "device {device} offered an unsupported channel type"
                )))
            }
        };
        debug!(device, "link sink open");
        Ok(Self { tx })
    }
}

impl InjectionSink for LinkSink {
    fn inject(&mut self, frame: &[u8]) -> Result<usize> {
        match self.tx.send_to(frame, None) {
            Some(Ok(())) => Ok(frame.len()),
            Some(Err(e)) => Err(e.into()),
            None => Err(CraftError::Sink("link channel refused the frame".into())),
        }
    }
}
