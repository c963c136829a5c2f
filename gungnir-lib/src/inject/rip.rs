//! The one-shot RIP-over-UDP-over-IP frame builder.
//!
//! A fixed-stack specialisation of the crafting pipeline: four header specs
//! plus two opaque blobs become one contiguous frame, checksummed and ready
//! for a sink. Header fields the user left at zero are defaulted here, per
//! the protocol's conventions, before the frame is laid out.

use std::net::Ipv4Addr;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::blob::MAX_IP_OPTIONS;
use crate::checksum;
use crate::error::{CraftError, Result};
use crate::inject::device;

pub const ETH_HEADER_SIZE: usize = 14;
pub const IP_HEADER_SIZE: usize = 20;
pub const UDP_HEADER_SIZE: usize = 8;
/// Fixed RIP portion: command, version, domain and one route entry.
pub const RIP_HEADER_SIZE: usize = 24;

/// Both RIP ports, requests and responses alike.
pub const RIP_PORT: u16 = 520;

/// RIPv2 multicast group, RIP2-ROUTERS.MCAST.NET.
pub const RIP2_MCAST: Ipv4Addr = Ipv4Addr::new(224, 0, 0, 9);

const RIPCMD_REQUEST: u8 = 1;
const IPTOS_RELIABILITY: u8 = 0x04;
const IPPROTO_UDP: u8 = 17;
const ETHERTYPE_IPV4: u16 = 0x0800;

/// Ethernet II framing for link mode.
#[derive(Debug, Clone)]
pub struct EtherSpec {
    pub dst: [u8; 6],
    pub src: [u8; 6],
    pub ethertype: u16,
}

impl Default for EtherSpec {
    fn default() -> Self {
        Self { dst: [0xff; 6], src: [0x00; 6], ethertype: ETHERTYPE_IPV4 }
    }
}

/// Outer IPv4 header. `frag` carries flags and offset as one 16-bit field.
#[derive(Debug, Clone)]
pub struct Ipv4Spec {
    pub tos: u8,
    pub id: u16,
    pub frag: u16,
    pub ttl: u8,
    pub proto: u8,
    pub src: Ipv4Addr,
    pub dst: Ipv4Addr,
}

impl Default for Ipv4Spec {
    /// Historical injector defaults: reliability TOS, TTL 255, a random IP
    /// ID. Source and destination stay zero so [`RipInjection::apply_defaults`]
    /// can tell "unset" from "given".
    fn default() -> Self {
        Self {
            tos: IPTOS_RELIABILITY,
            id: rand::thread_rng().gen(),
            frag: 0,
            ttl: 255,
            proto: IPPROTO_UDP,
            src: Ipv4Addr::UNSPECIFIED,
            dst: Ipv4Addr::UNSPECIFIED,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UdpSpec {
    pub sport: u16,
    pub dport: u16,
}

impl Default for UdpSpec {
    fn default() -> Self {
        Self { sport: RIP_PORT, dport: RIP_PORT }
    }
}

/// RIP command block plus one route entry.
#[derive(Debug, Clone)]
pub struct RipSpec {
    pub cmd: u8,
    pub ver: u8,
    pub domain: u16,
    pub af: u16,
    pub tag: u16,
    pub addr: Ipv4Addr,
    pub mask: Ipv4Addr,
    pub next_hop: Ipv4Addr,
    pub metric: u32,
}

impl Default for RipSpec {
    fn default() -> Self {
        Self {
            cmd: RIPCMD_REQUEST,
            ver: 2,
            domain: 0,
            af: 2,
            tag: rand::thread_rng().gen(),
            addr: Ipv4Addr::UNSPECIFIED,
            mask: Ipv4Addr::UNSPECIFIED,
            next_hop: Ipv4Addr::UNSPECIFIED,
            metric: 1,
        }
    }
}

/// Everything one injection needs: the four header specs, the two blobs and
/// the sink selection.
#[derive(Debug, Clone, Default)]
pub struct RipInjection {
    pub ether: EtherSpec,
    pub ip: Ipv4Spec,
    pub udp: UdpSpec,
    pub rip: RipSpec,
    pub payload: Vec<u8>,
    pub ip_options: Vec<u8>,
    pub device: Option<String>,
    /// Emit a full Ethernet frame on a device instead of a raw IP datagram.
    pub link_mode: bool,
    /// The user supplied `-r`; a zero domain then stays zero in RIPv2.
    pub domain_set: bool,
}

impl RipInjection {
    /// Fill the fields the user left unset, per the protocol's conventions.
    ///
    /// RIPv2 gets a random routing domain (unless explicitly zero) and a
    /// class-C mask; unset addresses are randomised, the RIPv2 destination
    /// going to the multicast group and the RIPv1 one to a directed
    /// broadcast (random network, host octet 255). A given source MAC with
    /// no device auto-selects one; a known device donates its MAC when none
    /// was given.
    pub fn apply_defaults(&mut self) -> Result<()> {
        let mut rng = rand::thread_rng();

        if self.rip.ver == 2 {
            if self.rip.domain == 0 && !self.domain_set {
                self.rip.domain = rng.gen();
            }
            if self.rip.mask.is_unspecified() {
                self.rip.mask = Ipv4Addr::new(255, 255, 255, 0);
            }
        }

        if self.ip.src.is_unspecified() {
            self.ip.src = Ipv4Addr::from(rng.gen::<u32>());
        }
        if self.ip.dst.is_unspecified() {
            self.ip.dst = match self.rip.ver {
                1 => Ipv4Addr::from(rng.gen::<u32>() | 0xff),
                2 => RIP2_MCAST,
                _ => Ipv4Addr::from(rng.gen::<u32>()),
            };
            debug!(dst = %self.ip.dst, "defaulted IP destination");
        }
        if self.rip.addr.is_unspecified() {
            self.rip.addr = Ipv4Addr::from(rng.gen::<u32>());
        }

        if self.ether.src != [0u8; 6] && !self.link_mode && self.device.is_none() {
            let iface = device::auto_select()?;
            info!(device = %iface.name, "automatically selected device");
            self.device = Some(iface.name);
            self.link_mode = true;
        }

        if self.link_mode {
            let name = self
                .device
                .clone()
                .ok_or_else(|| CraftError::Device("link mode requires a device name".into()))?;
            if self.ether.src == [0u8; 6] {
                self.ether.src = device::mac_of(&name)?;
            }
        }

        Ok(())
    }

    /// Lay the frame out and checksum it. Pure: no sockets, no devices.
    ///
    /// IP options are spliced in after the L4 layout; an options blob whose
    /// length is not a 4-byte multiple (or exceeds 40 bytes) is discarded
    /// with a warning and the frame goes out without it. The UDP checksum
    /// covers the UDP header plus payload plus options length, seeded with
    /// the IPv4 pseudo-header; the IP checksum is only computed in link
    /// mode — the raw sink's kernel fills it otherwise.
    pub fn build(&self) -> Vec<u8> {
        let link_offset = if self.link_mode { ETH_HEADER_SIZE } else { 0 };
        let core_len =
            link_offset + IP_HEADER_SIZE + UDP_HEADER_SIZE + RIP_HEADER_SIZE + self.payload.len();

        let mut pkt = Vec::with_capacity(core_len + self.ip_options.len());

        if self.link_mode {
            pkt.extend_from_slice(&self.ether.dst);
            pkt.extend_from_slice(&self.ether.src);
            pkt.extend_from_slice(&self.ether.ethertype.to_be_bytes());
        }

        // L3: total length counts everything past the link header.
        pkt.push(0x45);
        pkt.push(self.ip.tos);
        pkt.extend_from_slice(&((core_len - link_offset) as u16).to_be_bytes());
        pkt.extend_from_slice(&self.ip.id.to_be_bytes());
        pkt.extend_from_slice(&self.ip.frag.to_be_bytes());
        pkt.push(self.ip.ttl);
        pkt.push(self.ip.proto);
        pkt.extend_from_slice(&[0, 0]);
        pkt.extend_from_slice(&self.ip.src.octets());
        pkt.extend_from_slice(&self.ip.dst.octets());

        // L4: length covers the UDP header and everything it carries.
        let udp_len = (UDP_HEADER_SIZE + RIP_HEADER_SIZE + self.payload.len()) as u16;
        pkt.extend_from_slice(&self.udp.sport.to_be_bytes());
        pkt.extend_from_slice(&self.udp.dport.to_be_bytes());
        pkt.extend_from_slice(&udp_len.to_be_bytes());
        pkt.extend_from_slice(&[0, 0]);

        // RIP command block and one route entry.
        pkt.push(self.rip.cmd);
        pkt.push(self.rip.ver);
        pkt.extend_from_slice(&self.rip.domain.to_be_bytes());
        pkt.extend_from_slice(&self.rip.af.to_be_bytes());
        pkt.extend_from_slice(&self.rip.tag.to_be_bytes());
        pkt.extend_from_slice(&self.rip.addr.octets());
        pkt.extend_from_slice(&self.rip.mask.octets());
        pkt.extend_from_slice(&self.rip.next_hop.octets());
        pkt.extend_from_slice(&self.rip.metric.to_be_bytes());

        pkt.extend_from_slice(&self.payload);

        let opt_len = if insert_ip_options(&mut pkt, link_offset, &self.ip_options) {
            self.ip_options.len()
        } else {
            0
        };

        if self.link_mode {
            let ip_end = link_offset + IP_HEADER_SIZE + opt_len;
            let ck = checksum::inet_checksum(0, &pkt[link_offset..ip_end]);
            pkt[link_offset + 10..link_offset + 12].copy_from_slice(&ck.to_be_bytes());
        }

        let udp_start = link_offset + IP_HEADER_SIZE + opt_len;
        let span = UDP_HEADER_SIZE + self.payload.len() + opt_len;
        let end = (udp_start + span).min(pkt.len());
        let seed = checksum::pseudo_sum(self.ip.src, self.ip.dst, self.ip.proto, span as u16);
        let ck = checksum::inet_checksum(seed, &pkt[udp_start..end]);
        pkt[udp_start + 6..udp_start + 8].copy_from_slice(&ck.to_be_bytes());

        pkt
    }
}

/// Splice the options blob in right after the IPv4 header and patch IHL and
/// total length. Returns whether the options made it into the frame.
fn insert_ip_options(pkt: &mut Vec<u8>, link_offset: usize, opts: &[u8]) -> bool {
    if opts.is_empty() {
        return false;
    }
    if opts.len() > MAX_IP_OPTIONS || opts.len() % 4 != 0 {
        warn!(len = opts.len(), "unable to add IP options, discarding them");
        return false;
    }

    let ip_start = link_offset;
    let insert_at = ip_start + IP_HEADER_SIZE;
    pkt.splice(insert_at..insert_at, opts.iter().copied());

    pkt[ip_start] = 0x40 | (5 + opts.len() / 4) as u8;
    let total = u16::from_be_bytes([pkt[ip_start + 2], pkt[ip_start + 3]]) + opts.len() as u16;
    pkt[ip_start + 2..ip_start + 4].copy_from_slice(&total.to_be_bytes());

    true
}
