use crate::layer::{FillRule, Header};
use crate::proto::IPPROTO_UDP;

/// UDP header, 8 bytes. `len` is derived by the fill rule when unset.
pub fn template() -> Header {
    Header::new("udp", IPPROTO_UDP, &[("sport", 16), ("dport", 16), ("len", 16), ("chksum", 16)])
        .with_fill(FillRule::Udp)
}
