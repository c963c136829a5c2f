use crate::layer::{FillRule, Header};
use crate::proto::ETHERTYPE_IPV4;

/// IPv4 header, 20 bytes without options.
///
/// `len` and `proto` are derived by the fill rule when unset; `chksum`
/// stays zero unless assigned — the generic assembler does not checksum,
/// that is the caller's business via the checksum engine.
pub fn template() -> Header {
    Header::new(
        "ipv4",
        ETHERTYPE_IPV4,
        &[
            ("ver", 4),
            ("ihl", 4),
            ("tos", 8),
            ("len", 16),
            ("id", 16),
            ("flags", 3),
            ("foff", 13),
            ("ttl", 8),
            ("proto", 8),
            ("chksum", 16),
            ("sip", 32),
            ("dip", 32),
        ],
    )
    .with_default("ver", &[4])
    .with_default("ihl", &[5])
    .with_default("ttl", &[64])
    .with_fill(FillRule::Ipv4)
}
