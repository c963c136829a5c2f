use crate::layer::Header;
use crate::proto::ETHERTYPE_ARP;

/// ARP over Ethernet/IPv4, 28 bytes, defaulting to a request.
pub fn template() -> Header {
    Header::new(
        "arp",
        ETHERTYPE_ARP,
        &[
            ("htype", 16),
            ("ptype", 16),
            ("hlen", 8),
            ("plen", 8),
            ("oper", 16),
            ("sha", 48),
            ("spa", 32),
            ("tha", 48),
            ("tpa", 32),
        ],
    )
    .with_default("htype", &[0, 1])
    .with_default("ptype", &[0x08, 0x00])
    .with_default("hlen", &[6])
    .with_default("plen", &[4])
    .with_default("oper", &[0, 1])
}
