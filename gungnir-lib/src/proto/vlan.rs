use crate::layer::{FillRule, Header};
use crate::proto::ETHERTYPE_VLAN;

/// 802.1Q tag: PCP / DEI / VID packed into 16 bits, then the inner
/// EtherType, filled the same way Ethernet's is.
pub fn template() -> Header {
    Header::new("vlan", ETHERTYPE_VLAN, &[("pcp", 3), ("dei", 1), ("vid", 12), ("et", 16)])
        .with_default("pcp", &[0])
        .with_default("vid", &[0, 0])
        .with_fill(FillRule::EtherType)
}
