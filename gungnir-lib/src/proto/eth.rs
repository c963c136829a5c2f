use crate::layer::{FillRule, Header};

/// Ethernet II, 14 bytes. `et` is left unset so the fill rule can derive it
/// from the next layer; destination defaults to broadcast.
pub fn template() -> Header {
    Header::new("eth", 0, &[("dmac", 48), ("smac", 48), ("et", 16)])
        .with_default("dmac", &[0xff; 6])
        .with_default("smac", &[0x00; 6])
        .with_fill(FillRule::EtherType)
}
