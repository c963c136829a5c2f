use ahash::AHashMap;

use crate::layer::Header;
use crate::proto;

/// Table of protocol header templates, keyed by short symbolic name.
///
/// Built once, before any frame is assembled, and immutable afterwards —
/// the explicit-construction replacement for the constructor-populated
/// global table this design descends from.
#[derive(Debug, Default)]
pub struct Registry {
    map: AHashMap<&'static str, Header>,
}

impl Registry {
    /// An empty registry, for callers bringing their own templates.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in protocol set: `eth`, `vlan`, `arp`, `ipv4`, `udp`,
    /// `payload`.
    pub fn with_builtin() -> Self {
        let mut reg = Self::new();
        reg.register(proto::eth::template());
        reg.register(proto::vlan::template());
        reg.register(proto::arp::template());
        reg.register(proto::ipv4::template());
        reg.register(proto::udp::template());
        reg.register(proto::payload::template());
        reg
    }

    /// Insert a template under its own name, replacing any previous one.
    pub fn register(&mut self, template: Header) {
        self.map.insert(template.name, template);
    }

    /// Exact-name lookup.
    pub fn get(&self, name: &str) -> Option<&Header> {
        self.map.get(name)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
