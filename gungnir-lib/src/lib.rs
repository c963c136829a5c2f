#![forbid(unsafe_code)]

//! Composable packet crafting: stack protocol headers, assign named fields,
//! emit byte-exact frames, and inject them on a link or raw socket.

pub mod bits;
pub mod blob;
pub mod checksum;
pub mod dump;
pub mod error;
pub mod inject;
pub mod layer;
pub mod proto;
pub mod value;

pub use error::{CraftError, Result};
pub use inject::{EtherSpec, InjectionSink, Ipv4Spec, RipInjection, RipSpec, UdpSpec};
pub use layer::{Field, FillRule, Frame, Header, Registry};
