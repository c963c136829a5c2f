use bytes::BytesMut;
use tracing::trace;

use crate::error::{CraftError, Result};
use crate::layer::{FillRule, Header};

/// Hard cap on stacked headers per frame.
pub const STACK_MAX: usize = 16;

/// Frames shorter than this are zero-padded up to it (minimum Ethernet
/// payload).
pub const MIN_FRAME_SIZE: usize = 64;

/// An ordered stack of header instances, outermost first.
///
/// The frame exclusively owns every pushed header, each header its fields,
/// each field its buffers; dropping the frame releases the lot exactly once.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    stack: Vec<Header>,
    buf_size: usize,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deep-clone `template` onto the top of the stack and hand back the
    /// instance for field assignment.
    pub fn push(&mut self, template: &Header) -> Result<&mut Header> {
        if self.stack.len() >= STACK_MAX {
            return Err(CraftError::StackFull);
        }
        let idx = self.stack.len();
        self.stack.push(template.clone());
        Ok(&mut self.stack[idx])
    }

    pub fn headers(&self) -> &[Header] {
        &self.stack
    }

    pub fn header_mut(&mut self, idx: usize) -> Option<&mut Header> {
        self.stack.get_mut(idx)
    }

    pub fn top_mut(&mut self) -> Option<&mut Header> {
        self.stack.last_mut()
    }

    /// Drop every pushed header, with every field buffer inside it, and
    /// forget the derived size.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.buf_size = 0;
    }

    /// Serialised frame size computed by the last [`serialize`] call.
    ///
    /// [`serialize`]: Frame::serialize
    pub fn buf_size(&self) -> usize {
        self.buf_size
    }

    /// Serialise the stack into one contiguous buffer.
    ///
    /// Three passes: a forward pass records each header's byte offset and
    /// sums the frame size (floored at [`MIN_FRAME_SIZE`]); a reverse pass
    /// runs each header's fill rule outer-to-inner, so an outer EtherType
    /// can read the next header's type and an IPv4 length already knows the
    /// size of everything inside it; a final forward pass emits each field
    /// through the bit codec into the zeroed buffer — the zeros are the pad.
    pub fn serialize(&mut self) -> BytesMut {
        let mut frame_size = 0;
        for hdr in &mut self.stack {
            hdr.offset_in_frame = frame_size;
            frame_size += hdr.size;
        }
        let frame_size = frame_size.max(MIN_FRAME_SIZE);
        self.buf_size = frame_size;
        trace!(headers = self.stack.len(), frame_size, "serialising frame");

        for idx in (0..self.stack.len()).rev() {
            self.fill_defaults(idx);
        }

        let mut buf = BytesMut::zeroed(frame_size);
        let mut offset = 0;
        for hdr in &self.stack {
            hdr.write_to(&mut buf[..], offset);
            offset += hdr.size;
        }
        buf
    }

    /// Apply the fill rule of `stack[idx]`, reading the next header where
    /// the rule calls for it. Rules only ever synthesise a `val` for fields
    /// the user left unset.
    fn fill_defaults(&mut self, idx: usize) {
        let next_proto = self.stack.get(idx + 1).map(|h| h.proto);
        let inner_span: usize = self.stack[idx..].iter().map(|h| h.size).sum();

        let hdr = &mut self.stack[idx];
        match hdr.fill {
            FillRule::None => {}
            FillRule::EtherType => {
                fill_unset(hdr, "et", next_proto.map(|p| p.to_be_bytes().to_vec()));
            }
            FillRule::Ipv4 => {
                fill_unset(hdr, "len", Some((inner_span as u16).to_be_bytes().to_vec()));
                let proto = next_proto.filter(|&p| p <= 0xff).map(|p| vec![p as u8]);
                fill_unset(hdr, "proto", proto);
            }
            FillRule::Udp => {
                fill_unset(hdr, "len", Some((inner_span as u16).to_be_bytes().to_vec()));
            }
        }
    }
}

fn fill_unset(hdr: &mut Header, field: &str, value: Option<Vec<u8>>) {
    let Some(value) = value else { return };
    let name = hdr.name;
    if let Some(f) = hdr.field_mut(field) {
        if f.val.is_none() {
            trace!(header = name, field, "fill rule supplied value");
            f.val = Some(value);
        }
    }
}
