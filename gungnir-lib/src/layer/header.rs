use tracing::debug;

use crate::bits;
use crate::error::{CraftError, Result};
use crate::layer::Field;
use crate::value;

/// Cross-layer default rule a header contributes during the reverse fill
/// pass of frame serialisation.
///
/// A closed enum instead of a per-header callback keeps the dispatch
/// explicit and the frame borrowable while a rule peeks at its neighbour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillRule {
    /// No cross-layer defaults.
    None,
    /// Fill `et` from the next header's numeric type (Ethernet, VLAN).
    EtherType,
    /// Fill `len` with the byte span from this header inward, and `proto`
    /// from the next header's numeric type when it fits in one byte.
    Ipv4,
    /// Fill `len` with the byte span from this header inward.
    Udp,
}

/// A protocol layer: an ordered list of bit-aligned named fields.
///
/// Lives two lives — as a read-only template in the [`Registry`] and as an
/// instance deep-cloned onto a [`Frame`]. `Clone` copies every field buffer,
/// so mutating a template after a push never affects pushed instances.
///
/// [`Registry`]: crate::layer::Registry
/// [`Frame`]: crate::layer::Frame
#[derive(Debug, Clone)]
pub struct Header {
    pub name: &'static str,
    /// Numeric protocol type consumed by the *outer* layer's fill rule
    /// (e.g. 0x0800 makes an outer Ethernet header fill `et` with IPv4).
    pub proto: u16,
    fields: Vec<Field>,
    /// Serialised size in bytes, derived from the field widths.
    pub size: usize,
    /// Byte offset within the frame, set by the assembler's first pass.
    pub offset_in_frame: usize,
    pub fill: FillRule,
}

impl Header {
    /// Build a header from an authored `(name, bit_width)` layout.
    pub fn new(name: &'static str, proto: u16, layout: &[(&'static str, usize)]) -> Self {
        let fields = layout.iter().map(|&(n, w)| Field::new(n, w)).collect();
        let mut hdr =
            Self { name, proto, fields, size: 0, offset_in_frame: 0, fill: FillRule::None };
        hdr.relayout();
        hdr
    }

    pub fn with_fill(mut self, fill: FillRule) -> Self {
        self.fill = fill;
        self
    }

    /// Attach a binary default during template construction. The value must
    /// match the field's byte width; both are template-author invariants.
    pub fn with_default(mut self, field: &'static str, def: &[u8]) -> Self {
        let width = {
            let f = self.field(field);
            assert!(f.is_some(), "template `{}` has no field `{field}`", self.name);
            f.map(Field::byte_width).unwrap_or_default()
        };
        assert_eq!(width, def.len(), "default for `{field}` must be {width} bytes");
        if let Some(f) = self.field_mut(field) {
            f.def = Some(def.to_vec());
        }
        self
    }

    /// Recompute `bit_offset` for every field and the header byte size.
    /// Runs at construction and again whenever a variable-width field
    /// changes width.
    fn relayout(&mut self) {
        let mut offset = 0;
        for f in &mut self.fields {
            f.bit_offset = offset;
            offset += f.bit_width;
        }
        self.size = offset.div_ceil(8);
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    /// Parse a textual default into a field's `def` buffer.
    pub fn set_default(&mut self, field: &str, text: &str) -> Result<()> {
        let width = self.width_of(field)?;
        let parsed = value::parse_bytes(text, width)?;
        if let Some(f) = self.field_mut(field) {
            f.def = Some(parsed);
        }
        Ok(())
    }

    /// Parse a textual value into a field's `val` buffer, dropping any
    /// previous value. A variable-width field adopts the value's natural
    /// width and the header relayouts.
    pub fn set_value(&mut self, field: &str, text: &str) -> Result<()> {
        let idx = self
            .fields
            .iter()
            .position(|f| f.name == field)
            .ok_or_else(|| CraftError::UnknownField {
                header: self.name.to_string(),
                field: field.to_string(),
            })?;

        let var = self.fields[idx].var_width;
        let parsed = if var {
            value::parse_bytes_natural(text)?
        } else {
            value::parse_bytes(text, self.fields[idx].byte_width())?
        };

        debug!(header = self.name, field, bytes = parsed.len(), "assigned field value");

        let f = &mut self.fields[idx];
        if var {
            f.bit_width = 8 * parsed.len();
        }
        f.val = Some(parsed);
        if var {
            self.relayout();
        }
        Ok(())
    }

    /// Walk `tokens` as `(field, value)` pairs, assigning each named field.
    ///
    /// Stops at the first token that names no field of this header and
    /// returns its index, so a caller interleaving headers and field tokens
    /// can resume there. A name with no value token is an error.
    pub fn parse_fields(&mut self, tokens: &[&str]) -> Result<usize> {
        let mut i = 0;
        while i < tokens.len() {
            let name = tokens[i];
            if self.field(name).is_none() {
                return Ok(i);
            }
            let Some(&text) = tokens.get(i + 1) else {
                return Err(CraftError::Value(format!(
                    "field `{name}` of `{}` is missing its value token",
                    self.name
                )));
            };
            self.set_value(name, text)?;
            i += 2;
        }
        Ok(i)
    }

    /// Emit every set field into `out` at this header's byte offset.
    pub fn write_to(&self, out: &mut [u8], byte_offset: usize) {
        for f in &self.fields {
            if let Some(v) = f.effective() {
                bits::write_field(out, byte_offset, f, v);
            }
        }
    }

    fn width_of(&self, field: &str) -> Result<usize> {
        self.field(field).map(Field::byte_width).ok_or_else(|| CraftError::UnknownField {
            header: self.name.to_string(),
            field: field.to_string(),
        })
    }

    /// Mark the single field of a payload-style header as variable-width.
    pub fn with_var_width(mut self, field: &'static str) -> Self {
        if let Some(f) = self.field_mut(field) {
            f.var_width = true;
        }
        self
    }
}
