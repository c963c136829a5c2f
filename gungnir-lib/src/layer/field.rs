/// One named, bit-width-typed slice of a header.
///
/// The schema part (`name`, `bit_width`, `bit_offset`) comes from the header
/// layout pass; `def` and `val` are owned right-aligned buffers of exactly
/// `ceil(bit_width/8)` bytes. Emission picks `val` over `def` and skips the
/// field when neither is set.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: &'static str,
    pub bit_width: usize,
    /// Position of this field's MSB within the serialised header, in bits.
    /// Derived by the header layout pass, never authored.
    pub bit_offset: usize,
    /// A variable-width field adopts the natural width of each assigned
    /// value; the parent header relayouts after assignment. Only the payload
    /// template uses this.
    pub var_width: bool,
    pub def: Option<Vec<u8>>,
    pub val: Option<Vec<u8>>,
}

impl Field {
    pub fn new(name: &'static str, bit_width: usize) -> Self {
        Self { name, bit_width, bit_offset: 0, var_width: false, def: None, val: None }
    }

    /// Byte width of the value buffers backing this field.
    pub fn byte_width(&self) -> usize {
        self.bit_width.div_ceil(8)
    }

    /// The buffer that emission writes: `val` if assigned, else the default.
    pub fn effective(&self) -> Option<&[u8]> {
        self.val.as_deref().or(self.def.as_deref())
    }
}
