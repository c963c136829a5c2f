use crate::layer::Header;

/// Opaque payload bytes as an innermost pseudo-header.
///
/// The single `data` field is variable-width: it adopts the natural size of
/// whatever value is assigned, and the header size follows.
pub fn template() -> Header {
    Header::new("payload", 0, &[("data", 0)]).with_var_width("data")
}
