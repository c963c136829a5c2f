//! Textual field values.
//!
//! Accepted forms mirror what the CLI hands over: bare decimal, `0x` hex,
//! colon-separated hex octets (`aa:bb:cc:dd:ee:ff`) and dotted-quad IPv4.
//! Parsed values are right-aligned into the target field's byte width;
//! integers wider than the field are truncated to the low bytes.

use std::net::Ipv4Addr;

use crate::error::{CraftError, Result};

/// IP fragment field flag bits (RFC 791 bit 0 is reserved).
pub const IP_FLAG_RESERVED: u16 = 0x8000;
pub const IP_FLAG_DF: u16 = 0x4000;
pub const IP_FLAG_MF: u16 = 0x2000;

const MAX_FRAG_OFFSET: u16 = 0x1fff;

/// Parse `text` into a right-aligned buffer of exactly `width` bytes.
pub fn parse_bytes(text: &str, width: usize) -> Result<Vec<u8>> {
    if text.contains(':') {
        let octets = parse_colon_hex(text)?;
        if octets.len() != width {
            return Err(CraftError::Value(format!(
                "`{text}` is {} octets, field takes {width}",
                octets.len()
            )));
        }
        return Ok(octets);
    }

    if width == 4 && text.contains('.') {
        let addr: Ipv4Addr = text
            .parse()
            .map_err(|_| CraftError::Value(format!("`{text}` is not a dotted-quad address")))?;
        return Ok(addr.octets().to_vec());
    }

    let v = parse_int(text)?;
    let be = v.to_be_bytes();
    let mut out = vec![0u8; width];
    let n = width.min(be.len());
    out[width - n..].copy_from_slice(&be[be.len() - n..]);
    Ok(out)
}

/// Parse `text` at its natural width, for variable-size fields (payload data).
///
/// Colon form keeps its stated octets; `0x` hex keeps one byte per digit
/// pair (an odd digit count gets a leading zero); decimal shrinks to the
/// minimal big-endian encoding.
pub fn parse_bytes_natural(text: &str) -> Result<Vec<u8>> {
    if text.contains(':') {
        return parse_colon_hex(text);
    }

    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        let padded = if hex.len() % 2 == 0 { hex.to_string() } else { format!("0{hex}") };
        return padded
            .as_bytes()
            .chunks(2)
            .map(|pair| {
                let s = std::str::from_utf8(pair).map_err(|_| bad_int(text))?;
                u8::from_str_radix(s, 16).map_err(|_| bad_int(text))
            })
            .collect();
    }

    let v = parse_int(text)?;
    let be = v.to_be_bytes();
    let first = be.iter().position(|&b| b != 0).unwrap_or(be.len() - 1);
    Ok(be[first..].to_vec())
}

/// Render six octets in the colon-separated form accepted by [`parse_bytes`].
pub fn format_mac(mac: &[u8; 6]) -> String {
    mac.iter().map(|b| format!("{b:02x}")).collect::<Vec<_>>().join(":")
}

/// Parse the `-F` fragmentation syntax `[D],[M],[R],[offset]` into the
/// 16-bit flags-plus-offset field.
pub fn parse_frag_options(text: &str) -> Result<u16> {
    let mut frag = 0u16;

    for token in text.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match token {
            "D" | "d" => frag |= IP_FLAG_DF,
            "M" | "m" => frag |= IP_FLAG_MF,
            "R" | "r" => frag |= IP_FLAG_RESERVED,
            _ => {
                let offset: u16 = token.parse().map_err(|_| {
                    CraftError::Value(format!("`{token}` is not a fragment option or offset"))
                })?;
                if offset > MAX_FRAG_OFFSET {
                    return Err(CraftError::Value(format!(
                        "fragment offset {offset} exceeds {MAX_FRAG_OFFSET}"
                    )));
                }
                frag |= offset;
            }
        }
    }

    Ok(frag)
}

fn parse_int(text: &str) -> Result<u128> {
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u128::from_str_radix(hex, 16).map_err(|_| bad_int(text))
    } else {
        text.parse().map_err(|_| bad_int(text))
    }
}

fn parse_colon_hex(text: &str) -> Result<Vec<u8>> {
    text.split(':')
        .map(|part| u8::from_str_radix(part, 16).map_err(|_| bad_int(text)))
        .collect()
}

fn bad_int(text: &str) -> CraftError {
    CraftError::Value(format!("`{text}` is not a parseable value"))
}
