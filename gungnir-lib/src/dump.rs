//! Frame dumps for the verbose modes.

use std::fmt::Write;

/// Offset, sixteen hex columns and an ASCII gutter per row.
pub fn hex_ascii(data: &[u8]) -> String {
    let mut out = String::new();
    for (row, chunk) in data.chunks(16).enumerate() {
        let _ = write!(out, "{:08x}: ", row * 16);
        for b in chunk {
            let _ = write!(out, "{b:02x} ");
        }
        for _ in chunk.len()..16 {
            out.push_str("   ");
        }
        out.push(' ');
        for &b in chunk {
            out.push(if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' });
        }
        out.push('\n');
    }
    out
}

/// Bare hex pairs, sixteen per row.
pub fn hex_raw(data: &[u8]) -> String {
    let mut out = String::new();
    for chunk in data.chunks(16) {
        let row: Vec<String> = chunk.iter().map(|b| format!("{b:02x}")).collect();
        out.push_str(&row.join(" "));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_gutter_masks_unprintable() {
        let dump = hex_ascii(&[0x41, 0x00, 0x42]);
        assert!(dump.starts_with("00000000: 41 00 42"));
        assert!(dump.trim_end().ends_with("A.B"));
    }

    #[test]
    fn raw_rows_are_sixteen_wide() {
        let dump = hex_raw(&[0u8; 17]);
        let rows: Vec<&str> = dump.lines().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].split(' ').count(), 16);
        assert_eq!(rows[1], "00");
    }
}
