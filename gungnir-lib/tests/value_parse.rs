use gungnir_lib::value::{
    format_mac, parse_bytes, parse_bytes_natural, parse_frag_options, IP_FLAG_DF, IP_FLAG_MF,
    IP_FLAG_RESERVED,
};

type TestResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[test]
fn decimal_and_hex_agree() -> TestResult {
    assert_eq!(parse_bytes("4660", 2)?, parse_bytes("0x1234", 2)?);
    assert_eq!(parse_bytes("4660", 2)?, vec![0x12, 0x34]);
    Ok(())
}

#[test]
fn integers_right_align_into_wider_fields() -> TestResult {
    assert_eq!(parse_bytes("17", 1)?, vec![17]);
    assert_eq!(parse_bytes("17", 4)?, vec![0, 0, 0, 17]);
    Ok(())
}

#[test]
fn oversize_integers_truncate_to_the_low_bytes() -> TestResult {
    assert_eq!(parse_bytes("65536", 2)?, vec![0, 0]);
    assert_eq!(parse_bytes("0xaabbcc", 2)?, vec![0xbb, 0xcc]);
    Ok(())
}

#[test]
fn textual_forms_round_trip() -> TestResult {
    // decimal and hex renderings of the same value parse identically
    let v = 0x0800u16;
    assert_eq!(parse_bytes(&v.to_string(), 2)?, v.to_be_bytes().to_vec());
    assert_eq!(parse_bytes(&format!("{v:#x}"), 2)?, v.to_be_bytes().to_vec());

    let mac = [0x00, 0x1b, 0x21, 0x3c, 0x9d, 0xf0];
    assert_eq!(parse_bytes(&format_mac(&mac), 6)?, mac.to_vec());
    Ok(())
}

#[test]
fn colon_octets_must_match_the_field_width() {
    assert!(parse_bytes("aa:bb:cc", 6).is_err());
    assert!(parse_bytes("aa:bb:cc:dd:ee:ff", 6).is_ok());
}

#[test]
fn dotted_quad_needs_a_four_byte_field() -> TestResult {
    assert_eq!(parse_bytes("192.168.0.1", 4)?, vec![192, 168, 0, 1]);
    assert!(parse_bytes("192.168.0.1", 2).is_err());
    Ok(())
}

#[test]
fn garbage_is_rejected() {
    assert!(parse_bytes("fish", 2).is_err());
    assert!(parse_bytes("0x", 2).is_err());
    assert!(parse_bytes("", 2).is_err());
}

#[test]
fn natural_width_follows_the_text() -> TestResult {
    assert_eq!(parse_bytes_natural("0xdeadbeef")?, vec![0xde, 0xad, 0xbe, 0xef]);
    // odd digit counts get a leading zero
    assert_eq!(parse_bytes_natural("0xabc")?, vec![0x0a, 0xbc]);
    assert_eq!(parse_bytes_natural("aa:bb")?, vec![0xaa, 0xbb]);
    assert_eq!(parse_bytes_natural("0")?, vec![0]);
    Ok(())
}

#[test]
fn frag_options_combine_flags_and_offset() -> TestResult {
    assert_eq!(parse_frag_options("D")?, IP_FLAG_DF);
    assert_eq!(parse_frag_options("D,M,R,185")?, IP_FLAG_DF | IP_FLAG_MF | IP_FLAG_RESERVED | 185);
    assert_eq!(parse_frag_options("8191")?, 0x1fff);
    Ok(())
}

#[test]
fn frag_offset_is_bounded() {
    assert!(parse_frag_options("8192").is_err());
    assert!(parse_frag_options("D,x").is_err());
}
