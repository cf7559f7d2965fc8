//! ASCII85 and ASCIIHex armor.

use pdfsieve_core::FilterError;
use pdfsieve_core::ascii85::{ascii85decode, ascii85encode, asciihexdecode, asciihexencode};

// === ASCII85 decode ===

#[test]
fn test_ascii85decode_with_eod() {
    assert_eq!(ascii85decode(b"E,9)oF*2M7/c~>").unwrap(), b"pleasure.");
}

#[test]
fn test_ascii85decode_wikipedia() {
    assert_eq!(
        ascii85decode(b"9jqo^BlbD-BleB1DJ+*+F(f,q~>").unwrap(),
        b"Man is distinguished"
    );
}

#[test]
fn test_ascii85decode_z_encoding() {
    assert_eq!(
        ascii85decode(b"zE,9)oF*2M7/c~>").unwrap(),
        b"\0\0\0\0pleasure."
    );
}

#[test]
fn test_ascii85decode_z_matches_bangs() {
    assert_eq!(
        ascii85decode(b"z~>").unwrap(),
        ascii85decode(b"!!!!!~>").unwrap()
    );
}

#[test]
fn test_ascii85decode_with_prefix_and_newline() {
    assert_eq!(ascii85decode(b"<~E,9)oF*2M7/c~\n>").unwrap(), b"pleasure.");
}

#[test]
fn test_ascii85decode_various() {
    assert_eq!(
        ascii85decode(b"<^BVT:K:=9<E)pd;BS_1:/aSV;ag~>").unwrap(),
        b"VARIOUS UTTER NONSENSE"
    );
    assert_eq!(
        ascii85decode(b"<~<^BVT:K:=9<E)pd;BS_1:/aSV;ag~>").unwrap(),
        b"VARIOUS UTTER NONSENSE"
    );
}

#[test]
fn test_ascii85decode_whitespace_inside_groups() {
    assert_eq!(
        ascii85decode(b"  E,9)o\r\nF*2M\t7/c ~>").unwrap(),
        b"pleasure."
    );
}

#[test]
fn test_ascii85decode_ignores_trailing_bytes() {
    assert_eq!(ascii85decode(b"E,9)oF*2M7/c~>endstream").unwrap(), b"pleasure.");
}

#[test]
fn test_ascii85decode_no_eod_is_error() {
    assert!(matches!(
        ascii85decode(b"E,9)oF*2M7/c"),
        Err(FilterError::UnterminatedStream(_))
    ));
    assert!(matches!(
        ascii85decode(b"E,9)oF*2M7/c~"),
        Err(FilterError::UnterminatedStream(_))
    ));
}

#[test]
fn test_ascii85decode_bad_terminator() {
    assert!(matches!(
        ascii85decode(b"E,9)o~x"),
        Err(FilterError::InvalidCharacter { byte: b'x', offset: 6, .. })
    ));
}

#[test]
fn test_ascii85decode_rejects_out_of_range_byte() {
    assert!(matches!(
        ascii85decode(b"E,9{oF~>"),
        Err(FilterError::InvalidCharacter { byte: b'{', offset: 3, .. })
    ));
}

#[test]
fn test_ascii85decode_z_inside_group_is_error() {
    assert!(matches!(
        ascii85decode(b"E,z~>"),
        Err(FilterError::InvalidCharacter { byte: b'z', .. })
    ));
}

#[test]
fn test_ascii85decode_single_char_tail_is_truncated() {
    assert!(matches!(
        ascii85decode(b"E,9)oF~>"),
        Err(FilterError::TruncatedInput(_))
    ));
}

// === ASCII85 encode ===

#[test]
fn test_ascii85encode_known_vectors() {
    assert_eq!(ascii85encode(b"Man is distinguished", None), b"9jqo^BlbD-BleB1DJ+*+F(f,q~>");
    assert_eq!(ascii85encode(b"Hello World!", None), b"87cURD]i,\"Ebo80~>");
    assert_eq!(ascii85encode(b"\0\0\0\0abc", None), b"z@:E^~>");
}

#[test]
fn test_ascii85encode_empty() {
    assert_eq!(ascii85encode(b"", None), b"~>");
    assert_eq!(ascii85decode(b"~>").unwrap(), b"");
}

#[test]
fn test_ascii85_round_trip_all_tail_lengths() {
    let data: Vec<u8> = (0u8..=255).rev().chain([0, 0, 0, 0, 0, 0, 0, 0]).collect();
    for len in 0..data.len() {
        let encoded = ascii85encode(&data[..len], Some(64));
        assert_eq!(ascii85decode(&encoded).unwrap(), &data[..len], "len {len}");
    }
}

#[test]
fn test_ascii85encode_line_width() {
    let encoded = ascii85encode(&[0xAB; 40], Some(20));
    let text = String::from_utf8(encoded).unwrap();
    assert!(text.lines().all(|l| l.len() <= 22));
    assert_eq!(text.lines().count(), 3);
}

// === ASCIIHex ===

#[test]
fn test_asciihexdecode_whitespace() {
    assert_eq!(asciihexdecode(b"61 62 2e6364   65>").unwrap(), b"ab.cde");
}

#[test]
fn test_asciihexdecode_odd_with_eod() {
    assert_eq!(asciihexdecode(b"61 62 2e6364   657>").unwrap(), b"ab.cdep");
}

#[test]
fn test_asciihexdecode_single_odd() {
    assert_eq!(asciihexdecode(b"7>").unwrap(), b"p");
}

#[test]
fn test_asciihexdecode_empty() {
    assert_eq!(asciihexdecode(b">").unwrap(), b"");
}

#[test]
fn test_asciihexdecode_mixed_case() {
    assert_eq!(asciihexdecode(b"<48656C6c6f>").unwrap(), b"Hello");
}

#[test]
fn test_asciihexdecode_no_eod_is_error() {
    assert!(matches!(
        asciihexdecode(b"61 62 2e6364   65"),
        Err(FilterError::UnterminatedStream(_))
    ));
}

#[test]
fn test_asciihexdecode_invalid_character() {
    assert!(matches!(
        asciihexdecode(b"6g>"),
        Err(FilterError::InvalidCharacter { byte: b'g', offset: 1, .. })
    ));
}

#[test]
fn test_asciihexencode() {
    assert_eq!(asciihexencode(b"\x00\xffab", None), b"00FF6162>");
    assert_eq!(asciihexencode(b"", None), b">");
    assert_eq!(asciihexencode(b"abc", Some(4)), b"6162\n63>");
}

#[test]
fn test_asciihex_round_trip() {
    let data: Vec<u8> = (0u8..=255).collect();
    assert_eq!(asciihexdecode(&asciihexencode(&data, Some(80))).unwrap(), data);
}
