//! LZW coding, including interop with an independent implementation.

use pdfsieve_core::lzw::{self, CLEAR_TABLE, END_OF_DATA};
use pdfsieve_core::{Diagnostics, FilterError, LzwParams, Warning};
use weezl::BitOrder;

/// Deterministic pseudo-random text drawn from a small alphabet.
fn lcg_text(seed: u64, len: usize, alphabet: &[u8]) -> Vec<u8> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            alphabet[((state >> 33) as usize) % alphabet.len()]
        })
        .collect()
}

fn params(early_change: bool) -> LzwParams {
    LzwParams {
        early_change,
        ..LzwParams::default()
    }
}

#[test]
fn test_lzwdecode() {
    let input = b"\x80\x0b\x60\x50\x22\x0c\x0c\x85\x01";
    let expected = b"\x2d\x2d\x2d\x2d\x2d\x41\x2d\x2d\x2d\x42";
    assert_eq!(lzw::decode(input, &LzwParams::default()).unwrap(), expected);
}

#[test]
fn test_encode_empty_is_clear_then_end() {
    let encoded = lzw::encode(b"", true);
    assert_eq!(
        lzw::read_codes(&encoded, true).unwrap(),
        vec![CLEAR_TABLE, END_OF_DATA]
    );
    assert_eq!(lzw::decode(&encoded, &params(true)).unwrap(), b"");
}

#[test]
fn test_repeated_bytes_need_fewer_codes() {
    let encoded = lzw::encode(b"AAAAAA", true);
    let codes = lzw::read_codes(&encoded, true).unwrap();
    let data_codes = codes
        .iter()
        .filter(|&&c| c != CLEAR_TABLE && c != END_OF_DATA)
        .count();
    assert!(data_codes < 6);
    assert_eq!(lzw::decode(&encoded, &params(true)).unwrap(), b"AAAAAA");
}

#[test]
fn test_round_trip_both_width_modes() {
    for early_change in [true, false] {
        for (seed, len, alphabet) in [
            (1, 1, &b"x"[..]),
            (2, 700, b"ab"),
            (3, 5_000, b"abcdefgh"),
            (4, 60_000, b"the quick brown fox jumps over a lazy dog"),
        ] {
            let data = lcg_text(seed, len, alphabet);
            let encoded = lzw::encode(&data, early_change);
            let decoded = lzw::decode(&encoded, &params(early_change)).unwrap();
            assert_eq!(decoded, data, "seed {seed} early_change {early_change}");
        }
    }
}

#[test]
fn test_round_trip_all_byte_values() {
    let data: Vec<u8> = (0..20_000u32).map(|i| (i * 7 + i / 255) as u8).collect();
    let encoded = lzw::encode(&data, true);
    assert_eq!(lzw::decode(&encoded, &params(true)).unwrap(), data);
}

#[test]
fn test_long_input_resets_table() {
    let data = lcg_text(9, 60_000, b"0123456789abcdef");
    let codes = lzw::read_codes(&lzw::encode(&data, true), true).unwrap();
    let clears = codes.iter().filter(|&&c| c == CLEAR_TABLE).count();
    assert!(clears > 1, "expected table resets, got {clears} clear codes");
}

#[test]
fn test_decodes_reference_encoder_output() {
    let data = lcg_text(5, 3_000, b"abcdefghij");
    let pdf_style = weezl::encode::Encoder::with_tiff_size_switch(BitOrder::Msb, 8)
        .encode(&data)
        .unwrap();
    assert_eq!(lzw::decode(&pdf_style, &params(true)).unwrap(), data);

    let late_switch = weezl::encode::Encoder::new(BitOrder::Msb, 8)
        .encode(&data)
        .unwrap();
    assert_eq!(lzw::decode(&late_switch, &params(false)).unwrap(), data);
}

#[test]
fn test_reference_decoder_reads_our_output() {
    let data = lcg_text(6, 3_000, b"abcdefghij");
    let encoded = lzw::encode(&data, true);
    let decoded = weezl::decode::Decoder::with_tiff_size_switch(BitOrder::Msb, 8)
        .decode(&encoded)
        .unwrap();
    assert_eq!(decoded, data);
}

#[test]
fn test_missing_stop_code() {
    let mut encoded = lzw::encode(b"hello hello hello", true);
    // drop the end-of-data code and its padding
    encoded.truncate(encoded.len() - 2);
    assert!(matches!(
        lzw::decode(&encoded, &params(true)),
        Err(FilterError::MissingStopCode)
    ));
    assert!(matches!(
        lzw::decode(&[], &params(true)),
        Err(FilterError::MissingStopCode)
    ));
}

#[test]
fn test_code_beyond_table_is_invalid() {
    // clear (256), then 300 as the first code: 100000000 100101100
    let data = [0x80, 0x4B, 0x00];
    assert!(matches!(
        lzw::decode(&data, &params(true)),
        Err(FilterError::InvalidLzwCode { code: 300, .. })
    ));
}

#[test]
fn test_no_overflow_warning_for_well_formed_stream() {
    let data = lcg_text(7, 60_000, b"abcdefghijklmnop");
    let encoded = lzw::encode(&data, true);
    let mut diag = Diagnostics::new();
    let decoded = lzw::decode_with_diagnostics(&encoded, &params(true), &mut diag).unwrap();
    assert_eq!(decoded, data);
    assert!(!diag.warnings().iter().any(|w| matches!(w, Warning::LzwTableOverflow { .. })));
}

/// Pack `(value, width)` fields MSB first, zero padding the last byte.
fn pack_msb(fields: &[(u32, u32)]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut acc: u64 = 0;
    let mut nbits = 0;
    for &(value, width) in fields {
        acc = (acc << width) | u64::from(value);
        nbits += width;
        while nbits >= 8 {
            nbits -= 8;
            out.push((acc >> nbits) as u8);
        }
        acc &= (1 << nbits) - 1;
    }
    if nbits > 0 {
        out.push((acc << (8 - nbits)) as u8);
    }
    out
}

/// A stream that never clears its table: one clear code, `count` copies of
/// the literal `byte`, then end-of-data, each at the width a reader expects.
fn unbounded_stream(byte: u8, count: usize, early_change: bool) -> Vec<u8> {
    let width = |table_len: usize| {
        let n = table_len + usize::from(early_change);
        match n {
            0..512 => 9,
            512..1024 => 10,
            1024..2048 => 11,
            _ => 12,
        }
    };
    let mut table_len = 258;
    let mut fields = vec![(u32::from(CLEAR_TABLE), width(table_len))];
    for i in 0..count {
        fields.push((u32::from(byte), width(table_len)));
        if i > 0 && table_len < 4096 {
            table_len += 1;
        }
    }
    fields.push((u32::from(END_OF_DATA), width(table_len)));
    pack_msb(&fields)
}

#[test]
fn test_table_overflow_is_a_warning() {
    for early_change in [true, false] {
        let stream = unbounded_stream(b'a', 5_000, early_change);
        let mut diag = Diagnostics::new();
        let decoded =
            lzw::decode_with_diagnostics(&stream, &params(early_change), &mut diag).unwrap();
        assert_eq!(decoded, vec![b'a'; 5_000]);
        // 4999 insertions against 4096 - 258 free slots
        assert_eq!(
            diag.warnings(),
            &[Warning::LzwTableOverflow { ignored: 1_161 }]
        );
    }
}

#[test]
fn test_predictor_applies_after_lzw() {
    let filtered = [2u8, 1, 1, 1, 2, 1, 1, 1];
    let encoded = lzw::encode(&filtered, true);
    let params = LzwParams {
        predictor: pdfsieve_core::PredictorParams::png(3, 1, 8),
        early_change: true,
    };
    // Up filter on both rows: the first row adds to an implicit zero row
    assert_eq!(lzw::decode(&encoded, &params).unwrap(), vec![1, 1, 1, 2, 2, 2]);
}
