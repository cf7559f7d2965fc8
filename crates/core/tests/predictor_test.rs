//! Predictor un-filtering checked against forward-filtered fixtures.

use pdfsieve_core::predictor::{self, apply_png_predictor, apply_tiff_predictor, paeth_predictor};
use pdfsieve_core::{FilterError, PredictorParams};

fn lcg_bytes(seed: u64, len: usize) -> Vec<u8> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (state >> 56) as u8
        })
        .collect()
}

/// PNG forward filter for one row, the inverse of the decoder under test.
fn png_filter_row(tag: u8, row: &[u8], prev: &[u8], bpp: usize) -> Vec<u8> {
    let mut out = vec![tag];
    for i in 0..row.len() {
        let left = if i >= bpp { row[i - bpp] } else { 0 };
        let above = prev[i];
        let upper_left = if i >= bpp { prev[i - bpp] } else { 0 };
        let predicted = match tag {
            0 => 0,
            1 => left,
            2 => above,
            3 => ((u16::from(left) + u16::from(above)) / 2) as u8,
            4 => paeth_predictor(left, above, upper_left),
            _ => unreachable!(),
        };
        out.push(row[i].wrapping_sub(predicted));
    }
    out
}

fn png_filter_image(image: &[u8], row_len: usize, bpp: usize, tags: &[u8]) -> Vec<u8> {
    let mut prev = vec![0u8; row_len];
    let mut out = Vec::new();
    for (i, row) in image.chunks(row_len).enumerate() {
        out.extend(png_filter_row(tags[i % tags.len()], row, &prev, bpp));
        prev.copy_from_slice(row);
    }
    out
}

#[test]
fn test_each_png_tag_round_trips_gray() {
    let image = lcg_bytes(11, 16 * 12);
    for tag in 0..=4 {
        let filtered = png_filter_image(&image, 16, 1, &[tag]);
        assert_eq!(
            apply_png_predictor(&filtered, 16, 1, 8).unwrap(),
            image,
            "tag {tag}"
        );
    }
}

#[test]
fn test_each_png_tag_round_trips_rgb() {
    let image = lcg_bytes(12, 5 * 3 * 9);
    for tag in 0..=4 {
        let filtered = png_filter_image(&image, 15, 3, &[tag]);
        assert_eq!(
            apply_png_predictor(&filtered, 5, 3, 8).unwrap(),
            image,
            "tag {tag}"
        );
    }
}

#[test]
fn test_mixed_tags_per_row() {
    let image = lcg_bytes(13, 8 * 4 * 10);
    let filtered = png_filter_image(&image, 32, 4, &[4, 0, 3, 1, 2]);
    let params = PredictorParams {
        predictor: 15,
        colors: 4,
        bits_per_component: 8,
        columns: 8,
    };
    assert_eq!(predictor::unfilter(&filtered, &params).unwrap(), image);
}

#[test]
fn test_sixteen_bit_png_uses_two_byte_pixels() {
    let image = lcg_bytes(14, 6 * 2 * 5);
    let filtered = png_filter_image(&image, 12, 2, &[1, 4]);
    assert_eq!(apply_png_predictor(&filtered, 6, 1, 16).unwrap(), image);
}

#[test]
fn test_png_value_of_predictor_is_only_a_hint() {
    let image = lcg_bytes(15, 24);
    let filtered = png_filter_image(&image, 8, 1, &[2]);
    for predictor in 10..=15 {
        let params = PredictorParams {
            predictor,
            ..PredictorParams::png(8, 1, 8)
        };
        assert_eq!(predictor::unfilter(&filtered, &params).unwrap(), image);
    }
}

#[test]
fn test_tiff_rgb_round_trip() {
    let image = lcg_bytes(16, 4 * 3 * 6);
    // forward: difference from the same component of the pixel to the left
    let mut filtered = image.clone();
    for row in filtered.chunks_mut(12) {
        for i in (3..12).rev() {
            row[i] = row[i].wrapping_sub(row[i - 3]);
        }
    }
    assert_eq!(apply_tiff_predictor(&filtered, 4, 3, 8).unwrap(), image);
}

#[test]
fn test_tiff_4bit_samples() {
    // one row of four 4-bit samples: deltas 3, 2, 15, 1 -> 3, 5, 4, 5
    let out = apply_tiff_predictor(&[0x32, 0xF1], 4, 1, 4).unwrap();
    assert_eq!(out, vec![0x35, 0x45]);
}

#[test]
fn test_tiff_rejects_odd_depth() {
    assert!(matches!(
        apply_tiff_predictor(&[1, 2, 3], 3, 1, 3),
        Err(FilterError::InvalidParameter { key: "BitsPerComponent", .. })
    ));
}

#[test]
fn test_identity_and_unknown_predictors() {
    let data = lcg_bytes(17, 10);
    assert_eq!(
        predictor::unfilter(&data, &PredictorParams::default()).unwrap(),
        data
    );
    for bad in [0, 3, 9, 16] {
        let params = PredictorParams {
            predictor: bad,
            ..PredictorParams::default()
        };
        assert!(matches!(
            predictor::unfilter(&data, &params),
            Err(FilterError::UnsupportedPredictor(p)) if p == bad
        ));
    }
}
