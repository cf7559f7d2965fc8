//! Predictor un-filter applied after Flate and LZW decompression.
//!
//! Predictor 1 is the identity, 2 is the TIFF horizontal differencing
//! predictor and 10-15 are the PNG row filters, where each row carries its own
//! filter-type tag so the specific value above 10 is only a hint.

use crate::error::{FilterError, Result};
use crate::filter::params::PredictorParams;

/// Reverse the predictor described by `params`.
pub fn unfilter(data: &[u8], params: &PredictorParams) -> Result<Vec<u8>> {
    match params.predictor {
        1 => Ok(data.to_vec()),
        2 => apply_tiff_predictor(
            data,
            params.columns,
            params.colors,
            params.bits_per_component,
        ),
        10..=15 => apply_png_predictor(
            data,
            params.columns,
            params.colors,
            params.bits_per_component,
        ),
        other => Err(FilterError::UnsupportedPredictor(other)),
    }
}

/// Number of data bytes in one row (without the PNG tag byte). Fails when
/// the row is empty or its bit count overflows.
pub(crate) fn row_bytes(columns: usize, colors: usize, bits_per_component: usize) -> Result<usize> {
    columns
        .checked_mul(colors)
        .and_then(|samples| samples.checked_mul(bits_per_component))
        .filter(|&bits| bits > 0)
        .map(|bits| bits.div_ceil(8))
        .ok_or_else(|| FilterError::InvalidParameter {
            key: "Columns",
            reason: format!(
                "no row of {columns} columns with {colors} x {bits_per_component}-bit samples"
            ),
        })
}

/// Undo PNG row filtering.
///
/// Rows are `row_bytes + 1` long; a trailing partial row is reconstructed from
/// the bytes that are present.
pub fn apply_png_predictor(
    data: &[u8],
    columns: usize,
    colors: usize,
    bits_per_component: usize,
) -> Result<Vec<u8>> {
    let row_bytes = row_bytes(columns, colors, bits_per_component)?;
    // bytes per pixel, the distance to the "left" byte
    let bpp = std::cmp::max(1, colors.saturating_mul(bits_per_component) / 8);
    let row_size = row_bytes + 1;

    let mut result = Vec::with_capacity(data.len());
    // a row longer than the input is only ever partially present
    let mut prev_row = vec![0u8; row_bytes.min(data.len())];

    for (row, chunk) in data.chunks(row_size).enumerate() {
        let filter_type = chunk[0];
        let row_data = &chunk[1..];
        let mut current_row = vec![0u8; row_data.len()];

        match filter_type {
            0 => current_row.copy_from_slice(row_data),
            1 => {
                for i in 0..row_data.len() {
                    let left = if i >= bpp { current_row[i - bpp] } else { 0 };
                    current_row[i] = row_data[i].wrapping_add(left);
                }
            }
            2 => {
                for i in 0..row_data.len() {
                    current_row[i] = row_data[i].wrapping_add(prev_row[i]);
                }
            }
            3 => {
                for i in 0..row_data.len() {
                    let left = if i >= bpp { current_row[i - bpp] as u16 } else { 0 };
                    let above = prev_row[i] as u16;
                    current_row[i] = row_data[i].wrapping_add(((left + above) / 2) as u8);
                }
            }
            4 => {
                for i in 0..row_data.len() {
                    let left = if i >= bpp { current_row[i - bpp] } else { 0 };
                    let above = prev_row[i];
                    let upper_left = if i >= bpp { prev_row[i - bpp] } else { 0 };
                    let predicted = paeth_predictor(left, above, upper_left);
                    current_row[i] = row_data[i].wrapping_add(predicted);
                }
            }
            tag => return Err(FilterError::UnsupportedPngFilter { tag, row }),
        }

        result.extend_from_slice(&current_row);
        prev_row[..current_row.len()].copy_from_slice(&current_row);
    }

    Ok(result)
}

/// Paeth predictor function used in PNG filtering.
///
/// Ties go to left, then above, then upper-left.
pub const fn paeth_predictor(left: u8, above: u8, upper_left: u8) -> u8 {
    let a = left as i16;
    let b = above as i16;
    let c = upper_left as i16;
    let p = a + b - c;
    let pa = (p - a).abs();
    let pb = (p - b).abs();
    let pc = (p - c).abs();

    if pa <= pb && pa <= pc {
        left
    } else if pb <= pc {
        above
    } else {
        upper_left
    }
}

/// Undo TIFF predictor 2: each sample is stored as the difference from the
/// same component of the pixel to its left, modulo the component width.
pub fn apply_tiff_predictor(
    data: &[u8],
    columns: usize,
    colors: usize,
    bits_per_component: usize,
) -> Result<Vec<u8>> {
    if !matches!(bits_per_component, 1 | 2 | 4 | 8 | 16) {
        return Err(FilterError::InvalidParameter {
            key: "BitsPerComponent",
            reason: format!("{bits_per_component} is not supported by the TIFF predictor"),
        });
    }
    let row_len = row_bytes(columns, colors, bits_per_component)?;
    Ok(match bits_per_component {
        8 => tiff_rows_8(data, row_len, colors),
        16 => tiff_rows_16(data, row_len, colors),
        _ => tiff_rows_packed(data, row_len, columns * colors, colors, bits_per_component),
    })
}

fn tiff_rows_8(data: &[u8], nbytes: usize, bpp: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    for row in data.chunks(nbytes) {
        let start = out.len();
        for (i, &v) in row.iter().enumerate() {
            let value = if i >= bpp { v.wrapping_add(out[start + i - bpp]) } else { v };
            out.push(value);
        }
    }
    out
}

fn tiff_rows_16(data: &[u8], row_len: usize, colors: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    for row in data.chunks(row_len) {
        let start = out.len();
        let mut pairs = row.chunks_exact(2);
        for (i, pair) in pairs.by_ref().enumerate() {
            let mut sample = u16::from_be_bytes([pair[0], pair[1]]);
            if i >= colors {
                let at = start + (i - colors) * 2;
                sample = sample.wrapping_add(u16::from_be_bytes([out[at], out[at + 1]]));
            }
            out.extend_from_slice(&sample.to_be_bytes());
        }
        out.extend_from_slice(pairs.remainder());
    }
    out
}

fn tiff_rows_packed(
    data: &[u8],
    row_len: usize,
    samples: usize,
    colors: usize,
    bpc: usize,
) -> Vec<u8> {
    let mask = (1u16 << bpc) - 1;
    let mut out = Vec::with_capacity(data.len());

    for row in data.chunks(row_len) {
        let mut decoded = vec![0u8; row.len()];
        let available = (row.len() * 8 / bpc).min(samples);
        // s % colors < available, so wider pixels never need more slots
        let mut history = vec![0u16; colors.min(available)];
        for s in 0..available {
            let bit = s * bpc;
            let shift = 8 - bpc - bit % 8;
            let delta = (row[bit / 8] as u16 >> shift) & mask;
            let component = s % colors;
            let value = if s >= colors {
                (history[component] + delta) & mask
            } else {
                delta
            };
            history[component] = value;
            decoded[bit / 8] |= (value << shift) as u8;
        }
        out.extend_from_slice(&decoded);
    }
    out
}
