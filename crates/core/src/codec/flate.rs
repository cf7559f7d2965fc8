//! FlateDecode: zlib/deflate through flate2, followed by the predictor stage.
//!
//! Damaged streams are common in the wild, so decoding keeps whatever output
//! was produced before the data ran out or went bad and reports the loss as a
//! warning. How much is salvaged depends on where the inflater notices the
//! damage; callers should only rely on getting a prefix of the real payload.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};

use crate::codec::predictor;
use crate::error::{Diagnostics, FilterError, Result, Warning};
use crate::filter::params::PredictorParams;

const FILTER: &str = "FlateDecode";

/// Compression level used when no option overrides it.
pub const DEFAULT_LEVEL: u32 = 6;

/// Inflate `data` and undo the predictor described by `params`.
pub fn decode(data: &[u8], params: &PredictorParams) -> Result<Vec<u8>> {
    decode_with_diagnostics(data, params, &mut Diagnostics::new())
}

pub fn decode_with_diagnostics(
    data: &[u8],
    params: &PredictorParams,
    diag: &mut Diagnostics,
) -> Result<Vec<u8>> {
    let inflated = inflate(data, diag)?;
    if params.is_identity() {
        Ok(inflated)
    } else {
        predictor::unfilter(&inflated, params)
    }
}

/// Compress `data` as a zlib stream at the given level (0-9).
pub fn encode(data: &[u8], level: u32) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(
        Vec::with_capacity(data.len() / 2 + 16),
        Compression::new(level.min(9)),
    );
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

#[derive(Debug, PartialEq)]
enum InflateEnd {
    Complete,
    Truncated,
    Corrupt(String),
}

/// Inflate a zlib stream, salvaging a prefix of damaged ones.
pub fn inflate(data: &[u8], diag: &mut Diagnostics) -> Result<Vec<u8>> {
    let (out, end) = run_inflate(data, true);
    match end {
        InflateEnd::Complete => return Ok(out),
        InflateEnd::Truncated if !out.is_empty() => {
            diag.warn(Warning::TruncatedFlate {
                recovered: out.len(),
            });
            return Ok(out);
        }
        InflateEnd::Corrupt(message) if !out.is_empty() => {
            diag.warn(Warning::CorruptFlate {
                recovered: out.len(),
                message,
            });
            return Ok(out);
        }
        _ => {}
    }

    // Nothing came out. Some producers omit the zlib wrapper entirely.
    let (raw, raw_end) = run_inflate(data, false);
    if raw_end == InflateEnd::Complete {
        diag.warn(Warning::RawDeflateFallback);
        return Ok(raw);
    }

    match end {
        InflateEnd::Corrupt(message) => Err(FilterError::FlateDecode(message)),
        _ => Err(FilterError::TruncatedInput(FILTER)),
    }
}

fn run_inflate(data: &[u8], zlib_header: bool) -> (Vec<u8>, InflateEnd) {
    let mut decoder = Decompress::new(zlib_header);
    let mut out = Vec::with_capacity(data.len().saturating_mul(2));
    let mut buf = [0u8; 8192];
    loop {
        let consumed = decoder.total_in() as usize;
        let before_out = decoder.total_out();
        let res = decoder.decompress(&data[consumed..], &mut buf, FlushDecompress::None);
        let produced = (decoder.total_out() - before_out) as usize;
        out.extend_from_slice(&buf[..produced]);
        match res {
            Ok(Status::StreamEnd) => return (out, InflateEnd::Complete),
            Ok(_) => {
                if produced == 0 && decoder.total_in() as usize == consumed {
                    return (out, InflateEnd::Truncated);
                }
            }
            Err(e) => return (out, InflateEnd::Corrupt(e.to_string())),
        }
    }
}
