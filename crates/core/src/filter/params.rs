//! Typed parameter sets parsed from `/DecodeParms` dictionaries.
//!
//! Unknown keys are ignored and missing keys take the documented defaults.
//! A key that is present with the wrong type or an out-of-range value is an
//! `InvalidParameter` error.

use std::collections::HashMap;

use crate::error::{FilterError, Result};
use crate::model::PDFObject;

pub type ParamDict = HashMap<String, PDFObject>;

/// Predictor parameters shared by FlateDecode and LZWDecode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredictorParams {
    /// 1 (none), 2 (TIFF) or 10-15 (PNG). Validated when the un-filter runs.
    pub predictor: i64,
    /// Interleaved color components per sample.
    pub colors: usize,
    /// Bits per color component: 1, 2, 4, 8 or 16.
    pub bits_per_component: usize,
    /// Samples per row.
    pub columns: usize,
}

impl Default for PredictorParams {
    fn default() -> Self {
        Self {
            predictor: 1,
            colors: 1,
            bits_per_component: 8,
            columns: 1,
        }
    }
}

impl PredictorParams {
    pub fn from_dict(dict: Option<&ParamDict>) -> Result<Self> {
        let defaults = Self::default();
        let bits_per_component =
            usize_param(dict, "BitsPerComponent", defaults.bits_per_component, 1)?;
        if !matches!(bits_per_component, 1 | 2 | 4 | 8 | 16) {
            return Err(FilterError::InvalidParameter {
                key: "BitsPerComponent",
                reason: format!("{bits_per_component} is not one of 1, 2, 4, 8, 16"),
            });
        }
        Ok(Self {
            predictor: int_param(dict, "Predictor", defaults.predictor)?,
            colors: usize_param(dict, "Colors", defaults.colors, 1)?,
            bits_per_component,
            columns: usize_param(dict, "Columns", defaults.columns, 1)?,
        })
    }

    /// PNG-style predictor with the given row geometry.
    pub fn png(columns: usize, colors: usize, bits_per_component: usize) -> Self {
        Self {
            predictor: 15,
            colors,
            bits_per_component,
            columns,
        }
    }

    pub const fn is_identity(&self) -> bool {
        self.predictor == 1
    }
}

/// LZWDecode parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LzwParams {
    pub predictor: PredictorParams,
    /// Switch code widths one code early (the PDF default).
    pub early_change: bool,
}

impl Default for LzwParams {
    fn default() -> Self {
        Self {
            predictor: PredictorParams::default(),
            early_change: true,
        }
    }
}

impl LzwParams {
    pub fn from_dict(dict: Option<&ParamDict>) -> Result<Self> {
        let early_change = match int_param(dict, "EarlyChange", 1)? {
            0 => false,
            1 => true,
            other => {
                return Err(FilterError::InvalidParameter {
                    key: "EarlyChange",
                    reason: format!("{other} is neither 0 nor 1"),
                });
            }
        };
        Ok(Self {
            predictor: PredictorParams::from_dict(dict)?,
            early_change,
        })
    }
}

/// CCITTFaxDecode parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CcittParams {
    /// Negative: Group 4, zero: Group 3 1-D, positive: Group 3 mixed.
    pub k: i64,
    /// Pixels per row.
    pub columns: usize,
    /// Rows to decode; 0 means "until the data ends".
    pub rows: usize,
    pub end_of_line: bool,
    pub encoded_byte_align: bool,
    pub end_of_block: bool,
    /// 1 bits are black pixels instead of white.
    pub black_is_1: bool,
    pub damaged_rows_before_error: usize,
}

impl Default for CcittParams {
    fn default() -> Self {
        Self {
            k: 0,
            columns: 1728,
            rows: 0,
            end_of_line: false,
            encoded_byte_align: false,
            end_of_block: true,
            black_is_1: false,
            damaged_rows_before_error: 0,
        }
    }
}

impl CcittParams {
    pub fn from_dict(dict: Option<&ParamDict>) -> Result<Self> {
        let d = Self::default();
        Ok(Self {
            k: int_param(dict, "K", d.k)?,
            columns: usize_param(dict, "Columns", d.columns, 1)?,
            rows: usize_param(dict, "Rows", d.rows, 0)?,
            end_of_line: bool_param(dict, "EndOfLine", d.end_of_line)?,
            encoded_byte_align: bool_param(dict, "EncodedByteAlign", d.encoded_byte_align)?,
            end_of_block: bool_param(dict, "EndOfBlock", d.end_of_block)?,
            black_is_1: bool_param(dict, "BlackIs1", d.black_is_1)?,
            damaged_rows_before_error: usize_param(
                dict,
                "DamagedRowsBeforeError",
                d.damaged_rows_before_error,
                0,
            )?,
        })
    }

    /// Group 4 parameters for a raster of the given width.
    pub fn group4(columns: usize) -> Self {
        Self {
            k: -1,
            columns,
            ..Self::default()
        }
    }
}

/// Crypt filter parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CryptParams {
    pub name: String,
}

impl Default for CryptParams {
    fn default() -> Self {
        Self {
            name: "Identity".to_string(),
        }
    }
}

impl CryptParams {
    pub fn from_dict(dict: Option<&ParamDict>) -> Result<Self> {
        match dict.and_then(|d| d.get("Name")) {
            None | Some(PDFObject::Null) => Ok(Self::default()),
            Some(PDFObject::Name(name)) => Ok(Self { name: name.clone() }),
            Some(other) => Err(wrong_type("Name", "name", other)),
        }
    }

    pub fn is_identity(&self) -> bool {
        self.name == "Identity"
    }
}

fn lookup<'a>(dict: Option<&'a ParamDict>, key: &str) -> Option<&'a PDFObject> {
    dict.and_then(|d| d.get(key)).filter(|v| !v.is_null())
}

fn wrong_type(key: &'static str, expected: &str, got: &PDFObject) -> FilterError {
    FilterError::InvalidParameter {
        key,
        reason: format!("expected {expected}, got {}", got.type_name()),
    }
}

fn int_param(dict: Option<&ParamDict>, key: &'static str, default: i64) -> Result<i64> {
    match lookup(dict, key) {
        None => Ok(default),
        Some(obj) => obj.as_int().ok_or_else(|| wrong_type(key, "int", obj)),
    }
}

fn usize_param(
    dict: Option<&ParamDict>,
    key: &'static str,
    default: usize,
    min: usize,
) -> Result<usize> {
    let Some(obj) = lookup(dict, key) else {
        return Ok(default);
    };
    let value = obj.as_int().ok_or_else(|| wrong_type(key, "int", obj))?;
    usize::try_from(value)
        .ok()
        .filter(|v| *v >= min)
        .ok_or_else(|| FilterError::InvalidParameter {
            key,
            reason: format!("{value} is below the minimum of {min}"),
        })
}

fn bool_param(dict: Option<&ParamDict>, key: &'static str, default: bool) -> Result<bool> {
    match lookup(dict, key) {
        None => Ok(default),
        Some(obj) => obj.as_bool().ok_or_else(|| wrong_type(key, "bool", obj)),
    }
}
