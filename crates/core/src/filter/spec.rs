//! Typed filter lists and the payloads they describe.

use bytes::Bytes;

use crate::error::{FilterError, Result};
use crate::filter::kind::FilterKind;
use crate::filter::params::{CcittParams, CryptParams, LzwParams, ParamDict, PredictorParams};
use crate::model::PDFObject;

/// One stage of a filter pipeline together with its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterSpec {
    Flate(PredictorParams),
    Lzw(LzwParams),
    AsciiHex,
    Ascii85,
    RunLength,
    CcittFax(CcittParams),
    Dct,
    Jpx,
    Jbig2,
    Crypt(CryptParams),
    Identity,
}

impl FilterSpec {
    /// Build a spec from a filter kind and its `/DecodeParms` dictionary.
    pub fn from_parts(kind: FilterKind, params: Option<&ParamDict>) -> Result<Self> {
        Ok(match kind {
            FilterKind::Flate => Self::Flate(PredictorParams::from_dict(params)?),
            FilterKind::Lzw => Self::Lzw(LzwParams::from_dict(params)?),
            FilterKind::AsciiHex => Self::AsciiHex,
            FilterKind::Ascii85 => Self::Ascii85,
            FilterKind::RunLength => Self::RunLength,
            FilterKind::CcittFax => Self::CcittFax(CcittParams::from_dict(params)?),
            FilterKind::Dct => Self::Dct,
            FilterKind::Jpx => Self::Jpx,
            FilterKind::Jbig2 => Self::Jbig2,
            FilterKind::Crypt => Self::Crypt(CryptParams::from_dict(params)?),
            FilterKind::Identity => Self::Identity,
        })
    }

    pub fn from_name(name: &str, params: Option<&ParamDict>) -> Result<Self> {
        Self::from_parts(FilterKind::from_name(name)?, params)
    }

    pub const fn kind(&self) -> FilterKind {
        match self {
            Self::Flate(_) => FilterKind::Flate,
            Self::Lzw(_) => FilterKind::Lzw,
            Self::AsciiHex => FilterKind::AsciiHex,
            Self::Ascii85 => FilterKind::Ascii85,
            Self::RunLength => FilterKind::RunLength,
            Self::CcittFax(_) => FilterKind::CcittFax,
            Self::Dct => FilterKind::Dct,
            Self::Jpx => FilterKind::Jpx,
            Self::Jbig2 => FilterKind::Jbig2,
            Self::Crypt(_) => FilterKind::Crypt,
            Self::Identity => FilterKind::Identity,
        }
    }

    /// Flate with default parameters.
    pub fn flate() -> Self {
        Self::Flate(PredictorParams::default())
    }

    /// LZW with default parameters.
    pub fn lzw() -> Self {
        Self::Lzw(LzwParams::default())
    }
}

/// Stream bytes plus the filters that were applied to produce them, listed in
/// decode order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EncodedPayload {
    pub data: Bytes,
    pub filters: Vec<FilterSpec>,
}

impl EncodedPayload {
    pub fn new(data: impl Into<Bytes>, filters: Vec<FilterSpec>) -> Self {
        Self {
            data: data.into(),
            filters,
        }
    }

    /// Unfiltered data.
    pub fn raw(data: impl Into<Bytes>) -> Self {
        Self::new(data, Vec::new())
    }

    /// Build a payload from a stream's raw bytes and its dictionary.
    pub fn from_stream_dict(data: impl Into<Bytes>, dict: &ParamDict) -> Result<Self> {
        let filters = parse_filter_list(dict.get("Filter"), dict.get("DecodeParms"))?;
        Ok(Self::new(data, filters))
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Turn a stream dictionary's `/Filter` and `/DecodeParms` into a filter list.
///
/// `/Filter` may be a single name or an array of names. `/DecodeParms` may be
/// an array aligned with the filters, with `null` for "use the defaults". A
/// single dictionary is applied to every filter.
pub fn parse_filter_list(
    filter: Option<&PDFObject>,
    decode_parms: Option<&PDFObject>,
) -> Result<Vec<FilterSpec>> {
    let names: Vec<&str> = match filter {
        None | Some(PDFObject::Null) => return Ok(Vec::new()),
        Some(PDFObject::Name(name)) => vec![name.as_str()],
        Some(PDFObject::Array(items)) => items
            .iter()
            .map(|item| item.as_name().ok_or_else(|| invalid("Filter", item)))
            .collect::<Result<_>>()?,
        Some(other) => return Err(invalid("Filter", other)),
    };

    let params: Vec<Option<&ParamDict>> = match decode_parms {
        None | Some(PDFObject::Null) => vec![None; names.len()],
        Some(PDFObject::Dict(d)) => vec![Some(d); names.len()],
        Some(PDFObject::Array(items)) => {
            let mut params = items
                .iter()
                .map(|item| match item {
                    PDFObject::Null => Ok(None),
                    PDFObject::Dict(d) => Ok(Some(d)),
                    other => Err(invalid("DecodeParms", other)),
                })
                .collect::<Result<Vec<_>>>()?;
            params.resize(names.len(), None);
            params
        }
        Some(other) => return Err(invalid("DecodeParms", other)),
    };

    names
        .into_iter()
        .zip(params)
        .map(|(name, params)| FilterSpec::from_name(name, params))
        .collect()
}

fn invalid(key: &'static str, got: &PDFObject) -> FilterError {
    FilterError::InvalidParameter {
        key,
        reason: format!("unexpected {}", got.type_name()),
    }
}
