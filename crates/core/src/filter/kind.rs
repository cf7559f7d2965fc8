use std::fmt;
use std::str::FromStr;

use crate::error::{FilterError, Result};

/// A stream filter named in a `/Filter` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    Flate,
    Lzw,
    AsciiHex,
    Ascii85,
    RunLength,
    CcittFax,
    Dct,
    Jpx,
    Jbig2,
    Crypt,
    /// No transform. Never named in a file; used for "store as is".
    Identity,
}

impl FilterKind {
    /// Resolve a filter name, accepting the abbreviations allowed in inline
    /// images. Matching ignores ASCII case.
    pub fn from_name(name: &str) -> Result<Self> {
        const NAMES: &[(&str, &str, FilterKind)] = &[
            ("FlateDecode", "Fl", FilterKind::Flate),
            ("LZWDecode", "LZW", FilterKind::Lzw),
            ("ASCIIHexDecode", "AHx", FilterKind::AsciiHex),
            ("ASCII85Decode", "A85", FilterKind::Ascii85),
            ("RunLengthDecode", "RL", FilterKind::RunLength),
            ("CCITTFaxDecode", "CCF", FilterKind::CcittFax),
            ("DCTDecode", "DCT", FilterKind::Dct),
        ];
        for &(long, short, kind) in NAMES {
            if name.eq_ignore_ascii_case(long) || name.eq_ignore_ascii_case(short) {
                return Ok(kind);
            }
        }
        if name.eq_ignore_ascii_case("JPXDecode") {
            Ok(Self::Jpx)
        } else if name.eq_ignore_ascii_case("JBIG2Decode") {
            Ok(Self::Jbig2)
        } else if name.eq_ignore_ascii_case("Crypt") {
            Ok(Self::Crypt)
        } else {
            Err(FilterError::UnsupportedFilter(name.to_string()))
        }
    }

    /// The full filter name as written in `/Filter`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Flate => "FlateDecode",
            Self::Lzw => "LZWDecode",
            Self::AsciiHex => "ASCIIHexDecode",
            Self::Ascii85 => "ASCII85Decode",
            Self::RunLength => "RunLengthDecode",
            Self::CcittFax => "CCITTFaxDecode",
            Self::Dct => "DCTDecode",
            Self::Jpx => "JPXDecode",
            Self::Jbig2 => "JBIG2Decode",
            Self::Crypt => "Crypt",
            Self::Identity => "Identity",
        }
    }

    /// Filters whose output is an encoded image handed to an image decoder
    /// outside this crate. Nothing can follow them in a pipeline.
    pub const fn is_passthrough_image(self) -> bool {
        matches!(self, Self::Dct | Self::Jpx)
    }
}

impl FromStr for FilterKind {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
