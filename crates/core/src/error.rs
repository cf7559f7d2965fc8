//! Error and diagnostic types for stream filter decoding and encoding.

use thiserror::Error;

/// Primary error type for filter operations.
///
/// Every variant is fatal to the single decode or encode call that raised it.
/// Recoverable degradations are reported as [`Warning`]s instead.
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("unsupported filter: {0}")]
    UnsupportedFilter(String),

    #[error("unsupported predictor: {0}")]
    UnsupportedPredictor(i64),

    #[error("unsupported PNG filter type {tag} in row {row}")]
    UnsupportedPngFilter { tag: u8, row: usize },

    #[error("LZW stream ended without an end-of-data code")]
    MissingStopCode,

    #[error("invalid LZW code {code} (table size {table_len})")]
    InvalidLzwCode { code: u16, table_len: usize },

    #[error("{0} stream is missing its end marker")]
    UnterminatedStream(&'static str),

    #[error("{filter}: invalid character {byte:#04x} at offset {offset}")]
    InvalidCharacter {
        filter: &'static str,
        byte: u8,
        offset: usize,
    },

    #[error("unrecognized CCITT code at bit {bit_offset} (row {row})")]
    UnsupportedCCITTCode { row: usize, bit_offset: usize },

    #[error("not implemented: {0}")]
    NotImplemented(String),

    #[error("{0}: input is truncated")]
    TruncatedInput(&'static str),

    #[error("crypt filter {0} cannot be applied here")]
    UnsupportedCrypt(String),

    #[error("invalid value for /{key}: {reason}")]
    InvalidParameter { key: &'static str, reason: String },

    #[error("FlateDecode error: {0}")]
    FlateDecode(String),

    #[error("decoded data exceeds expected size ({len} > {max})")]
    OutputLimitExceeded { len: usize, max: usize },

    #[error("thread pool error: {0}")]
    ThreadPool(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias for FilterError.
pub type Result<T> = std::result::Result<T, FilterError>;

/// A non-fatal degradation observed while decoding.
///
/// The decoded bytes returned alongside a warning are a best-effort prefix of
/// the real payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The deflate stream ended before its final block.
    TruncatedFlate { recovered: usize },
    /// The deflate stream became unreadable part way through.
    CorruptFlate { recovered: usize, message: String },
    /// The zlib wrapper was unreadable and the data was inflated as raw DEFLATE.
    RawDeflateFallback,
    /// LZW table insertions dropped because the table was already full.
    LzwTableOverflow { ignored: usize },
    /// Fax data ended in the middle of a row; `rows` complete rows were kept.
    TruncatedFax { rows: usize },
    /// An image filter ended the pipeline with filters still listed after it.
    ImageFilterStopsPipeline {
        filter: &'static str,
        skipped: usize,
    },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TruncatedFlate { recovered } => {
                write!(f, "truncated deflate stream, recovered {recovered} bytes")
            }
            Self::CorruptFlate { recovered, message } => {
                write!(f, "corrupt deflate stream ({message}), recovered {recovered} bytes")
            }
            Self::RawDeflateFallback => {
                f.write_str("zlib header unreadable, decoded as raw deflate")
            }
            Self::LzwTableOverflow { ignored } => {
                write!(f, "LZW table full, {ignored} insertions ignored")
            }
            Self::TruncatedFax { rows } => {
                write!(f, "fax data ends mid-row after {rows} complete rows")
            }
            Self::ImageFilterStopsPipeline { filter, skipped } => {
                write!(f, "{filter} is final, {skipped} later filters not applied")
            }
        }
    }
}

/// Collects warnings for one decode call.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning and forward it to the tracing subscriber.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!(%warning, "stream filter degraded");
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}
