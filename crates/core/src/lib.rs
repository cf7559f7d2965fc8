//! pdfsieve - PDF stream filters: decoding and encoding of stream data.
//!
//! A stream's bytes and its `/Filter` list go in as an [`EncodedPayload`];
//! [`FilterPipeline::decode`] runs each filter in order and returns the plain
//! bytes together with any warnings about damaged input.

pub mod codec;
pub mod error;
pub mod filter;
pub mod model;

// Re-export codec modules for convenience
pub use codec::ascii85;
pub use codec::ccitt;
pub use codec::flate;
pub use codec::lzw;
pub use codec::predictor;
pub use codec::runlength;

pub use error::{Diagnostics, FilterError, Result, Warning};
pub use filter::{
    CcittParams, CodecOptions, CryptParams, Decoded, EncodedPayload, FilterKind, FilterPipeline,
    FilterSpec, LzwParams, ParamDict, PredictorParams, decode_payload, encode_payload,
    parse_filter_list,
};
pub use model::PDFObject;
