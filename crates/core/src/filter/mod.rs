//! Filter names, parameters and the dispatcher that chains the codecs.

pub mod kind;
pub mod options;
pub mod params;
pub mod pipeline;
pub mod spec;

pub use kind::FilterKind;
pub use options::CodecOptions;
pub use params::{CcittParams, CryptParams, LzwParams, ParamDict, PredictorParams};
pub use pipeline::{Decoded, FilterPipeline, decode_payload, encode_payload};
pub use spec::{EncodedPayload, FilterSpec, parse_filter_list};
