//! Byte-level codecs behind the stream filters.
//!
//! - `predictor`: PNG and TIFF row predictors
//! - `flate`: zlib/deflate
//! - `lzw`: adaptive-width LZW
//! - `ascii85`: ASCII85 and ASCIIHex armor
//! - `runlength`: PackBits run-length coding
//! - `ccitt`: Group 4 fax decoding

pub(crate) mod bits;
pub mod ascii85;
pub mod ccitt;
pub mod flate;
pub mod lzw;
pub mod predictor;
pub mod runlength;

pub use ascii85::{ascii85decode, ascii85encode, asciihexdecode, asciihexencode};
pub use ccitt::{CcittDecoder, LineBuilder};
pub use predictor::{apply_png_predictor, apply_tiff_predictor, paeth_predictor};
pub use runlength::{rldecode, rlencode};
