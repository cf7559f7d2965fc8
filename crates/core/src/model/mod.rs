//! Object model shared with the parser that extracts stream dictionaries.

pub mod objects;

pub use objects::PDFObject;
