/// Settings shared by every pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecOptions {
    /// Deflate level (0-9) used when encoding with FlateDecode.
    pub flate_level: u32,

    /// Upper bound on the size of any intermediate or final decode result.
    /// None disables the check.
    pub max_decoded_len: Option<usize>,

    /// Wrap ASCII85 and ASCIIHex encoder output after this many characters.
    pub line_width: Option<usize>,

    /// Worker threads for batch decoding. None uses the global rayon pool.
    pub threads: Option<usize>,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            flate_level: crate::codec::flate::DEFAULT_LEVEL,
            max_decoded_len: None,
            line_width: None,
            threads: None,
        }
    }
}

impl CodecOptions {
    pub fn with_flate_level(mut self, level: u32) -> Self {
        self.flate_level = level.min(9);
        self
    }

    pub fn with_max_decoded_len(mut self, max: usize) -> Self {
        self.max_decoded_len = Some(max);
        self
    }

    pub fn with_line_width(mut self, width: usize) -> Self {
        self.line_width = Some(width);
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }
}
