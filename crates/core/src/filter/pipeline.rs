//! Runs a payload's filter list through the codecs, in either direction.

use rayon::ThreadPoolBuilder;
use rayon::prelude::*;

use crate::codec::{ascii85, ccitt, flate, lzw, runlength};
use crate::error::{Diagnostics, FilterError, Result, Warning};
use crate::filter::options::CodecOptions;
use crate::filter::spec::{EncodedPayload, FilterSpec};

/// Result of a successful decode.
///
/// `warnings` lists the degradations met on the way; when it is non-empty
/// `data` is a best-effort prefix of the real content.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Decoded {
    pub data: Vec<u8>,
    pub warnings: Vec<Warning>,
}

impl Decoded {
    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Filter dispatcher. Holds configuration only, so one instance can serve
/// any number of threads.
#[derive(Debug, Clone, Default)]
pub struct FilterPipeline {
    options: CodecOptions,
}

impl FilterPipeline {
    pub fn new(options: CodecOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Apply every filter of `payload` in list order.
    ///
    /// DCTDecode and JPXDecode end the pipeline: their input is the encoded
    /// image and is returned as is.
    pub fn decode(&self, payload: &EncodedPayload) -> Result<Decoded> {
        if payload.data.is_empty() {
            return Ok(Decoded::default());
        }

        let mut diag = Diagnostics::new();
        let mut current: Option<Vec<u8>> = None;
        for (idx, spec) in payload.filters.iter().enumerate() {
            let kind = spec.kind();
            if kind.is_passthrough_image() {
                let skipped = payload.filters.len() - idx - 1;
                if skipped > 0 {
                    diag.warn(Warning::ImageFilterStopsPipeline {
                        filter: kind.name(),
                        skipped,
                    });
                }
                break;
            }

            let input = current.as_deref().unwrap_or(&payload.data[..]);
            let output = self.decode_stage(spec, input, &mut diag)?;
            tracing::debug!(
                filter = %kind,
                input = input.len(),
                output = output.len(),
                "filter decoded"
            );
            self.enforce_max_len(output.len())?;
            current = Some(output);
        }

        Ok(Decoded {
            data: current.unwrap_or_else(|| payload.data.to_vec()),
            warnings: diag.into_warnings(),
        })
    }

    fn decode_stage(
        &self,
        spec: &FilterSpec,
        data: &[u8],
        diag: &mut Diagnostics,
    ) -> Result<Vec<u8>> {
        match spec {
            FilterSpec::Flate(params) => flate::decode_with_diagnostics(data, params, diag),
            FilterSpec::Lzw(params) => lzw::decode_with_diagnostics(data, params, diag),
            FilterSpec::AsciiHex => ascii85::asciihexdecode(data),
            FilterSpec::Ascii85 => ascii85::ascii85decode(data),
            FilterSpec::RunLength => Ok(runlength::rldecode(data)),
            FilterSpec::CcittFax(params) => ccitt::decode_with_diagnostics(data, params, diag),
            FilterSpec::Jbig2 => Err(FilterError::NotImplemented("JBIG2Decode".to_string())),
            FilterSpec::Crypt(params) if params.is_identity() => Ok(data.to_vec()),
            FilterSpec::Crypt(params) => Err(FilterError::UnsupportedCrypt(params.name.clone())),
            FilterSpec::Identity | FilterSpec::Dct | FilterSpec::Jpx => Ok(data.to_vec()),
        }
    }

    fn enforce_max_len(&self, len: usize) -> Result<()> {
        if let Some(max) = self.options.max_decoded_len
            && len > max
        {
            return Err(FilterError::OutputLimitExceeded { len, max });
        }
        Ok(())
    }

    /// Encode raw bytes with one filter.
    pub fn encode(&self, data: &[u8], filter: FilterSpec) -> Result<EncodedPayload> {
        self.encode_onto(EncodedPayload::raw(data.to_vec()), filter)
    }

    /// Encode an already filtered payload once more. The new filter goes to
    /// the front of the list, since it is the first one a reader undoes.
    pub fn encode_onto(
        &self,
        payload: EncodedPayload,
        filter: FilterSpec,
    ) -> Result<EncodedPayload> {
        if filter == FilterSpec::Identity {
            return Ok(payload);
        }
        let data = self.encode_stage(&filter, &payload.data)?;
        tracing::debug!(
            filter = %filter.kind(),
            input = payload.data.len(),
            output = data.len(),
            "filter encoded"
        );
        let mut filters = Vec::with_capacity(payload.filters.len() + 1);
        filters.push(filter);
        filters.extend(payload.filters);
        Ok(EncodedPayload::new(data, filters))
    }

    fn encode_stage(&self, spec: &FilterSpec, data: &[u8]) -> Result<Vec<u8>> {
        match spec {
            FilterSpec::Flate(params) if params.is_identity() => {
                flate::encode(data, self.options.flate_level)
            }
            FilterSpec::Lzw(params) if params.predictor.is_identity() => {
                Ok(lzw::encode(data, params.early_change))
            }
            FilterSpec::Flate(_) | FilterSpec::Lzw(_) => Err(FilterError::NotImplemented(
                format!("{} encoding with a predictor", spec.kind()),
            )),
            FilterSpec::AsciiHex => Ok(ascii85::asciihexencode(data, self.options.line_width)),
            FilterSpec::Ascii85 => Ok(ascii85::ascii85encode(data, self.options.line_width)),
            FilterSpec::RunLength => Ok(runlength::rlencode(data)),
            FilterSpec::Identity => Ok(data.to_vec()),
            FilterSpec::CcittFax(_)
            | FilterSpec::Dct
            | FilterSpec::Jpx
            | FilterSpec::Jbig2
            | FilterSpec::Crypt(_) => Err(FilterError::NotImplemented(format!(
                "{} encoding",
                spec.kind()
            ))),
        }
    }

    /// Decode independent payloads in parallel. Results come back in input
    /// order, one per payload.
    pub fn decode_all(&self, payloads: &[EncodedPayload]) -> Result<Vec<Result<Decoded>>> {
        let run = || payloads.par_iter().map(|p| self.decode(p)).collect();
        match self.options.threads {
            Some(threads) => {
                let pool = ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| FilterError::ThreadPool(e.to_string()))?;
                Ok(pool.install(run))
            }
            None => Ok(run()),
        }
    }
}

/// Decode with default options.
pub fn decode_payload(payload: &EncodedPayload) -> Result<Decoded> {
    FilterPipeline::default().decode(payload)
}

/// Encode with default options.
pub fn encode_payload(data: &[u8], filter: FilterSpec) -> Result<EncodedPayload> {
    FilterPipeline::default().encode(data, filter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_payload_skips_codecs() {
        // would fail as unterminated ASCII85 if the codec ran
        let payload = EncodedPayload::new(Vec::new(), vec![FilterSpec::Ascii85]);
        assert_eq!(decode_payload(&payload).unwrap(), Decoded::default());
    }

    #[test]
    fn identity_encode_keeps_filter_list() {
        let payload = encode_payload(b"abc", FilterSpec::Identity).unwrap();
        assert!(payload.filters.is_empty());
        assert_eq!(&payload.data[..], b"abc");
    }

    #[test]
    fn output_limit_checked_per_stage() {
        let pipeline = FilterPipeline::new(CodecOptions::default().with_max_decoded_len(4));
        let payload = EncodedPayload::new(b"61626364656667>".to_vec(), vec![FilterSpec::AsciiHex]);
        let err = pipeline.decode(&payload).unwrap_err();
        assert!(matches!(err, FilterError::OutputLimitExceeded { len: 7, max: 4 }));
    }
}
