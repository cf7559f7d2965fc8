//! CCITT Group 4 fax decoder.
//!
//! ITU-T Recommendation T.4 - Group 3 facsimile
//! ITU-T Recommendation T.6 - Group 4 facsimile
//!
//! Rows are tracked as lists of color changes rather than pixels. A row
//! starts white; even entries are changes to black and odd entries changes
//! back to white. Each decoded row becomes the reference for the next one.

mod tables;

use tables::{BLACK_RUNS, Code, LOOKAHEAD, Lookup, MODES, Mode, RAW, Raw, WHITE_RUNS};

use crate::codec::bits::BitReader;
use crate::error::{Diagnostics, FilterError, Result, Warning};
use crate::filter::params::CcittParams;

/// Builds one coded row against the reference row above it.
#[derive(Debug, Clone)]
pub struct LineBuilder {
    width: usize,
    reference: Vec<usize>,
    changes: Vec<usize>,
    a0: isize,
    black: bool,
}

impl LineBuilder {
    /// Start the first row of an image; the imaginary row above is white.
    pub fn new(width: usize) -> Self {
        Self::with_reference(width, Vec::new())
    }

    /// Start a row whose reference row has the given change positions.
    pub fn with_reference(width: usize, reference: Vec<usize>) -> Self {
        Self {
            width,
            reference,
            changes: Vec::new(),
            a0: -1,
            black: false,
        }
    }

    /// Position of the changing element a0; -1 before the first code of a row.
    pub fn position(&self) -> isize {
        self.a0
    }

    /// Color of the run that starts at a0.
    pub fn is_black(&self) -> bool {
        self.black
    }

    pub fn is_complete(&self) -> bool {
        self.a0 >= self.width as isize
    }

    pub fn changes(&self) -> &[usize] {
        &self.changes
    }

    fn start(&self) -> usize {
        self.a0.max(0) as usize
    }

    /// b1 and b2: the first change on the reference row right of a0 whose
    /// color is opposite to the current one, and the change after it.
    fn reference_changes(&self) -> (usize, usize) {
        let mut idx = self
            .reference
            .partition_point(|&c| (c as isize) <= self.a0);
        // even indexes turn black, so a white run looks for an even one
        if idx % 2 != usize::from(self.black) {
            idx += 1;
        }
        let at = |i: usize| self.reference.get(i).copied().unwrap_or(self.width);
        (at(idx), at(idx + 1))
    }

    fn record(&mut self, pos: usize) {
        if pos >= self.width {
            return;
        }
        if self.changes.last() == Some(&pos) {
            // zero-length run
            self.changes.pop();
        } else {
            self.changes.push(pos);
        }
    }

    pub fn pass(&mut self) {
        let (_, b2) = self.reference_changes();
        self.a0 = b2 as isize;
    }

    pub fn vertical(&mut self, dx: i8) {
        let (b1, _) = self.reference_changes();
        let a1 = (b1 as isize + isize::from(dx)).clamp(self.start() as isize, self.width as isize);
        self.record(a1 as usize);
        self.a0 = a1;
        self.black = !self.black;
    }

    pub fn horizontal(&mut self, run1: usize, run2: usize) {
        let a1 = (self.start() + run1).min(self.width);
        let a2 = (a1 + run2).min(self.width);
        self.record(a1);
        self.record(a2);
        self.a0 = a2 as isize;
    }

    /// Append one pixel at a0, as in uncompressed mode.
    fn pixel(&mut self, black: bool) {
        let pos = self.start();
        if pos >= self.width {
            return;
        }
        if black != self.black {
            self.record(pos);
            self.black = black;
        }
        self.a0 = pos as isize + 1;
    }

    /// Set the color of the next run without moving a0.
    fn set_color(&mut self, black: bool) {
        if black != self.black {
            self.record(self.start());
            self.black = black;
        }
    }

    /// Pixels left of a0, `true` for black.
    pub fn pixels(&self) -> Vec<bool> {
        let mut row = expand(&self.changes, self.width);
        row.truncate(self.start());
        row
    }

    /// Close this row and start the next one with this row as reference.
    pub fn next_row(&mut self) -> Vec<usize> {
        let changes = std::mem::take(&mut self.changes);
        self.reference = changes.clone();
        self.a0 = -1;
        self.black = false;
        changes
    }
}

/// Expand change positions into a row of pixels, `true` for black.
fn expand(changes: &[usize], width: usize) -> Vec<bool> {
    let mut row = vec![false; width];
    for span in changes.chunks(2) {
        let end = span.get(1).copied().unwrap_or(width).min(width);
        for px in &mut row[span[0]..end] {
            *px = true;
        }
    }
    row
}

/// Pack a row MSB first; trailing bits of the last byte are zero.
fn pack_row(changes: &[usize], width: usize, black_is_1: bool, out: &mut Vec<u8>) {
    let start = out.len();
    out.resize(start + width.div_ceil(8), 0);
    for (x, black) in expand(changes, width).into_iter().enumerate() {
        if black == black_is_1 {
            out[start + x / 8] |= 0x80 >> (x % 8);
        }
    }
}

/// Widest row accepted. A single code can span a whole row, so the row
/// buffers are sized from `Columns` alone.
pub const MAX_COLUMNS: usize = 1 << 20;

/// Decode CCITT fax data into packed rows of `Columns` pixels.
pub fn decode(data: &[u8], params: &CcittParams) -> Result<Vec<u8>> {
    decode_with_diagnostics(data, params, &mut Diagnostics::new())
}

pub fn decode_with_diagnostics(
    data: &[u8],
    params: &CcittParams,
    diag: &mut Diagnostics,
) -> Result<Vec<u8>> {
    if params.k != -1 {
        return Err(FilterError::NotImplemented(format!(
            "CCITTFaxDecode with K={} (Group 3)",
            params.k
        )));
    }
    CcittDecoder::new(data, params)?.decode(diag)
}

/// Decodes a Group 4 fax image into packed rows.
pub struct CcittDecoder<'a> {
    reader: BitReader<'a>,
    params: &'a CcittParams,
    line: LineBuilder,
    rows: usize,
    out: Vec<u8>,
}

enum Step {
    Continue,
    /// End of block, or nothing but padding left.
    Stop,
    /// The data ended part way through a row.
    Truncated,
}

impl<'a> CcittDecoder<'a> {
    /// Fails when `Columns` is zero or above [`MAX_COLUMNS`].
    pub fn new(data: &'a [u8], params: &'a CcittParams) -> Result<Self> {
        if params.columns == 0 || params.columns > MAX_COLUMNS {
            return Err(FilterError::InvalidParameter {
                key: "Columns",
                reason: format!("{} is outside 1..={MAX_COLUMNS}", params.columns),
            });
        }
        Ok(Self {
            reader: BitReader::new(data),
            params,
            line: LineBuilder::new(params.columns),
            rows: 0,
            out: Vec::with_capacity(
                params
                    .columns
                    .div_ceil(8)
                    .saturating_mul(params.rows.max(1))
                    .min(data.len().saturating_mul(8)),
            ),
        })
    }

    /// Run to the end of the data and return the packed raster.
    pub fn decode(mut self, diag: &mut Diagnostics) -> Result<Vec<u8>> {
        loop {
            if self.params.rows > 0 && self.rows >= self.params.rows {
                break;
            }
            if self.line.position() < 0 && self.reader.rest_is_zero() {
                break;
            }
            match self.step()? {
                Step::Continue => {}
                Step::Stop => break,
                Step::Truncated => {
                    diag.warn(Warning::TruncatedFax { rows: self.rows });
                    break;
                }
            }
            if self.line.is_complete() {
                self.finish_row();
            }
        }
        tracing::debug!(rows = self.rows, bytes = self.out.len(), "fax image decoded");
        Ok(self.out)
    }

    fn finish_row(&mut self) {
        let changes = self.line.next_row();
        pack_row(&changes, self.params.columns, self.params.black_is_1, &mut self.out);
        self.rows += 1;
        if self.params.encoded_byte_align {
            self.reader.align_to_byte();
        }
    }

    fn unsupported(&self) -> FilterError {
        FilterError::UnsupportedCCITTCode {
            row: self.rows,
            bit_offset: self.reader.position(),
        }
    }

    /// Look up and consume the next code. `None` means the input ran out.
    fn next_code<T: Copy>(&mut self, table: &Lookup<T>) -> Result<Option<T>> {
        let window = self.reader.peek(LOOKAHEAD) as usize;
        match table[window] {
            Some(Code { len, .. }) if usize::from(len) > self.reader.remaining() => Ok(None),
            Some(Code { len, value }) => {
                self.reader.consume(u32::from(len));
                Ok(Some(value))
            }
            None if self.reader.rest_is_zero() => Ok(None),
            None => Err(self.unsupported()),
        }
    }

    fn step(&mut self) -> Result<Step> {
        if self.reader.peek(12) == 0 {
            return Ok(self.fill_then_eol());
        }
        let Some(mode) = self.next_code(&MODES)? else {
            return Ok(Step::Truncated);
        };
        match mode {
            Mode::Pass => self.line.pass(),
            Mode::Vertical(dx) => self.line.vertical(dx),
            Mode::Horizontal => {
                let first_black = self.line.is_black();
                let Some(run1) = self.read_run(first_black)? else {
                    return Ok(Step::Truncated);
                };
                let Some(run2) = self.read_run(!first_black)? else {
                    return Ok(Step::Truncated);
                };
                self.line.horizontal(run1, run2);
            }
            Mode::Uncompressed => return self.uncompressed(),
            Mode::Extension(_) => return Err(self.unsupported()),
            Mode::EndOfLine => return Ok(self.end_of_line()),
        }
        Ok(Step::Continue)
    }

    /// A run length: make-up codes are summed until a terminating code.
    fn read_run(&mut self, black: bool) -> Result<Option<usize>> {
        let table = if black { &*BLACK_RUNS } else { &*WHITE_RUNS };
        let mut total = 0;
        loop {
            let Some(run) = self.next_code(table)? else {
                return Ok(None);
            };
            total += usize::from(run);
            if run < 64 {
                return Ok(Some(total));
            }
        }
    }

    /// Twelve or more zero bits: either padding to the end or fill before EOL.
    fn fill_then_eol(&mut self) -> Step {
        if self.reader.rest_is_zero() {
            return if self.line.position() < 0 {
                Step::Stop
            } else {
                Step::Truncated
            };
        }
        while self.reader.peek(1) == 0 {
            self.reader.consume(1);
        }
        self.reader.consume(1);
        self.end_of_line()
    }

    fn end_of_line(&mut self) -> Step {
        // EOL twice in a row is the end-of-block marker
        if self.reader.peek(12) == 1 {
            self.reader.consume(12);
            return Step::Stop;
        }
        if self.line.position() >= 0 {
            self.finish_row();
        }
        Step::Continue
    }

    /// T.4 uncompressed mode: literal pixels until an exit code.
    fn uncompressed(&mut self) -> Result<Step> {
        loop {
            let Some(code) = self.next_code(&RAW)? else {
                return Ok(Step::Truncated);
            };
            match code {
                Raw::Pixels { white, black } => {
                    for _ in 0..white {
                        self.line.pixel(false);
                    }
                    if black {
                        self.line.pixel(true);
                    }
                }
                Raw::Exit { white } => {
                    for _ in 0..white {
                        self.line.pixel(false);
                    }
                    let Some(tag) = self.reader.read(1) else {
                        return Ok(Step::Truncated);
                    };
                    self.line.set_color(tag == 1);
                    return Ok(Step::Continue);
                }
            }
            if self.line.is_complete() {
                self.finish_row();
            }
        }
    }
}
