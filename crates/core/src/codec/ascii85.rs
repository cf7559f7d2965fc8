//! ASCII85 and ASCIIHex stream codecs.
//!
//! Both decoders require the format's end marker and reject characters
//! outside their alphabet. Whitespace is ignored anywhere in the data.

use crate::error::{FilterError, Result};

const A85: &str = "ASCII85Decode";
const AHX: &str = "ASCIIHexDecode";

const fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | b'\x0c' | b'\x00')
}

/// Decode ASCII85-encoded data (PDF variant).
///
/// An optional `<~` prefix is skipped, `z` stands for four zero bytes, and
/// a final group of 2-4 characters yields 1-3 bytes. Decoding stops at `~>`.
pub fn ascii85decode(data: &[u8]) -> Result<Vec<u8>> {
    let mut start = data.iter().position(|&b| !is_whitespace(b)).unwrap_or(data.len());
    if data[start..].starts_with(b"<~") {
        start += 2;
    }

    let mut result = Vec::with_capacity(data.len() / 5 * 4 + 4);
    let mut group = [0u8; 5];
    let mut filled = 0;
    let mut i = start;
    while i < data.len() {
        let byte = data[i];
        match byte {
            b'~' => {
                let close = data[i + 1..].iter().position(|&b| !is_whitespace(b));
                return match close.map(|p| (i + 1 + p, data[i + 1 + p])) {
                    Some((_, b'>')) => {
                        flush_partial(&group[..filled], &mut result, i)?;
                        Ok(result)
                    }
                    Some((offset, other)) => Err(FilterError::InvalidCharacter {
                        filter: A85,
                        byte: other,
                        offset,
                    }),
                    None => Err(FilterError::UnterminatedStream(A85)),
                };
            }
            b'z' if filled == 0 => result.extend_from_slice(&[0; 4]),
            b'!'..=b'u' => {
                group[filled] = byte;
                filled += 1;
                if filled == 5 {
                    let value = group_value(&group).ok_or(FilterError::InvalidCharacter {
                        filter: A85,
                        byte,
                        offset: i,
                    })?;
                    result.extend_from_slice(&value.to_be_bytes());
                    filled = 0;
                }
            }
            b if is_whitespace(b) => {}
            _ => {
                return Err(FilterError::InvalidCharacter {
                    filter: A85,
                    byte,
                    offset: i,
                });
            }
        }
        i += 1;
    }
    Err(FilterError::UnterminatedStream(A85))
}

fn group_value(chars: &[u8; 5]) -> Option<u32> {
    let value = chars
        .iter()
        .fold(0u64, |acc, &c| acc * 85 + u64::from(c - b'!'));
    u32::try_from(value).ok()
}

fn flush_partial(chars: &[u8], out: &mut Vec<u8>, offset: usize) -> Result<()> {
    match chars.len() {
        0 => Ok(()),
        1 => Err(FilterError::TruncatedInput(A85)),
        n => {
            let mut padded = [b'u'; 5];
            padded[..n].copy_from_slice(chars);
            let value = group_value(&padded).ok_or(FilterError::InvalidCharacter {
                filter: A85,
                byte: chars[n - 1],
                offset,
            })?;
            out.extend_from_slice(&value.to_be_bytes()[..n - 1]);
            Ok(())
        }
    }
}

/// Encode data as ASCII85, terminated with `~>`.
///
/// With `line_width`, a newline is inserted after that many characters.
pub fn ascii85encode(data: &[u8], line_width: Option<usize>) -> Vec<u8> {
    let mut out = LineWriter::new(data.len() / 4 * 5 + 8, line_width);
    for chunk in data.chunks(4) {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        let mut value = u32::from_be_bytes(word);
        if chunk.len() == 4 && value == 0 {
            out.push(b'z');
            continue;
        }
        let mut digits = [0u8; 5];
        for digit in digits.iter_mut().rev() {
            *digit = (value % 85) as u8 + b'!';
            value /= 85;
        }
        out.extend(&digits[..chunk.len() + 1]);
    }
    out.finish(b"~>")
}

/// Decode ASCIIHex-encoded data, stopping at `>`.
///
/// An odd number of digits is completed with a zero nibble.
pub fn asciihexdecode(data: &[u8]) -> Result<Vec<u8>> {
    let mut result = Vec::with_capacity(data.len() / 2);
    let mut pending: Option<u8> = None;

    // a leading `<` left over from a hex string literal is tolerated
    let mut start = data.iter().position(|&b| !is_whitespace(b)).unwrap_or(data.len());
    if data.get(start) == Some(&b'<') {
        start += 1;
    }

    for (offset, &byte) in data.iter().enumerate().skip(start) {
        let nibble = match byte {
            b'0'..=b'9' => byte - b'0',
            b'a'..=b'f' => byte - b'a' + 10,
            b'A'..=b'F' => byte - b'A' + 10,
            b'>' => {
                if let Some(high) = pending {
                    result.push(high << 4);
                }
                return Ok(result);
            }
            b if is_whitespace(b) => continue,
            _ => {
                return Err(FilterError::InvalidCharacter {
                    filter: AHX,
                    byte,
                    offset,
                });
            }
        };
        match pending.take() {
            Some(high) => result.push((high << 4) | nibble),
            None => pending = Some(nibble),
        }
    }
    Err(FilterError::UnterminatedStream(AHX))
}

/// Encode data as uppercase hex pairs followed by `>`.
pub fn asciihexencode(data: &[u8], line_width: Option<usize>) -> Vec<u8> {
    const DIGITS: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = LineWriter::new(data.len() * 2 + 2, line_width);
    for &byte in data {
        out.extend(&[DIGITS[(byte >> 4) as usize], DIGITS[(byte & 0x0f) as usize]]);
    }
    out.finish(b">")
}

/// Output buffer that wraps lines at a fixed character count.
struct LineWriter {
    out: Vec<u8>,
    width: Option<usize>,
    column: usize,
}

impl LineWriter {
    fn new(capacity: usize, width: Option<usize>) -> Self {
        Self {
            out: Vec::with_capacity(capacity),
            width: width.filter(|&w| w > 0),
            column: 0,
        }
    }

    fn push(&mut self, byte: u8) {
        if self.width.is_some_and(|w| self.column == w) {
            self.out.push(b'\n');
            self.column = 0;
        }
        self.out.push(byte);
        self.column += 1;
    }

    fn extend(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.push(b);
        }
    }

    fn finish(mut self, terminator: &[u8]) -> Vec<u8> {
        self.out.extend_from_slice(terminator);
        self.out
    }
}
