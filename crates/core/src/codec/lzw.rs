//! Adaptive-width LZW as used by LZWDecode.
//!
//! Codes are packed MSB first. Code 256 clears the table, 257 ends the data,
//! and the first dynamic entry is 258. Widths grow from 9 to 12 bits as the
//! table fills; with `early_change` the switch happens one code sooner.

use rustc_hash::FxHashMap;

use crate::codec::bits::{BitReader, BitWriter};
use crate::codec::predictor;
use crate::error::{Diagnostics, FilterError, Result, Warning};
use crate::filter::params::LzwParams;

pub const CLEAR_TABLE: u16 = 256;
pub const END_OF_DATA: u16 = 257;
const FIRST_DYNAMIC: u16 = 258;
const MAX_ENTRIES: usize = 4096;

/// Width in bits of the next code once the table holds `table_len` entries.
const fn code_width(table_len: usize, early_change: bool) -> u32 {
    let n = table_len + early_change as usize;
    if n >= 2048 {
        12
    } else if n >= 1024 {
        11
    } else if n >= 512 {
        10
    } else {
        9
    }
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    prefix: u16,
    last: u8,
    first: u8,
    len: u16,
}

struct Table {
    entries: Vec<Entry>,
    overflowed: usize,
}

impl Table {
    fn new() -> Self {
        let mut entries = Vec::with_capacity(MAX_ENTRIES);
        entries.extend((0..=255u8).map(|b| Entry {
            prefix: 0,
            last: b,
            first: b,
            len: 1,
        }));
        // clear and end-of-data occupy slots but never expand to bytes
        entries.extend([Entry { prefix: 0, last: 0, first: 0, len: 0 }; 2]);
        Self {
            entries,
            overflowed: 0,
        }
    }

    fn reset(&mut self) {
        self.entries.truncate(FIRST_DYNAMIC as usize);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn add(&mut self, prefix: u16, last: u8) {
        if self.entries.len() >= MAX_ENTRIES {
            self.overflowed += 1;
            return;
        }
        let base = self.entries[prefix as usize];
        self.entries.push(Entry {
            prefix,
            last,
            first: base.first,
            len: base.len + 1,
        });
    }

    /// Append the bytes of `code` to `out`.
    fn emit(&self, code: u16, out: &mut Vec<u8>) {
        let entry = self.entries[code as usize];
        if entry.len == 1 {
            out.push(entry.last);
            return;
        }
        let start = out.len();
        out.resize(start + entry.len as usize, 0);
        let mut cur = code;
        for slot in out[start..].iter_mut().rev() {
            let e = self.entries[cur as usize];
            *slot = e.last;
            cur = e.prefix;
        }
    }
}

/// Decode an LZW stream and undo its predictor.
pub fn decode(data: &[u8], params: &LzwParams) -> Result<Vec<u8>> {
    decode_with_diagnostics(data, params, &mut Diagnostics::new())
}

pub fn decode_with_diagnostics(
    data: &[u8],
    params: &LzwParams,
    diag: &mut Diagnostics,
) -> Result<Vec<u8>> {
    let out = decode_codes(data, params.early_change, diag)?;
    if params.predictor.is_identity() {
        Ok(out)
    } else {
        predictor::unfilter(&out, &params.predictor)
    }
}

fn decode_codes(data: &[u8], early_change: bool, diag: &mut Diagnostics) -> Result<Vec<u8>> {
    let mut reader = BitReader::new(data);
    let mut table = Table::new();
    let mut out = Vec::with_capacity(data.len() * 3);
    let mut prev: Option<u16> = None;

    loop {
        let width = code_width(table.len(), early_change);
        let Some(code) = reader.read(width) else {
            return Err(FilterError::MissingStopCode);
        };
        let code = code as u16;
        match code {
            CLEAR_TABLE => {
                table.reset();
                prev = None;
                continue;
            }
            END_OF_DATA => break,
            _ => {}
        }

        let known = (code as usize) < table.len();
        match prev {
            Some(p) if known => {
                let first = table.entries[code as usize].first;
                table.add(p, first);
            }
            // the code being defined right now: prev + first byte of prev
            Some(p) if code as usize == table.len() => {
                let first = table.entries[p as usize].first;
                table.add(p, first);
                if (code as usize) >= table.len() {
                    return Err(FilterError::InvalidLzwCode {
                        code,
                        table_len: table.len(),
                    });
                }
            }
            None if known => {}
            _ => {
                return Err(FilterError::InvalidLzwCode {
                    code,
                    table_len: table.len(),
                });
            }
        }
        table.emit(code, &mut out);
        prev = Some(code);
    }

    if table.overflowed > 0 {
        diag.warn(Warning::LzwTableOverflow {
            ignored: table.overflowed,
        });
    }
    Ok(out)
}

/// Encode `data` as an LZW stream.
///
/// The stream opens with a clear code, emits another whenever the table
/// fills up, and ends with the end-of-data code.
pub fn encode(data: &[u8], early_change: bool) -> Vec<u8> {
    let mut writer = BitWriter::with_capacity(data.len() / 2 + 4);
    let mut dict: FxHashMap<(u16, u8), u16> = FxHashMap::default();
    let mut next_code = FIRST_DYNAMIC;

    writer.write(u32::from(CLEAR_TABLE), code_width(next_code as usize - 1, early_change));

    let mut pending: Option<u16> = None;
    for &byte in data {
        let Some(w) = pending else {
            pending = Some(u16::from(byte));
            continue;
        };
        if let Some(&code) = dict.get(&(w, byte)) {
            pending = Some(code);
            continue;
        }
        writer.write(u32::from(w), code_width(next_code as usize - 1, early_change));
        dict.insert((w, byte), next_code);
        next_code += 1;
        if next_code as usize == MAX_ENTRIES {
            writer.write(u32::from(CLEAR_TABLE), code_width(next_code as usize - 1, early_change));
            dict.clear();
            next_code = FIRST_DYNAMIC;
        }
        pending = Some(u16::from(byte));
    }

    if let Some(w) = pending {
        writer.write(u32::from(w), code_width(next_code as usize - 1, early_change));
        // the decoder adds an entry on reading the final code
        next_code += 1;
    }
    writer.write(u32::from(END_OF_DATA), code_width(next_code as usize - 1, early_change));
    writer.finish()
}

/// List the codes in an LZW stream up to and including end-of-data.
///
/// Useful for inspecting how a stream was packed without expanding it.
pub fn read_codes(data: &[u8], early_change: bool) -> Result<Vec<u16>> {
    let mut reader = BitReader::new(data);
    let mut table_len = FIRST_DYNAMIC as usize;
    let mut have_prev = false;
    let mut codes = Vec::new();
    loop {
        let Some(code) = reader.read(code_width(table_len, early_change)) else {
            return Err(FilterError::MissingStopCode);
        };
        let code = code as u16;
        codes.push(code);
        match code {
            CLEAR_TABLE => {
                table_len = FIRST_DYNAMIC as usize;
                have_prev = false;
            }
            END_OF_DATA => return Ok(codes),
            _ => {
                if code as usize > table_len || (!have_prev && code as usize == table_len) {
                    return Err(FilterError::InvalidLzwCode { code, table_len });
                }
                if have_prev && table_len < MAX_ENTRIES {
                    table_len += 1;
                }
                have_prev = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_switch_one_code_early() {
        assert_eq!(code_width(510, true), 9);
        assert_eq!(code_width(511, true), 10);
        assert_eq!(code_width(511, false), 9);
        assert_eq!(code_width(512, false), 10);
        assert_eq!(code_width(2047, true), 12);
        assert_eq!(code_width(4096, false), 12);
    }

    #[test]
    fn empty_input_is_clear_then_end() {
        let encoded = encode(b"", true);
        assert_eq!(encoded, vec![0x80, 0x40, 0x40]);
        assert_eq!(read_codes(&encoded, true).unwrap(), vec![256, 257]);
        assert!(decode(&encoded, &LzwParams::default()).unwrap().is_empty());
    }

    #[test]
    fn repeated_byte_uses_dynamic_codes() {
        let encoded = encode(b"AAAAAA", true);
        assert_eq!(
            read_codes(&encoded, true).unwrap(),
            vec![256, 65, 258, 259, 257]
        );
    }

    #[test]
    fn table_expands_prefix_chains() {
        let mut table = Table::new();
        table.add(u16::from(b'a'), b'b');
        table.add(258, b'c');
        let mut out = Vec::new();
        table.emit(259, &mut out);
        assert_eq!(out, b"abc");
        assert_eq!(table.entries[259].first, b'a');
    }

    #[test]
    fn full_table_ignores_insertions() {
        let mut table = Table::new();
        while table.len() < MAX_ENTRIES {
            table.add(u16::from(b'x'), b'y');
        }
        table.add(u16::from(b'x'), b'z');
        table.add(u16::from(b'x'), b'z');
        assert_eq!(table.len(), MAX_ENTRIES);
        assert_eq!(table.overflowed, 2);
    }
}
