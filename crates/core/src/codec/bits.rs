//! MSB-first bit reader and writer shared by the LZW and fax codecs.

/// Reads big-endian bit fields from a byte slice.
#[derive(Debug, Clone)]
pub(crate) struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BitReader<'a> {
    pub(crate) const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current position in bits from the start of the input.
    pub(crate) const fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn remaining(&self) -> usize {
        (self.data.len() * 8).saturating_sub(self.pos)
    }

    /// Look at the next `n` bits (n <= 24) without consuming them.
    /// Bits past the end of the input read as zero.
    pub(crate) fn peek(&self, n: u32) -> u32 {
        debug_assert!(n <= 24);
        let byte = self.pos / 8;
        let mut window: u32 = 0;
        for i in 0..4 {
            window = (window << 8) | u32::from(self.data.get(byte + i).copied().unwrap_or(0));
        }
        let shift = 32 - (self.pos % 8) as u32 - n;
        (window >> shift) & ((1u32 << n) - 1)
    }

    pub(crate) fn consume(&mut self, n: u32) {
        self.pos += n as usize;
    }

    /// Read `n` bits, or `None` when fewer than `n` remain.
    pub(crate) fn read(&mut self, n: u32) -> Option<u32> {
        if self.remaining() < n as usize {
            return None;
        }
        let value = self.peek(n);
        self.consume(n);
        Some(value)
    }

    /// True when every bit left in the input is zero (fill or padding).
    pub(crate) fn rest_is_zero(&self) -> bool {
        if self.remaining() == 0 {
            return true;
        }
        let byte = self.pos / 8;
        let head_mask = 0xffu8 >> (self.pos % 8);
        self.data[byte] & head_mask == 0 && self.data[byte + 1..].iter().all(|&b| b == 0)
    }

    pub(crate) fn align_to_byte(&mut self) {
        self.pos = self.pos.div_ceil(8) * 8;
    }
}

/// Packs big-endian bit fields into bytes; the last byte is zero padded.
#[derive(Debug, Default)]
pub(crate) struct BitWriter {
    out: Vec<u8>,
    acc: u32,
    nbits: u32,
}

impl BitWriter {
    pub(crate) fn with_capacity(bytes: usize) -> Self {
        Self {
            out: Vec::with_capacity(bytes),
            acc: 0,
            nbits: 0,
        }
    }

    pub(crate) fn write(&mut self, value: u32, width: u32) {
        debug_assert!(width <= 16 && value < (1 << width));
        self.acc = (self.acc << width) | value;
        self.nbits += width;
        while self.nbits >= 8 {
            self.nbits -= 8;
            self.out.push((self.acc >> self.nbits) as u8);
        }
        self.acc &= (1 << self.nbits) - 1;
    }

    pub(crate) fn finish(mut self) -> Vec<u8> {
        if self.nbits > 0 {
            self.out.push((self.acc << (8 - self.nbits)) as u8);
        }
        self.out
    }
}
