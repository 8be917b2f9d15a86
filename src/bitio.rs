//! MSB-first bit packing.

/// Accumulates bits most-significant first into a byte buffer.
#[derive(Debug, Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    current: u8,
    filled: u8,
    bits_written: u64,
}

impl BitWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with room for `bytes` output bytes.
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bytes),
            ..Self::default()
        }
    }

    /// Append one bit (any nonzero value counts as 1).
    #[inline]
    pub fn write_bit(&mut self, bit: u8) {
        self.current = (self.current << 1) | (bit & 1);
        self.filled += 1;
        self.bits_written += 1;
        if self.filled == 8 {
            self.bytes.push(self.current);
            self.current = 0;
            self.filled = 0;
        }
    }

    /// Append `count` copies of `bit`.
    pub fn write_repeated(&mut self, bit: u8, count: u64) {
        for _ in 0..count {
            self.write_bit(bit);
        }
    }

    /// Append the low `len` bits of `code`, highest first.
    pub fn write_bits(&mut self, code: u64, len: u32) {
        for i in (0..len).rev() {
            self.write_bit(((code >> i) & 1) as u8);
        }
    }

    /// Number of meaningful bits written so far.
    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Zero-pad the final byte and return `(payload, bit_count)`.
    pub fn finish(mut self) -> (Vec<u8>, u64) {
        if self.filled > 0 {
            self.bytes.push(self.current << (8 - self.filled));
        }
        (self.bytes, self.bits_written)
    }
}

/// Reads bits most-significant first; yields zeros past the end of input.
#[derive(Debug)]
pub struct BitReader<'a> {
    bytes: &'a [u8],
    pos: u64,
}

impl<'a> BitReader<'a> {
    /// Read from the start of `bytes`.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Next bit, or 0 once the input is exhausted.
    #[inline]
    pub fn read_bit(&mut self) -> u8 {
        let byte = (self.pos / 8) as usize;
        let bit = match self.bytes.get(byte) {
            Some(&b) => (b >> (7 - (self.pos % 8) as u8)) & 1,
            None => 0,
        };
        self.pos += 1;
        bit
    }

    /// Bits consumed so far, including any zero fill past the end.
    pub fn position(&self) -> u64 {
        self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_pads_final_byte() {
        let mut w = BitWriter::new();
        w.write_bits(0b101, 3);
        let (bytes, bits) = w.finish();
        assert_eq!(bytes, vec![0b1010_0000]);
        assert_eq!(bits, 3);
    }

    #[test]
    fn test_reader_matches_writer() {
        let mut w = BitWriter::new();
        w.write_bits(0b1100_1010_1, 9);
        w.write_repeated(1, 4);
        let (bytes, bits) = w.finish();
        assert_eq!(bits, 13);

        let mut r = BitReader::new(&bytes);
        let read: Vec<u8> = (0..13).map(|_| r.read_bit()).collect();
        assert_eq!(read, vec![1, 1, 0, 0, 1, 0, 1, 0, 1, 1, 1, 1, 1]);
        // padding and past-the-end reads are zero
        assert_eq!(r.read_bit(), 0);
        for _ in 0..20 {
            assert_eq!(r.read_bit(), 0);
        }
    }
}
