//! 32-bit arithmetic (range) coding.
//!
//! The whole message is coded as one sub-interval of `[0, 2^32)`. Each symbol
//! narrows `[low, high]` in proportion to its frequency; once the leading bit
//! of both bounds agrees it is settled and shifted out.
//!
//! ## Renormalization
//!
//! Three cases rescale the interval after every symbol:
//!
//! ```text
//! high <  HALF                      emit 0, then `pending` 1s
//! low  >= HALF                      emit 1, then `pending` 0s, subtract HALF
//! QUARTER <= low, high < 3*QUARTER  pending += 1, subtract QUARTER
//! ```
//!
//! The third case handles an interval straddling the midpoint: the next bit is
//! not known yet, but it will be the opposite of every deferred bit. Without it
//! `low` and `high` would converge on `HALF` and the interval would collapse.
//!
//! After renormalization `high - low + 1 > QUARTER`, so any total up to
//! `QUARTER` keeps every nonzero-frequency symbol at least one unit wide.

use crate::bitio::{BitReader, BitWriter};
use crate::error::{Error, Result};
use crate::freq::FrequencyTable;
use crate::Codec;

const HALF: u32 = 0x8000_0000;
const QUARTER: u32 = 0x4000_0000;
const THREE_QUARTERS: u32 = 0xC000_0000;

/// Largest frequency total the coder accepts.
pub const MAX_TOTAL: u64 = QUARTER as u64;

/// Narrow `[low, high]` to the sub-interval `[cum_low, cum_high)` of `total`.
#[inline]
fn narrow(low: u32, high: u32, cum_low: u64, cum_high: u64, total: u64) -> (u32, u32) {
    let range = (high - low) as u64 + 1;
    let new_high = low as u64 + range * cum_high / total - 1;
    let new_low = low as u64 + range * cum_low / total;
    (new_low as u32, new_high as u32)
}

/// Range encoder.
pub struct RangeEncoder {
    low: u32,
    high: u32,
    pending: u64,
    out: BitWriter,
}

impl RangeEncoder {
    /// Create a new encoder over the full 32-bit interval.
    pub fn new() -> Self {
        Self {
            low: 0,
            high: u32::MAX,
            pending: 0,
            out: BitWriter::new(),
        }
    }

    /// Encode a symbol occupying `[cum_low, cum_high)` of `total`.
    ///
    /// # Errors
    /// Returns `Error::InputTooLarge` if `total` exceeds [`MAX_TOTAL`], and
    /// `Error::CorruptStream` for an empty or out-of-range interval.
    pub fn encode(&mut self, cum_low: u64, cum_high: u64, total: u64) -> Result<()> {
        if total > MAX_TOTAL {
            return Err(Error::InputTooLarge {
                len: total,
                max: MAX_TOTAL,
            });
        }
        if cum_low >= cum_high || cum_high > total {
            return Err(Error::CorruptStream("empty symbol interval"));
        }

        (self.low, self.high) = narrow(self.low, self.high, cum_low, cum_high, total);

        loop {
            if self.high < HALF {
                self.emit(0);
            } else if self.low >= HALF {
                self.emit(1);
                self.low -= HALF;
                self.high -= HALF;
            } else if self.low >= QUARTER && self.high < THREE_QUARTERS {
                self.pending += 1;
                self.low -= QUARTER;
                self.high -= QUARTER;
            } else {
                break;
            }
            self.low <<= 1;
            self.high = (self.high << 1) | 1;
        }
        Ok(())
    }

    fn emit(&mut self, bit: u8) {
        self.out.write_bit(bit);
        self.out.write_repeated(bit ^ 1, self.pending);
        self.pending = 0;
    }

    /// Flush the bits that identify the final interval.
    ///
    /// Returns `(payload, bit_count)`.
    pub fn finish(mut self) -> (Vec<u8>, u64) {
        self.pending += 1;
        if self.low < QUARTER {
            self.emit(0);
        } else {
            self.emit(1);
        }
        self.out.finish()
    }
}

impl Default for RangeEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Range decoder.
pub struct RangeDecoder<'a> {
    low: u32,
    high: u32,
    value: u32,
    bits: BitReader<'a>,
}

impl<'a> RangeDecoder<'a> {
    /// Prime the decoder with the first 32 bits of `payload`.
    pub fn new(payload: &'a [u8]) -> Self {
        let mut bits = BitReader::new(payload);
        let mut value = 0u32;
        for _ in 0..32 {
            value = (value << 1) | bits.read_bit() as u32;
        }
        Self {
            low: 0,
            high: u32::MAX,
            value,
            bits,
        }
    }

    /// Position of the coded value within `total`.
    ///
    /// # Errors
    /// Returns `Error::CorruptStream` if `total` is zero or the value has left
    /// the interval.
    pub fn get_scaled(&self, total: u64) -> Result<u64> {
        if total == 0 {
            return Err(Error::CorruptStream("empty model"));
        }
        let offset = self
            .value
            .checked_sub(self.low)
            .ok_or(Error::CorruptStream("range value below interval"))?;
        let range = (self.high - self.low) as u64 + 1;
        Ok(((offset as u64 + 1) * total - 1) / range)
    }

    /// Consume the symbol occupying `[cum_low, cum_high)` of `total`.
    ///
    /// Arguments must be the ones the encoder used for this position, as
    /// located through [`get_scaled`](Self::get_scaled).
    pub fn decode(&mut self, cum_low: u64, cum_high: u64, total: u64) {
        (self.low, self.high) = narrow(self.low, self.high, cum_low, cum_high, total);

        loop {
            if self.high < HALF {
                // leading bits agree on 0
            } else if self.low >= HALF {
                self.low -= HALF;
                self.high -= HALF;
                self.value = self.value.wrapping_sub(HALF);
            } else if self.low >= QUARTER && self.high < THREE_QUARTERS {
                self.low -= QUARTER;
                self.high -= QUARTER;
                self.value = self.value.wrapping_sub(QUARTER);
            } else {
                break;
            }
            self.low <<= 1;
            self.high = (self.high << 1) | 1;
            self.value = (self.value << 1) | self.bits.read_bit() as u32;
        }
    }
}

/// Everything a range decode needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeArtifact {
    /// Coded bits, zero-padded to a byte boundary.
    pub payload: Vec<u8>,
    /// Meaningful bits in `payload`.
    pub bit_count: u64,
    /// Static model; its total is the number of symbols to decode.
    pub frequencies: FrequencyTable,
}

/// Static-model arithmetic coding as a [`Codec`].
///
/// The model is the byte histogram of the whole input, and its total is the
/// input length. The 32-bit interval only has room for totals up to
/// [`MAX_TOTAL`] (2^30), so longer inputs are rejected rather than coded with
/// a rescaled model.
///
/// # Errors
///
/// `encode` returns `Error::InputTooLarge` for inputs longer than
/// [`MAX_TOTAL`] bytes. `decode` returns the same error for a table whose
/// total exceeds it, and `Error::CorruptStream` for a table whose counts
/// overflow.
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeCodec;

impl RangeCodec {
    /// Create the codec.
    pub fn new() -> Self {
        Self
    }
}

impl Codec for RangeCodec {
    type Artifact = RangeArtifact;

    fn encode(&self, input: &[u8]) -> Result<RangeArtifact> {
        let frequencies = FrequencyTable::from_bytes(input);
        if input.is_empty() {
            return Ok(RangeArtifact {
                payload: Vec::new(),
                bit_count: 0,
                frequencies,
            });
        }

        let cum = frequencies.cumulative()?;
        let mut encoder = RangeEncoder::new();
        for &s in input {
            let (lo, hi) = cum.interval(s);
            encoder.encode(lo, hi, cum.total())?;
        }
        let (payload, bit_count) = encoder.finish();
        log::debug!("range encode: {} bytes -> {} bits", input.len(), bit_count);

        Ok(RangeArtifact {
            payload,
            bit_count,
            frequencies,
        })
    }

    fn decode(&self, artifact: &RangeArtifact) -> Result<Vec<u8>> {
        let cum = artifact.frequencies.cumulative()?;
        let total = cum.total();
        if total == 0 {
            return Ok(Vec::new());
        }
        if total > MAX_TOTAL {
            return Err(Error::InputTooLarge {
                len: total,
                max: MAX_TOTAL,
            });
        }
        if artifact.bit_count > artifact.payload.len() as u64 * 8 {
            return Err(Error::TruncatedStream("bit count exceeds payload"));
        }

        let mut decoder = RangeDecoder::new(&artifact.payload);
        // Symbols can cost well under a bit, so the table bounds the loop but
        // only a small reservation is made up front.
        let mut out = Vec::with_capacity(total.min(artifact.bit_count.max(64) * 8) as usize);
        for _ in 0..total {
            let scaled = decoder.get_scaled(total)?;
            let s = cum
                .find(scaled)
                .ok_or(Error::CorruptStream("range value beyond total"))?;
            out.push(s);
            let (lo, hi) = cum.interval(s);
            decoder.decode(lo, hi, total);
        }
        log::debug!(
            "range decode: {} bits -> {} bytes",
            artifact.bit_count,
            out.len()
        );
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_range_basic_roundtrip() {
        let data = b"abracadabra";
        let artifact = RangeCodec.encode(data).unwrap();
        assert!(!artifact.payload.is_empty());
        assert_eq!(artifact.payload.len() as u64, artifact.bit_count.div_ceil(8));
        assert_eq!(RangeCodec.decode(&artifact).unwrap(), data.to_vec());
    }

    #[test]
    fn test_skewed_distribution() {
        let mut data = vec![b'x'; 4999];
        data.insert(2500, b'y');
        let artifact = RangeCodec.encode(&data).unwrap();
        // One rare symbol costs ~12 bits; the rest are nearly free.
        assert!(artifact.bit_count < 64);
        assert_eq!(RangeCodec.decode(&artifact).unwrap(), data);
    }

    #[test]
    fn test_single_symbol() {
        let data = vec![9u8; 1000];
        let artifact = RangeCodec.encode(&data).unwrap();
        assert_eq!(RangeCodec.decode(&artifact).unwrap(), data);
    }

    #[test]
    fn test_empty() {
        let artifact = RangeCodec.encode(&[]).unwrap();
        assert!(artifact.payload.is_empty());
        assert_eq!(artifact.bit_count, 0);
        assert!(RangeCodec.decode(&artifact).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_oversized_total() {
        let mut encoder = RangeEncoder::new();
        assert!(matches!(
            encoder.encode(0, 1, MAX_TOTAL + 1),
            Err(Error::InputTooLarge { .. })
        ));
        assert!(matches!(
            encoder.encode(3, 3, 10),
            Err(Error::CorruptStream(_))
        ));
    }

    #[test]
    fn test_decode_rejects_bad_tables() {
        let mut counts = [0u64; 256];
        counts[0] = u64::MAX;
        counts[1] = 1;
        let artifact = RangeArtifact {
            payload: Vec::new(),
            bit_count: 0,
            frequencies: FrequencyTable::from_counts(counts),
        };
        assert!(matches!(
            RangeCodec.decode(&artifact),
            Err(Error::CorruptStream(_))
        ));

        counts[0] = MAX_TOTAL;
        let artifact = RangeArtifact {
            frequencies: FrequencyTable::from_counts(counts),
            ..artifact
        };
        assert!(matches!(
            RangeCodec.decode(&artifact),
            Err(Error::InputTooLarge { len, max: MAX_TOTAL }) if len == MAX_TOTAL + 1
        ));
    }

    #[test]
    fn test_straddling_interval_defers_bits() {
        // Two equiprobable symbols alternating keep the interval near HALF.
        let data: Vec<u8> = (0..512).map(|i| if i % 2 == 0 { 1 } else { 2 }).collect();
        let artifact = RangeCodec.encode(&data).unwrap();
        assert!(artifact.bit_count <= 512 + 2);
        assert_eq!(RangeCodec.decode(&artifact).unwrap(), data);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_range_roundtrip(input in prop::collection::vec(any::<u8>(), 0..300)) {
            let artifact = RangeCodec.encode(&input).unwrap();
            prop_assert_eq!(artifact.frequencies.total().unwrap(), input.len() as u64);
            prop_assert_eq!(RangeCodec.decode(&artifact).unwrap(), input);
        }

        #[test]
        fn prop_range_roundtrip_skewed(
            len in 2usize..2000,
            rare in any::<u8>(),
            common in any::<u8>(),
            at in any::<prop::sample::Index>(),
        ) {
            let mut input = vec![common; len];
            input[at.index(len)] = rare;
            let artifact = RangeCodec.encode(&input).unwrap();
            prop_assert_eq!(RangeCodec.decode(&artifact).unwrap(), input);
        }
    }
}
