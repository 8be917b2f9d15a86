//! Byte frequency tables shared by the Huffman and range coders.
//!
//! Both sides of an entropy coder derive their model from the same table, so
//! the table is the only side information the decoder needs besides the bits.
//! A table arriving with an artifact is untrusted: its counts may sum past
//! `u64::MAX`, so every sum is checked.

use crate::error::{Error, Result};

/// Occurrence count per byte value.
///
/// Invariant: `total()` equals the length of the sequence the table was
/// derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; 256],
}

impl FrequencyTable {
    /// Count every byte of `data`.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut counts = [0u64; 256];
        for &b in data {
            counts[b as usize] += 1;
        }
        Self { counts }
    }

    /// Build a table from raw counts.
    pub fn from_counts(counts: [u64; 256]) -> Self {
        Self { counts }
    }

    /// Count for a single byte value.
    pub fn get(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// All 256 counts, indexed by byte value.
    pub fn counts(&self) -> &[u64; 256] {
        &self.counts
    }

    /// Sum of all counts.
    ///
    /// # Errors
    /// Returns `Error::CorruptStream` if the counts overflow a `u64`, which no
    /// counted input can produce.
    pub fn total(&self) -> Result<u64> {
        self.counts
            .iter()
            .try_fold(0u64, |acc, &c| acc.checked_add(c))
            .ok_or(Error::CorruptStream("frequency total overflows"))
    }

    /// Number of byte values with a nonzero count.
    pub fn distinct_symbols(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// True when no byte was counted.
    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Cumulative intervals `[low[b], high[b])` over the byte alphabet.
    ///
    /// # Errors
    /// Same as [`total`](Self::total).
    pub fn cumulative(&self) -> Result<CumulativeTable> {
        let mut low = [0u64; 256];
        let mut high = [0u64; 256];
        let mut cum = 0u64;
        for (s, &c) in self.counts.iter().enumerate() {
            low[s] = cum;
            cum = cum
                .checked_add(c)
                .ok_or(Error::CorruptStream("frequency total overflows"))?;
            high[s] = cum;
        }
        Ok(CumulativeTable {
            low,
            high,
            total: cum,
        })
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self { counts: [0; 256] }
    }
}

/// Cumulative frequency intervals derived from a [`FrequencyTable`].
#[derive(Debug, Clone)]
pub struct CumulativeTable {
    low: [u64; 256],
    high: [u64; 256],
    total: u64,
}

impl CumulativeTable {
    /// Interval `(low, high)` for `symbol`; empty when its count is zero.
    #[inline]
    pub fn interval(&self, symbol: u8) -> (u64, u64) {
        (self.low[symbol as usize], self.high[symbol as usize])
    }

    /// Sum of all frequencies.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Symbol whose interval contains `scaled`, or `None` if `scaled >= total`.
    pub fn find(&self, scaled: u64) -> Option<u8> {
        if scaled >= self.total {
            return None;
        }
        // First symbol whose upper bound exceeds `scaled`; zero-width
        // intervals are skipped because their bound equals the previous one.
        let s = self.high.partition_point(|&h| h <= scaled);
        Some(s as u8)
    }
}
