//! # Reversible Byte-Stream Codecs
//!
//! *Four classic lossless transforms with a common encode/decode contract.*
//!
//! ## Intuition First
//!
//! Compression exploits two kinds of redundancy. Some bytes are simply more
//! common than others (a skewed *distribution*), and some byte strings keep
//! coming back (*repetition*). Entropy coders such as Huffman and arithmetic
//! coding attack the first by spending fewer bits on frequent bytes. Dictionary
//! coders such as LZW attack the second by replacing repeats with references.
//! The Burrows-Wheeler Transform compresses nothing on its own: it reorders a
//! block so that repetition turns into local skew, which an entropy coder can
//! then exploit.
//!
//! ## Historical Context
//!
//! ```text
//! 1952  Huffman            Optimal prefix codes from symbol frequencies
//! 1976  Rissanen, Pasco    Arithmetic coding: fractional bits per symbol
//! 1978  Ziv, Lempel        LZ78: adaptive dictionary of previously seen phrases
//! 1984  Welch              LZW: LZ78 without literals, used in GIF and compress(1)
//! 1987  Witten et al.      Practical integer arithmetic coder with underflow bits
//! 1994  Burrows, Wheeler   Block-sorting transform, later the core of bzip2
//! ```
//!
//! ## Contract
//!
//! Every codec implements [`Codec`]: `encode` turns bytes into an artifact that
//! carries whatever side information its decoder needs, and `decode` inverts
//! it exactly, `decode(encode(x)) == x` for every `x` including the empty one.
//!
//! | Codec                | Side information                   |
//! |----------------------|------------------------------------|
//! | [`BwtCodec`]         | original row index                 |
//! | [`HuffmanCodec`]     | frequency table, bit count         |
//! | [`RangeCodec`]       | frequency table, bit count         |
//! | [`LzwCodec`]         | none (dictionary is rebuilt)       |
//! | [`BwtHuffmanCodec`]  | row index plus the Huffman artifact|
//!
//! Every call is a pure function of its arguments. Working buffers are owned by
//! the call, so codecs may be used from many threads without coordination.
//!
//! ## Failure Modes
//!
//! 1. **Malformed artifacts**: an index, code or bit count that no encoder
//!    could have produced is reported as an [`Error`], never as partial output.
//! 2. **Range coder precision**: a frequency total above 2^30 would leave some
//!    symbols without room in the 32-bit interval; such inputs are rejected.
//! 3. **LZW capacity**: codes are 16-bit, so the dictionary is bounded; see
//!    [`OverflowPolicy`].
//!
//! ## References
//!
//! - Huffman, D. (1952). "A Method for the Construction of Minimum-Redundancy Codes."
//! - Welch, T. (1984). "A Technique for High-Performance Data Compression."
//! - Witten, I., Neal, R., Cleary, J. (1987). "Arithmetic Coding for Data Compression."
//! - Burrows, M., Wheeler, D. (1994). "A Block-sorting Lossless Data Compression Algorithm."

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bitio;
pub mod bwt;
pub mod config;
pub mod error;
pub mod freq;
pub mod huffman;
pub mod lzw;
pub mod pipeline;
pub mod range;
pub mod rank;

pub use bwt::{BwtCodec, BwtResult};
pub use config::{LzwConfig, OverflowPolicy};
pub use error::{Error, Result};
pub use freq::FrequencyTable;
pub use huffman::{HuffmanArtifact, HuffmanCodec, HuffmanDecoder, HuffmanEncoder};
pub use lzw::{LzwArtifact, LzwCodec};
pub use pipeline::{BwtHuffmanArtifact, BwtHuffmanCodec};
pub use range::{RangeArtifact, RangeCodec, RangeDecoder, RangeEncoder};

/// A reversible byte transform.
pub trait Codec {
    /// Encoded form plus any metadata `decode` needs.
    type Artifact;

    /// Transform `input` into an artifact.
    fn encode(&self, input: &[u8]) -> Result<Self::Artifact>;

    /// Recover the exact bytes that produced `artifact`.
    fn decode(&self, artifact: &Self::Artifact) -> Result<Vec<u8>>;
}
