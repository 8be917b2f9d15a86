//! Burrows-Wheeler Transform followed by Huffman coding.
//!
//! The BWT does not shrink anything by itself; it groups bytes by context so
//! that a downstream entropy coder sees a more skewed local distribution. This
//! is the classic front half of bzip2 without the move-to-front and run-length
//! stages.

use crate::bwt::{self, BwtResult};
use crate::error::Result;
use crate::huffman::{HuffmanArtifact, HuffmanCodec};
use crate::Codec;

/// Output of [`BwtHuffmanCodec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BwtHuffmanArtifact {
    /// Row of the unrotated block in the BWT table.
    pub original_index: usize,
    /// Huffman coding of the transformed block.
    pub huffman: HuffmanArtifact,
}

/// BWT then Huffman as a single [`Codec`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BwtHuffmanCodec;

impl BwtHuffmanCodec {
    /// Create the codec.
    pub fn new() -> Self {
        Self
    }
}

impl Codec for BwtHuffmanCodec {
    type Artifact = BwtHuffmanArtifact;

    fn encode(&self, input: &[u8]) -> Result<BwtHuffmanArtifact> {
        let BwtResult {
            transformed,
            original_index,
        } = bwt::transform(input);
        let huffman = HuffmanCodec.encode(&transformed)?;
        Ok(BwtHuffmanArtifact {
            original_index,
            huffman,
        })
    }

    fn decode(&self, artifact: &BwtHuffmanArtifact) -> Result<Vec<u8>> {
        let transformed = HuffmanCodec.decode(&artifact.huffman)?;
        bwt::inverse(&BwtResult {
            transformed,
            original_index: artifact.original_index,
        })
    }
}
