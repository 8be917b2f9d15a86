//! Huffman coding.
//!
//! Builds a prefix code from byte frequencies: the two least frequent subtrees
//! are merged repeatedly until one tree remains, so frequent bytes end up near
//! the root with short codes.
//!
//! # Historical Context
//!
//! David Huffman (1952) developed this algorithm as a term paper at MIT.
//! It was the first practical algorithm for constructing optimal prefix codes.
//!
//! # Determinism
//!
//! The tree is never transmitted. The decoder rebuilds it from the same
//! [`FrequencyTable`], so construction must be a pure function of the table.
//! Ties between equal frequencies are broken by creation order: leaves are
//! created in byte-value order, merged nodes after them.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::bitio::{BitReader, BitWriter};
use crate::error::{Error, Result};
use crate::freq::FrequencyTable;
use crate::Codec;

/// Widest code that fits the code register.
const MAX_CODE_LEN: u32 = 64;

/// Huffman tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Leaf {
        symbol: u8,
        freq: u64,
    },
    Internal {
        left: Box<Node>,
        right: Box<Node>,
        freq: u64,
    },
}

impl Node {
    fn freq(&self) -> u64 {
        match self {
            Node::Leaf { freq, .. } => *freq,
            Node::Internal { freq, .. } => *freq,
        }
    }
}

/// Heap slot ordered by `(freq, order)`, smallest first.
struct Pending {
    order: usize,
    node: Node,
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap.
        other
            .node
            .freq()
            .cmp(&self.node.freq())
            .then_with(|| other.order.cmp(&self.order))
    }
}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pending {}

fn build_tree(table: &FrequencyTable) -> Result<Option<Node>> {
    // Every merged frequency is a partial sum of the counts, so a total that
    // fits in a u64 keeps the additions below from overflowing.
    table.total()?;

    let mut pq = BinaryHeap::new();
    let mut order = 0;
    for (s, &f) in table.counts().iter().enumerate() {
        if f > 0 {
            pq.push(Pending {
                order,
                node: Node::Leaf {
                    symbol: s as u8,
                    freq: f,
                },
            });
            order += 1;
        }
    }

    if pq.len() == 1 {
        // A lone symbol still needs a 1-bit code: pair it with an empty leaf.
        let only = match pq.pop() {
            Some(p) => p.node,
            None => return Ok(None),
        };
        let freq = only.freq();
        return Ok(Some(Node::Internal {
            left: Box::new(only),
            right: Box::new(Node::Leaf { symbol: 0, freq: 0 }),
            freq,
        }));
    }

    while pq.len() > 1 {
        let (Some(left), Some(right)) = (pq.pop(), pq.pop()) else {
            break;
        };
        let freq = left.node.freq() + right.node.freq();
        pq.push(Pending {
            order,
            node: Node::Internal {
                left: Box::new(left.node),
                right: Box::new(right.node),
                freq,
            },
        });
        order += 1;
    }

    Ok(pq.pop().map(|p| p.node))
}

/// Per-byte code assignment derived from a Huffman tree.
#[derive(Debug, Clone)]
pub struct CodeTable {
    codes: [u64; 256],
    lengths: [u32; 256],
}

impl CodeTable {
    fn from_tree(root: &Node) -> Result<Self> {
        let mut table = Self {
            codes: [0; 256],
            lengths: [0; 256],
        };
        table.assign(root, 0, 0)?;
        Ok(table)
    }

    fn assign(&mut self, node: &Node, code: u64, len: u32) -> Result<()> {
        match node {
            Node::Leaf { symbol, freq } => {
                // The placeholder leaf of a single-symbol tree gets no entry.
                if *freq > 0 && (len > 0 || *symbol != 0) {
                    self.codes[*symbol as usize] = code;
                    self.lengths[*symbol as usize] = len;
                }
                Ok(())
            }
            Node::Internal { left, right, .. } => {
                if len == MAX_CODE_LEN {
                    return Err(Error::CodeTooLong(len + 1));
                }
                self.assign(left, code << 1, len + 1)?;
                self.assign(right, (code << 1) | 1, len + 1)
            }
        }
    }

    /// Code and bit length for `symbol`, or `None` if it has no code.
    pub fn code(&self, symbol: u8) -> Option<(u64, u32)> {
        match self.lengths[symbol as usize] {
            0 => None,
            len => Some((self.codes[symbol as usize], len)),
        }
    }
}

/// Huffman encoder.
pub struct HuffmanEncoder {
    table: CodeTable,
}

impl HuffmanEncoder {
    /// Create a new Huffman encoder from symbol frequencies.
    ///
    /// # Errors
    /// Returns `Error::CodeTooLong` if the tree is deeper than 64 levels, and
    /// `Error::CorruptStream` if the counts overflow.
    pub fn new(frequencies: &FrequencyTable) -> Result<Self> {
        let table = match build_tree(frequencies)? {
            Some(root) => CodeTable::from_tree(&root)?,
            None => CodeTable {
                codes: [0; 256],
                lengths: [0; 256],
            },
        };
        Ok(Self { table })
    }

    /// The code assignment in use.
    pub fn code_table(&self) -> &CodeTable {
        &self.table
    }

    /// Pack the codes of `data` MSB first; returns `(payload, bit_count)`.
    ///
    /// Bytes without a code are skipped.
    pub fn encode(&self, data: &[u8]) -> (Vec<u8>, u64) {
        let mut out = BitWriter::with_capacity(data.len() / 2);
        for &s in data {
            if let Some((code, len)) = self.table.code(s) {
                out.write_bits(code, len);
            }
        }
        out.finish()
    }
}

/// Huffman decoder.
pub struct HuffmanDecoder {
    root: Option<Node>,
}

impl HuffmanDecoder {
    /// Create a new Huffman decoder from frequencies.
    ///
    /// # Errors
    /// Returns `Error::CorruptStream` if the counts overflow.
    pub fn new(frequencies: &FrequencyTable) -> Result<Self> {
        Ok(Self {
            root: build_tree(frequencies)?,
        })
    }

    /// Walk the tree for exactly `bit_count` bits of `payload`.
    ///
    /// # Errors
    /// Returns `Error::CorruptStream` if bits are present without a tree, or
    /// the last bit does not complete a code.
    pub fn decode(&self, payload: &[u8], bit_count: u64) -> Result<Vec<u8>> {
        let root = match self.root {
            Some(ref r) => r,
            None if bit_count == 0 => return Ok(Vec::new()),
            None => return Err(Error::CorruptStream("bits present for an empty table")),
        };

        // Each decoded byte consumes at least one bit of a real payload.
        let bound = bit_count.min(payload.len() as u64 * 8);
        let mut out = Vec::with_capacity(root.freq().min(bound) as usize);
        let mut bits = BitReader::new(payload);
        let mut curr = root;

        for _ in 0..bit_count {
            let bit = bits.read_bit();
            curr = match curr {
                Node::Internal { left, right, .. } => {
                    if bit == 0 {
                        left.as_ref()
                    } else {
                        right.as_ref()
                    }
                }
                Node::Leaf { .. } => return Err(Error::CorruptStream("leaf at tree root")),
            };

            if let Node::Leaf { symbol, freq } = curr {
                if *freq > 0 {
                    out.push(*symbol);
                }
                curr = root;
            }
        }

        if !std::ptr::eq(curr, root) {
            return Err(Error::CorruptStream("stream ends inside a code"));
        }
        Ok(out)
    }
}

/// Everything a Huffman decode needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanArtifact {
    /// Packed codes, zero-padded to a byte boundary.
    pub payload: Vec<u8>,
    /// Meaningful bits in `payload`.
    pub bit_count: u64,
    /// Table the tree was built from.
    pub frequencies: FrequencyTable,
}

/// Static Huffman coding as a [`Codec`].
#[derive(Debug, Clone, Copy, Default)]
pub struct HuffmanCodec;

impl HuffmanCodec {
    /// Create the codec.
    pub fn new() -> Self {
        Self
    }
}

impl Codec for HuffmanCodec {
    type Artifact = HuffmanArtifact;

    fn encode(&self, input: &[u8]) -> Result<HuffmanArtifact> {
        let frequencies = FrequencyTable::from_bytes(input);
        let encoder = HuffmanEncoder::new(&frequencies)?;
        let (payload, bit_count) = encoder.encode(input);
        log::debug!(
            "huffman encode: {} bytes -> {} bits, {} symbols",
            input.len(),
            bit_count,
            frequencies.distinct_symbols()
        );
        Ok(HuffmanArtifact {
            payload,
            bit_count,
            frequencies,
        })
    }

    fn decode(&self, artifact: &HuffmanArtifact) -> Result<Vec<u8>> {
        if artifact.bit_count > artifact.payload.len() as u64 * 8 {
            return Err(Error::TruncatedStream("bit count exceeds payload"));
        }
        let total = artifact.frequencies.total()?;
        if total > artifact.bit_count {
            return Err(Error::CorruptStream("table total exceeds bit count"));
        }
        let decoder = HuffmanDecoder::new(&artifact.frequencies)?;
        let out = decoder.decode(&artifact.payload, artifact.bit_count)?;
        if out.len() as u64 != total {
            return Err(Error::CorruptStream("decoded length differs from table total"));
        }
        log::debug!(
            "huffman decode: {} bits -> {} bytes",
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
    fn test_huffman_roundtrip() {
        let data = b"abracadabra";
        let counts = FrequencyTable::from_bytes(data);

        let encoder = HuffmanEncoder::new(&counts).unwrap();
        let (bits, bit_count) = encoder.encode(data);

        let decoder = HuffmanDecoder::new(&counts).unwrap();
        let decoded = decoder.decode(&bits, bit_count).unwrap();

        assert_eq!(data.to_vec(), decoded);
        // 'a' is the most frequent byte and gets the shortest code.
        let (_, a_len) = encoder.code_table().code(b'a').unwrap();
        for &s in b"bcdr" {
            let (_, len) = encoder.code_table().code(s).unwrap();
            assert!(a_len <= len);
        }
    }

    #[test]
    fn test_codes_are_prefix_free() {
        let counts = FrequencyTable::from_bytes(b"the quick brown fox jumps over the lazy dog");
        let encoder = HuffmanEncoder::new(&counts).unwrap();
        let codes: Vec<(u64, u32)> = (0..=255u8)
            .filter_map(|s| encoder.code_table().code(s))
            .collect();
        for (i, &(a, la)) in codes.iter().enumerate() {
            for &(b, lb) in &codes[i + 1..] {
                let shorter = la.min(lb);
                assert_ne!(a >> (la - shorter), b >> (lb - shorter));
            }
        }
    }

    #[test]
    fn test_single_symbol() {
        let data = vec![b'Z'; 37];
        let artifact = HuffmanCodec.encode(&data).unwrap();
        assert_eq!(artifact.bit_count, 37);
        assert_eq!(artifact.payload.len(), 5);
        assert_eq!(HuffmanCodec.decode(&artifact).unwrap(), data);
    }

    #[test]
    fn test_single_zero_byte_symbol() {
        let data = vec![0u8; 10];
        let artifact = HuffmanCodec.encode(&data).unwrap();
        assert_eq!(artifact.bit_count, 10);
        assert_eq!(HuffmanCodec.decode(&artifact).unwrap(), data);
    }

    #[test]
    fn test_empty() {
        let artifact = HuffmanCodec.encode(&[]).unwrap();
        assert!(artifact.payload.is_empty());
        assert_eq!(artifact.bit_count, 0);
        assert!(HuffmanCodec.decode(&artifact).unwrap().is_empty());
    }

    #[test]
    fn test_bit_count_beyond_payload() {
        let mut artifact = HuffmanCodec.encode(b"abracadabra").unwrap();
        artifact.bit_count = artifact.payload.len() as u64 * 8 + 1;
        assert!(matches!(
            HuffmanCodec.decode(&artifact),
            Err(Error::TruncatedStream(_))
        ));
    }

    #[test]
    fn test_dropped_bit_is_detected() {
        let mut artifact = HuffmanCodec.encode(b"abracadabra").unwrap();
        artifact.bit_count -= 1;
        assert!(matches!(
            HuffmanCodec.decode(&artifact),
            Err(Error::CorruptStream(_))
        ));
    }

    #[test]
    fn test_overflowing_table_is_rejected() {
        for (a, b) in [(u64::MAX - 1, 1), (u64::MAX, 5)] {
            let mut counts = [0u64; 256];
            counts[b'a' as usize] = a;
            counts[b'b' as usize] = b;
            let artifact = HuffmanArtifact {
                payload: Vec::new(),
                bit_count: 0,
                frequencies: FrequencyTable::from_counts(counts),
            };
            assert!(matches!(
                HuffmanCodec.decode(&artifact),
                Err(Error::CorruptStream(_))
            ));
        }

        let mut counts = [0u64; 256];
        counts[0] = u64::MAX;
        counts[1] = u64::MAX;
        let table = FrequencyTable::from_counts(counts);
        assert!(HuffmanEncoder::new(&table).is_err());
        assert!(HuffmanDecoder::new(&table).is_err());
    }

    #[test]
    fn test_table_larger_than_payload_is_rejected() {
        let mut counts = [0u64; 256];
        counts[b'x' as usize] = 1 << 40;
        counts[b'y' as usize] = 1;
        let artifact = HuffmanArtifact {
            payload: vec![0],
            bit_count: 8,
            frequencies: FrequencyTable::from_counts(counts),
        };
        assert!(matches!(
            HuffmanCodec.decode(&artifact),
            Err(Error::CorruptStream(_))
        ));

        // The decoder alone sizes its buffer from the bits, not the table.
        // The rarer byte is popped first and takes the 0 branch.
        let decoder = HuffmanDecoder::new(&artifact.frequencies).unwrap();
        assert_eq!(decoder.decode(&[0], 8).unwrap(), vec![b'y'; 8]);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_huffman_roundtrip(input in prop::collection::vec(any::<u8>(), 0..300)) {
            let artifact = HuffmanCodec.encode(&input).unwrap();
            prop_assert_eq!(artifact.frequencies.total().unwrap(), input.len() as u64);
            prop_assert_eq!(HuffmanCodec.decode(&artifact).unwrap(), input);
        }
    }
}
