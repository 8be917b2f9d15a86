//! Burrows-Wheeler Transform.
//!
//! The forward transform sorts all circular rotations of the block and keeps
//! the last column, which clusters bytes that share a following context. It is
//! a permutation: output length equals input length, and one index (the row
//! holding the unrotated block) is enough to undo it.
//!
//! # Inversion
//!
//! The inverse uses LF-mapping. The first column of the sorted table is the
//! last column sorted, and the `j`-th occurrence of byte `b` in the last column
//! is the same text position as the `j`-th occurrence of `b` in the first.
//! Following that correspondence from the original row walks the block front
//! to back in linear time, with no sorting.

use crate::error::{Error, Result};
use crate::rank::rotation_order;
use crate::Codec;

/// Output of the forward transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BwtResult {
    /// Last column of the sorted rotation table.
    pub transformed: Vec<u8>,
    /// Row of the sorted table that holds the untransformed block.
    pub original_index: usize,
}

/// Forward transform.
pub fn transform(input: &[u8]) -> BwtResult {
    let n = input.len();
    if n == 0 {
        return BwtResult {
            transformed: Vec::new(),
            original_index: 0,
        };
    }

    let sa = rotation_order(input);
    let mut transformed = Vec::with_capacity(n);
    let mut original_index = 0;
    for (row, &start) in sa.iter().enumerate() {
        if start == 0 {
            original_index = row;
        }
        transformed.push(input[(start + n - 1) % n]);
    }

    BwtResult {
        transformed,
        original_index,
    }
}

/// Inverse transform.
///
/// # Errors
/// Returns `Error::BwtIndexOutOfRange` if `original_index` does not address a
/// row of a non-empty block.
pub fn inverse(result: &BwtResult) -> Result<Vec<u8>> {
    let bwt = &result.transformed;
    let n = bwt.len();
    if n == 0 {
        return Ok(Vec::new());
    }
    if result.original_index >= n {
        return Err(Error::BwtIndexOutOfRange {
            index: result.original_index,
            len: n,
        });
    }

    let mut positions = [0usize; 256];
    for &b in bwt {
        positions[b as usize] += 1;
    }
    let mut acc = 0;
    for slot in positions.iter_mut() {
        let count = *slot;
        *slot = acc;
        acc += count;
    }

    // next[first-column row] = last-column row of the same text position.
    let mut next = vec![0usize; n];
    for (row, &b) in bwt.iter().enumerate() {
        next[positions[b as usize]] = row;
        positions[b as usize] += 1;
    }

    let mut out = Vec::with_capacity(n);
    let mut idx = result.original_index;
    for _ in 0..n {
        idx = next[idx];
        out.push(bwt[idx]);
    }
    Ok(out)
}

/// Burrows-Wheeler Transform as a [`Codec`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BwtCodec;

impl BwtCodec {
    /// Create the codec.
    pub fn new() -> Self {
        Self
    }
}

impl Codec for BwtCodec {
    type Artifact = BwtResult;

    fn encode(&self, input: &[u8]) -> Result<BwtResult> {
        let result = transform(input);
        log::debug!(
            "bwt encode: {} bytes, original index {}",
            input.len(),
            result.original_index
        );
        Ok(result)
    }

    fn decode(&self, artifact: &BwtResult) -> Result<Vec<u8>> {
        let out = inverse(artifact)?;
        log::debug!("bwt decode: {} bytes", out.len());
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_banana() {
        let result = transform(b"banana");
        assert_eq!(result.transformed, b"nnbaaa".to_vec());
        assert_eq!(result.original_index, 3);
        assert_eq!(inverse(&result).unwrap(), b"banana".to_vec());
    }

    #[test]
    fn test_empty_and_single() {
        let empty = transform(&[]);
        assert!(empty.transformed.is_empty());
        assert_eq!(empty.original_index, 0);
        assert!(inverse(&empty).unwrap().is_empty());

        let one = transform(&[7]);
        assert_eq!(one.transformed, vec![7]);
        assert_eq!(one.original_index, 0);
        assert_eq!(inverse(&one).unwrap(), vec![7]);
    }

    #[test]
    fn test_index_out_of_range() {
        let bad = BwtResult {
            transformed: b"nnbaaa".to_vec(),
            original_index: 6,
        };
        assert!(matches!(
            inverse(&bad),
            Err(Error::BwtIndexOutOfRange { index: 6, len: 6 })
        ));
    }

    #[test]
    fn test_clusters_repeats() {
        let input: Vec<u8> = b"ABRACADABRA".iter().cycle().take(1000).copied().collect();
        let result = transform(&input);
        assert_eq!(result.transformed.len(), input.len());
        let runs = result
            .transformed
            .windows(2)
            .filter(|w| w[0] != w[1])
            .count();
        assert!(runs < input.len() / 4);
        assert_eq!(inverse(&result).unwrap(), input);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_bwt_roundtrip(input in prop::collection::vec(any::<u8>(), 0..200)) {
            let result = transform(&input);
            prop_assert_eq!(result.transformed.len(), input.len());
            prop_assert_eq!(inverse(&result).unwrap(), input);
        }

        #[test]
        fn prop_bwt_roundtrip_small_alphabet(input in prop::collection::vec(0u8..3, 0..200)) {
            let result = transform(&input);
            prop_assert_eq!(inverse(&result).unwrap(), input);
        }
    }
}
