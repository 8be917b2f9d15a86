//! Circular rotation ranking by prefix doubling.
//!
//! Rotation `i` of `input` is `input[i], input[i+1 mod n], ...`. Ranks start as
//! single-byte buckets; each round sorts by `(rank[i], rank[i+k mod n])` and
//! renumbers, doubling `k` until it covers the whole block. `O(n log^2 n)`.

/// Order the circular rotations of `input` lexicographically.
///
/// Returns a permutation `sa` of `0..n` with rotation `sa[0]` smallest.
/// Rotations that are equal as strings appear adjacent in unspecified order.
pub fn rotation_order(input: &[u8]) -> Vec<usize> {
    let n = input.len();

    // Counting sort by the first byte.
    let mut starts = [0usize; 256];
    for &b in input {
        starts[b as usize] += 1;
    }
    let mut acc = 0;
    for slot in starts.iter_mut() {
        let count = *slot;
        *slot = acc;
        acc += count;
    }
    let mut sa = vec![0usize; n];
    for (i, &b) in input.iter().enumerate() {
        sa[starts[b as usize]] = i;
        starts[b as usize] += 1;
    }

    if n <= 1 {
        return sa;
    }

    let mut rank = vec![0usize; n];
    let mut current = 0;
    for w in 1..n {
        if input[sa[w]] != input[sa[w - 1]] {
            current += 1;
        }
        rank[sa[w]] = current;
    }

    let mut next_rank = vec![0usize; n];
    let mut k = 1;
    while k < n {
        // All rotations already distinct: further rounds cannot reorder.
        if current == n - 1 {
            break;
        }

        let key = |i: usize| (rank[i], rank[(i + k) % n]);
        sa.sort_unstable_by_key(|&i| key(i));

        current = 0;
        next_rank[sa[0]] = 0;
        for w in 1..n {
            if key(sa[w]) != key(sa[w - 1]) {
                current += 1;
            }
            next_rank[sa[w]] = current;
        }
        std::mem::swap(&mut rank, &mut next_rank);
        k *= 2;
    }

    sa
}
