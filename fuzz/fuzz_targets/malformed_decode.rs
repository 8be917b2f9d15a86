#![no_main]
use codecs::{
    BwtCodec, BwtResult, Codec, FrequencyTable, HuffmanArtifact, HuffmanCodec, LzwArtifact,
    LzwCodec, RangeArtifact, RangeCodec,
};
use codecs::range::MAX_TOTAL;
use libfuzzer_sys::fuzz_target;

// Arbitrary artifacts must decode or fail cleanly, never panic.
fuzz_target!(|data: (Vec<u8>, u16, [u64; 4])| {
    let (payload, index, model) = data;

    let _ = LzwCodec::new().decode(&LzwArtifact {
        payload: payload.clone(),
    });

    let _ = BwtCodec.decode(&BwtResult {
        transformed: payload.clone(),
        original_index: index as usize,
    });

    // Full-width counts reach the overflow and oversized-table paths.
    let mut counts = [0u64; 256];
    for (i, &c) in model.iter().enumerate() {
        counts[i * 64] = c;
    }
    let frequencies = FrequencyTable::from_counts(counts);
    let bit_count = (index as u64).min(payload.len() as u64 * 8);

    let _ = HuffmanCodec.decode(&HuffmanArtifact {
        payload: payload.clone(),
        bit_count,
        frequencies: frequencies.clone(),
    });

    // A valid range table up to 2^30 decodes that many symbols; cap it so
    // each run stays fast.
    if frequencies
        .total()
        .map_or(true, |t| t <= 1 << 16 || t > MAX_TOTAL)
    {
        let _ = RangeCodec.decode(&RangeArtifact {
            payload,
            bit_count,
            frequencies,
        });
    }
});
