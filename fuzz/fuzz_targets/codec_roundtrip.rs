#![no_main]
use codecs::{BwtCodec, BwtHuffmanCodec, Codec, HuffmanCodec, LzwCodec, RangeCodec};
use libfuzzer_sys::fuzz_target;

fn check<C: Codec>(codec: &C, input: &[u8]) {
    let artifact = codec.encode(input).unwrap();
    assert_eq!(codec.decode(&artifact).unwrap(), input);
}

fuzz_target!(|data: &[u8]| {
    check(&BwtCodec, data);
    check(&HuffmanCodec, data);
    check(&RangeCodec, data);
    check(&LzwCodec::new(), data);
    check(&BwtHuffmanCodec, data);
});
