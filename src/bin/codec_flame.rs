use codecs::{BwtCodec, BwtHuffmanCodec, Codec, HuffmanCodec, LzwCodec, RangeCodec};

fn run<C: Codec>(codec: &C, input: &[u8], iterations: usize) {
    for _ in 0..iterations {
        let artifact = match codec.encode(input) {
            Ok(a) => a,
            Err(e) => {
                log::error!("encode failed: {e}");
                std::process::exit(1);
            }
        };
        match codec.decode(&artifact) {
            Ok(out) if out == input => {}
            Ok(_) => {
                log::error!("roundtrip mismatch");
                std::process::exit(1);
            }
            Err(e) => {
                log::error!("decode failed: {e}");
                std::process::exit(1);
            }
        }
    }
}

fn main() {
    env_logger::init();

    let input = b"ABRACADABRA"
        .iter()
        .cycle()
        .take(100_000)
        .copied()
        .collect::<Vec<_>>();

    run(&BwtCodec, &input, 20);
    run(&HuffmanCodec, &input, 200);
    run(&RangeCodec, &input, 100);
    run(&LzwCodec::new(), &input, 200);
    run(&BwtHuffmanCodec, &input, 20);
    log::info!("all codecs round-tripped {} bytes", input.len());
}
