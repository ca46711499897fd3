//! Decoder hot-path benchmark, mirroring the shape of
//! `examples/geldata-vtio/crates/vtio/benches/parser.rs`.

use criterion::{criterion_group, criterion_main, Criterion};

use boardterm_charset::CharsetRegistry;
use boardterm_decode::{Decoder, DecoderConfig};

fn plain_text(c: &mut Criterion) {
    let registry = CharsetRegistry::new();
    c.bench_function("decode_plain_run", |b| {
        b.iter(|| {
            let mut decoder = Decoder::new(DecoderConfig::default());
            for byte in "the quick brown fox jumps over the lazy dog\n".bytes() {
                decoder.feed(&registry, u32::from(byte));
            }
        });
    });
}

fn sgr_heavy(c: &mut Criterion) {
    let registry = CharsetRegistry::new();
    c.bench_function("decode_sgr_sequence", |b| {
        b.iter(|| {
            let mut decoder = Decoder::new(DecoderConfig::default());
            for byte in "\x1b[1;31;48:2::10:20:30mhello\x1b[0m".bytes() {
                decoder.feed(&registry, u32::from(byte));
            }
        });
    });
}

criterion_group!(benches, plain_text, sgr_heavy);
criterion_main!(benches);
