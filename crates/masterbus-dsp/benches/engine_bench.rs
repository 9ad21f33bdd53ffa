//! Criterion benchmarks for the mastering engines
//!
//! Run with: cargo bench
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use masterbus_core::StereoProcessor;
use masterbus_dsp::{MasteringCompressor, MasteringEq, SaturationMode};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

fn generate_test_signal(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5
        })
        .collect()
}

fn bench_engine<P: StereoProcessor>(c: &mut Criterion, name: &str, mut engine: P) {
    let mut group = c.benchmark_group(name);

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);

        group.bench_with_input(
            BenchmarkId::from_parameter(block_size),
            &block_size,
            |b, _| {
                let mut left = input.clone();
                let mut right = input.clone();
                b.iter(|| {
                    engine.process(black_box(&mut left), black_box(&mut right));
                    black_box(left[0])
                })
            },
        );
    }

    group.finish();
}

fn bench_eq(c: &mut Criterion) {
    let mut eq = MasteringEq::new(SAMPLE_RATE);
    eq.set_high_pass_enabled(true);
    eq.set_high_pass_frequency(30.0);
    eq.set_low_shelf_gain(2.0);
    eq.set_band_gain(0, -3.0);
    eq.set_band_gain(2, 2.5);
    eq.set_high_shelf_gain(1.5);
    eq.prepare(SAMPLE_RATE, 1024);
    bench_engine(c, "MasteringEq", eq);
}

fn bench_compressor(c: &mut Criterion) {
    let mut comp = MasteringCompressor::new(SAMPLE_RATE);
    comp.set_threshold_db(-18.0);
    comp.set_ratio(4.0);
    comp.set_attack_ms(5.0);
    comp.set_release_ms(120.0);
    comp.set_knee_db(6.0);
    comp.prepare(SAMPLE_RATE, 1024);
    bench_engine(c, "MasteringCompressor", comp);
}

fn bench_compressor_vintage(c: &mut Criterion) {
    let mut comp = MasteringCompressor::new(SAMPLE_RATE);
    comp.set_threshold_db(-18.0);
    comp.set_ratio(4.0);
    comp.set_mode(SaturationMode::Vintage);
    comp.prepare(SAMPLE_RATE, 1024);
    bench_engine(c, "MasteringCompressor/vintage", comp);
}

criterion_group!(benches, bench_eq, bench_compressor, bench_compressor_vintage);
criterion_main!(benches);
