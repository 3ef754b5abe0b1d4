//! Benchmarks for the phase-accumulating LFO.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use hyper_tremolo::dsp::oscillator::PhaseOscillator;
use hyper_tremolo::ProcessSpec;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let spec = ProcessSpec::new(SAMPLE_RATE, size, 1);
        let mut buffer = vec![0.0f32; size];

        // Sine - sin() per sample
        let mut osc = PhaseOscillator::sine();
        osc.prepare(&spec);
        osc.set_rate(2.5);
        group.bench_with_input(BenchmarkId::new("sine", size), &size, |b, _| {
            b.iter(|| {
                osc.render(black_box(&mut buffer));
            })
        });

        // Sawtooth - rem_euclid per sample
        let mut osc = PhaseOscillator::sawtooth();
        osc.prepare(&spec);
        osc.set_rate(2.5);
        group.bench_with_input(BenchmarkId::new("sawtooth", size), &size, |b, _| {
            b.iter(|| {
                osc.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
