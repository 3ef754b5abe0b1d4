//! Benchmarks for smoothed gain.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use hyper_tremolo::dsp::gain::Gain;
use hyper_tremolo::io::AudioBuffer;
use hyper_tremolo::ProcessSpec;

use crate::{stereo_signal, BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_gain(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/gain");

    for &size in BLOCK_SIZES {
        let spec = ProcessSpec::new(SAMPLE_RATE, size, 2);
        let mut buffer = AudioBuffer::from_channels(&stereo_signal(size));

        let mut gain = Gain::new(-6.0);
        gain.prepare(&spec);
        group.bench_with_input(BenchmarkId::new("steady", size), &size, |b, _| {
            b.iter(|| {
                gain.process_block(black_box(&mut buffer.as_block_mut()));
            })
        });
    }

    group.finish();
}
