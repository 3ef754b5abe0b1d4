//! Benchmarks for the state-variable filter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use hyper_tremolo::dsp::filter::SVFilter;
use hyper_tremolo::io::AudioBuffer;
use hyper_tremolo::ProcessSpec;

use crate::{stereo_signal, BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        let spec = ProcessSpec::new(SAMPLE_RATE, size, 2);
        let input = AudioBuffer::from_channels(&stereo_signal(size));
        let mut buffer = input.clone();

        let mut filter = SVFilter::lowpass(1500.0);
        filter.prepare(&spec);
        group.bench_with_input(BenchmarkId::new("lowpass", size), &size, |b, _| {
            b.iter(|| {
                buffer.as_block_mut().copy_from(&input.as_block());
                filter.process_block(black_box(&mut buffer.as_block_mut()));
            })
        });

        let mut filter = SVFilter::highpass(1500.0);
        filter.prepare(&spec);
        group.bench_with_input(BenchmarkId::new("highpass", size), &size, |b, _| {
            b.iter(|| {
                buffer.as_block_mut().copy_from(&input.as_block());
                filter.process_block(black_box(&mut buffer.as_block_mut()));
            })
        });
    }

    group.finish();
}
