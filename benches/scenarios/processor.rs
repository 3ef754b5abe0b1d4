//! Benchmarks for the complete processor as a host drives it.

use std::collections::VecDeque;
use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use hyper_tremolo::io::{AudioBuffer, ControlMessage};
use hyper_tremolo::{HyperTremolo, Parameters, ProcessSpec, Processor};

use crate::{stereo_signal, BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_processor(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/processor");

    for &size in BLOCK_SIZES {
        let spec = ProcessSpec::new(SAMPLE_RATE, size, 2);
        let input = AudioBuffer::from_channels(&stereo_signal(size));
        let mut output = AudioBuffer::new(2, size);

        // Default settings, parameters untouched between blocks
        let mut processor = HyperTremolo::dual();
        processor.prepare(&spec);
        group.bench_with_input(BenchmarkId::new("steady", size), &size, |b, _| {
            b.iter(|| {
                processor.process(
                    &input.as_block(),
                    black_box(&mut output.as_block_mut()),
                    false,
                );
            })
        });

        // A fresh snapshot per block, as from an automating host
        let mut processor = HyperTremolo::dual();
        processor.prepare(&spec);
        let mut queue = VecDeque::new();
        let mut params = Parameters::default();
        group.bench_with_input(BenchmarkId::new("automated", size), &size, |b, _| {
            b.iter(|| {
                params.crossover_frequency = if params.crossover_frequency > 1000.0 {
                    800.0
                } else {
                    2000.0
                };
                queue.push_back(ControlMessage::Params(params));
                processor.drain_messages(&mut queue);
                processor.process(
                    &input.as_block(),
                    black_box(&mut output.as_block_mut()),
                    false,
                );
            })
        });
    }

    group.finish();
}
