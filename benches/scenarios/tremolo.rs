//! Benchmarks for a single tremolo band and the two-band harmonic tremolo.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use hyper_tremolo::dsp::oscillator::WaveShape;
use hyper_tremolo::effect::Tremolo;
use hyper_tremolo::io::AudioBuffer;
use hyper_tremolo::{HarmonicTremolo, ProcessSpec, Processor};

use crate::{stereo_signal, BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_tremolo(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/tremolo");

    for &size in BLOCK_SIZES {
        let spec = ProcessSpec::new(SAMPLE_RATE, size, 2);
        let input = AudioBuffer::from_channels(&stereo_signal(size));
        let mut buffer = input.clone();

        // === SINGLE BAND ===
        let mut tremolo = Tremolo::new(WaveShape::Sine);
        tremolo.set_rate(2.5);
        tremolo.prepare(&spec);
        group.bench_with_input(BenchmarkId::new("band", size), &size, |b, _| {
            b.iter(|| {
                buffer.as_block_mut().copy_from(&input.as_block());
                tremolo.process_replacing(black_box(&mut buffer.as_block_mut()), false);
            })
        });

        // === THROUGH-ZERO ===
        let mut tremolo = Tremolo::new(WaveShape::Sawtooth);
        tremolo.set_rate(2.5);
        tremolo.set_through_zero(true);
        tremolo.prepare(&spec);
        group.bench_with_input(BenchmarkId::new("band_through_zero", size), &size, |b, _| {
            b.iter(|| {
                buffer.as_block_mut().copy_from(&input.as_block());
                tremolo.process_replacing(black_box(&mut buffer.as_block_mut()), false);
            })
        });

        // === HARMONIC ===
        // crossover + two bands at 1:3.7
        let mut harmonic = HarmonicTremolo::dual();
        harmonic.set_tremolo_ratio(3.7);
        harmonic.prepare(&spec);
        group.bench_with_input(BenchmarkId::new("harmonic", size), &size, |b, _| {
            b.iter(|| {
                buffer.as_block_mut().copy_from(&input.as_block());
                harmonic.process_replacing(black_box(&mut buffer.as_block_mut()), false);
            })
        });
    }

    group.finish();
}
