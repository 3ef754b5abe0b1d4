//! Benchmarks for the dry/wet mixer.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use hyper_tremolo::dsp::mix::DryWetMixer;
use hyper_tremolo::io::AudioBuffer;
use hyper_tremolo::ProcessSpec;

use crate::{stereo_signal, BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_mix(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/mix");

    for &size in BLOCK_SIZES {
        let spec = ProcessSpec::new(SAMPLE_RATE, size, 2);
        let dry = AudioBuffer::from_channels(&stereo_signal(size));
        let mut wet = AudioBuffer::new(2, size);

        // Settled proportion - one multiply-add per sample
        let mut mixer = DryWetMixer::new(0.5);
        mixer.prepare(&spec);
        group.bench_with_input(BenchmarkId::new("steady", size), &size, |b, _| {
            b.iter(|| {
                mixer.push_dry_samples(&dry.as_block());
                mixer.mix_wet_samples(black_box(&mut wet.as_block_mut()));
            })
        });

        // Proportion moving every block - per-sample ramp
        let mut mixer = DryWetMixer::new(0.0);
        mixer.prepare(&spec);
        let mut flip = false;
        group.bench_with_input(BenchmarkId::new("ramping", size), &size, |b, _| {
            b.iter(|| {
                flip = !flip;
                mixer.set_wet_mix_proportion(if flip { 0.9 } else { 0.1 });
                mixer.push_dry_samples(&dry.as_block());
                mixer.mix_wet_samples(black_box(&mut wet.as_block_mut()));
            })
        });
    }

    group.finish();
}
