use std::f64::consts::{FRAC_PI_2, PI, TAU};

use hyper_tremolo::io::AudioBuffer;
use hyper_tremolo::params::TremoloShape;
use hyper_tremolo::{HarmonicTremolo, HyperTremolo, Parameters, ProcessSpec, Processor};

/// Shortest distance between two angles.
fn angle_between(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(TAU);
    d.min(TAU - d)
}

/// Leave the two bands at an unrelated phase relationship.
fn scrambled(seed_ratio: f64, blocks: usize) -> HarmonicTremolo {
    let mut harmonic = HarmonicTremolo::dual();
    harmonic.prepare(&ProcessSpec::new(48_000.0, 256, 2));
    harmonic.set_tremolo_rate(3.3);
    harmonic.set_tremolo_ratio(seed_ratio);
    let mut buffer = AudioBuffer::new(2, 256);
    for _ in 0..blocks {
        harmonic.process_replacing(&mut buffer.as_block_mut(), false);
    }
    harmonic
}

#[test]
fn sync_hits_target_for_every_ratio_and_prior_phase() {
    let targets = [0.0, 0.4, FRAC_PI_2, PI, 5.9];
    for &ratio in &[1.0, 0.5, 3.7] {
        for (i, &target) in targets.iter().enumerate() {
            let mut harmonic = scrambled(1.0 + 0.37 * i as f64, 3 + 5 * i);
            harmonic.set_tremolo_ratio(ratio);
            harmonic.set_tremolo_phase(target);

            harmonic.sync();

            let phases = harmonic.band_phases();
            assert!(
                angle_between(phases.difference, target) < 1e-6,
                "ratio {} target {}: difference {}",
                ratio,
                target,
                phases.difference
            );
            assert!(
                angle_between(phases.audible_difference(), target) < 1e-6,
                "ratio {} target {}: residual offset {}",
                ratio,
                target,
                phases.offset
            );
        }
    }
}

#[test]
fn sync_is_repeatable() {
    let mut harmonic = scrambled(2.2, 7);
    harmonic.set_tremolo_phase(1.0);
    harmonic.sync();
    let first = harmonic.band_phases().difference;
    harmonic.sync();
    let second = harmonic.band_phases().difference;
    assert!(angle_between(first, second) < 1e-9, "{} vs {}", first, second);
}

const SAMPLE_RATE: f64 = 48_000.0;
const BLOCK: usize = 512;
const RATE_HZ: f64 = 2.5;

/// Unit-amplitude exponential sweep, 20 Hz to 20 kHz over ten seconds.
fn sweep(len: usize) -> Vec<f32> {
    let mut phase = 0.0f64;
    (0..len)
        .map(|n| {
            let t = n as f64 / SAMPLE_RATE;
            let hz = 20.0 * 1000f64.powf(t / 10.0);
            phase += TAU * hz / SAMPLE_RATE;
            phase.sin() as f32
        })
        .collect()
}

/// Run `input` through a synced processor that outputs only one band.
///
/// With the crossover mix at 0 each band sees the unfiltered input, so the
/// output is the input times that band's modulation envelope.
fn render_band(input: &[f32], balance: f64) -> Vec<f32> {
    let params = Parameters {
        tremolo_rate: RATE_HZ,
        tremolo_ratio: 1.0,
        tremolo_phase: FRAC_PI_2,
        through_zero: false,
        tremolo_shape: TremoloShape::Sine,
        mix: 1.0,
        crossover_mix: 0.0,
        crossover_balance: balance,
        ..Parameters::default()
    };
    let mut processor = HyperTremolo::with_parameters(&params);
    processor.prepare(&ProcessSpec::new(SAMPLE_RATE, BLOCK, 1));
    processor.sync();

    let mut buffer = AudioBuffer::new(1, BLOCK);
    let mut output = Vec::with_capacity(input.len());
    for chunk in input.chunks(BLOCK) {
        buffer.channel_mut(0)[..chunk.len()].copy_from_slice(chunk);
        processor.process_replacing(&mut buffer.block_mut(chunk.len()), false);
        output.extend_from_slice(&buffer.channel(0)[..chunk.len()]);

        let phases = processor.band_phases();
        assert!(
            angle_between(phases.audible_difference(), FRAC_PI_2) < 1e-3,
            "bands drifted to {} after {} samples",
            phases.audible_difference(),
            output.len()
        );
    }
    output
}

#[test]
fn rendered_high_band_leads_low_band_by_a_quarter_cycle() {
    let len = (10.0 * SAMPLE_RATE) as usize;
    let input = sweep(len);
    let low = render_band(&input, 0.0);
    let high = render_band(&input, 1.0);

    // One quarter of the LFO period
    let lag = (SAMPLE_RATE / RATE_HZ / 4.0) as usize;
    let envelope = |out: &[f32], n: usize| 2.0 * f64::from(out[n] / input[n]) - 1.0;

    let mut checked = 0;
    for n in 0..len - lag {
        if input[n].abs() < 0.05 || input[n + lag].abs() < 0.05 {
            continue;
        }
        let high_now = envelope(&high, n);
        let low_later = envelope(&low, n + lag);
        assert!(
            (high_now - low_later).abs() < 1.1e-3,
            "sample {}: high envelope {} vs low envelope a quarter cycle later {}",
            n,
            high_now,
            low_later
        );
        checked += 1;
    }
    assert!(checked > len / 2, "only {} samples were measurable", checked);

    assert!(low.iter().chain(&high).all(|s| s.is_finite()));
}

#[test]
fn phase_target_waits_for_sync() {
    let mut processor = HyperTremolo::dual();
    processor.prepare(&ProcessSpec::new(SAMPLE_RATE, BLOCK, 2));
    processor.set_tremolo_phase(PI);

    let mut buffer = AudioBuffer::new(2, BLOCK);
    for _ in 0..10 {
        processor.process_replacing(&mut buffer.as_block_mut(), false);
    }
    let before = processor.band_phases().audible_difference();
    assert!(angle_between(before, FRAC_PI_2) < 1e-9, "moved to {} without sync", before);

    processor.sync();
    let after = processor.band_phases().audible_difference();
    assert!(angle_between(after, PI) < 1e-6, "sync landed on {}", after);

    processor.reset();
    let reset = processor.band_phases().audible_difference();
    assert!(angle_between(reset, FRAC_PI_2) < 1e-12, "reset landed on {}", reset);
}
