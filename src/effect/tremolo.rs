use crate::{
    dsp::{
        gain::multiply_in_place,
        mix::DryWetMixer,
        oscillator::{PhaseOscillator, WaveShape},
    },
    effect::node::{ProcessSpec, Processor},
    io::buffer::AudioBlockMut,
};

/*
Tremolo
=======

Amplitude modulation by one phase oscillator:

    out[ch][i] = in[ch][i] × a(i)          a(i) = shape(phase_at(i) + offset)

then crossfaded against the unmodulated input by the tremolo mix.

The modulation is rendered ONCE per block into a scratch buffer and shared by
every channel, so all channels pulse together and the oscillator advances by
exactly one block no matter the channel count.

Through-Zero
------------

A normal tremolo's modulator lives in [0, 1]: the signal dips towards silence
and comes back. Through-zero remaps it to [-1, 1]:

    a ← 2a − 1

so the signal's polarity flips on every trough. Each oscillator cycle then
contains two amplitude peaks, which is why hosts usually halve the rate when
they switch it on (see `Parameters::oscillator_rate`).

    phase     sine a    through-zero
    0         0.5       0.0
    π/2       1.0       1.0
    3π/2      0.0      -1.0
*/

/// Remap a unipolar modulator value to bipolar.
#[inline]
pub fn through_zero(a: f32) -> f32 {
    2.0 * a - 1.0
}

#[derive(Debug, Clone)]
pub struct Tremolo {
    oscillator: PhaseOscillator,
    through_zero: bool,
    mixer: DryWetMixer,
    modulation: Vec<f32>,
}

impl Tremolo {
    pub fn new(shape: WaveShape) -> Self {
        Self {
            oscillator: PhaseOscillator::new(shape),
            through_zero: false,
            mixer: DryWetMixer::new(1.0),
            modulation: Vec::new(),
        }
    }

    /// Frequency in Hz. Negative values freeze the oscillator.
    pub fn set_rate(&mut self, frequency_hz: f64) {
        self.oscillator.set_rate(frequency_hz);
    }

    pub fn set_shape(&mut self, shape: WaveShape) {
        self.oscillator.set_shape(shape);
    }

    /// Takes effect on the next rendered sample.
    pub fn set_through_zero(&mut self, enabled: bool) {
        self.through_zero = enabled;
    }

    /// Wet proportion, clamped to [0, 1] and ramped.
    pub fn set_mix(&mut self, mix: f64) {
        self.mixer.set_wet_mix_proportion(mix);
    }

    pub fn set_offset(&mut self, target: f64) {
        self.oscillator.set_offset(target);
    }

    pub fn set_offset_with_current(&mut self, target: f64, current: f64) {
        self.oscillator.set_offset_with_current(target, current);
    }

    pub fn offset(&self) -> f64 {
        self.oscillator.offset()
    }

    pub fn phase(&self) -> f64 {
        self.oscillator.phase()
    }

    pub fn advance(&mut self, delta: f64) {
        self.oscillator.advance(delta);
    }

    pub fn frequency(&self) -> f64 {
        self.oscillator.frequency()
    }

    pub fn shape(&self) -> WaveShape {
        self.oscillator.shape()
    }

    pub fn is_through_zero(&self) -> bool {
        self.through_zero
    }

    pub fn mix(&self) -> f64 {
        self.mixer.wet_mix_proportion()
    }

    pub fn oscillator(&self) -> &PhaseOscillator {
        &self.oscillator
    }

    /// Modulation factor this tremolo applies at `phase` (offset excluded).
    pub fn factor_at(&self, phase: f64) -> f32 {
        let a = self.oscillator.wave_shape(phase) as f32;
        if self.through_zero {
            through_zero(a)
        } else {
            a
        }
    }
}

impl Default for Tremolo {
    fn default() -> Self {
        Self::new(WaveShape::Sine)
    }
}

impl Processor for Tremolo {
    fn prepare(&mut self, spec: &ProcessSpec) {
        self.oscillator.prepare(spec);
        self.mixer.prepare(spec);
        self.modulation.clear();
        self.modulation.resize(spec.max_block_size, 0.0);
    }

    fn reset(&mut self) {
        self.oscillator.reset();
        self.mixer.reset();
    }

    fn process_replacing(&mut self, block: &mut AudioBlockMut<'_>, bypassed: bool) {
        if bypassed || block.num_channels() == 0 {
            return;
        }

        let num_samples = block.num_samples();
        debug_assert!(
            num_samples <= self.modulation.len(),
            "block of {} samples exceeds prepared size {}",
            num_samples,
            self.modulation.len()
        );
        if num_samples > self.modulation.len() {
            return;
        }

        self.mixer.push_dry_samples(&block.as_block());

        let modulation = &mut self.modulation[..num_samples];
        self.oscillator.render(modulation);
        if self.through_zero {
            for a in modulation.iter_mut() {
                *a = through_zero(*a);
            }
        }

        for channel in block.channels_mut() {
            multiply_in_place(channel, modulation);
        }

        self.mixer.mix_wet_samples(block);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::buffer::AudioBuffer;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn prepared(channels: usize, block: usize) -> Tremolo {
        let mut tremolo = Tremolo::default();
        tremolo.prepare(&ProcessSpec::new(48_000.0, block, channels));
        tremolo
    }

    #[test]
    fn test_through_zero_factor() {
        let mut tremolo = prepared(1, 64);
        tremolo.set_through_zero(true);

        assert!(tremolo.factor_at(0.0).abs() < 1e-6);
        assert!((tremolo.factor_at(FRAC_PI_2) - 1.0).abs() < 1e-6);
        assert!((tremolo.factor_at(3.0 * FRAC_PI_2) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_unipolar_factor() {
        let tremolo = prepared(1, 64);

        assert!((tremolo.factor_at(0.0) - 0.5).abs() < 1e-6);
        assert!((tremolo.factor_at(FRAC_PI_2) - 1.0).abs() < 1e-6);
        assert!(tremolo.factor_at(3.0 * FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_modulates_every_channel_identically() {
        let mut tremolo = prepared(2, 256);
        tremolo.set_rate(50.0);
        let mut buffer = AudioBuffer::from_channels(&[vec![1.0; 256], vec![1.0; 256]]);

        tremolo.process_replacing(&mut buffer.as_block_mut(), false);

        assert_eq!(buffer.channel(0), buffer.channel(1));
        assert!(buffer.channel(0).iter().all(|&s| (0.0..=1.0).contains(&s)));
        assert!(buffer.channel(0).iter().any(|&s| s < 0.9));
    }

    #[test]
    fn test_through_zero_flips_polarity() {
        let mut tremolo = prepared(1, 64);
        tremolo.set_rate(0.0);
        tremolo.set_through_zero(true);
        tremolo.advance(3.0 * FRAC_PI_2);
        let mut buffer = AudioBuffer::from_channels(&[vec![0.5; 64]]);

        tremolo.process_replacing(&mut buffer.as_block_mut(), false);

        assert!(buffer.channel(0).iter().all(|&s| (s + 0.5).abs() < 1e-6));
    }

    #[test]
    fn test_zero_mix_is_dry() {
        let mut tremolo = Tremolo::default();
        tremolo.set_mix(0.0);
        tremolo.prepare(&ProcessSpec::new(48_000.0, 128, 1));
        tremolo.set_rate(10.0);
        let input: Vec<f32> = (0..128).map(|i| (i as f32 * 0.1).sin()).collect();
        let mut buffer = AudioBuffer::from_channels(&[input.clone()]);

        tremolo.process_replacing(&mut buffer.as_block_mut(), false);

        assert_eq!(buffer.channel(0), input.as_slice());
        assert!(tremolo.phase() > 0.0, "oscillator still runs at zero mix");
    }

    #[test]
    fn test_bypass_leaves_block_and_phase() {
        let mut tremolo = prepared(1, 32);
        tremolo.set_rate(5.0);
        let mut buffer = AudioBuffer::from_channels(&[vec![0.3; 32]]);

        tremolo.process_replacing(&mut buffer.as_block_mut(), true);

        assert_eq!(buffer.channel(0), &[0.3; 32]);
        assert_eq!(tremolo.phase(), 0.0);
    }

    #[test]
    fn test_process_advances_one_block() {
        let mut tremolo = prepared(3, 512);
        tremolo.set_rate(2.5);
        let mut buffer = AudioBuffer::new(3, 512);

        tremolo.process_replacing(&mut buffer.as_block_mut(), false);

        let expected = std::f64::consts::TAU * 2.5 / 48_000.0 * 512.0;
        assert!((tremolo.phase() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_reset_zeroes_phase_keeps_settings() {
        let mut tremolo = prepared(1, 32);
        tremolo.set_rate(3.0);
        tremolo.set_through_zero(true);
        tremolo.advance(PI);

        tremolo.reset();

        assert_eq!(tremolo.phase(), 0.0);
        assert_eq!(tremolo.frequency(), 3.0);
        assert!(tremolo.is_through_zero());
    }
}
