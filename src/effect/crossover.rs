use std::f64::consts::FRAC_1_SQRT_2;

use crate::{
    dsp::{
        filter::{FilterType, SVFilter},
        mix::DryWetMixer,
    },
    effect::node::{ProcessSpec, Processor},
    io::buffer::{AudioBlockMut, AudioBuffer},
};

/*
Two-Band Crossover
==================

Splits the input into a low band and a high band, runs a processor on each,
and recombines them.

Signal Flow
-----------

                   ┌─ copy ─→ [LPF] ─→ mix(dry, lp) ─→ [low band] ──┐ dry
    input/block ───┤                                                ├─ balance ─→ block
                   └──────→ [HPF] ─→ mix(dry, hp) ─→ [high band] ───┘ wet

The low path runs on a scratch buffer sized at prepare; the high path runs in
place on the caller's block. The band processors see filtered audio, then the
balance mixer crossfades:

    out = (1 − balance) × low + balance × high

With the crossover mix at 0 both paths carry the unfiltered input, so the
band processors still run but nothing is split.

Both filters share cutoff and Q. At Q = 1/√2 the bands are Butterworth
halves: flat well away from the cutoff and −3 dB each at it. Their sum
notches at the cutoff because the two 2-pole taps are 180° apart there.
*/

pub const DEFAULT_CUTOFF_HZ: f64 = 1_500.0;
pub const DEFAULT_RESONANCE: f64 = FRAC_1_SQRT_2;
pub const DEFAULT_BALANCE: f64 = 0.5;

/// Band splitter owning one processor per band.
#[derive(Debug, Clone)]
pub struct Crossover<L, H> {
    low_pass: SVFilter,
    high_pass: SVFilter,
    low_mixer: DryWetMixer,
    high_mixer: DryWetMixer,
    balance_mixer: DryWetMixer,
    lpf_buffer: AudioBuffer,

    low_band: L,
    high_band: H,

    cutoff_hz: f64,
    resonance: f64,
}

impl<L, H> Crossover<L, H>
where
    L: Processor,
    H: Processor,
{
    pub fn new(low_band: L, high_band: H) -> Self {
        let mut low_pass = SVFilter::new(FilterType::LowPass);
        let mut high_pass = SVFilter::new(FilterType::HighPass);
        for filter in [&mut low_pass, &mut high_pass] {
            filter.set_cutoff(DEFAULT_CUTOFF_HZ);
            filter.set_resonance(DEFAULT_RESONANCE);
        }

        Self {
            low_pass,
            high_pass,
            low_mixer: DryWetMixer::new(1.0),
            high_mixer: DryWetMixer::new(1.0),
            balance_mixer: DryWetMixer::new(DEFAULT_BALANCE),
            lpf_buffer: AudioBuffer::default(),
            low_band,
            high_band,
            cutoff_hz: DEFAULT_CUTOFF_HZ,
            resonance: DEFAULT_RESONANCE,
        }
    }

    /// Cutoff in Hz. Coefficients clamp it into (0, nyquist).
    pub fn set_cutoff_frequency(&mut self, cutoff_hz: f64) {
        if cutoff_hz == self.cutoff_hz {
            return;
        }
        self.cutoff_hz = cutoff_hz;
        self.low_pass.set_cutoff(cutoff_hz);
        self.high_pass.set_cutoff(cutoff_hz);
    }

    pub fn set_resonance(&mut self, resonance: f64) {
        if resonance == self.resonance {
            return;
        }
        self.low_pass.set_resonance(resonance);
        self.high_pass.set_resonance(resonance);
        self.resonance = self.low_pass.resonance();
    }

    /// Filtered proportion of both bands.
    pub fn set_mix(&mut self, mix: f64) {
        self.low_mixer.set_wet_mix_proportion(mix);
        self.high_mixer.set_wet_mix_proportion(mix);
    }

    /// 0 keeps only the low band, 1 only the high band.
    pub fn set_balance(&mut self, balance: f64) {
        self.balance_mixer.set_wet_mix_proportion(balance);
    }

    pub fn cutoff_frequency(&self) -> f64 {
        self.cutoff_hz
    }

    pub fn resonance(&self) -> f64 {
        self.resonance
    }

    pub fn mix(&self) -> f64 {
        self.low_mixer.wet_mix_proportion()
    }

    pub fn balance(&self) -> f64 {
        self.balance_mixer.wet_mix_proportion()
    }

    pub fn low_band(&self) -> &L {
        &self.low_band
    }

    pub fn low_band_mut(&mut self) -> &mut L {
        &mut self.low_band
    }

    pub fn high_band(&self) -> &H {
        &self.high_band
    }

    pub fn high_band_mut(&mut self) -> &mut H {
        &mut self.high_band
    }

    /// Both band processors at once.
    pub fn bands_mut(&mut self) -> (&mut L, &mut H) {
        (&mut self.low_band, &mut self.high_band)
    }
}

impl<L, H> Processor for Crossover<L, H>
where
    L: Processor,
    H: Processor,
{
    fn prepare(&mut self, spec: &ProcessSpec) {
        self.low_pass.prepare(spec);
        self.high_pass.prepare(spec);
        self.low_mixer.prepare(spec);
        self.high_mixer.prepare(spec);
        self.balance_mixer.prepare(spec);
        self.lpf_buffer.resize(spec.num_channels, spec.max_block_size);

        self.low_band.prepare(spec);
        self.high_band.prepare(spec);

        log::debug!(
            "crossover prepared: {} Hz, {} samples x {} channels, cutoff {:.1} Hz, Q {:.3}",
            spec.sample_rate,
            spec.max_block_size,
            spec.num_channels,
            self.cutoff_hz,
            self.resonance
        );
    }

    fn reset(&mut self) {
        self.low_pass.reset();
        self.high_pass.reset();
        self.low_mixer.reset();
        self.high_mixer.reset();
        self.balance_mixer.reset();

        self.low_band.reset();
        self.high_band.reset();
    }

    fn process_replacing(&mut self, block: &mut AudioBlockMut<'_>, bypassed: bool) {
        if bypassed {
            return;
        }

        let num_samples = block.num_samples();
        let num_channels = block.num_channels();
        debug_assert!(
            num_samples <= self.lpf_buffer.capacity(),
            "lpf buffer holds {} samples, block has {}",
            self.lpf_buffer.capacity(),
            num_samples
        );
        debug_assert!(num_channels <= self.lpf_buffer.num_channels());
        if num_samples > self.lpf_buffer.capacity()
            || num_channels > self.lpf_buffer.num_channels()
        {
            return;
        }

        let mut lpf = self
            .lpf_buffer
            .block_mut_with_channels(num_channels, num_samples);
        lpf.copy_from(&block.as_block());

        self.low_mixer.push_dry_samples(&lpf.as_block());
        self.low_pass.process_block(&mut lpf);
        self.low_mixer.mix_wet_samples(&mut lpf);

        self.high_mixer.push_dry_samples(&block.as_block());
        self.high_pass.process_block(block);
        self.high_mixer.mix_wet_samples(block);

        self.low_band.process_replacing(&mut lpf, false);
        self.high_band.process_replacing(block, false);

        self.balance_mixer.push_dry_samples(&lpf.as_block());
        self.balance_mixer.mix_wet_samples(block);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::node::{FnProcessor, Passthrough};

    fn prepared<L: Processor, H: Processor>(
        mut crossover: Crossover<L, H>,
        block: usize,
    ) -> Crossover<L, H> {
        crossover.prepare(&ProcessSpec::new(48_000.0, block, 2));
        crossover
    }

    fn noise(len: usize) -> Vec<f32> {
        // Deterministic LCG so unit tests need no RNG crate.
        let mut state = 0x2545_f491u32;
        (0..len)
            .map(|_| {
                state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                (state >> 8) as f32 / (1u32 << 24) as f32 * 2.0 - 1.0
            })
            .collect()
    }

    #[test]
    fn test_bypass_skips_band_processors() {
        let mut crossover = prepared(
            Crossover::new(
                FnProcessor::new(|b: &mut AudioBlockMut<'_>| b.fill(9.0)),
                FnProcessor::new(|b: &mut AudioBlockMut<'_>| b.fill(9.0)),
            ),
            64,
        );
        let input = noise(64);
        let mut buffer = AudioBuffer::from_channels(&[input.clone(), input.clone()]);

        crossover.process_replacing(&mut buffer.as_block_mut(), true);

        assert_eq!(buffer.channel(0), input.as_slice());
    }

    #[test]
    fn test_balance_zero_is_low_band_only() {
        let mut crossover = Crossover::new(
            FnProcessor::new(|b: &mut AudioBlockMut<'_>| b.fill(0.25)),
            FnProcessor::new(|b: &mut AudioBlockMut<'_>| b.fill(0.75)),
        );
        crossover.set_balance(0.0);
        let mut crossover = prepared(crossover, 32);
        let mut buffer = AudioBuffer::from_channels(&[noise(32), noise(32)]);

        crossover.process_replacing(&mut buffer.as_block_mut(), false);

        assert!(buffer.channel(0).iter().all(|&s| s == 0.25));
        assert!(buffer.channel(1).iter().all(|&s| s == 0.25));
    }

    #[test]
    fn test_balance_one_is_high_band_only() {
        let mut crossover = Crossover::new(
            FnProcessor::new(|b: &mut AudioBlockMut<'_>| b.fill(0.25)),
            FnProcessor::new(|b: &mut AudioBlockMut<'_>| b.fill(0.75)),
        );
        crossover.set_balance(1.0);
        let mut crossover = prepared(crossover, 32);
        let mut buffer = AudioBuffer::from_channels(&[noise(32), noise(32)]);

        crossover.process_replacing(&mut buffer.as_block_mut(), false);

        assert!(buffer.channel(0).iter().all(|&s| s == 0.75));
    }

    #[test]
    fn test_balance_is_linear_between_bands() {
        for balance in [0.1f64, 0.5, 0.8] {
            let mut crossover = Crossover::new(
                FnProcessor::new(|b: &mut AudioBlockMut<'_>| b.fill(1.0)),
                FnProcessor::new(|b: &mut AudioBlockMut<'_>| b.fill(-1.0)),
            );
            crossover.set_balance(balance);
            let mut crossover = prepared(crossover, 16);
            let mut buffer = AudioBuffer::new(2, 16);

            crossover.process_replacing(&mut buffer.as_block_mut(), false);

            let expected = (1.0 - balance) - balance;
            assert!(
                (buffer.channel(0)[0] as f64 - expected).abs() < 1e-6,
                "balance {balance}: got {}",
                buffer.channel(0)[0]
            );
        }
    }

    #[test]
    fn test_zero_mix_passes_input_through_both_bands() {
        let mut crossover = Crossover::new(Passthrough, Passthrough);
        crossover.set_mix(0.0);
        let mut crossover = prepared(crossover, 128);
        let input = noise(128);
        let mut buffer = AudioBuffer::from_channels(&[input.clone(), input.clone()]);

        crossover.process_replacing(&mut buffer.as_block_mut(), false);

        for (out, inp) in buffer.channel(0).iter().zip(&input) {
            assert!((out - inp).abs() < 1e-6);
        }
    }

    #[test]
    fn test_bands_see_filtered_audio() {
        let mut crossover = Crossover::new(Passthrough, Passthrough);
        crossover.set_cutoff_frequency(1_000.0);
        crossover.set_balance(0.0);
        let mut crossover = prepared(crossover, 1024);

        // DC belongs to the low band only.
        let mut buffer = AudioBuffer::from_channels(&[vec![1.0; 1024], vec![1.0; 1024]]);
        crossover.process_replacing(&mut buffer.as_block_mut(), false);
        assert!(buffer.channel(0)[1023] > 0.99);

        crossover.set_balance(1.0);
        crossover.reset();
        let mut buffer = AudioBuffer::from_channels(&[vec![1.0; 1024], vec![1.0; 1024]]);
        crossover.process_replacing(&mut buffer.as_block_mut(), false);
        assert!(buffer.channel(0)[1023].abs() < 1e-3);
    }

    #[test]
    fn test_short_block_uses_prefix_of_scratch() {
        let mut crossover = prepared(Crossover::new(Passthrough, Passthrough), 512);
        let mut buffer = AudioBuffer::from_channels(&[vec![0.5; 100], vec![0.5; 100]]);

        crossover.process_replacing(&mut buffer.as_block_mut(), false);

        assert!(buffer.channel(0).iter().all(|s| s.is_finite()));
    }

    #[test]
    fn test_setters_update_state() {
        let mut crossover = Crossover::new(Passthrough, Passthrough);
        crossover.set_cutoff_frequency(800.0);
        crossover.set_resonance(2.0);
        crossover.set_mix(0.4);
        crossover.set_balance(2.0);

        assert_eq!(crossover.cutoff_frequency(), 800.0);
        assert_eq!(crossover.resonance(), 2.0);
        assert_eq!(crossover.mix(), 0.4);
        assert_eq!(crossover.balance(), 1.0);
    }
}
