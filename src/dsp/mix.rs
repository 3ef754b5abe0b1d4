//! Dry/wet and balance mixing.

use crate::{
    dsp::smooth::SmoothedValue,
    effect::node::ProcessSpec,
    io::buffer::{AudioBlock, AudioBlockMut, AudioBuffer},
};

/*
Signal Mixing
=============

Every mix stage in the effect is a linear crossfade between two signals that
share a timeline: the unprocessed ("dry") signal and the processed ("wet")
one.

Vocabulary
----------

  crossfade     Transitioning between two signals using complementary weights.
                As one fades out, the other fades in.

  proportion    A control value in [0, 1] that sets the weights.
                  proportion = 0.0  →  100% dry
                  proportion = 0.5  →  50% dry, 50% wet
                  proportion = 1.0  →  100% wet

  balance       The same crossfade used to recombine two bands. The low band
                plays the dry role, the high band the wet role.


The Math: Linear Crossfade
--------------------------

    output = dry × (1 − proportion) + wet × proportion

The weights always sum to 1, so mixing two full-scale signals cannot
exceed full scale. At 0 and 1 the output is bit-exact with one input.

Linear rather than equal-power: the two sides here are correlated (the
wet side IS the dry side, modulated or filtered), so amplitude, not power,
is what adds up.


DryWetMixer
-----------

A stage that needs the dry signal after it has overwritten its buffer in
place pushes a copy first:

    mixer.push_dry_samples(&block)     copy into storage sized at prepare
    ... process block in place ...
    mixer.mix_wet_samples(&mut block)  crossfade against the stored copy

The proportion is smoothed (50 ms linear ramp). While a ramp is running
every sample gets its own weight; all channels share the same weight at a
given sample.
*/

/// Length of the dry/wet proportion ramp.
pub const MIX_RAMP_SECONDS: f64 = 0.05;

/// Mix two signals using linear crossfade.
///
/// output = (A × (1-balance)) + (B × balance)
#[inline]
pub fn mix(a: &[f32], b: &[f32], balance: f32, out: &mut [f32]) {
    debug_assert_eq!(a.len(), b.len());
    debug_assert_eq!(a.len(), out.len());

    let balance = balance.clamp(0.0, 1.0);
    let weight_a = 1.0 - balance;
    let weight_b = balance;

    for ((&sa, &sb), o) in a.iter().zip(b.iter()).zip(out.iter_mut()) {
        *o = (sa * weight_a) + (sb * weight_b);
    }
}

/// Blend dry and wet samples using linear crossfade (single sample version).
#[inline]
pub fn blend_dry_wet(dry: f32, wet: f32, mix: f32) -> f32 {
    dry * (1.0 - mix) + wet * mix
}

/// Apply a constant dry/wet proportion to a buffer.
///
/// Modifies `wet` in-place, using `dry` as the unprocessed reference.
#[inline]
pub fn apply_dry_wet(dry: &[f32], wet: &mut [f32], mix: f32) {
    debug_assert_eq!(dry.len(), wet.len());

    if mix >= 1.0 {
        return; // 100% wet, nothing to do
    }

    if mix <= 0.0 {
        wet.copy_from_slice(dry);
        return;
    }

    let dry_amount = 1.0 - mix;
    for (wet_sample, &dry_sample) in wet.iter_mut().zip(dry.iter()) {
        *wet_sample = dry_sample * dry_amount + *wet_sample * mix;
    }
}

/// Apply a per-sample dry/wet proportion to a buffer.
#[inline]
pub fn apply_dry_wet_ramp(dry: &[f32], wet: &mut [f32], mix: &[f32]) {
    debug_assert_eq!(dry.len(), wet.len());
    debug_assert_eq!(mix.len(), wet.len());

    for ((wet_sample, &dry_sample), &m) in wet.iter_mut().zip(dry).zip(mix) {
        *wet_sample = blend_dry_wet(dry_sample, *wet_sample, m);
    }
}

/// Smoothed crossfade between a stored dry copy and an in-place wet block.
#[derive(Debug, Clone)]
pub struct DryWetMixer {
    dry: AudioBuffer,
    num_dry_samples: usize,
    proportion: SmoothedValue,
    ramp: Vec<f32>,
}

impl DryWetMixer {
    /// `proportion` is clamped to [0, 1].
    pub fn new(proportion: f64) -> Self {
        Self {
            dry: AudioBuffer::default(),
            num_dry_samples: 0,
            proportion: SmoothedValue::new(proportion.clamp(0.0, 1.0), MIX_RAMP_SECONDS),
            ramp: Vec::new(),
        }
    }

    /// Size dry storage for the host's maximum block. Allocates.
    pub fn prepare(&mut self, spec: &ProcessSpec) {
        self.dry.resize(spec.num_channels, spec.max_block_size);
        self.ramp.clear();
        self.ramp.resize(spec.max_block_size, 0.0);
        self.proportion.prepare(spec.sample_rate);
        self.num_dry_samples = 0;
    }

    /// Finish the proportion ramp and forget the stored dry block.
    pub fn reset(&mut self) {
        self.proportion.snap();
        self.dry.clear();
        self.num_dry_samples = 0;
    }

    pub fn set_wet_mix_proportion(&mut self, proportion: f64) {
        self.proportion.set_target(proportion.clamp(0.0, 1.0));
    }

    pub fn wet_mix_proportion(&self) -> f64 {
        self.proportion.target()
    }

    pub fn push_dry_samples(&mut self, dry: &AudioBlock<'_>) {
        debug_assert!(
            dry.num_samples() <= self.dry.capacity(),
            "dry block of {} samples exceeds prepared capacity {}",
            dry.num_samples(),
            self.dry.capacity()
        );
        debug_assert!(dry.num_channels() <= self.dry.num_channels());

        let num_samples = dry.num_samples().min(self.dry.capacity());
        let num_channels = dry.num_channels().min(self.dry.num_channels());

        for ch in 0..num_channels {
            self.dry.channel_mut(ch)[..num_samples]
                .copy_from_slice(&dry.channel(ch)[..num_samples]);
        }
        self.num_dry_samples = num_samples;
    }

    /// Crossfade `wet` against the last pushed dry block.
    pub fn mix_wet_samples(&mut self, wet: &mut AudioBlockMut<'_>) {
        debug_assert_eq!(
            wet.num_samples(),
            self.num_dry_samples,
            "wet block length must match the pushed dry block"
        );

        let num_samples = wet.num_samples().min(self.num_dry_samples);
        let num_channels = wet.num_channels().min(self.dry.num_channels());

        if !self.proportion.is_smoothing() {
            let proportion = self.proportion.target() as f32;
            for ch in 0..num_channels {
                apply_dry_wet(
                    &self.dry.channel(ch)[..num_samples],
                    &mut wet.channel_mut(ch)[..num_samples],
                    proportion,
                );
            }
            return;
        }

        let ramp = &mut self.ramp[..num_samples];
        for value in ramp.iter_mut() {
            *value = self.proportion.next_value() as f32;
        }

        for ch in 0..num_channels {
            apply_dry_wet_ramp(
                &self.dry.channel(ch)[..num_samples],
                &mut wet.channel_mut(ch)[..num_samples],
                ramp,
            );
        }
    }
}

impl Default for DryWetMixer {
    fn default() -> Self {
        Self::new(1.0)
    }
}
