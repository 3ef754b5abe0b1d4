//! Signal multiplication and smoothed makeup gain.

use crate::{
    dsp::smooth::SmoothedValue,
    effect::node::ProcessSpec,
    io::buffer::AudioBlockMut,
};

/*
Signal Multiplication
=====================

Multiplying two signals sample-by-sample is how both halves of this effect
change level: the tremolo multiplies audio by a slow modulator, the makeup
gain multiplies it by a constant.

Vocabulary
----------

  gain          A multiplier applied to amplitude.
                  gain > 1.0  →  louder
                  gain = 1.0  →  unchanged (unity gain)
                  gain = 0.0  →  silence

  modulation    Using one signal to control a parameter of another.
                Amplitude modulation = controlling volume with a signal.
                A tremolo is amplitude modulation by an LFO below ~20 Hz.


Decibels
--------

    dB = 20 × log₁₀(gain)          gain = 10^(dB / 20)

    ×1.0   =   0 dB
    ×0.5   ≈  -6 dB
    ×0.1   = -20 dB
    ×2.0   ≈  +6 dB

Anything at or below -100 dB is treated as silence (gain 0).


Smoothed Gain
-------------

`Gain` ramps the linear multiplier (not the dB value) over 50 ms when the
target changes, so automation never steps.
*/

/// dB values at or below this map to a gain of exactly 0.
pub const MINUS_INFINITY_DB: f64 = -100.0;
/// Length of the makeup gain ramp.
pub const GAIN_RAMP_SECONDS: f64 = 0.05;

pub fn db_to_linear(decibels: f64) -> f64 {
    if decibels <= MINUS_INFINITY_DB {
        0.0
    } else {
        10f64.powf(decibels / 20.0)
    }
}

pub fn linear_to_db(gain: f64) -> f64 {
    if gain <= 0.0 {
        MINUS_INFINITY_DB
    } else {
        (20.0 * gain.log10()).max(MINUS_INFINITY_DB)
    }
}

/// Multiply two signal buffers sample-by-sample.
#[inline]
pub fn multiply(signal: &[f32], modulator: &[f32], out: &mut [f32]) {
    debug_assert_eq!(signal.len(), modulator.len());
    debug_assert_eq!(signal.len(), out.len());

    for ((o, &s), &m) in out.iter_mut().zip(signal.iter()).zip(modulator.iter()) {
        *o = s * m;
    }
}

/// Multiply a signal by a constant gain factor (in-place).
#[inline]
pub fn apply_gain(signal: &mut [f32], gain: f32) {
    for sample in signal.iter_mut() {
        *sample *= gain;
    }
}

/// Multiply a signal by a modulator, writing result into signal buffer (in-place).
#[inline]
pub fn multiply_in_place(signal: &mut [f32], modulator: &[f32]) {
    debug_assert_eq!(signal.len(), modulator.len());

    for (s, &m) in signal.iter_mut().zip(modulator.iter()) {
        *s *= m;
    }
}

/// Makeup gain set in decibels, ramped in the linear domain.
#[derive(Debug, Clone)]
pub struct Gain {
    decibels: f64,
    gain: SmoothedValue,
    ramp: Vec<f32>,
}

impl Gain {
    pub fn new(decibels: f64) -> Self {
        Self {
            decibels,
            gain: SmoothedValue::new(db_to_linear(decibels), GAIN_RAMP_SECONDS),
            ramp: Vec::new(),
        }
    }

    pub fn prepare(&mut self, spec: &ProcessSpec) {
        self.gain.prepare(spec.sample_rate);
        self.ramp.clear();
        self.ramp.resize(spec.max_block_size, 0.0);
    }

    pub fn reset(&mut self) {
        self.gain.snap();
    }

    pub fn set_gain_decibels(&mut self, decibels: f64) {
        self.decibels = decibels;
        self.gain.set_target(db_to_linear(decibels));
    }

    pub fn set_gain_linear(&mut self, gain: f64) {
        let gain = gain.max(0.0);
        self.decibels = linear_to_db(gain);
        self.gain.set_target(gain);
    }

    pub fn gain_decibels(&self) -> f64 {
        self.decibels
    }

    /// Target multiplier.
    pub fn gain_linear(&self) -> f64 {
        self.gain.target()
    }

    pub fn process_block(&mut self, block: &mut AudioBlockMut<'_>) {
        let num_samples = block.num_samples();

        if !self.gain.is_smoothing() {
            let gain = self.gain.target() as f32;
            if gain == 1.0 {
                return;
            }
            for channel in block.channels_mut() {
                apply_gain(channel, gain);
            }
            return;
        }

        debug_assert!(num_samples <= self.ramp.len());
        let num_samples = num_samples.min(self.ramp.len());
        let ramp = &mut self.ramp[..num_samples];
        for value in ramp.iter_mut() {
            *value = self.gain.next_value() as f32;
        }

        for channel in block.channels_mut() {
            multiply_in_place(&mut channel[..num_samples], ramp);
        }
    }
}

impl Default for Gain {
    fn default() -> Self {
        Self::new(0.0)
    }
}
