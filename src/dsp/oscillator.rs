//! Phase-accumulator oscillator with pluggable wave shapes.

use std::f64::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::smooth::SmoothedValue,
    effect::node::ProcessSpec,
    io::buffer::AudioBlockMut,
};

/*
Phase-Controlled Oscillator
===========================

A normal oscillator hides its phase. This one exposes it, because the
harmonic tremolo needs to read two oscillators' phases and jump one of them
so the pair sits at an exact offset.

Vocabulary
----------

  phase         Angular position in radians. Conceptually in [0, 2π), but the
                accumulator is never wrapped: it only ever grows by
                `rate × samples` (or by whatever a caller passes to
                `advance`). Wave shapes and comparisons take it mod 2π.

  rate          Phase derivative in radians per sample:
                    rate = 2π × frequency_hz / sample_rate
                At 48 kHz a 2.5 Hz LFO advances 0.000327 rad per sample.

  wave shape    A pure function phase → amplitude in [0, 1].
                    sine:      (sin φ + 1) / 2
                    sawtooth:  (φ mod 2π) / 2π

  offset        A smoothed bias added to the phase when shaping. Moving the
                offset ramps the waveform's position over 50 ms instead of
                jumping it, so it never clicks.


Block Rendering
---------------

Inside a block the accumulator is NOT touched per sample. Sample i reads

    shape(phase_at(i) + offset.next_value())     phase_at(i) = phase + rate × i

and only after the whole block does the accumulator move once:

    phase += rate × num_samples

That keeps phase advance exactly proportional to elapsed samples, and makes
`advance(rate × n); advance(rate × m)` identical to `advance(rate × (n + m))`.
The offset ramp on the other hand steps once per sample, even when a caller
jumps the accumulator with `advance`.


Why f64 phase?
--------------

The accumulator grows without bound. With f32 a 2.5 Hz oscillator reaches
~157 rad after 10 seconds, where one ulp is already ~1.5e-5 rad. f64 keeps
sub-microradian accuracy for days of playback.
*/

/// Length of the phase offset ramp.
pub const OFFSET_RAMP_SECONDS: f64 = 0.05;

/// A phase → [0, 1] amplitude function.
pub type WaveShapeFn = fn(f64) -> f64;

/// `(sin φ + 1) / 2`
pub fn sine_wave(phase: f64) -> f64 {
    (phase.sin() + 1.0) / 2.0
}

/// `(φ mod 2π) / 2π`, non-negative for negative phases too.
pub fn sawtooth_wave(phase: f64) -> f64 {
    (phase / TAU).rem_euclid(1.0)
}

/// Which wave shape an oscillator uses.
///
/// `Custom` holds a plain function pointer so shapes stay `Copy` and can be
/// sent to the render thread without allocating.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default)]
pub enum WaveShape {
    #[default]
    Sine,
    Sawtooth,
    #[cfg_attr(feature = "serde", serde(skip))]
    Custom(WaveShapeFn),
}

impl WaveShape {
    /// Resolve to the concrete function.
    pub fn function(self) -> WaveShapeFn {
        match self {
            WaveShape::Sine => sine_wave,
            WaveShape::Sawtooth => sawtooth_wave,
            WaveShape::Custom(f) => f,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WaveShape::Sine => "Sine",
            WaveShape::Sawtooth => "Sawtooth",
            WaveShape::Custom(_) => "Custom",
        }
    }
}

/// Oscillator whose phase can be read and moved from outside.
#[derive(Debug, Clone)]
pub struct PhaseOscillator {
    shape: WaveShape,
    shape_fn: WaveShapeFn,
    sample_rate: f64,
    frequency_hz: f64,
    /// Radians per sample.
    rate: f64,
    phase: f64,
    offset: SmoothedValue,
}

impl PhaseOscillator {
    pub fn new(shape: WaveShape) -> Self {
        let sample_rate = 44_100.0;
        let frequency_hz = 1.0;
        Self {
            shape,
            shape_fn: shape.function(),
            sample_rate,
            frequency_hz,
            rate: TAU * frequency_hz / sample_rate,
            phase: 0.0,
            offset: SmoothedValue::new(0.0, OFFSET_RAMP_SECONDS),
        }
    }

    pub fn sine() -> Self {
        Self::new(WaveShape::Sine)
    }

    pub fn sawtooth() -> Self {
        Self::new(WaveShape::Sawtooth)
    }

    pub fn prepare(&mut self, spec: &ProcessSpec) {
        debug_assert!(spec.sample_rate > 0.0);
        self.sample_rate = spec.sample_rate;
        self.update_rate();
        self.offset.prepare(spec.sample_rate);
    }

    /// Zero the accumulator and finish any offset ramp.
    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.offset.snap();
    }

    /// Set the frequency in Hz. Negative values clamp to 0 (a frozen oscillator).
    pub fn set_rate(&mut self, frequency_hz: f64) {
        self.frequency_hz = frequency_hz.max(0.0);
        self.update_rate();
    }

    pub fn set_shape(&mut self, shape: WaveShape) {
        self.shape = shape;
        self.shape_fn = shape.function();
    }

    pub fn shape(&self) -> WaveShape {
        self.shape
    }

    #[inline]
    pub fn wave_shape(&self, phase: f64) -> f64 {
        (self.shape_fn)(phase)
    }

    pub fn frequency(&self) -> f64 {
        self.frequency_hz
    }

    /// Radians per sample.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Raw, unwrapped accumulator value.
    #[inline]
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Accumulator folded into [0, 2π). For display and comparison only.
    pub fn phase_wrapped(&self) -> f64 {
        self.phase.rem_euclid(TAU)
    }

    /// Phase after `delay_samples` more samples. Does not mutate.
    #[inline]
    pub fn phase_at(&self, delay_samples: usize) -> f64 {
        self.phase + self.samples_to_phase(delay_samples)
    }

    /// Add `delta` radians to the accumulator. Any sign and magnitude is accepted.
    #[inline]
    pub fn advance(&mut self, delta: f64) {
        self.phase += delta;
    }

    /// Ramp the phase offset towards `target`.
    pub fn set_offset(&mut self, target: f64) {
        self.offset.set_target(target);
    }

    /// Force the offset's current value, then ramp towards `target`.
    pub fn set_offset_with_current(&mut self, target: f64, current: f64) {
        self.offset.set_current_and_target(current, target);
    }

    /// Offset target.
    pub fn offset(&self) -> f64 {
        self.offset.target()
    }

    /// Offset value as of the last rendered sample.
    pub fn current_offset(&self) -> f64 {
        self.offset.current()
    }

    #[inline]
    pub fn samples_to_phase(&self, samples: usize) -> f64 {
        self.rate * samples as f64
    }

    /// Fill `out` with shaped samples, then advance the accumulator by one block.
    pub fn render(&mut self, out: &mut [f32]) {
        for (i, sample) in out.iter_mut().enumerate() {
            let phase = self.phase_at(i) + self.offset.next_value();
            *sample = (self.shape_fn)(phase) as f32;
        }

        self.advance(self.samples_to_phase(out.len()));
    }

    /// Render the waveform into every channel of `block`.
    ///
    /// Bypassed blocks are silenced and leave the oscillator untouched.
    /// Blocks without channels are a no-op.
    pub fn render_block(&mut self, block: &mut AudioBlockMut<'_>, bypassed: bool) {
        if bypassed {
            block.fill(0.0);
            return;
        }

        if block.num_channels() == 0 {
            return;
        }

        self.render(block.channel_mut(0));

        for ch in 1..block.num_channels() {
            block.copy_channel(0, ch);
        }
    }

    fn update_rate(&mut self) {
        self.rate = TAU * self.frequency_hz / self.sample_rate;
    }
}

impl Default for PhaseOscillator {
    fn default() -> Self {
        Self::sine()
    }
}
