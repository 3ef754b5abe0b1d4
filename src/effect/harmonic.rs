use std::f64::consts::{FRAC_PI_2, TAU};

use crate::{
    dsp::oscillator::WaveShape,
    effect::{
        crossover::Crossover,
        node::{ProcessSpec, Processor},
        tremolo::Tremolo,
    },
    io::{buffer::AudioBlockMut, control::BandPhases},
};

/*
Harmonic Tremolo
================

A crossover whose two band processors are tremolos. The low band and the high
band pulse against each other, which is what gives the effect its swirl.

Rates
-----

The low band always runs at the base rate. The high band's rate comes from a
`RateMap` chosen at construction:

    dual     high = base × ratio        ratio 2 → high band pulses twice as fast
    unison   high = base                ratio ignored

Rate changes never touch the phases.


Phase Lock
----------

`sync()` jumps the high oscillator so that

    (φ_high − φ_low) mod 2π == target

in one step, by advancing it by

    p = (2π + target) + (φ_low − φ_high)

`p` is not normalised: the accumulators are unbounded anyway, and the extra
2π keeps `p` positive for any target in [0, 2π) and any small negative
difference. After a sync the bands drift apart again whenever their rates
differ.

Phase Target
------------

`set_tremolo_phase` only stores the target. The bands keep whatever
relationship they have until the next `sync()`. `reset()` zeroes both
accumulators and puts the high band a quarter cycle ahead, whatever the
target.
*/

/// Maps (base rate, ratio) to the high band's rate in Hz.
pub type RateMap = fn(f64, f64) -> f64;

/// `base × ratio`
pub fn proportional_rate(base: f64, ratio: f64) -> f64 {
    base * ratio
}

/// `base`, ratio ignored.
pub fn unison_rate(base: f64, _ratio: f64) -> f64 {
    base
}

pub const DEFAULT_RATE_HZ: f64 = 2.5;
pub const DEFAULT_RATIO: f64 = 1.0;
pub const DEFAULT_PHASE: f64 = FRAC_PI_2;
/// Smallest accepted ratio.
pub const MIN_RATIO: f64 = 1e-3;

pub struct HarmonicTremolo {
    crossover: Crossover<Tremolo, Tremolo>,
    rate_map: RateMap,
    base_rate: f64,
    ratio: f64,
    target_phase: f64,
}

impl HarmonicTremolo {
    pub fn new(rate_map: RateMap) -> Self {
        let mut tremolo = Self {
            crossover: Crossover::new(Tremolo::default(), Tremolo::default()),
            rate_map,
            base_rate: DEFAULT_RATE_HZ,
            ratio: DEFAULT_RATIO,
            target_phase: DEFAULT_PHASE,
        };
        tremolo.update_rates();
        tremolo.reset();
        tremolo
    }

    /// High band at `base × ratio`.
    pub fn dual() -> Self {
        Self::new(proportional_rate)
    }

    /// Both bands at the base rate.
    pub fn unison() -> Self {
        Self::new(unison_rate)
    }

    /// Lock the band phase difference to the configured target.
    pub fn sync(&mut self) {
        let low = self.low().phase();
        let high = self.high().phase();
        let advance = (TAU + self.target_phase) + (low - high);

        let high_band = self.crossover.high_band_mut();
        high_band.advance(advance);
        high_band.set_offset_with_current(0.0, 0.0);

        log::debug!(
            "sync: low {:.6} high {:.6} target {:.6} advance {:.6} -> difference {:.6}",
            low,
            high,
            self.target_phase,
            advance,
            (self.high().phase() - self.low().phase()).rem_euclid(TAU)
        );
    }

    /// Base rate in Hz. Negative values freeze both bands.
    pub fn set_tremolo_rate(&mut self, base_rate: f64) {
        self.base_rate = base_rate.max(0.0);
        self.update_rates();
    }

    /// Clamped to at least [`MIN_RATIO`].
    pub fn set_tremolo_ratio(&mut self, ratio: f64) {
        self.ratio = ratio.max(MIN_RATIO);
        self.update_rates();
    }

    /// Sync target in radians. Takes effect at the next `sync()`.
    pub fn set_tremolo_phase(&mut self, phase: f64) {
        self.target_phase = phase;
    }

    pub fn set_tremolo_through_zero(&mut self, enabled: bool) {
        let (low, high) = self.crossover.bands_mut();
        low.set_through_zero(enabled);
        high.set_through_zero(enabled);
    }

    pub fn set_tremolo_shape(&mut self, shape: WaveShape) {
        let (low, high) = self.crossover.bands_mut();
        low.set_shape(shape);
        high.set_shape(shape);
    }

    pub fn set_tremolo_mix(&mut self, mix: f64) {
        let (low, high) = self.crossover.bands_mut();
        low.set_mix(mix);
        high.set_mix(mix);
    }

    pub fn set_crossover_frequency(&mut self, cutoff_hz: f64) {
        self.crossover.set_cutoff_frequency(cutoff_hz);
    }

    pub fn set_crossover_resonance(&mut self, resonance: f64) {
        self.crossover.set_resonance(resonance);
    }

    pub fn set_crossover_mix(&mut self, mix: f64) {
        self.crossover.set_mix(mix);
    }

    pub fn set_crossover_balance(&mut self, balance: f64) {
        self.crossover.set_balance(balance);
    }

    pub fn tremolo_rate(&self) -> f64 {
        self.base_rate
    }

    pub fn tremolo_ratio(&self) -> f64 {
        self.ratio
    }

    pub fn tremolo_phase(&self) -> f64 {
        self.target_phase
    }

    pub fn low(&self) -> &Tremolo {
        self.crossover.low_band()
    }

    pub fn high(&self) -> &Tremolo {
        self.crossover.high_band()
    }

    pub fn crossover(&self) -> &Crossover<Tremolo, Tremolo> {
        &self.crossover
    }

    pub fn band_phases(&self) -> BandPhases {
        let low = self.low().oscillator();
        let high = self.high().oscillator();
        BandPhases::new(
            low.phase(),
            high.phase(),
            high.current_offset() - low.current_offset(),
        )
    }

    fn update_rates(&mut self) {
        let high_rate = (self.rate_map)(self.base_rate, self.ratio);
        let (low, high) = self.crossover.bands_mut();
        low.set_rate(self.base_rate);
        high.set_rate(high_rate);
    }
}

impl Default for HarmonicTremolo {
    fn default() -> Self {
        Self::dual()
    }
}

impl Processor for HarmonicTremolo {
    fn prepare(&mut self, spec: &ProcessSpec) {
        self.crossover.prepare(spec);
        self.update_rates();
        self.reset();
    }

    /// Zero every phase, then restore the default quarter-cycle lock.
    fn reset(&mut self) {
        self.crossover.reset();

        let high = self.crossover.high_band_mut();
        high.advance(DEFAULT_PHASE);
        high.set_offset_with_current(0.0, 0.0);
    }

    fn process_replacing(&mut self, block: &mut AudioBlockMut<'_>, bypassed: bool) {
        self.crossover.process_replacing(block, bypassed);
    }
}
