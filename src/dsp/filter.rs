use std::f64::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{effect::node::ProcessSpec, io::buffer::AudioBlockMut};

/*
Topology-Preserving State-Variable Filter
=========================================

One trapezoidal-integrated SVF produces low-pass, band-pass and high-pass
outputs from the same two integrator states. The crossover runs two of them
with identical coefficients: one read at the low-pass tap, one at the
high-pass tap.

Coefficients
------------

    g = tan(π × cutoff / sample_rate)      prewarped integrator gain
    k = 1 / Q                              damping

    h  = 1 / (1 + g(g + k))
    v1 = h × (ic1 + g(x − ic2))            band-pass
    v2 = ic2 + g × v1                      low-pass
    hp = x − k·v1 − v2                     high-pass

Q = 1/√2 gives a Butterworth response. Because lp + k·bp + hp == x, summing
only the low and high taps leaves a notch at the cutoff: the two paths are
180° apart there.

| type      | passes       | rejects      |
| --------- | ------------ | ------------ |
| low-pass  | below cutoff | above cutoff |
| high-pass | above cutoff | below cutoff |
| band-pass | at cutoff    | away from it |

Each channel keeps its own integrator memory. Coefficients are shared.
*/

/// Lowest cutoff the coefficients are computed for.
pub const MIN_CUTOFF_HZ: f64 = 1.0;
/// Smallest usable Q. Lower values make `k` explode.
pub const MIN_RESONANCE: f64 = 0.01;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    LowPass,
    HighPass,
    BandPass,
}

pub struct FilterOutputs {
    pub lowpass: f32,
    pub bandpass: f32,
    pub highpass: f32,
}

#[derive(Debug, Clone, Copy, Default)]
struct ChannelState {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory
}

#[derive(Debug, Clone)]
pub struct SVFilter {
    filter_type: FilterType,
    cutoff_hz: f64,
    resonance: f64,
    sample_rate: f64,

    g: f32,
    k: f32,
    h: f32,

    state: Vec<ChannelState>,
}

impl SVFilter {
    pub fn new(filter_type: FilterType) -> Self {
        let mut filter = Self {
            filter_type,
            cutoff_hz: 1_000.0,
            resonance: std::f64::consts::FRAC_1_SQRT_2,
            sample_rate: 44_100.0,
            g: 0.0,
            k: 0.0,
            h: 0.0,
            state: Vec::new(),
        };
        filter.update_coefficients();
        filter
    }

    pub fn lowpass(cutoff_hz: f64) -> Self {
        let mut filter = Self::new(FilterType::LowPass);
        filter.set_cutoff(cutoff_hz);
        filter
    }

    pub fn highpass(cutoff_hz: f64) -> Self {
        let mut filter = Self::new(FilterType::HighPass);
        filter.set_cutoff(cutoff_hz);
        filter
    }

    /// Size per-channel state and recompute coefficients. Allocates.
    pub fn prepare(&mut self, spec: &ProcessSpec) {
        debug_assert!(spec.sample_rate > 0.0);
        self.sample_rate = spec.sample_rate;
        self.state.clear();
        self.state.resize(spec.num_channels, ChannelState::default());
        self.update_coefficients();
    }

    pub fn reset(&mut self) {
        self.state.fill(ChannelState::default());
    }

    pub fn set_cutoff(&mut self, cutoff_hz: f64) {
        self.cutoff_hz = cutoff_hz;
        self.update_coefficients();
    }

    /// Set Q. Values below [`MIN_RESONANCE`] are clamped.
    pub fn set_resonance(&mut self, resonance: f64) {
        self.resonance = resonance.max(MIN_RESONANCE);
        self.update_coefficients();
    }

    pub fn set_filter_type(&mut self, filter_type: FilterType) {
        self.filter_type = filter_type;
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff_hz
    }

    pub fn resonance(&self) -> f64 {
        self.resonance
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    pub fn num_channels(&self) -> usize {
        self.state.len()
    }

    #[inline]
    pub fn next_sample(&mut self, channel: usize, sample: f32) -> FilterOutputs {
        let (g, k, h) = (self.g, self.k, self.h);
        let state = &mut self.state[channel];

        let v3 = sample - state.ic2eq;
        let v1 = h * (state.ic1eq + g * v3);
        let v2 = state.ic2eq + g * v1;

        state.ic1eq = 2.0 * v1 - state.ic1eq;
        state.ic2eq = 2.0 * v2 - state.ic2eq;

        FilterOutputs {
            lowpass: v2,
            bandpass: v1,
            highpass: sample - k * v1 - v2,
        }
    }

    /// Filter one channel's samples in place.
    pub fn render(&mut self, buffer: &mut [f32], channel: usize) {
        for sample in buffer.iter_mut() {
            let outputs = self.next_sample(channel, *sample);

            *sample = match self.filter_type {
                FilterType::LowPass => outputs.lowpass,
                FilterType::HighPass => outputs.highpass,
                FilterType::BandPass => outputs.bandpass,
            }
        }
    }

    /// Filter every channel of `block` in place.
    pub fn process_block(&mut self, block: &mut AudioBlockMut<'_>) {
        debug_assert!(
            block.num_channels() <= self.state.len(),
            "filter prepared for {} channels, got {}",
            self.state.len(),
            block.num_channels()
        );

        let num_channels = block.num_channels().min(self.state.len());
        for ch in 0..num_channels {
            self.render(block.channel_mut(ch), ch);
        }
    }

    fn update_coefficients(&mut self) {
        let nyquist = self.sample_rate / 2.0;
        let cutoff = self.cutoff_hz.clamp(MIN_CUTOFF_HZ, nyquist * 0.999);

        let g = (PI * cutoff / self.sample_rate).tan();
        let k = 1.0 / self.resonance;

        self.g = g as f32;
        self.k = k as f32;
        self.h = (1.0 / (1.0 + g * (g + k))) as f32;
    }
}
