//! Flat parameter snapshot, parameter metadata and presets.

use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, TAU};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::oscillator::WaveShape;

/// Skewed ranges for normalised host control.
pub mod range;

/// JSON presets.
#[cfg(feature = "serde")]
pub mod preset;

pub use range::ParamRange;

#[cfg(feature = "serde")]
pub use preset::{Preset, PresetError};

/// Wave shapes selectable from the parameter layer.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TremoloShape {
    #[default]
    Sine,
    Sawtooth,
}

impl TremoloShape {
    pub fn index(self) -> usize {
        match self {
            TremoloShape::Sine => 0,
            TremoloShape::Sawtooth => 1,
        }
    }

    pub fn from_index(index: usize) -> Self {
        match index {
            0 => TremoloShape::Sine,
            _ => TremoloShape::Sawtooth,
        }
    }
}

impl From<TremoloShape> for WaveShape {
    fn from(shape: TremoloShape) -> Self {
        match shape {
            TremoloShape::Sine => WaveShape::Sine,
            TremoloShape::Sawtooth => WaveShape::Sawtooth,
        }
    }
}

/// Every user-facing setting, read once per block by the render thread.
///
/// Field names serialise under the same ids hosts use (`tremRate`, ...).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    /// Makeup gain in dB.
    #[cfg_attr(feature = "serde", serde(rename = "gain"))]
    pub gain_db: f64,
    /// Global dry/wet.
    pub mix: f64,
    /// Base tremolo rate in Hz.
    #[cfg_attr(feature = "serde", serde(rename = "tremRate"))]
    pub tremolo_rate: f64,
    /// High band rate multiplier.
    #[cfg_attr(feature = "serde", serde(rename = "tremRatio"))]
    pub tremolo_ratio: f64,
    /// Band phase difference in radians.
    #[cfg_attr(feature = "serde", serde(rename = "tremPhase"))]
    pub tremolo_phase: f64,
    #[cfg_attr(feature = "serde", serde(rename = "tremZero"))]
    pub through_zero: bool,
    #[cfg_attr(feature = "serde", serde(rename = "tremShape"))]
    pub tremolo_shape: TremoloShape,
    #[cfg_attr(feature = "serde", serde(rename = "tremMix"))]
    pub tremolo_mix: f64,
    #[cfg_attr(feature = "serde", serde(rename = "xoverFreq"))]
    pub crossover_frequency: f64,
    #[cfg_attr(feature = "serde", serde(rename = "xoverReson"))]
    pub crossover_resonance: f64,
    #[cfg_attr(feature = "serde", serde(rename = "xoverBalance"))]
    pub crossover_balance: f64,
    #[cfg_attr(feature = "serde", serde(rename = "xoverMix"))]
    pub crossover_mix: f64,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            gain_db: 0.0,
            mix: 1.0,
            tremolo_rate: 2.5,
            tremolo_ratio: 1.0,
            tremolo_phase: FRAC_PI_2,
            through_zero: false,
            tremolo_shape: TremoloShape::Sine,
            tremolo_mix: 1.0,
            crossover_frequency: 1_500.0,
            crossover_resonance: FRAC_1_SQRT_2,
            crossover_balance: 0.5,
            crossover_mix: 1.0,
        }
    }
}

impl Parameters {
    /// Rate the oscillators actually run at.
    ///
    /// A through-zero modulator swings through two amplitude peaks per cycle,
    /// so the oscillator runs at half the displayed rate to keep the audible
    /// pulse rate unchanged.
    pub fn oscillator_rate(&self) -> f64 {
        if self.through_zero {
            self.tremolo_rate / 2.0
        } else {
            self.tremolo_rate
        }
    }

    /// Plain value of `id`. Booleans and choices map to 0, 1, ...
    pub fn get(&self, id: ParamId) -> f64 {
        match id {
            ParamId::Gain => self.gain_db,
            ParamId::Mix => self.mix,
            ParamId::TremoloRate => self.tremolo_rate,
            ParamId::TremoloRatio => self.tremolo_ratio,
            ParamId::TremoloPhase => self.tremolo_phase,
            ParamId::ThroughZero => f64::from(u8::from(self.through_zero)),
            ParamId::TremoloShape => self.tremolo_shape.index() as f64,
            ParamId::TremoloMix => self.tremolo_mix,
            ParamId::CrossoverFrequency => self.crossover_frequency,
            ParamId::CrossoverResonance => self.crossover_resonance,
            ParamId::CrossoverBalance => self.crossover_balance,
            ParamId::CrossoverMix => self.crossover_mix,
        }
    }

    /// Set the plain value of `id`, clamped into its range.
    pub fn set(&mut self, id: ParamId, value: f64) {
        let value = id.range().clamp(value);
        match id {
            ParamId::Gain => self.gain_db = value,
            ParamId::Mix => self.mix = value,
            ParamId::TremoloRate => self.tremolo_rate = value,
            ParamId::TremoloRatio => self.tremolo_ratio = value,
            ParamId::TremoloPhase => self.tremolo_phase = value,
            ParamId::ThroughZero => self.through_zero = value >= 0.5,
            ParamId::TremoloShape => {
                self.tremolo_shape = TremoloShape::from_index(value.round() as usize)
            }
            ParamId::TremoloMix => self.tremolo_mix = value,
            ParamId::CrossoverFrequency => self.crossover_frequency = value,
            ParamId::CrossoverResonance => self.crossover_resonance = value,
            ParamId::CrossoverBalance => self.crossover_balance = value,
            ParamId::CrossoverMix => self.crossover_mix = value,
        }
    }

    pub fn get_normalized(&self, id: ParamId) -> f64 {
        id.range().to_normalized(self.get(id))
    }

    pub fn set_normalized(&mut self, id: ParamId, normalized: f64) {
        self.set(id, id.range().from_normalized(normalized));
    }

    /// Move `id` by `delta` in normalised space. Discrete parameters toggle
    /// or step by one choice per call.
    pub fn nudge(&mut self, id: ParamId, delta: f64) {
        if id.is_discrete() {
            let range = id.range();
            let step = delta.signum();
            let mut next = self.get(id) + step;
            if next > range.end {
                next = range.start;
            } else if next < range.start {
                next = range.end;
            }
            self.set(id, next);
            return;
        }

        let normalized = self.get_normalized(id) + delta;
        self.set_normalized(id, normalized);
    }

    /// First parameter whose value lies outside its range, if any.
    pub fn first_out_of_range(&self) -> Option<(ParamId, f64)> {
        ParamId::ALL
            .iter()
            .map(|&id| (id, self.get(id)))
            .find(|&(id, value)| !id.range().contains(value))
    }
}

/// Identifies one parameter for hosts, UIs and presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamId {
    Gain,
    Mix,
    TremoloRate,
    TremoloRatio,
    TremoloPhase,
    ThroughZero,
    TremoloShape,
    TremoloMix,
    CrossoverFrequency,
    CrossoverResonance,
    CrossoverBalance,
    CrossoverMix,
}

impl ParamId {
    pub const ALL: [ParamId; 12] = [
        ParamId::Gain,
        ParamId::Mix,
        ParamId::TremoloRate,
        ParamId::TremoloRatio,
        ParamId::TremoloPhase,
        ParamId::ThroughZero,
        ParamId::TremoloShape,
        ParamId::TremoloMix,
        ParamId::CrossoverFrequency,
        ParamId::CrossoverResonance,
        ParamId::CrossoverBalance,
        ParamId::CrossoverMix,
    ];

    /// Stable identifier, shared with preset files.
    pub fn id(self) -> &'static str {
        match self {
            ParamId::Gain => "gain",
            ParamId::Mix => "mix",
            ParamId::TremoloRate => "tremRate",
            ParamId::TremoloRatio => "tremRatio",
            ParamId::TremoloPhase => "tremPhase",
            ParamId::ThroughZero => "tremZero",
            ParamId::TremoloShape => "tremShape",
            ParamId::TremoloMix => "tremMix",
            ParamId::CrossoverFrequency => "xoverFreq",
            ParamId::CrossoverResonance => "xoverReson",
            ParamId::CrossoverBalance => "xoverBalance",
            ParamId::CrossoverMix => "xoverMix",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ParamId::Gain => "Makeup Gain",
            ParamId::Mix => "Mix",
            ParamId::TremoloRate => "Rate",
            ParamId::TremoloRatio => "Ratio",
            ParamId::TremoloPhase => "Phase",
            ParamId::ThroughZero => "Through Zero",
            ParamId::TremoloShape => "Shape",
            ParamId::TremoloMix => "Tremolo Mix",
            ParamId::CrossoverFrequency => "Crossover",
            ParamId::CrossoverResonance => "Resonance",
            ParamId::CrossoverBalance => "Balance",
            ParamId::CrossoverMix => "Crossover Mix",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            ParamId::Gain => "dB",
            ParamId::TremoloRate | ParamId::CrossoverFrequency => "Hz",
            ParamId::TremoloRatio => "x",
            ParamId::TremoloPhase => "rad",
            _ => "",
        }
    }

    pub fn range(self) -> ParamRange {
        match self {
            ParamId::Gain => ParamRange::linear(-20.0, 20.0),
            ParamId::TremoloRate => ParamRange::skewed(0.0, 20.0, 0.333),
            ParamId::TremoloRatio => ParamRange::log(0.25, 4.0),
            ParamId::TremoloPhase => ParamRange::linear(0.0, TAU),
            ParamId::CrossoverFrequency => ParamRange::log(112.5, 20_000.0),
            ParamId::CrossoverResonance => ParamRange::log(0.125, 4.0),
            ParamId::Mix
            | ParamId::ThroughZero
            | ParamId::TremoloShape
            | ParamId::TremoloMix
            | ParamId::CrossoverBalance
            | ParamId::CrossoverMix => ParamRange::linear(0.0, 1.0),
        }
    }

    pub fn is_discrete(self) -> bool {
        matches!(self, ParamId::ThroughZero | ParamId::TremoloShape)
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|param| param.id() == id)
    }

    /// Human-readable value of `id` in `params`.
    pub fn display(self, params: &Parameters) -> String {
        match self {
            ParamId::ThroughZero => {
                let state = if params.through_zero { "on" } else { "off" };
                state.to_string()
            }
            ParamId::TremoloShape => WaveShape::from(params.tremolo_shape).name().to_string(),
            ParamId::CrossoverFrequency => format!("{:.0} Hz", params.crossover_frequency),
            ParamId::TremoloPhase => format!("{:.1}°", params.tremolo_phase.to_degrees()),
            _ => {
                let unit = self.unit();
                if unit.is_empty() {
                    format!("{:.3}", params.get(self))
                } else {
                    format!("{:.2} {}", params.get(self), unit)
                }
            }
        }
    }
}
