#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Skewed Parameter Ranges
=======================

Hosts and UIs move parameters in a normalised [0, 1] space. A range maps that
space onto real units, optionally bent by a skew exponent:

    normalised = ((value − start) / (end − start)) ^ skew
    value      = start + (end − start) × normalised ^ (1 / skew)

  skew = 1      linear
  skew < 1      more travel spent near `start` (frequencies, rates)
  skew > 1      more travel spent near `end`

`ParamRange::log` picks the skew that puts the geometric centre of the range
(√(start × end)) close to the middle of the knob:

    skew = 1 / log2(1 + √(end / start))
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub start: f64,
    pub end: f64,
    pub skew: f64,
}

impl ParamRange {
    pub const fn linear(start: f64, end: f64) -> Self {
        Self {
            start,
            end,
            skew: 1.0,
        }
    }

    pub const fn skewed(start: f64, end: f64, skew: f64) -> Self {
        Self { start, end, skew }
    }

    /// Skew tuned for ranges spanning several octaves. `start` must be > 0.
    pub fn log(start: f64, end: f64) -> Self {
        debug_assert!(start > 0.0 && end > start);
        Self::skewed(start, end, 1.0 / (1.0 + (end / start).sqrt()).log2())
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.start, self.end)
    }

    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.start && value <= self.end
    }

    pub fn to_normalized(&self, value: f64) -> f64 {
        let proportion = ((value - self.start) / (self.end - self.start)).clamp(0.0, 1.0);
        if self.skew == 1.0 {
            proportion
        } else {
            proportion.powf(self.skew)
        }
    }

    pub fn from_normalized(&self, normalized: f64) -> f64 {
        let mut proportion = normalized.clamp(0.0, 1.0);
        if self.skew != 1.0 && proportion > 0.0 {
            proportion = (proportion.ln() / self.skew).exp();
        }
        self.start + (self.end - self.start) * proportion
    }
}
