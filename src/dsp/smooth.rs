//! Linear parameter ramps.

/*
Parameter Smoothing
===================

Jumping a gain, a mix proportion or a phase offset from one value to another
between two samples produces a step in the output: an audible click. A
smoother turns that step into a short straight ramp.

    value
      1.0 ┤          ╭──────────
          │         ╱
          │        ╱   ramp_samples = ramp_seconds × sample_rate
          │       ╱
      0.0 ┼──────╯
          └──────┬──────┬───────→ samples
              target   target
               set     reached

Linear (constant-rate) ramps are what we use everywhere. They reach the
target in a known number of samples, which matters for the phase offset: a
50 ms ramp at 48 kHz always lands after exactly 2400 samples.

`snap()` sets current = target with no ramp. Use it after a discontinuity
that is intentional (a phase jump, a reset) so the smoother doesn't ramp away
from a stale position.
*/

/// A value that ramps linearly towards its target, one step per sample.
#[derive(Debug, Clone, Copy)]
pub struct SmoothedValue {
    current: f64,
    target: f64,
    step: f64,
    steps_remaining: usize,
    ramp_samples: usize,
    ramp_seconds: f64,
}

impl SmoothedValue {
    pub fn new(initial: f64, ramp_seconds: f64) -> Self {
        Self {
            current: initial,
            target: initial,
            step: 0.0,
            steps_remaining: 0,
            ramp_samples: 0,
            ramp_seconds: ramp_seconds.max(0.0),
        }
    }

    /// Recompute the ramp length for a sample rate. Snaps to the target.
    pub fn prepare(&mut self, sample_rate: f64) {
        self.ramp_samples = (self.ramp_seconds * sample_rate).round().max(0.0) as usize;
        self.snap();
    }

    /// Start a ramp from the current value towards `target`.
    pub fn set_target(&mut self, target: f64) {
        if target == self.target {
            return;
        }

        self.target = target;

        if self.ramp_samples == 0 {
            self.snap();
            return;
        }

        self.steps_remaining = self.ramp_samples;
        self.step = (self.target - self.current) / self.ramp_samples as f64;
    }

    /// Force both the current value and the target.
    pub fn set_current_and_target(&mut self, current: f64, target: f64) {
        self.current = current;
        self.target = target;
        self.steps_remaining = 0;
        self.step = 0.0;
        if current != target {
            // Ramp from the forced position, not from wherever we were.
            self.target = current;
            self.set_target(target);
        }
    }

    /// Jump to the target without ramping.
    pub fn snap(&mut self) {
        self.current = self.target;
        self.steps_remaining = 0;
        self.step = 0.0;
    }

    #[inline]
    pub fn next_value(&mut self) -> f64 {
        if self.steps_remaining == 0 {
            return self.target;
        }

        self.steps_remaining -= 1;
        if self.steps_remaining == 0 {
            self.current = self.target;
        } else {
            self.current += self.step;
        }
        self.current
    }

    /// Advance the ramp by `num_samples` without reading intermediate values.
    pub fn skip(&mut self, num_samples: usize) -> f64 {
        if num_samples >= self.steps_remaining {
            self.snap();
        } else {
            self.steps_remaining -= num_samples;
            self.current += self.step * num_samples as f64;
        }
        self.current
    }

    #[inline]
    pub fn current(&self) -> f64 {
        self.current
    }

    #[inline]
    pub fn target(&self) -> f64 {
        self.target
    }

    #[inline]
    pub fn is_smoothing(&self) -> bool {
        self.steps_remaining > 0
    }
}
