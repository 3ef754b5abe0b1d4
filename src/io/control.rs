use std::f64::consts::TAU;

#[cfg(feature = "rtrb")]
use rtrb::Consumer;

use crate::params::Parameters;

/// Messages from the control thread to the render thread.
///
/// `Params` replaces the whole parameter snapshot; the render thread only
/// applies the newest one it finds in a block. `Sync` and `Reset` are applied
/// in arrival order.
#[derive(Debug, Copy, Clone)]
pub enum ControlMessage {
    Params(Parameters),
    Sync,
    Reset,
}

pub trait ControlReceiver {
    fn pop(&mut self) -> Option<ControlMessage>;
}

#[cfg(feature = "rtrb")]
impl ControlReceiver for Consumer<ControlMessage> {
    fn pop(&mut self) -> Option<ControlMessage> {
        Consumer::pop(self).ok()
    }
}

/// Queue-backed receiver for hosts without a ring buffer, and for tests.
impl ControlReceiver for std::collections::VecDeque<ControlMessage> {
    fn pop(&mut self) -> Option<ControlMessage> {
        self.pop_front()
    }
}

/// Oscillator phases of both bands, published for display.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct BandPhases {
    /// Low band accumulator, folded into [0, 2π).
    pub low: f64,
    /// High band accumulator, folded into [0, 2π).
    pub high: f64,
    /// `(high − low) mod 2π` of the raw accumulators.
    pub difference: f64,
    /// Smoothed offset currently applied on top of `difference`.
    pub offset: f64,
}

impl BandPhases {
    pub fn new(low: f64, high: f64, offset: f64) -> Self {
        Self {
            low: low.rem_euclid(TAU),
            high: high.rem_euclid(TAU),
            difference: (high - low).rem_euclid(TAU),
            offset,
        }
    }

    /// Phase difference the listener hears, in [0, 2π).
    pub fn audible_difference(&self) -> f64 {
        (self.difference + self.offset).rem_euclid(TAU)
    }
}
