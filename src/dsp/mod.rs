//! Low-level DSP primitives used by the effect processors.
//!
//! These components are allocation-free once prepared and realtime-safe. They
//! stay focused on the signal-processing math so the processors in
//! [`crate::effect`] can layer on routing and parameter handling.

/// State-variable filter with low-pass and high-pass taps.
pub mod filter;
/// Multiplication, decibel conversion and smoothed makeup gain.
pub mod gain;
/// Dry/wet crossfades and the buffered `DryWetMixer`.
pub mod mix;
/// Phase-controlled oscillator and wave shapes.
pub mod oscillator;
/// Linear parameter ramps.
pub mod smooth;

pub use filter::{FilterType, SVFilter};
pub use gain::Gain;
pub use mix::DryWetMixer;
pub use oscillator::{PhaseOscillator, WaveShape};
pub use smooth::SmoothedValue;
