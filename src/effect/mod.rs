//! Processors built from the DSP primitives.
//!
//! Everything here implements [`node::Processor`]: prepared once with a
//! [`node::ProcessSpec`], then driven block by block. The composition is
//! strictly nested:
//!
//! `HyperTremolo` ⊃ `HarmonicTremolo` ⊃ `Crossover<Tremolo, Tremolo>` ⊃ `Tremolo`

/// Two-band splitter with per-band processors.
pub mod crossover;
/// Crossover with a phase-locked tremolo per band.
pub mod harmonic;
/// Global dry/wet and makeup gain around the harmonic tremolo.
pub mod hyper;
/// Core trait shared by all processors.
pub mod node;
/// Single-oscillator amplitude modulation.
pub mod tremolo;

pub use crossover::Crossover;
pub use harmonic::{HarmonicTremolo, RateMap};
pub use hyper::HyperTremolo;
pub use node::{FnProcessor, Passthrough, ProcessSpec, Processor};
pub use tremolo::Tremolo;
