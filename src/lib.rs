pub mod dsp; // Allocation-free signal primitives
pub mod effect; // Tremolo, crossover and the top-level processor
pub mod io; // Buffers, blocks and control messages
pub mod params; // Parameter snapshot, ranges and presets

pub use effect::{HarmonicTremolo, HyperTremolo, ProcessSpec, Processor};
pub use params::Parameters;

/// Largest block hosts in this crate hand to `process`.
pub const MAX_BLOCK_SIZE: usize = 2048;
