//! Benchmarks for low-level DSP primitives.

mod filter;
mod gain;
mod mix;
mod oscillator;

pub use filter::bench_filter;
pub use gain::bench_gain;
pub use mix::bench_mix;
pub use oscillator::bench_oscillator;
