//! Complete effect chains.

mod processor;
mod tremolo;

pub use processor::bench_processor;
pub use tremolo::bench_tremolo;
