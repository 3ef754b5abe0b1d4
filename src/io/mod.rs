//! External interfaces: sample blocks in, control messages across threads.

/// Channel-major buffers and borrowed block views.
pub mod buffer;
/// Control-thread messages and render-thread state snapshots.
pub mod control;

pub use buffer::{AudioBlock, AudioBlockMut, AudioBuffer};
pub use control::{BandPhases, ControlMessage, ControlReceiver};
