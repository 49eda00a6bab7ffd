pub mod envelope;
pub mod simulator;
pub mod source;
#[cfg(test)]
mod tests;

pub use envelope::{DriftEnvelope, StressCoupling, WalkRange};
pub use simulator::{advance, Simulator};
pub use source::{FixedSource, RandSource, SequenceSource, UniformSource};
