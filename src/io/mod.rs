//! Filesystem output.

pub mod writer;

pub use writer::{write_output, WriteOutcome};
