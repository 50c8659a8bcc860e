//! Simulation driver.
//!
//! Wraps a [`Circuit`](crate::circuit::Circuit) with switch mutation, single
//! and bounded steps, and a run mode for externally timed loops.

mod driver;

pub use driver::{RunState, Simulator};
