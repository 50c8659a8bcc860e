//! # Ternuino
//!
//! A gate-level simulator for small balanced ternary (and binary) logic
//! circuits.
//!
//! A circuit is a set of components (switches, ternary gates, a transistor,
//! a latch, a full adder and probes) joined by wires. Each call to
//! [`Circuit::step`] performs one synchronous evaluation pass over the whole
//! graph.

pub mod ternary;
pub mod circuit;
pub mod sim;
pub mod design;

#[cfg(feature = "tui")]
pub mod tui;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use ternary::{Trit, SignalError};
pub use circuit::{
    Circuit, CircuitError, Component, ComponentId, Direction, Endpoint, Gate, Kind,
    OperationError, Position, Snapshot, StructuralError, Wire,
};
pub use sim::{RunState, Simulator};
pub use design::{load_str, dump_string, load_design, save_design, DesignError, DesignFile};

#[cfg(feature = "tui")]
pub use tui::run_bench;
