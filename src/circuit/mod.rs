//! Circuit model and evaluation.
//!
//! This module implements the gate-level engine:
//! - components with fixed, named ports and a per-variant transfer function
//! - wires referencing ports by component id, with multi-driver resolution
//! - a circuit container that owns both and evaluates them one step at a time

mod component;
mod wire;
mod error;
mod snapshot;
mod engine;

pub use component::{Component, ComponentId, Direction, Gate, Kind, Position};
pub use wire::{resolve, Endpoint, Wire};
pub use error::{CircuitError, OperationError, StructuralError};
pub use snapshot::{PortValue, Snapshot, Unwired};
pub use engine::Circuit;
