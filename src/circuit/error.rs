//! Error taxonomy for circuit mutation and evaluation.

use crate::circuit::{ComponentId, Direction, Kind, Wire};
use crate::ternary::{SignalError, Trit};
use thiserror::Error;

/// The circuit graph is, or would become, inconsistent.
///
/// Raised by loads and structural edits before anything is changed, or by a
/// step that finds a wire it cannot route. In every case the circuit keeps its
/// previous state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    #[error("duplicate component id `{0}`")]
    DuplicateComponent(ComponentId),

    #[error("unknown component `{0}`")]
    UnknownComponent(ComponentId),

    #[error("{kind} `{component}` has no {direction} port `{port}`")]
    UnknownPort {
        component: ComponentId,
        kind: Kind,
        direction: Direction,
        port: String,
    },

    #[error("unknown component type `{0}`")]
    UnknownKind(String),

    #[error("no wire {0}")]
    UnknownWire(Wire),

    #[error("invalid parameter for {kind} `{component}`: {message}")]
    InvalidParameter {
        component: ComponentId,
        kind: Kind,
        message: String,
    },

    #[error("dangling wire {0}")]
    DanglingWire(Wire),
}

/// A driver operation was aimed at the wrong component. Nothing changed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationError {
    #[error("unknown component `{0}`")]
    UnknownComponent(ComponentId),

    #[error("`{id}` is a {kind}, not a switch")]
    NotASwitch { id: ComponentId, kind: Kind },

    #[error("`{id}` is a {kind}, not a probe")]
    NotAProbe { id: ComponentId, kind: Kind },

    #[error("{kind} `{id}` cannot hold {value}")]
    InvalidValue { id: ComponentId, kind: Kind, value: Trit },
}

/// Any failure surfaced by the simulation driver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CircuitError {
    #[error("structural error: {0}")]
    Structural(#[from] StructuralError),

    #[error("invalid operation: {0}")]
    InvalidOperation(#[from] OperationError),

    #[error("contract violation: {0}")]
    ContractViolation(#[from] SignalError),
}
