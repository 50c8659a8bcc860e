//! Read-only views of circuit state for display and comparison.

use std::fmt;
use serde::Serialize;

use crate::circuit::{ComponentId, Direction, Kind};
use crate::ternary::Trit;

/// The value on one port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortValue {
    pub component: ComponentId,
    pub port: &'static str,
    pub direction: Direction,
    pub value: Trit,
}

/// Every port value in the circuit, in component insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub ports: Vec<PortValue>,
}

impl Snapshot {
    pub fn get(&self, component: &str, direction: Direction, port: &str) -> Option<Trit> {
        self.ports
            .iter()
            .find(|p| p.component.as_str() == component && p.direction == direction && p.port == port)
            .map(|p| p.value)
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for p in &self.ports {
            writeln!(f, "{}.{} ({}) = {}", p.component, p.port, p.direction, p.value)?;
        }
        Ok(())
    }
}

/// A component with ports that nothing is connected to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Unwired {
    pub component: ComponentId,
    pub kind: Kind,
    pub ports: Vec<(Direction, &'static str)>,
}

impl fmt::Display for Unwired {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}):", self.component, self.kind)?;
        for (direction, port) in &self.ports {
            write!(f, " {}:{}", direction, port)?;
        }
        Ok(())
    }
}
