//! Wires and multi-driver resolution.

use std::fmt;
use serde::{Serialize, Deserialize};

use crate::circuit::ComponentId;
use crate::ternary::Trit;

/// One end of a wire: a component id and one of its port names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    #[serde(rename = "componentId")]
    pub component: ComponentId,
    pub port: String,
}

impl Endpoint {
    pub fn new(component: impl Into<ComponentId>, port: impl Into<String>) -> Self {
        Self { component: component.into(), port: port.into() }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.component, self.port)
    }
}

/// A directed connection from an output port to an input port.
///
/// Components are referenced by id, so removing a component only has to
/// filter the wire list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Wire {
    pub from: Endpoint,
    pub to: Endpoint,
}

impl Wire {
    pub fn new(from: Endpoint, to: Endpoint) -> Self {
        Self { from, to }
    }

    /// Shorthand for `Wire::new(Endpoint::new(..), Endpoint::new(..))`.
    pub fn between(
        src: impl Into<ComponentId>,
        src_port: impl Into<String>,
        dst: impl Into<ComponentId>,
        dst_port: impl Into<String>,
    ) -> Self {
        Self::new(Endpoint::new(src, src_port), Endpoint::new(dst, dst_port))
    }

    /// True if either end is on the given component.
    pub fn touches(&self, id: &str) -> bool {
        self.from.component.as_str() == id || self.to.component.as_str() == id
    }
}

impl fmt::Display for Wire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// Resolve the effective value of an input port from all of its drivers.
///
/// - no drivers: null
/// - both neg and pos present: contention, null
/// - otherwise the single non-null value present, or null
pub fn resolve(drivers: &[Trit]) -> Trit {
    let neg = drivers.contains(&Trit::Neg);
    let pos = drivers.contains(&Trit::Pos);
    match (neg, pos) {
        (true, false) => Trit::Neg,
        (false, true) => Trit::Pos,
        _ => Trit::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use Trit::*;

    #[test]
    fn test_resolution_cases() {
        assert_eq!(resolve(&[Pos, Neg]), Null);
        assert_eq!(resolve(&[Pos, Null, Pos]), Pos);
        assert_eq!(resolve(&[]), Null);
        assert_eq!(resolve(&[Null, Null]), Null);
        assert_eq!(resolve(&[Null, Null, Pos]), Pos);
        assert_eq!(resolve(&[Neg]), Neg);
        assert_eq!(resolve(&[Neg, Null, Pos, Null]), Null);
    }

    proptest! {
        #[test]
        fn resolution_ignores_driver_order(
            mut drivers in prop::collection::vec(prop::sample::select(Trit::ALL.to_vec()), 0..8)
        ) {
            let forward = resolve(&drivers);
            drivers.reverse();
            prop_assert_eq!(resolve(&drivers), forward);
            drivers.sort();
            prop_assert_eq!(resolve(&drivers), forward);
        }

        #[test]
        fn single_driver_passes_through(t in prop::sample::select(Trit::ALL.to_vec())) {
            prop_assert_eq!(resolve(&[t]), t);
        }
    }

    #[test]
    fn test_wire_display() {
        let w = Wire::between("sw1", "out", "g1", "in");
        assert_eq!(w.to_string(), "sw1.out -> g1.in");
        assert!(w.touches("g1"));
        assert!(!w.touches("p1"));
    }

    #[test]
    fn test_wire_serde_shape() {
        let w = Wire::between("sw1", "out", "g1", "in");
        let json = serde_json::to_value(&w).unwrap();
        assert_eq!(json["from"]["componentId"], "sw1");
        assert_eq!(json["to"]["port"], "in");
    }
}
