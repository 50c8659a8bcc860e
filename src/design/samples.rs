//! Built-in sample circuits used by the demo, the self-test and the bench.

use crate::circuit::{Circuit, Component, Kind, Position, StructuralError, Wire};
use crate::ternary::Trit;

/// Switch, transistor, NOR and latch feeding one probe.
///
/// `sw1` gates the latch enable and the transistor sign; `sw2` drives the
/// second AND and NOR inputs.
pub fn latch_bench() -> Result<Circuit, StructuralError> {
    Circuit::from_parts(
        [
            Component::ternary_switch("sw1", Trit::Pos).at(Position::new(80.0, 80.0)),
            Component::ternary_switch("sw2", Trit::Neg).at(Position::new(80.0, 200.0)),
            Component::new("and1", Kind::TAnd).at(Position::new(240.0, 120.0)),
            Component::new("t1", Kind::Transistor).at(Position::new(400.0, 80.0)),
            Component::new("nor1", Kind::TNor).at(Position::new(560.0, 120.0)),
            Component::new("l1", Kind::TLatch).at(Position::new(720.0, 80.0)),
            Component::new("p1", Kind::Probe).at(Position::new(880.0, 80.0)),
        ],
        [
            Wire::between("sw1", "out", "and1", "in1"),
            Wire::between("sw2", "out", "and1", "in2"),
            Wire::between("and1", "out", "t1", "presence"),
            Wire::between("sw1", "out", "t1", "sign"),
            Wire::between("t1", "out", "nor1", "in1"),
            Wire::between("sw2", "out", "nor1", "in2"),
            Wire::between("nor1", "out", "l1", "in"),
            Wire::between("sw1", "out", "l1", "enable"),
            Wire::between("l1", "out", "p1", "in"),
        ],
    )
}

/// Three ternary switches into a full adder with sum and carry probes.
pub fn full_adder(a: Trit, b: Trit, c: Trit) -> Result<Circuit, StructuralError> {
    Circuit::from_parts(
        [
            Component::ternary_switch("a", a).at(Position::new(80.0, 60.0)),
            Component::ternary_switch("b", b).at(Position::new(80.0, 160.0)),
            Component::ternary_switch("c", c).at(Position::new(80.0, 260.0)),
            Component::new("fa", Kind::TFullAdder).at(Position::new(260.0, 160.0)),
            Component::new("sum", Kind::Probe).at(Position::new(440.0, 110.0)),
            Component::new("carry", Kind::Probe).at(Position::new(440.0, 210.0)),
        ],
        [
            Wire::between("a", "out", "fa", "ai"),
            Wire::between("b", "out", "fa", "bi"),
            Wire::between("c", "out", "fa", "ci"),
            Wire::between("fa", "so", "sum", "in"),
            Wire::between("fa", "co", "carry", "in"),
        ],
    )
}
