//! Components: typed nodes with fixed ports and a transfer function.
//!
//! The variant set is closed, so a component is a [`Gate`] (tag plus any
//! per-variant state) dispatched through a single `match` in
//! [`Gate::transfer`].

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};

use crate::circuit::{OperationError, StructuralError};
use crate::ternary::{self, Trit};

/// Stable identifier of a component, unique within a circuit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(String);

impl ComponentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl Borrow<str> for ComponentId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ComponentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ComponentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Port direction. Ports carry no width, only a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,
    Out,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::In => write!(f, "in"),
            Direction::Out => write!(f, "out"),
        }
    }
}

/// Canvas position. Carried for editors and saved designs; never read by evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Variant tag of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    SwitchBinary,
    SwitchTernary,
    #[serde(rename = "TAND")]
    TAnd,
    #[serde(rename = "TNOR")]
    TNor,
    #[serde(rename = "TNOT")]
    TNot,
    Transistor,
    TLatch,
    Probe,
    TFullAdder,
}

impl Kind {
    pub const ALL: [Kind; 9] = [
        Kind::SwitchBinary,
        Kind::SwitchTernary,
        Kind::TAnd,
        Kind::TNor,
        Kind::TNot,
        Kind::Transistor,
        Kind::TLatch,
        Kind::Probe,
        Kind::TFullAdder,
    ];

    /// The tag used in design files.
    pub const fn tag(self) -> &'static str {
        match self {
            Kind::SwitchBinary => "SwitchBinary",
            Kind::SwitchTernary => "SwitchTernary",
            Kind::TAnd => "TAND",
            Kind::TNor => "TNOR",
            Kind::TNot => "TNOT",
            Kind::Transistor => "Transistor",
            Kind::TLatch => "TLatch",
            Kind::Probe => "Probe",
            Kind::TFullAdder => "TFullAdder",
        }
    }

    /// Input port names, in the order the transfer function reads them.
    pub const fn inputs(self) -> &'static [&'static str] {
        match self {
            Kind::SwitchBinary | Kind::SwitchTernary => &[],
            Kind::TAnd | Kind::TNor => &["in1", "in2"],
            Kind::TNot | Kind::Probe => &["in"],
            Kind::Transistor => &["presence", "sign"],
            Kind::TLatch => &["in", "enable"],
            Kind::TFullAdder => &["ai", "bi", "ci"],
        }
    }

    /// Output port names, in the order the transfer function produces them.
    pub const fn outputs(self) -> &'static [&'static str] {
        match self {
            Kind::Probe => &[],
            Kind::TFullAdder => &["so", "co"],
            _ => &["out"],
        }
    }

    pub const fn ports(self, direction: Direction) -> &'static [&'static str] {
        match direction {
            Direction::In => self.inputs(),
            Direction::Out => self.outputs(),
        }
    }

    /// Index of the named port in [`Kind::ports`].
    pub fn port_index(self, direction: Direction, name: &str) -> Option<usize> {
        self.ports(direction).iter().position(|p| *p == name)
    }

    pub const fn is_switch(self) -> bool {
        matches!(self, Kind::SwitchBinary | Kind::SwitchTernary)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.tag())
    }
}

impl FromStr for Kind {
    type Err = StructuralError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Kind::ALL
            .into_iter()
            .find(|kind| kind.tag() == tag)
            .ok_or_else(|| StructuralError::UnknownKind(tag.to_string()))
    }
}

/// A component variant together with its state.
///
/// Switches hold their settable value, the latch holds its memory cell and
/// the probe holds the last value it displayed. Every other gate is a pure
/// function of its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    SwitchBinary { on: bool },
    SwitchTernary { value: Trit },
    TAnd,
    TNor,
    TNot,
    Transistor,
    TLatch { stored: Trit },
    Probe { last: Trit },
    TFullAdder,
}

impl Gate {
    /// A gate of the given kind in its initial state (everything null, switches off).
    pub const fn new(kind: Kind) -> Self {
        match kind {
            Kind::SwitchBinary => Gate::SwitchBinary { on: false },
            Kind::SwitchTernary => Gate::SwitchTernary { value: Trit::Null },
            Kind::TAnd => Gate::TAnd,
            Kind::TNor => Gate::TNor,
            Kind::TNot => Gate::TNot,
            Kind::Transistor => Gate::Transistor,
            Kind::TLatch => Gate::TLatch { stored: Trit::Null },
            Kind::Probe => Gate::Probe { last: Trit::Null },
            Kind::TFullAdder => Gate::TFullAdder,
        }
    }

    pub const fn kind(&self) -> Kind {
        match self {
            Gate::SwitchBinary { .. } => Kind::SwitchBinary,
            Gate::SwitchTernary { .. } => Kind::SwitchTernary,
            Gate::TAnd => Kind::TAnd,
            Gate::TNor => Kind::TNor,
            Gate::TNot => Kind::TNot,
            Gate::Transistor => Kind::Transistor,
            Gate::TLatch { .. } => Kind::TLatch,
            Gate::Probe { .. } => Kind::Probe,
            Gate::TFullAdder => Kind::TFullAdder,
        }
    }

    /// The value held by a stateful gate: switch setting, latch memory, or probe reading.
    pub const fn held(&self) -> Option<Trit> {
        match *self {
            Gate::SwitchBinary { on } => Some(if on { Trit::Pos } else { Trit::Null }),
            Gate::SwitchTernary { value } => Some(value),
            Gate::TLatch { stored } => Some(stored),
            Gate::Probe { last } => Some(last),
            _ => None,
        }
    }

    /// Evaluate the gate once.
    ///
    /// `inputs` are the resolved input values in [`Kind::inputs`] order. Returns
    /// the gate's next state and its output values in [`Kind::outputs`] order.
    /// Probes are returned unchanged; their reading is sampled by the circuit
    /// after all outputs are known.
    ///
    /// # Panics
    /// Panics if `inputs` does not match the kind's input arity.
    pub fn transfer(&self, inputs: &[Trit]) -> (Gate, Vec<Trit>) {
        assert_eq!(
            inputs.len(),
            self.kind().inputs().len(),
            "{} expects {} inputs",
            self.kind(),
            self.kind().inputs().len()
        );

        match *self {
            Gate::SwitchBinary { on } => (*self, vec![Trit::from(on)]),
            Gate::SwitchTernary { value } => (*self, vec![value]),
            Gate::TAnd => (*self, vec![ternary::and(inputs[0], inputs[1])]),
            Gate::TNor => (*self, vec![ternary::nor(inputs[0], inputs[1])]),
            Gate::TNot => (*self, vec![ternary::not(inputs[0])]),
            Gate::Transistor => {
                let (presence, sign) = (inputs[0], inputs[1]);
                let out = if !presence.is_null() && !sign.is_null() { sign } else { Trit::Null };
                (*self, vec![out])
            }
            Gate::TLatch { stored } => {
                let (input, enable) = (inputs[0], inputs[1]);
                let stored = if enable == Trit::Pos { input } else { stored };
                (Gate::TLatch { stored }, vec![stored])
            }
            Gate::Probe { .. } => (*self, Vec::new()),
            Gate::TFullAdder => {
                let (sum, carry) = ternary::full_add(inputs[0], inputs[1], inputs[2]);
                (*self, vec![sum, carry])
            }
        }
    }

    /// Output values before the first step: switches drive their setting,
    /// everything else drives null.
    fn initial_outputs(&self) -> Vec<Trit> {
        match *self {
            Gate::SwitchBinary { on } => vec![Trit::from(on)],
            Gate::SwitchTernary { value } => vec![value],
            _ => vec![Trit::Null; self.kind().outputs().len()],
        }
    }
}

/// A node of the circuit: identity, gate, position and the port values of
/// the latest snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    id: ComponentId,
    gate: Gate,
    position: Position,
    inputs: Vec<Trit>,
    outputs: Vec<Trit>,
}

impl Component {
    /// A component of the given kind in its initial state.
    pub fn new(id: impl Into<ComponentId>, kind: Kind) -> Self {
        Self::with_gate(id, Gate::new(kind))
    }

    pub fn with_gate(id: impl Into<ComponentId>, gate: Gate) -> Self {
        Self {
            id: id.into(),
            inputs: vec![Trit::Null; gate.kind().inputs().len()],
            outputs: gate.initial_outputs(),
            gate,
            position: Position::default(),
        }
    }

    /// A binary switch starting at `on`.
    pub fn binary_switch(id: impl Into<ComponentId>, on: bool) -> Self {
        Self::with_gate(id, Gate::SwitchBinary { on })
    }

    /// A ternary switch starting at `value`.
    pub fn ternary_switch(id: impl Into<ComponentId>, value: Trit) -> Self {
        Self::with_gate(id, Gate::SwitchTernary { value })
    }

    /// Place the component on the canvas.
    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn id(&self) -> &ComponentId {
        &self.id
    }

    pub fn kind(&self) -> Kind {
        self.gate.kind()
    }

    pub fn gate(&self) -> Gate {
        self.gate
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Resolved input values from the latest step, in [`Kind::inputs`] order.
    pub fn inputs(&self) -> &[Trit] {
        &self.inputs
    }

    /// Output values of the latest snapshot, in [`Kind::outputs`] order.
    pub fn outputs(&self) -> &[Trit] {
        &self.outputs
    }

    /// Value currently on the named port.
    pub fn port(&self, direction: Direction, name: &str) -> Option<Trit> {
        let index = self.kind().port_index(direction, name)?;
        match direction {
            Direction::In => self.inputs.get(index).copied(),
            Direction::Out => self.outputs.get(index).copied(),
        }
    }

    /// Every port with its current value, inputs first.
    pub fn ports(&self) -> impl Iterator<Item = (Direction, &'static str, Trit)> + '_ {
        let kind = self.kind();
        let inputs = kind.inputs().iter().zip(&self.inputs).map(|(n, v)| (Direction::In, *n, *v));
        let outputs = kind.outputs().iter().zip(&self.outputs).map(|(n, v)| (Direction::Out, *n, *v));
        inputs.chain(outputs)
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub(crate) fn commit(&mut self, gate: Gate, inputs: Vec<Trit>, outputs: Vec<Trit>) {
        debug_assert_eq!(gate.kind(), self.kind());
        self.gate = gate;
        self.inputs = inputs;
        self.outputs = outputs;
    }

    /// Set a switch. The new value is driven immediately.
    pub(crate) fn set_switch(&mut self, value: Trit) -> Result<Trit, OperationError> {
        let gate = match self.gate {
            Gate::SwitchBinary { .. } if value.is_binary() => Gate::SwitchBinary { on: value == Trit::Pos },
            Gate::SwitchTernary { .. } => Gate::SwitchTernary { value },
            Gate::SwitchBinary { .. } => {
                return Err(OperationError::InvalidValue { id: self.id.clone(), kind: self.kind(), value });
            }
            _ => return Err(OperationError::NotASwitch { id: self.id.clone(), kind: self.kind() }),
        };
        self.gate = gate;
        self.outputs = gate.initial_outputs();
        Ok(value)
    }

    /// Advance a switch: binary 0 → 1 → 0, ternary -1 → 0 → 1 → -1.
    pub(crate) fn toggle(&mut self) -> Result<Trit, OperationError> {
        let next = match self.gate {
            Gate::SwitchBinary { on } => Trit::from(!on),
            Gate::SwitchTernary { value } => value.cycle(),
            _ => return Err(OperationError::NotASwitch { id: self.id.clone(), kind: self.kind() }),
        };
        self.set_switch(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Trit::*;

    #[test]
    fn test_kind_tags_roundtrip() {
        for kind in Kind::ALL {
            assert_eq!(kind.tag().parse::<Kind>().unwrap(), kind);
        }
        assert_eq!(
            "TXOR".parse::<Kind>(),
            Err(StructuralError::UnknownKind("TXOR".into()))
        );
    }

    #[test]
    fn test_transistor() {
        let t = Gate::Transistor;
        assert_eq!(t.transfer(&[Null, Pos]).1, vec![Null]);
        assert_eq!(t.transfer(&[Pos, Null]).1, vec![Null]);
        assert_eq!(t.transfer(&[Pos, Neg]).1, vec![Neg]);
        assert_eq!(t.transfer(&[Neg, Pos]).1, vec![Pos]);
    }

    #[test]
    fn test_latch_holds_when_disabled() {
        let latch = Gate::new(Kind::TLatch);
        let (latch, out) = latch.transfer(&[Pos, Pos]);
        assert_eq!(out, vec![Pos]);
        assert_eq!(latch.held(), Some(Pos));

        let (latch, out) = latch.transfer(&[Neg, Null]);
        assert_eq!(out, vec![Pos]);
        let (latch, out) = latch.transfer(&[Neg, Neg]);
        assert_eq!(out, vec![Pos]);
        assert_eq!(latch.held(), Some(Pos));
    }

    #[test]
    fn test_gates() {
        assert_eq!(Gate::TAnd.transfer(&[Pos, Neg]).1, vec![Neg]);
        assert_eq!(Gate::TNor.transfer(&[Null, Neg]).1, vec![Null]);
        assert_eq!(Gate::TNot.transfer(&[Pos]).1, vec![Neg]);
        assert_eq!(Gate::TFullAdder.transfer(&[Pos, Pos, Null]).1, vec![Neg, Pos]);
        assert!(Gate::new(Kind::Probe).transfer(&[Pos]).1.is_empty());
    }

    #[test]
    #[should_panic]
    fn test_wrong_arity_panics() {
        Gate::TAnd.transfer(&[Pos]);
    }

    #[test]
    fn test_binary_switch_toggle_sequence() {
        let mut sw = Component::binary_switch("sw", false);
        assert_eq!(sw.outputs(), &[Null]);
        assert_eq!(sw.toggle(), Ok(Pos));
        assert_eq!(sw.outputs(), &[Pos]);
        assert_eq!(sw.toggle(), Ok(Null));
        assert_eq!(sw.outputs(), &[Null]);
    }

    #[test]
    fn test_ternary_switch_toggle_sequence() {
        let mut sw = Component::ternary_switch("sw", Neg);
        assert_eq!(sw.toggle(), Ok(Null));
        assert_eq!(sw.toggle(), Ok(Pos));
        assert_eq!(sw.toggle(), Ok(Neg));
        assert_eq!(sw.port(Direction::Out, "out"), Some(Neg));
    }

    #[test]
    fn test_binary_switch_rejects_neg() {
        let mut sw = Component::binary_switch("sw", true);
        assert!(matches!(sw.set_switch(Neg), Err(OperationError::InvalidValue { .. })));
        assert_eq!(sw.outputs(), &[Pos]);
    }

    #[test]
    fn test_toggle_non_switch() {
        let mut gate = Component::new("g", Kind::TNot);
        assert_eq!(
            gate.toggle(),
            Err(OperationError::NotASwitch { id: "g".into(), kind: Kind::TNot })
        );
    }

    #[test]
    fn test_ports_listing() {
        let adder = Component::new("fa", Kind::TFullAdder);
        let names: Vec<_> = adder.ports().map(|(d, n, _)| format!("{}:{}", d, n)).collect();
        assert_eq!(names, ["in:ai", "in:bi", "in:ci", "out:so", "out:co"]);
    }
}
