//! The circuit container and its step protocol.
//!
//! A step is one synchronous pass:
//! 1. resolve every input from the outputs of the previous snapshot,
//! 2. run every transfer function on those inputs,
//! 3. commit the new outputs and let probes sample them.
//!
//! Because all reads in (1) use the previous snapshot, component order never
//! affects the result and feedback loops advance by one tick per step.

use std::collections::{HashMap, HashSet};
use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::circuit::{
    resolve, Component, ComponentId, Direction, Gate, Kind, OperationError, Position, Snapshot,
    PortValue, StructuralError, Unwired, Wire,
};
use crate::ternary::Trit;

/// A wire with both ends looked up: component index and port index.
#[derive(Debug, Clone, Copy)]
struct Route {
    src: usize,
    src_port: usize,
    dst: usize,
    dst_port: usize,
}

/// Drivers of each (component index, input port index).
type Drivers = HashMap<(usize, usize), Vec<Trit>>;

/// Components keyed by id plus the wires between them.
///
/// Every wire in the circuit refers to existing ports: mutations validate
/// before changing anything, and removing a component removes its wires.
#[derive(Debug, Clone, Default)]
pub struct Circuit {
    components: IndexMap<ComponentId, Component>,
    wires: Vec<Wire>,
}

impl Circuit {
    /// Create an empty circuit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a circuit from components and wires, all or nothing.
    pub fn from_parts(
        components: impl IntoIterator<Item = Component>,
        wires: impl IntoIterator<Item = Wire>,
    ) -> Result<Self, StructuralError> {
        let mut circuit = Self::new();
        for component in components {
            circuit.add_component(component)?;
        }
        for wire in wires {
            circuit.connect(wire)?;
        }
        Ok(circuit)
    }

    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.get(id)
    }

    /// Components in insertion order.
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.values()
    }

    pub fn wires(&self) -> &[Wire] {
        &self.wires
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Insert a component. Fails if the id is already taken.
    pub fn add_component(&mut self, component: Component) -> Result<(), StructuralError> {
        if self.components.contains_key(component.id().as_str()) {
            return Err(StructuralError::DuplicateComponent(component.id().clone()));
        }
        debug!(id = %component.id(), kind = %component.kind(), "add component");
        self.components.insert(component.id().clone(), component);
        Ok(())
    }

    /// Remove a component together with every wire touching it.
    pub fn remove_component(&mut self, id: &str) -> Result<Component, StructuralError> {
        let component = self
            .components
            .shift_remove(id)
            .ok_or_else(|| StructuralError::UnknownComponent(id.into()))?;
        let before = self.wires.len();
        self.wires.retain(|wire| !wire.touches(id));
        debug!(id, wires = before - self.wires.len(), "remove component");
        Ok(component)
    }

    /// Update a component's canvas position.
    pub fn move_component(&mut self, id: &str, position: Position) -> Result<(), StructuralError> {
        let component = self
            .components
            .get_mut(id)
            .ok_or_else(|| StructuralError::UnknownComponent(id.into()))?;
        component.set_position(position);
        Ok(())
    }

    /// Add a wire from an output port to an input port.
    pub fn connect(&mut self, wire: Wire) -> Result<(), StructuralError> {
        self.check_port(&wire.from.component, Direction::Out, &wire.from.port)?;
        self.check_port(&wire.to.component, Direction::In, &wire.to.port)?;
        debug!(%wire, "connect");
        self.wires.push(wire);
        Ok(())
    }

    /// Remove one wire equal to `wire`.
    pub fn disconnect(&mut self, wire: &Wire) -> Result<Wire, StructuralError> {
        let index = self
            .wires
            .iter()
            .position(|w| w == wire)
            .ok_or_else(|| StructuralError::UnknownWire(wire.clone()))?;
        debug!(%wire, "disconnect");
        Ok(self.wires.remove(index))
    }

    /// An unused id of the form `<Tag>_<n>`.
    pub fn fresh_id(&self, kind: Kind) -> ComponentId {
        let mut n = self.components.len() + 1;
        loop {
            let id = format!("{}_{}", kind.tag(), n);
            if !self.components.contains_key(id.as_str()) {
                return ComponentId::new(id);
            }
            n += 1;
        }
    }

    /// Advance a switch to its next setting. Returns the new value.
    pub fn toggle_switch(&mut self, id: &str) -> Result<Trit, OperationError> {
        self.components
            .get_mut(id)
            .ok_or_else(|| OperationError::UnknownComponent(id.into()))?
            .toggle()
    }

    /// Set a switch to `value`. Binary switches accept only null and pos.
    pub fn set_switch(&mut self, id: &str, value: Trit) -> Result<Trit, OperationError> {
        self.components
            .get_mut(id)
            .ok_or_else(|| OperationError::UnknownComponent(id.into()))?
            .set_switch(value)
    }

    /// The value a probe currently displays.
    pub fn probe(&self, id: &str) -> Result<Trit, OperationError> {
        let component = self
            .components
            .get(id)
            .ok_or_else(|| OperationError::UnknownComponent(id.into()))?;
        match component.gate() {
            Gate::Probe { last } => Ok(last),
            _ => Err(OperationError::NotAProbe { id: id.into(), kind: component.kind() }),
        }
    }

    /// Every probe with its displayed value.
    pub fn probes(&self) -> impl Iterator<Item = (&ComponentId, Trit)> {
        self.components.values().filter_map(|c| match c.gate() {
            Gate::Probe { last } => Some((c.id(), last)),
            _ => None,
        })
    }

    pub fn switches(&self) -> impl Iterator<Item = &Component> {
        self.components.values().filter(|c| c.kind().is_switch())
    }

    /// Evaluate the whole circuit once.
    ///
    /// On error nothing is committed and the previous snapshot stays in place.
    pub fn step(&mut self) -> Result<(), StructuralError> {
        let routes = self.routes()?;

        let current: Vec<&[Trit]> = self.components.values().map(Component::outputs).collect();
        let drivers = collect_drivers(&routes, &current);

        let mut staged: Vec<(Gate, Vec<Trit>, Vec<Trit>)> = self
            .components
            .values()
            .enumerate()
            .map(|(index, component)| {
                let inputs = resolve_inputs(&drivers, index, component.kind());
                let (gate, outputs) = component.gate().transfer(&inputs);
                (gate, inputs, outputs)
            })
            .collect();

        // Probes have no outputs, so they can read the new values without
        // affecting anything else.
        let next: Vec<&[Trit]> = staged.iter().map(|(_, _, outputs)| outputs.as_slice()).collect();
        let sampled = collect_drivers(&routes, &next);
        for (index, (gate, inputs, _)) in staged.iter_mut().enumerate() {
            if let Gate::Probe { .. } = gate {
                *inputs = resolve_inputs(&sampled, index, Kind::Probe);
                *gate = Gate::Probe { last: inputs[0] };
            }
        }

        for (component, (gate, inputs, outputs)) in self.components.values_mut().zip(staged) {
            component.commit(gate, inputs, outputs);
        }
        trace!(components = self.components.len(), wires = self.wires.len(), "step");
        Ok(())
    }

    /// Every port value, in component insertion order.
    pub fn snapshot(&self) -> Snapshot {
        let ports = self
            .components
            .values()
            .flat_map(|component| {
                component.ports().map(move |(direction, port, value)| PortValue {
                    component: component.id().clone(),
                    port,
                    direction,
                    value,
                })
            })
            .collect();
        Snapshot { ports }
    }

    /// Components with undriven inputs or outputs that drive nothing.
    pub fn unwired(&self) -> Vec<Unwired> {
        let driven: HashSet<(&str, &str)> = self
            .wires
            .iter()
            .map(|w| (w.to.component.as_str(), w.to.port.as_str()))
            .collect();
        let fanned: HashSet<(&str, &str)> = self
            .wires
            .iter()
            .map(|w| (w.from.component.as_str(), w.from.port.as_str()))
            .collect();

        self.components
            .values()
            .filter_map(|component| {
                let id = component.id().as_str();
                let kind = component.kind();
                let inputs = kind
                    .inputs()
                    .iter()
                    .filter(|port| !driven.contains(&(id, **port)))
                    .map(|port| (Direction::In, *port));
                let outputs = kind
                    .outputs()
                    .iter()
                    .filter(|port| !fanned.contains(&(id, **port)))
                    .map(|port| (Direction::Out, *port));
                let ports: Vec<_> = inputs.chain(outputs).collect();
                (!ports.is_empty()).then(|| Unwired { component: component.id().clone(), kind, ports })
            })
            .collect()
    }

    fn check_port(&self, id: &ComponentId, direction: Direction, port: &str) -> Result<(), StructuralError> {
        let component = self
            .components
            .get(id.as_str())
            .ok_or_else(|| StructuralError::UnknownComponent(id.clone()))?;
        match component.kind().port_index(direction, port) {
            Some(_) => Ok(()),
            None => Err(StructuralError::UnknownPort {
                component: id.clone(),
                kind: component.kind(),
                direction,
                port: port.to_string(),
            }),
        }
    }

    fn routes(&self) -> Result<Vec<Route>, StructuralError> {
        self.wires
            .iter()
            .map(|wire| -> Result<Route, StructuralError> {
                let dangling = || StructuralError::DanglingWire(wire.clone());
                let (src, _, source) = self.components.get_full(wire.from.component.as_str()).ok_or_else(dangling)?;
                let (dst, _, sink) = self.components.get_full(wire.to.component.as_str()).ok_or_else(dangling)?;
                Ok(Route {
                    src,
                    src_port: source.kind().port_index(Direction::Out, &wire.from.port).ok_or_else(dangling)?,
                    dst,
                    dst_port: sink.kind().port_index(Direction::In, &wire.to.port).ok_or_else(dangling)?,
                })
            })
            .collect()
    }
}

fn collect_drivers(routes: &[Route], outputs: &[&[Trit]]) -> Drivers {
    let mut drivers = Drivers::new();
    for route in routes {
        drivers
            .entry((route.dst, route.dst_port))
            .or_default()
            .push(outputs[route.src][route.src_port]);
    }
    drivers
}

fn resolve_inputs(drivers: &Drivers, index: usize, kind: Kind) -> Vec<Trit> {
    (0..kind.inputs().len())
        .map(|port| drivers.get(&(index, port)).map_or(Trit::Null, |d| resolve(d)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use Trit::*;

    /// sw1 (binary, on) -> g1 (TNOT) -> p1 (probe)
    fn inverter_chain() -> Circuit {
        Circuit::from_parts(
            [
                Component::binary_switch("sw1", true),
                Component::new("g1", Kind::TNot),
                Component::new("p1", Kind::Probe),
            ],
            [
                Wire::between("sw1", "out", "g1", "in"),
                Wire::between("g1", "out", "p1", "in"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_inverter_chain() {
        let mut c = inverter_chain();
        assert_eq!(c.probe("p1"), Ok(Null));

        c.step().unwrap();
        assert_eq!(c.probe("p1"), Ok(Neg));

        assert_eq!(c.toggle_switch("sw1"), Ok(Null));
        c.step().unwrap();
        assert_eq!(c.probe("p1"), Ok(Null));
    }

    #[test]
    fn test_delete_cascades_to_wires() {
        let mut c = inverter_chain();
        let removed = c.remove_component("g1").unwrap();
        assert_eq!(removed.kind(), Kind::TNot);
        assert!(c.wires().is_empty());
        assert_eq!(c.len(), 2);
        assert!(c.step().is_ok());
    }

    #[test]
    fn test_remove_unknown_component() {
        let mut c = inverter_chain();
        assert_eq!(
            c.remove_component("nope").unwrap_err(),
            StructuralError::UnknownComponent("nope".into())
        );
        assert_eq!(c.wires().len(), 2);
    }

    #[test]
    fn test_connect_validates_ports() {
        let mut c = inverter_chain();
        let bad_dir = Wire::between("g1", "in", "p1", "in");
        assert!(matches!(
            c.connect(bad_dir),
            Err(StructuralError::UnknownPort { direction: Direction::Out, .. })
        ));
        let bad_id = Wire::between("sw1", "out", "ghost", "in");
        assert_eq!(
            c.connect(bad_id),
            Err(StructuralError::UnknownComponent("ghost".into()))
        );
        assert_eq!(c.wires().len(), 2);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut c = inverter_chain();
        assert_eq!(
            c.add_component(Component::new("g1", Kind::TAnd)),
            Err(StructuralError::DuplicateComponent("g1".into()))
        );
        assert_eq!(c.component("g1").map(Component::kind), Some(Kind::TNot));
    }

    #[test]
    fn test_from_parts_is_atomic() {
        let result = Circuit::from_parts(
            [Component::new("a", Kind::TNot)],
            [Wire::between("a", "out", "b", "in")],
        );
        assert_eq!(result.unwrap_err(), StructuralError::UnknownComponent("b".into()));
    }

    #[test]
    fn test_latch_writes_then_holds() {
        let mut c = Circuit::from_parts(
            [
                Component::ternary_switch("d", Pos),
                Component::binary_switch("en", true),
                Component::new("l1", Kind::TLatch),
                Component::new("p1", Kind::Probe),
            ],
            [
                Wire::between("d", "out", "l1", "in"),
                Wire::between("en", "out", "l1", "enable"),
                Wire::between("l1", "out", "p1", "in"),
            ],
        )
        .unwrap();

        c.step().unwrap();
        assert_eq!(c.component("l1").unwrap().gate().held(), Some(Pos));
        assert_eq!(c.probe("p1"), Ok(Pos));

        c.set_switch("d", Neg).unwrap();
        c.set_switch("en", Null).unwrap();
        c.step().unwrap();
        assert_eq!(c.component("l1").unwrap().port(Direction::Out, "out"), Some(Pos));
        assert_eq!(c.probe("p1"), Ok(Pos));
    }

    #[test]
    fn test_multiple_drivers_contend() {
        let mut c = Circuit::from_parts(
            [
                Component::ternary_switch("a", Pos),
                Component::ternary_switch("b", Neg),
                Component::new("p", Kind::Probe),
            ],
            [
                Wire::between("a", "out", "p", "in"),
                Wire::between("b", "out", "p", "in"),
            ],
        )
        .unwrap();
        c.step().unwrap();
        assert_eq!(c.probe("p"), Ok(Null));

        c.set_switch("b", Null).unwrap();
        c.step().unwrap();
        assert_eq!(c.probe("p"), Ok(Pos));
    }

    #[test]
    fn test_chain_advances_one_tick_per_step() {
        let mut c = Circuit::from_parts(
            [
                Component::ternary_switch("s", Pos),
                Component::new("n1", Kind::TNot),
                Component::new("n2", Kind::TNot),
            ],
            [
                Wire::between("s", "out", "n1", "in"),
                Wire::between("n1", "out", "n2", "in"),
            ],
        )
        .unwrap();

        c.step().unwrap();
        assert_eq!(c.component("n1").unwrap().outputs(), &[Neg]);
        // n2 saw n1's previous output (null).
        assert_eq!(c.component("n2").unwrap().outputs(), &[Null]);
        c.step().unwrap();
        assert_eq!(c.component("n2").unwrap().outputs(), &[Pos]);
    }

    #[test]
    fn test_evaluation_order_is_unobservable() {
        let parts = |reversed: bool| {
            let mut components = vec![
                Component::ternary_switch("s", Neg),
                Component::new("a", Kind::TNot),
                Component::new("b", Kind::TNor),
                Component::new("l", Kind::TLatch),
            ];
            if reversed {
                components.reverse();
            }
            Circuit::from_parts(
                components,
                [
                    Wire::between("s", "out", "a", "in"),
                    Wire::between("a", "out", "b", "in1"),
                    Wire::between("l", "out", "b", "in2"),
                    Wire::between("b", "out", "l", "in"),
                    Wire::between("a", "out", "l", "enable"),
                ],
            )
            .unwrap()
        };
        let mut forward = parts(false);
        let mut backward = parts(true);
        for _ in 0..4 {
            forward.step().unwrap();
            backward.step().unwrap();
            for component in forward.components() {
                let other = backward.component(component.id().as_str()).unwrap();
                assert_eq!(component.outputs(), other.outputs());
                assert_eq!(component.gate(), other.gate());
            }
        }
    }

    #[test]
    fn test_stable_after_first_step() {
        let mut c = inverter_chain();
        c.step().unwrap();
        let first = c.snapshot();
        for _ in 0..3 {
            c.step().unwrap();
            assert_eq!(c.snapshot(), first);
        }
    }

    #[test]
    fn test_unwired_report() {
        let c = Circuit::from_parts(
            [Component::binary_switch("sw", false), Component::new("and", Kind::TAnd)],
            [Wire::between("sw", "out", "and", "in1")],
        )
        .unwrap();
        let report = c.unwired();
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].component.as_str(), "and");
        assert_eq!(report[0].ports, vec![(Direction::In, "in2"), (Direction::Out, "out")]);
    }

    #[test]
    fn test_disconnect() {
        let mut c = inverter_chain();
        let wire = Wire::between("g1", "out", "p1", "in");
        assert_eq!(c.disconnect(&wire), Ok(wire.clone()));
        assert_eq!(c.disconnect(&wire), Err(StructuralError::UnknownWire(wire)));
        assert_eq!(c.wires().len(), 1);
    }

    #[test]
    fn test_fresh_id_skips_taken() {
        let mut c = Circuit::new();
        c.add_component(Component::new("TNOT_2", Kind::TNot)).unwrap();
        assert_eq!(c.fresh_id(Kind::TNot).as_str(), "TNOT_3");
        assert_eq!(c.fresh_id(Kind::Probe).as_str(), "Probe_2");
    }

    #[test]
    fn test_probe_on_non_probe() {
        let c = inverter_chain();
        assert_eq!(
            c.probe("g1"),
            Err(OperationError::NotAProbe { id: "g1".into(), kind: Kind::TNot })
        );
        assert_eq!(c.probe("zz"), Err(OperationError::UnknownComponent("zz".into())));
    }

    #[test]
    fn test_move_component() {
        let mut c = inverter_chain();
        c.move_component("g1", Position::new(10.0, 20.0)).unwrap();
        assert_eq!(c.component("g1").unwrap().position(), Position::new(10.0, 20.0));
        assert!(c.move_component("zz", Position::default()).is_err());
    }

    #[test]
    fn test_dangling_wire_rejects_step() {
        let mut c = inverter_chain();
        c.step().unwrap();
        let before = c.snapshot();
        c.toggle_switch("sw1").unwrap();
        let toggled = c.snapshot();
        assert_ne!(before, toggled);

        c.wires.push(Wire::between("ghost", "out", "p1", "in"));
        assert!(matches!(c.step(), Err(StructuralError::DanglingWire(_))));
        assert_eq!(c.snapshot(), toggled);
    }
}
