//! JSON design files.
//!
//! A design lists components (id, type tag, optional params and position)
//! and wires (`from`/`to` endpoints). Loading is all or nothing: a design
//! that names an unknown type, component or port produces an error and no
//! circuit.

use std::path::Path;
use serde::{Serialize, Deserialize};
use thiserror::Error;
use tracing::info;

use crate::circuit::{Circuit, Component, ComponentId, Gate, Kind, Position, StructuralError, Wire};
use crate::ternary::Trit;

/// Format version written by [`DesignFile::from_circuit`].
pub const DESIGN_VERSION: u32 = 1;

/// On-disk shape of a design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignFile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub components: Vec<ComponentEntry>,
    #[serde(default)]
    pub wires: Vec<Wire>,
}

/// One component entry. The type is kept as a string so an unknown tag is
/// reported as a structural error rather than a syntax error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentEntry {
    pub id: ComponentId,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Params::is_empty")]
    pub params: Params,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

/// Variant-specific initial parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Params {
    /// Starting value of a switch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,
}

impl Params {
    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }
}

impl ComponentEntry {
    /// Instantiate the component, validating the tag and parameters.
    pub fn build(&self) -> Result<Component, StructuralError> {
        let kind: Kind = self.kind.parse()?;
        let invalid = |message: String| StructuralError::InvalidParameter {
            component: self.id.clone(),
            kind,
            message,
        };

        let gate = match (kind, self.params.value) {
            (Kind::SwitchBinary, Some(value)) => {
                let level = Trit::from_binary(value).map_err(|e| invalid(e.to_string()))?;
                Gate::SwitchBinary { on: level == Trit::Pos }
            }
            (Kind::SwitchTernary, Some(value)) => {
                let value = Trit::from_i64(value).map_err(|e| invalid(e.to_string()))?;
                Gate::SwitchTernary { value }
            }
            (_, Some(_)) => return Err(invalid("only switches take a value".into())),
            (_, None) => Gate::new(kind),
        };

        let component = Component::with_gate(self.id.clone(), gate);
        Ok(match self.position {
            Some(position) => component.at(position),
            None => component,
        })
    }

    fn from_component(component: &Component) -> Self {
        let value = match component.gate() {
            Gate::SwitchBinary { .. } | Gate::SwitchTernary { .. } => component.gate().held().map(i64::from),
            _ => None,
        };
        Self {
            id: component.id().clone(),
            kind: component.kind().tag().to_string(),
            params: Params { value },
            position: Some(component.position()),
        }
    }
}

impl DesignFile {
    /// Parse a design from JSON text.
    pub fn parse(text: &str) -> Result<Self, DesignError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Capture a circuit, including current switch values and positions.
    pub fn from_circuit(name: &str, circuit: &Circuit) -> Self {
        Self {
            name: name.to_string(),
            version: DESIGN_VERSION,
            components: circuit.components().map(ComponentEntry::from_component).collect(),
            wires: circuit.wires().to_vec(),
        }
    }

    /// Instantiate the circuit described by this design.
    pub fn build(&self) -> Result<Circuit, StructuralError> {
        let components = self
            .components
            .iter()
            .map(ComponentEntry::build)
            .collect::<Result<Vec<_>, _>>()?;
        Circuit::from_parts(components, self.wires.iter().cloned())
    }

    pub fn to_json(&self) -> Result<String, DesignError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Load a circuit from JSON text.
pub fn load_str(text: &str) -> Result<Circuit, DesignError> {
    let design = DesignFile::parse(text)?;
    let circuit = design.build()?;
    info!(
        name = %design.name,
        components = circuit.len(),
        wires = circuit.wires().len(),
        "design loaded"
    );
    Ok(circuit)
}

/// Serialize a circuit as an exported design.
pub fn dump_string(circuit: &Circuit) -> Result<String, DesignError> {
    DesignFile::from_circuit("Exported", circuit).to_json()
}

/// Load a design file from disk.
pub fn load_design<P: AsRef<Path>>(path: P) -> Result<Circuit, DesignError> {
    let text = std::fs::read_to_string(path.as_ref())
        .map_err(|e| DesignError::IoError(e.to_string()))?;
    load_str(&text)
}

/// Save a circuit as a design file.
pub fn save_design<P: AsRef<Path>>(path: P, circuit: &Circuit) -> Result<(), DesignError> {
    let text = dump_string(circuit)?;
    std::fs::write(path.as_ref(), text).map_err(|e| DesignError::IoError(e.to_string()))?;
    info!(path = %path.as_ref().display(), "design saved");
    Ok(())
}

/// Errors from loading or saving designs.
#[derive(Debug, Error)]
pub enum DesignError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("malformed design: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Structural(#[from] StructuralError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::Direction;
    use Trit::*;

    const INVERTER: &str = r#"{
        "name": "inverter",
        "version": 1,
        "components": [
            { "id": "sw1", "type": "SwitchBinary", "params": { "value": 1 }, "position": { "x": 100, "y": 80 } },
            { "id": "g1", "type": "TNOT" },
            { "id": "p1", "type": "Probe" }
        ],
        "wires": [
            { "from": { "componentId": "sw1", "port": "out" }, "to": { "componentId": "g1", "port": "in" } },
            { "from": { "componentId": "g1", "port": "out" }, "to": { "componentId": "p1", "port": "in" } }
        ]
    }"#;

    #[test]
    fn test_load_and_step() {
        let mut circuit = load_str(INVERTER).unwrap();
        assert_eq!(circuit.len(), 3);
        assert_eq!(circuit.component("sw1").unwrap().position(), Position::new(100.0, 80.0));

        circuit.step().unwrap();
        assert_eq!(circuit.probe("p1"), Ok(Neg));
        circuit.toggle_switch("sw1").unwrap();
        circuit.step().unwrap();
        assert_eq!(circuit.probe("p1"), Ok(Null));
    }

    #[test]
    fn test_delete_then_export_has_no_wires() {
        let mut circuit = load_str(INVERTER).unwrap();
        circuit.remove_component("g1").unwrap();
        let text = dump_string(&circuit).unwrap();
        let reloaded = load_str(&text).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.wires().is_empty());
    }

    #[test]
    fn test_export_keeps_switch_values() {
        let mut circuit = load_str(INVERTER).unwrap();
        circuit.toggle_switch("sw1").unwrap();
        let design = DesignFile::from_circuit("Exported", &circuit);
        assert_eq!(design.version, DESIGN_VERSION);
        assert_eq!(design.components[0].params.value, Some(0));
        assert_eq!(design.components[1].params.value, None);

        let reloaded = design.build().unwrap();
        assert_eq!(
            reloaded.component("sw1").unwrap().port(Direction::Out, "out"),
            Some(Null)
        );
    }

    #[test]
    fn test_unknown_type_rejected() {
        let text = r#"{ "components": [ { "id": "x", "type": "TXOR" } ] }"#;
        assert!(matches!(
            load_str(text),
            Err(DesignError::Structural(StructuralError::UnknownKind(tag))) if tag == "TXOR"
        ));
    }

    #[test]
    fn test_unknown_endpoint_rejected() {
        let text = r#"{
            "components": [ { "id": "g", "type": "TNOT" } ],
            "wires": [ { "from": { "componentId": "g", "port": "out" }, "to": { "componentId": "g", "port": "in9" } } ]
        }"#;
        assert!(matches!(
            load_str(text),
            Err(DesignError::Structural(StructuralError::UnknownPort { .. }))
        ));
    }

    #[test]
    fn test_switch_params_validated() {
        let bad_binary = r#"{ "components": [ { "id": "s", "type": "SwitchBinary", "params": { "value": -1 } } ] }"#;
        assert!(matches!(
            load_str(bad_binary),
            Err(DesignError::Structural(StructuralError::InvalidParameter { .. }))
        ));

        let bad_ternary = r#"{ "components": [ { "id": "s", "type": "SwitchTernary", "params": { "value": 2 } } ] }"#;
        assert!(load_str(bad_ternary).is_err());

        let gate_value = r#"{ "components": [ { "id": "g", "type": "TAND", "params": { "value": 1 } } ] }"#;
        assert!(load_str(gate_value).is_err());

        let good = r#"{ "components": [ { "id": "s", "type": "SwitchTernary", "params": { "value": -1 } } ] }"#;
        let circuit = load_str(good).unwrap();
        assert_eq!(circuit.component("s").unwrap().outputs(), &[Neg]);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(load_str("{ components: "), Err(DesignError::Json(_))));
    }

    #[test]
    fn test_empty_design() {
        let circuit = load_str("{}").unwrap();
        assert!(circuit.is_empty());
    }
}
