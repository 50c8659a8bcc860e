//! WebAssembly bindings for the circuit simulator.
//!
//! This module provides JavaScript-friendly wrappers around the driver and
//! the design loader. A browser editor owns the timer for continuous runs
//! and calls `tick` from it.

use wasm_bindgen::prelude::*;
use crate::circuit::Circuit;
use crate::design::{self, DesignFile};
use crate::sim::Simulator;

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn js_error(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

/// WebAssembly-friendly simulator wrapper.
#[wasm_bindgen]
pub struct WasmCircuit {
    sim: Simulator,
    initial: Circuit,
}

#[wasm_bindgen]
impl WasmCircuit {
    /// Create an empty circuit.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            sim: Simulator::new(Circuit::new()),
            initial: Circuit::new(),
        }
    }

    /// Replace the circuit with one parsed from design JSON.
    /// Returns the number of components.
    #[wasm_bindgen]
    pub fn load_json(&mut self, text: &str) -> Result<usize, JsError> {
        let circuit = design::load_str(text).map_err(js_error)?;
        let len = circuit.len();
        self.initial = circuit.clone();
        self.sim = Simulator::new(circuit);
        Ok(len)
    }

    /// Export the current circuit as design JSON.
    #[wasm_bindgen]
    pub fn export_json(&self) -> Result<String, JsError> {
        design::dump_string(self.sim.circuit()).map_err(js_error)
    }

    /// Step once. Returns the step count.
    #[wasm_bindgen]
    pub fn step(&mut self) -> Result<u64, JsError> {
        self.sim.step().map_err(js_error)
    }

    /// Step `count` times.
    #[wasm_bindgen]
    pub fn run(&mut self, count: u32) -> Result<u64, JsError> {
        self.sim.run_limited(count as u64).map_err(js_error)
    }

    #[wasm_bindgen]
    pub fn start(&mut self) {
        self.sim.start();
    }

    #[wasm_bindgen]
    pub fn stop(&mut self) {
        self.sim.stop();
    }

    /// Call from the page's timer. Steps only while started.
    #[wasm_bindgen]
    pub fn tick(&mut self) -> Result<bool, JsError> {
        self.sim.tick().map_err(js_error)
    }

    #[wasm_bindgen]
    pub fn is_running(&self) -> bool {
        self.sim.is_running()
    }

    #[wasm_bindgen]
    pub fn steps(&self) -> u64 {
        self.sim.steps()
    }

    /// Toggle a switch. Returns its new value.
    #[wasm_bindgen]
    pub fn toggle(&mut self, id: &str) -> Result<i32, JsError> {
        let value = self.sim.toggle_switch(id).map_err(js_error)?;
        Ok(value.to_i8() as i32)
    }

    /// Set a switch to -1, 0 or 1.
    #[wasm_bindgen]
    pub fn set_switch(&mut self, id: &str, value: i32) -> Result<(), JsError> {
        self.sim.set_switch_level(id, value as i64).map_err(js_error)?;
        Ok(())
    }

    /// Read a probe.
    #[wasm_bindgen]
    pub fn probe(&self, id: &str) -> Result<i32, JsError> {
        let value = self.sim.probe(id).map_err(js_error)?;
        Ok(value.to_i8() as i32)
    }

    /// Probe readings as an array of `[id, value]` pairs.
    #[wasm_bindgen]
    pub fn probes(&self) -> js_sys::Array {
        self.sim
            .circuit()
            .probes()
            .map(|(id, value)| {
                let pair = js_sys::Array::new();
                pair.push(&JsValue::from_str(id.as_str()));
                pair.push(&JsValue::from(value.to_i8() as i32));
                JsValue::from(pair)
            })
            .collect()
    }

    /// Every port value as JSON.
    #[wasm_bindgen]
    pub fn snapshot_json(&self) -> Result<String, JsError> {
        serde_json::to_string(&self.sim.circuit().snapshot()).map_err(js_error)
    }

    /// Unwired ports as JSON.
    #[wasm_bindgen]
    pub fn unwired_json(&self) -> Result<String, JsError> {
        serde_json::to_string(&self.sim.circuit().unwired()).map_err(js_error)
    }

    /// Restore the circuit as last loaded.
    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.sim = Simulator::new(self.initial.clone());
    }
}

impl Default for WasmCircuit {
    fn default() -> Self {
        Self::new()
    }
}

/// Check that design JSON loads. Returns the component count.
#[wasm_bindgen]
pub fn wasm_validate(text: &str) -> Result<usize, JsError> {
    let design = DesignFile::parse(text).map_err(js_error)?;
    let circuit = design.build().map_err(js_error)?;
    Ok(circuit.len())
}
