//! Simulation driver: sequences steps and switch changes on a circuit.
//!
//! The driver owns no clock. A continuous run is a flag plus [`Simulator::tick`],
//! which the caller invokes at whatever cadence its event loop chooses.

use serde::{Serialize, Deserialize};
use tracing::{debug, trace, warn};

use crate::circuit::{Circuit, CircuitError};
use crate::ternary::Trit;

/// Whether the continuous run is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    Paused,
    Running,
}

/// Drives a [`Circuit`] through steps.
#[derive(Debug, Clone)]
pub struct Simulator {
    circuit: Circuit,
    state: RunState,
    steps: u64,
}

impl Simulator {
    pub fn new(circuit: Circuit) -> Self {
        Self {
            circuit,
            state: RunState::Paused,
            steps: 0,
        }
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Access for structural edits between steps.
    pub fn circuit_mut(&mut self) -> &mut Circuit {
        &mut self.circuit
    }

    pub fn into_circuit(self) -> Circuit {
        self.circuit
    }

    /// Number of steps completed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    /// Advance a switch to its next setting and return the new value.
    pub fn toggle_switch(&mut self, id: &str) -> Result<Trit, CircuitError> {
        let value = self.circuit.toggle_switch(id)?;
        debug!(id, %value, "toggle switch");
        Ok(value)
    }

    pub fn set_switch(&mut self, id: &str, value: Trit) -> Result<Trit, CircuitError> {
        let value = self.circuit.set_switch(id, value)?;
        debug!(id, %value, "set switch");
        Ok(value)
    }

    /// Set a switch from a raw integer level, validating it first.
    pub fn set_switch_level(&mut self, id: &str, level: i64) -> Result<Trit, CircuitError> {
        let value = Trit::from_i64(level)?;
        self.set_switch(id, value)
    }

    pub fn probe(&self, id: &str) -> Result<Trit, CircuitError> {
        Ok(self.circuit.probe(id)?)
    }

    /// Run one step. Returns the total step count.
    ///
    /// A failed step leaves the circuit untouched and pauses a continuous run.
    pub fn step(&mut self) -> Result<u64, CircuitError> {
        if let Err(e) = self.circuit.step() {
            warn!(step = self.steps + 1, error = %e, "step rejected");
            self.state = RunState::Paused;
            return Err(e.into());
        }
        self.steps += 1;
        trace!(step = self.steps, "step complete");
        Ok(self.steps)
    }

    /// Run exactly `count` steps, stopping at the first error.
    pub fn run_limited(&mut self, count: u64) -> Result<u64, CircuitError> {
        let start = self.steps;
        for _ in 0..count {
            self.step()?;
        }
        Ok(self.steps - start)
    }

    /// Step until a step leaves the snapshot unchanged.
    ///
    /// Returns the number of steps taken, or `None` if the circuit was still
    /// changing after `max_steps` (a feedback loop may never settle).
    pub fn run_until_stable(&mut self, max_steps: u64) -> Result<Option<u64>, CircuitError> {
        let mut previous = self.circuit.snapshot();
        for taken in 1..=max_steps {
            self.step()?;
            let current = self.circuit.snapshot();
            if current == previous {
                return Ok(Some(taken));
            }
            previous = current;
        }
        Ok(None)
    }

    /// Begin a continuous run. Steps happen on [`Simulator::tick`].
    pub fn start(&mut self) {
        self.state = RunState::Running;
    }

    pub fn stop(&mut self) {
        self.state = RunState::Paused;
    }

    /// One beat of the caller's run loop: steps only while running.
    ///
    /// Returns whether a step happened.
    pub fn tick(&mut self) -> Result<bool, CircuitError> {
        if !self.is_running() {
            return Ok(false);
        }
        self.step()?;
        Ok(true)
    }
}
