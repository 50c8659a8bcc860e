//! Terminal bench for circuits.
//!
//! Provides an interactive terminal view with:
//! - Live port values for every component
//! - Switch selection and toggling
//! - Step / run / pause controls with a fixed cadence
//! - Probe readings

mod app;
mod ui;

pub use app::{BenchApp, run_bench};
