//! Design loading and saving.
//!
//! Designs are JSON documents describing components and wires. This module
//! converts between them and the in-memory [`Circuit`](crate::circuit::Circuit).

pub mod file;
pub mod samples;

pub use file::{
    load_str, dump_string, load_design, save_design, DesignFile, ComponentEntry, Params,
    DesignError, DESIGN_VERSION,
};
