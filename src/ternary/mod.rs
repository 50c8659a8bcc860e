//! Balanced ternary signal primitives.
//!
//! - [`Trit`] - a single signal level (-1, 0, +1)
//! - [`logic`] - the NOT / AND / OR / NOR combination rules and the full adder

mod trit;
pub mod logic;

pub use trit::{Trit, SignalError};
pub use logic::{not, and, or, nor, full_add};
