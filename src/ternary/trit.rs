//! Single balanced ternary signal value.
//!
//! A trit carries one of three levels: -1 (neg), 0 (null) or +1 (pos).
//! Binary logic lives inside the same domain using only null and pos.

use std::fmt;
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// A single balanced ternary signal.
///
/// Serialized as its integer level, so `-1`, `0` and `1` appear verbatim
/// in design files and snapshots.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
#[repr(i8)]
pub enum Trit {
    /// Negative (-1)
    Neg = -1,
    /// Null (0)
    Null = 0,
    /// Positive (+1)
    Pos = 1,
}

impl Trit {
    /// All possible signal values in ascending order.
    pub const ALL: [Trit; 3] = [Trit::Neg, Trit::Null, Trit::Pos];

    /// Convert an integer level into a trit.
    ///
    /// This is the validation boundary for values entering the engine; anything
    /// outside {-1, 0, 1} is rejected rather than clamped.
    #[inline]
    pub const fn from_i64(value: i64) -> Result<Self, SignalError> {
        match value {
            -1 => Ok(Trit::Neg),
            0 => Ok(Trit::Null),
            1 => Ok(Trit::Pos),
            _ => Err(SignalError::OutOfRange(value)),
        }
    }

    /// Convert a binary level (0 or 1) into a trit.
    #[inline]
    pub const fn from_binary(value: i64) -> Result<Self, SignalError> {
        match value {
            0 => Ok(Trit::Null),
            1 => Ok(Trit::Pos),
            _ => Err(SignalError::NotBinary(value)),
        }
    }

    /// Convert to integer level.
    #[inline]
    pub const fn to_i8(self) -> i8 {
        self as i8
    }

    /// Ternary negation: flips neg and pos, null stays null.
    #[inline]
    pub const fn neg(self) -> Self {
        match self {
            Trit::Neg => Trit::Pos,
            Trit::Null => Trit::Null,
            Trit::Pos => Trit::Neg,
        }
    }

    /// The lesser of two levels (ternary AND).
    #[inline]
    pub const fn min(self, other: Self) -> Self {
        if self.to_i8() <= other.to_i8() { self } else { other }
    }

    /// The greater of two levels (ternary OR).
    #[inline]
    pub const fn max(self, other: Self) -> Self {
        if self.to_i8() >= other.to_i8() { self } else { other }
    }

    /// The next level in the ternary switch cycle: -1 → 0 → 1 → -1.
    #[inline]
    pub const fn cycle(self) -> Self {
        match self {
            Trit::Neg => Trit::Null,
            Trit::Null => Trit::Pos,
            Trit::Pos => Trit::Neg,
        }
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        matches!(self, Trit::Null)
    }

    /// True for the two values a binary line may carry.
    #[inline]
    pub const fn is_binary(self) -> bool {
        !matches!(self, Trit::Neg)
    }
}

impl Default for Trit {
    fn default() -> Self {
        Trit::Null
    }
}

impl fmt::Debug for Trit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trit::Neg => write!(f, "Neg"),
            Trit::Null => write!(f, "Null"),
            Trit::Pos => write!(f, "Pos"),
        }
    }
}

impl fmt::Display for Trit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trit::Neg => write!(f, "-1"),
            Trit::Null => write!(f, "0"),
            Trit::Pos => write!(f, "+1"),
        }
    }
}

impl std::ops::Neg for Trit {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Trit::neg(self)
    }
}

impl TryFrom<i64> for Trit {
    type Error = SignalError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Trit::from_i64(value)
    }
}

impl From<Trit> for i64 {
    fn from(trit: Trit) -> Self {
        trit.to_i8() as i64
    }
}

impl From<bool> for Trit {
    fn from(on: bool) -> Self {
        if on { Trit::Pos } else { Trit::Null }
    }
}

/// An out-of-domain value offered where a signal was expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SignalError {
    #[error("invalid signal value {0} (must be -1, 0, or 1)")]
    OutOfRange(i64),
    #[error("invalid binary value {0} (must be 0 or 1)")]
    NotBinary(i64),
}
