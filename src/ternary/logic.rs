//! Combination rules over the signal domain.
//!
//! All functions here are total over {-1, 0, 1}; the domain is closed by
//! construction of [`Trit`], so none of them can fail.

use crate::ternary::Trit;

/// `NOT(x) = -x`
#[inline]
pub const fn not(x: Trit) -> Trit {
    x.neg()
}

/// `AND(x, y) = min(x, y)`
#[inline]
pub const fn and(x: Trit, y: Trit) -> Trit {
    x.min(y)
}

/// `OR(x, y) = max(x, y)`
#[inline]
pub const fn or(x: Trit, y: Trit) -> Trit {
    x.max(y)
}

/// `NOR(x, y) = -max(x, y)`
#[inline]
pub const fn nor(x: Trit, y: Trit) -> Trit {
    or(x, y).neg()
}

/// Balanced ternary full adder: returns `(sum, carry)` with
/// `a + b + c == sum + 3 * carry`.
pub const fn full_add(a: Trit, b: Trit, c: Trit) -> (Trit, Trit) {
    let total = a.to_i8() + b.to_i8() + c.to_i8();
    match total {
        -3 => (Trit::Null, Trit::Neg),
        -2 => (Trit::Pos, Trit::Neg),
        -1 => (Trit::Neg, Trit::Null),
        0 => (Trit::Null, Trit::Null),
        1 => (Trit::Pos, Trit::Null),
        2 => (Trit::Neg, Trit::Pos),
        3 => (Trit::Null, Trit::Pos),
        _ => unreachable!(),
    }
}
