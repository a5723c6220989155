#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Boolean variables and signed literals.
//!
//! A literal is a non-zero signed integer: its magnitude names a variable
//! (`1..=num_vars`) and its sign gives the polarity, positive meaning the
//! variable is asserted true. This is the same encoding DIMACS uses, so
//! conversion to and from `i32` is lossless.

use core::fmt;
use core::num::NonZeroI32;
use core::ops::{Neg, Not};

/// Identifier of a boolean variable. Valid ids start at 1.
pub type Variable = u32;

/// A signed reference to a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal(NonZeroI32);

impl Literal {
    /// Creates the literal of `var` with the given polarity.
    ///
    /// Returns `None` for variable 0 or for ids that do not fit in a
    /// positive `i32`.
    #[must_use]
    pub fn new(var: Variable, polarity: bool) -> Option<Self> {
        let magnitude = i32::try_from(var).ok()?;
        let value = if polarity { magnitude } else { -magnitude };
        NonZeroI32::new(value).map(Self)
    }

    /// Converts a DIMACS-style integer.
    ///
    /// `0` is the clause terminator and `i32::MIN` has no representable
    /// negation, so both are rejected.
    #[must_use]
    pub fn from_i32(value: i32) -> Option<Self> {
        if value == i32::MIN {
            return None;
        }
        NonZeroI32::new(value).map(Self)
    }

    /// The variable this literal refers to.
    #[must_use]
    pub const fn variable(self) -> Variable {
        self.0.get().unsigned_abs()
    }

    /// `true` when the literal asserts its variable is true.
    #[must_use]
    pub const fn polarity(self) -> bool {
        self.0.get() > 0
    }

    /// The literal of the same variable with opposite polarity.
    #[must_use]
    pub const fn negated(self) -> Self {
        // Construction rules out i32::MIN, so the negation cannot overflow.
        match NonZeroI32::new(-self.0.get()) {
            Some(v) => Self(v),
            None => self,
        }
    }

    /// The signed integer form of this literal.
    #[must_use]
    pub const fn to_i32(self) -> i32 {
        self.0.get()
    }

    /// Truth value of the literal when its variable takes `value`.
    #[must_use]
    pub const fn evaluate(self, value: bool) -> bool {
        value == self.polarity()
    }
}

impl Neg for Literal {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.negated()
    }
}

impl Not for Literal {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.negated()
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Literal> for i32 {
    fn from(lit: Literal) -> Self {
        lit.to_i32()
    }
}
