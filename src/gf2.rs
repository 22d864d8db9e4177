//! Finite field GF(2) arithmetic.
//!
//! This module contains the struct [GF2], an element of the finite field
//! GF(2). Codewords handled by the encoder are vectors of [GF2], so that
//! sparse matrix products and `ndarray` dot products reduce modulo two
//! automatically. Conversions to and from unpacked bits (`u8` values 0 and
//! 1) are provided for the byte-oriented interfaces.

use core::iter::Sum;
use core::ops::{Add, AddAssign, Div, Mul, MulAssign, Sub};
use ndarray::ScalarOperand;
use num_traits::{One, Zero};
use thiserror::Error;

/// Finite field GF(2) element.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct GF2(u8);

/// Error produced when converting an integer that is not 0 or 1.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Error)]
#[error("value {0} is not a bit")]
pub struct NotABit(pub u8);

impl GF2 {
    /// Returns the element as an unpacked bit (0 or 1).
    pub fn bit(self) -> u8 {
        self.0
    }

    /// Converts a slice of unpacked bits into GF(2) elements.
    ///
    /// Any non-zero value is taken as a one.
    pub fn from_bits(bits: &[u8]) -> Vec<GF2> {
        bits.iter().map(|&b| GF2(u8::from(b != 0))).collect()
    }

    /// Converts GF(2) elements into unpacked bits.
    pub fn to_bits<'a, I>(elements: I) -> Vec<u8>
    where
        I: IntoIterator<Item = &'a GF2>,
    {
        elements.into_iter().map(|x| x.bit()).collect()
    }
}

impl From<bool> for GF2 {
    fn from(b: bool) -> GF2 {
        GF2(u8::from(b))
    }
}

impl From<GF2> for u8 {
    fn from(x: GF2) -> u8 {
        x.bit()
    }
}

impl TryFrom<u8> for GF2 {
    type Error = NotABit;

    fn try_from(value: u8) -> Result<GF2, NotABit> {
        match value {
            0 | 1 => Ok(GF2(value)),
            _ => Err(NotABit(value)),
        }
    }
}

impl Zero for GF2 {
    fn zero() -> GF2 {
        GF2(0)
    }

    fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl One for GF2 {
    fn one() -> GF2 {
        GF2(1)
    }

    fn is_one(&self) -> bool {
        self.0 == 1
    }
}

// Addition and subtraction are both XOR, multiplication is AND.
#[allow(clippy::suspicious_arithmetic_impl)]
impl Add for GF2 {
    type Output = GF2;

    fn add(self, rhs: GF2) -> GF2 {
        GF2(self.0 ^ rhs.0)
    }
}

#[allow(clippy::suspicious_arithmetic_impl)]
impl Sub for GF2 {
    type Output = GF2;

    fn sub(self, rhs: GF2) -> GF2 {
        GF2(self.0 ^ rhs.0)
    }
}

#[allow(clippy::suspicious_arithmetic_impl)]
impl Mul for GF2 {
    type Output = GF2;

    fn mul(self, rhs: GF2) -> GF2 {
        GF2(self.0 & rhs.0)
    }
}

impl Div for GF2 {
    type Output = GF2;

    fn div(self, rhs: GF2) -> GF2 {
        assert!(!rhs.is_zero(), "division by zero in GF(2)");
        self
    }
}

impl AddAssign for GF2 {
    fn add_assign(&mut self, rhs: GF2) {
        self.0 ^= rhs.0;
    }
}

impl AddAssign<&GF2> for GF2 {
    fn add_assign(&mut self, rhs: &GF2) {
        self.0 ^= rhs.0;
    }
}

impl MulAssign for GF2 {
    fn mul_assign(&mut self, rhs: GF2) {
        self.0 &= rhs.0;
    }
}

impl Sum for GF2 {
    fn sum<I: Iterator<Item = GF2>>(iter: I) -> GF2 {
        iter.fold(GF2::zero(), Add::add)
    }
}

impl<'a> Sum<&'a GF2> for GF2 {
    fn sum<I: Iterator<Item = &'a GF2>>(iter: I) -> GF2 {
        iter.fold(GF2::zero(), |acc, &x| acc + x)
    }
}

impl ScalarOperand for GF2 {}
