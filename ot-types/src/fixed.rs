//! A 32-bit signed fixed-point number.

use std::ops::{Div, Neg};

/// A 32-bit signed fixed-point number with 16 fractional bits (16.16).
///
/// This is the representation used by variation axis values.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fixed(i32);

impl Fixed {
    /// The representation of 0.0.
    pub const ZERO: Fixed = Fixed(0);

    /// The representation of 1.0.
    pub const ONE: Fixed = Fixed(0x10000);

    /// The smallest representable value.
    pub const MIN: Fixed = Fixed(i32::MIN);

    /// The largest representable value.
    pub const MAX: Fixed = Fixed(i32::MAX);

    /// Create a new fixed-point value from its underlying bit representation.
    pub const fn from_bits(bits: i32) -> Self {
        Fixed(bits)
    }

    /// The underlying bit representation of this value.
    pub const fn to_bits(self) -> i32 {
        self.0
    }

    /// Create a fixed-point value from an `f64`, rounding to the nearest
    /// representable value.
    pub fn from_f64(value: f64) -> Self {
        #[cfg(any(feature = "std", test))]
        return Fixed((value * 65536.0).round() as i32);
        #[cfg(all(not(feature = "std"), not(test)))]
        {
            // Round half away from zero, as `f64::round` does.
            let scaled = value * 65536.0;
            let bias = if scaled < 0.0 { -0.5 } else { 0.5 };
            Fixed((scaled + bias) as i32)
        }
    }

    /// This value as an `f64`.
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / 65536.0
    }

    /// Subtraction that saturates at the numeric bounds instead of
    /// overflowing.
    pub const fn saturating_sub(self, other: Self) -> Self {
        Fixed(self.0.saturating_sub(other.0))
    }
}

impl Neg for Fixed {
    type Output = Fixed;

    fn neg(self) -> Fixed {
        Fixed(self.0.wrapping_neg())
    }
}

impl Div for Fixed {
    type Output = Fixed;

    /// Division, rounding to the nearest representable value.
    fn div(self, other: Fixed) -> Fixed {
        Fixed(((((self.0 as i64) << 17) / other.0 as i64 + 1) >> 1) as i32)
    }
}

impl std::fmt::Debug for Fixed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Fixed({})", self.to_f64())
    }
}

impl std::fmt::Display for Fixed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.to_f64().fmt(f)
    }
}

crate::newtype_scalar!(Fixed, [u8; 4]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_bits() {
        for expected in [0x7fff_ffff, 0, 0x8000, -0x8000, 0x4_0000] {
            assert_eq!(Fixed::from_bits(expected).to_bits(), expected);
        }
    }

    #[test]
    fn from_f64() {
        assert_eq!(Fixed::from_f64(1.0), Fixed::ONE);
        assert_eq!(Fixed::from_f64(400.0).to_bits(), 400 << 16);
        assert_eq!(Fixed::from_f64(-0.5).to_bits(), -0x8000);
    }

    #[test]
    fn division_rounds() {
        let a = Fixed::from_f64(180.0);
        let b = Fixed::from_f64(300.0);
        // 0.6 is not representable; the quotient rounds up to the nearest
        // bit pattern rather than truncating.
        assert_eq!((a / b).to_bits(), 39322);
    }
}
