use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// Fixed-point currency amount with 4 decimal places, stored as a scaled integer.
///
/// The wire format is a plain JSON number (dollars), which is what the backend
/// sends and expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Amount(i64);

impl Amount {
    const SCALE: i64 = 10_000;
    const CENT: i64 = Self::SCALE / 100;

    pub const ZERO: Amount = Amount(0);

    pub fn from_float(value: f64) -> Self {
        Amount((value * Self::SCALE as f64).round() as i64)
    }

    /// Like [`Amount::from_float`], but `None` for NaN, infinities and values
    /// too large to represent.
    pub fn try_from_float(value: f64) -> Option<Self> {
        let scaled = (value * Self::SCALE as f64).round();
        if scaled.is_finite() && scaled.abs() < i64::MAX as f64 {
            Some(Amount(scaled as i64))
        } else {
            None
        }
    }

    pub fn from_scaled(value: i64) -> Self {
        Amount(value)
    }

    pub const fn from_cents(cents: i64) -> Self {
        Amount(cents * Self::CENT)
    }

    pub fn scaled(self) -> i64 {
        self.0
    }

    pub fn to_float(self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Round toward negative infinity to a whole cent.
    pub fn floor_to_cent(self) -> Self {
        Amount(self.0.div_euclid(Self::CENT) * Self::CENT)
    }

    /// Round half away from zero to a whole cent.
    pub fn round_to_cent(self) -> Self {
        let cents = div_round(self.0 as i128, Self::CENT as i128);
        Amount(saturate(cents * Self::CENT as i128))
    }

    /// `self - rhs`, clamped so the result never drops below zero.
    pub fn sub_or_zero(self, rhs: Self) -> Self {
        (self - rhs).max(Self::ZERO)
    }

    /// Multiply by `numerator / denominator`, rounding half away from zero at
    /// the fourth decimal place.
    pub fn scale_by(self, numerator: i64, denominator: i64) -> Self {
        let product = self.0 as i128 * numerator as i128;
        Amount(saturate(div_round(product, denominator as i128)))
    }
}

fn saturate(value: i128) -> i64 {
    value.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

fn div_round(value: i128, divisor: i128) -> i128 {
    let quotient = value / divisor;
    let remainder = value % divisor;
    if remainder.abs() * 2 >= divisor.abs() {
        quotient + value.signum() * divisor.signum()
    } else {
        quotient
    }
}

/// Formats as dollars and cents, rounding the sub-cent digits.
impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cents = self.round_to_cent().0 / Self::CENT;
        let sign = if cents < 0 { "-" } else { "" };
        let abs = cents.abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Amount::from_float(value)
    }
}

impl From<Amount> for f64 {
    fn from(value: Amount) -> Self {
        value.to_float()
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Amount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount(self.0.saturating_sub(rhs.0))
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Mul<u32> for Amount {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self::Output {
        Amount(self.0.saturating_mul(rhs as i64))
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}
