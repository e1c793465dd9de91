use std::fmt;
use std::ops::{Add, Sub};

/// Fixed-point mana amount in thousandths of a point.
///
/// Spending and restoring the same amount always lands on the exact
/// starting value, which floating point cannot guarantee.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mana(u32);

impl Mana {
    pub const ZERO: Self = Self(0);
    const SCALE: f32 = 1000.0;

    pub const fn from_milli(milli: u32) -> Self {
        Self(milli)
    }

    /// Converts decimal points, rounding to the nearest thousandth.
    /// Negative or non-finite input becomes zero.
    pub fn from_points(points: f32) -> Self {
        let scaled = (points * Self::SCALE).round();
        if scaled.is_finite() && scaled > 0.0 {
            Self(scaled as u32)
        } else {
            Self::ZERO
        }
    }

    pub fn points(self) -> f32 {
        self.0 as f32 / Self::SCALE
    }

    pub const fn milli(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }

    #[must_use]
    pub const fn saturating_add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Add for Mana {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        self.saturating_add(rhs)
    }
}

impl Sub for Mana {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        self.saturating_sub(rhs)
    }
}

impl fmt::Display for Mana {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:03}", self.0 / 1000, self.0 % 1000)
    }
}
