//! Type-safe price representation using decimal arithmetic.
//!
//! Every amount in Wakalni is expressed in Algerian dinar (DZD). Prices are
//! exact decimals so cart totals, discounts and wallet balances never pick
//! up floating point drift.

use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// ISO 4217 code of the only currency the platform handles.
pub const CURRENCY_CODE: &str = "DZD";

/// An amount of money in DZD.
///
/// Serialized transparently as a decimal; deserialization accepts both JSON
/// numbers and decimal strings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero dinars.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest amount accepted from user input: one billion dinars.
    pub const MAX: Self = Self(Decimal::from_parts(1_000_000_000, 0, 0, false, 0));

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of dinars.
    #[must_use]
    pub fn from_dinars(dinars: i64) -> Self {
        Self(Decimal::new(dinars, 0))
    }

    /// Create a price from an amount in centimes (1/100 dinar).
    #[must_use]
    pub fn from_centimes(centimes: i64) -> Self {
        Self(Decimal::new(centimes, 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Whether the amount is strictly greater than zero.
    #[must_use]
    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Whether the amount is no larger than [`Price::MAX`].
    #[must_use]
    pub fn is_within_limit(self) -> bool {
        self.0 <= Self::MAX.0
    }

    /// Multiply by a quantity, saturating at the decimal range.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }

    /// Take `percent`% of this amount, rounded to centimes.
    #[must_use]
    pub fn percent(self, percent: Decimal) -> Self {
        Self(self.0.saturating_mul(percent) / Decimal::ONE_HUNDRED).round()
    }

    /// Round half-away-from-zero to two decimal places.
    #[must_use]
    pub fn round(self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Subtract, clamping at zero.
    #[must_use]
    pub fn saturating_sub(self, other: Self) -> Self {
        if other.0 >= self.0 {
            Self::ZERO
        } else {
            Self(self.0 - other.0)
        }
    }
}

// Operators saturate instead of panicking on overflow.

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Price {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Self> for Price {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} {CURRENCY_CODE}", self.0)
    }
}
