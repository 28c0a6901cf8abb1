// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Fixed-point currency amounts.
//!
//! [`Money`] stores a signed number of cents. Every stored or settled amount
//! in the ledger is a whole number of cents, so balances never drift the way
//! repeatedly rounded floats do.
//!
//! # Example
//!
//! ```
//! use expense_ledger_rs::Money;
//! use rust_decimal_macros::dec;
//!
//! let amount = Money::try_from(dec!(12.5)).unwrap();
//! assert_eq!(amount.cents(), 1250);
//! assert_eq!(amount.to_string(), "12.50");
//! ```

use crate::error::InvalidExpenseError;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

/// Currency amount with two decimal places, stored as integer cents.
///
/// The arithmetic operators behave like `i64` on overflow; sums over
/// untrusted input go through [`Money::checked_add`] and friends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Number of fractional digits carried by every amount.
    pub const DECIMAL_PRECISION: u32 = 2;

    const SCALE: i64 = 100;

    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, Self::DECIMAL_PRECISION)
    }

    /// Converts a decimal to cents, rounding to the nearest cent with halves
    /// going up (toward positive infinity): `-1.005` becomes `-1.00`.
    ///
    /// Used where the input is already approximate: floats from a JSON store,
    /// or the quotient of an even split.
    pub fn from_decimal_rounded(value: Decimal) -> Result<Self, InvalidExpenseError> {
        value
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|scaled| scaled.checked_add(Decimal::new(5, 1)))
            .and_then(|scaled| scaled.floor().to_i64())
            .map(Money)
            .ok_or(InvalidExpenseError::AmountOutOfRange(value))
    }

    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn abs(self) -> Self {
        Money(self.0.abs())
    }

    /// `None` when the sum leaves the cent range.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Money)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Money)
    }

    pub fn checked_neg(self) -> Option<Self> {
        self.0.checked_neg().map(Money)
    }

    /// Negation clamped to the cent range; only `i64::MIN` cents is affected.
    pub const fn saturating_neg(self) -> Self {
        Money(self.0.saturating_neg())
    }
}

impl TryFrom<Decimal> for Money {
    type Error = InvalidExpenseError;

    /// Strict conversion: amounts finer than a cent are rejected rather than
    /// silently rounded.
    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        if value.round_dp(Self::DECIMAL_PRECISION) != value {
            return Err(InvalidExpenseError::SubCentAmount(value));
        }
        value
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|cents| cents.to_i64())
            .map(Money)
            .ok_or(InvalidExpenseError::AmountOutOfRange(value))
    }
}

impl FromStr for Money {
    type Err = InvalidExpenseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim())
            .map_err(|_| InvalidExpenseError::MalformedAmount(s.to_owned()))?;
        Self::try_from(value)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let whole = abs / Self::SCALE as u64;
        let frac = abs % Self::SCALE as u64;
        write!(f, "{sign}{whole}.{frac:02}")
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

/// Accepts decimal strings (CSV, our own JSON output) as well as JSON numbers
/// written by stores that keep amounts as floats.
struct MoneyVisitor;

impl Visitor<'_> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a currency amount with at most two decimal places")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
        Money::from_str(v).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        Money::try_from(Decimal::from(v)).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        Money::try_from(Decimal::from(v)).map_err(E::custom)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        let value = Decimal::from_f64(v)
            .ok_or_else(|| E::custom(format!("amount {v} is not a finite decimal")))?;
        Money::from_decimal_rounded(value).map_err(E::custom)
    }
}
