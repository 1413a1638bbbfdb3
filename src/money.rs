//! Currency amounts
//!
//! Cost arithmetic runs on `rust_decimal` so totals and comparisons are exact to
//! the cent. Amounts cross the JSON boundary as plain floating-point dollars.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// A signed dollar amount held to the cent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(#[serde(with = "rust_decimal::serde::float")] Decimal);

fn to_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Non-finite factors have no decimal form and price at zero
fn factor(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub const fn from_cents(cents: i64) -> Self {
        Money(Decimal::from_parts(cents.unsigned_abs() as u32, (cents.unsigned_abs() >> 32) as u32, 0, cents < 0, 2))
    }

    pub const fn from_whole_dollars(dollars: i64) -> Self {
        Money::from_cents(dollars * 100)
    }

    /// Create from a dollar amount, rounded to the cent (half away from zero)
    pub fn from_dollars(dollars: f64) -> Self {
        Money(to_cents(factor(dollars)))
    }

    pub fn amount(self) -> Decimal {
        self.0
    }

    pub fn to_dollars(self) -> f64 {
        self.0.to_f64().unwrap_or_default()
    }

    pub fn is_negative(self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Multiply by a fractional factor, rounding the result to the cent
    ///
    /// Used for coinsurance percentages and fractional visit/fill counts.
    pub fn scale(self, by: f64) -> Self {
        Money(to_cents(self.0 * factor(by)))
    }

    /// Apply a percentage expressed on a 0-100 scale
    pub fn percent(self, percentage: f64) -> Self {
        Money(to_cents(self.0 * factor(percentage) / Decimal::ONE_HUNDRED))
    }

    /// Floor at zero
    pub fn non_negative(self) -> Self {
        self.max(Money::ZERO)
    }

    /// Format with thousands separators and cents, e.g. `$1,234.56`
    pub fn format_cents(self) -> String {
        format_with(self.0, 2)
    }

    /// Format rounded to whole dollars, e.g. `$1,235`
    pub fn format_whole(self) -> String {
        format_with(self.0, 0)
    }
}

fn format_with(value: Decimal, places: u32) -> String {
    let rounded = value
        .abs()
        .round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.*}", places as usize, rounded);
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    match fraction {
        Some(fraction) => format!("{}${}.{}", sign, grouped, fraction),
        None => format!("{}${}", sign, grouped),
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.format_cents())
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

/// Exact multiplication by a whole count (members, months, visits)
impl Mul<u32> for Money {
    type Output = Money;

    fn mul(self, rhs: u32) -> Money {
        Money(self.0 * Decimal::from(rhs))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}
