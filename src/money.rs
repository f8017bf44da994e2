use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;

use crate::config::CurrencyFormat;
use crate::errors::{EngineError, Result};

/// Money in integer cents. All engine arithmetic happens on this type;
/// human-entered decimal amounts are converted once at the edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);
    pub const CENT: Money = Money(1);

    /// create from cents
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// create from whole currency units
    pub fn from_major(amount: i64) -> Self {
        Money(amount * 100)
    }

    /// create from a decimal amount in currency units, rounding half away from zero
    pub fn from_decimal_major(amount: Decimal) -> Result<Self> {
        let cents = (amount * dec!(100))
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

        cents
            .to_i64()
            .map(Money)
            .ok_or_else(|| EngineError::InvalidAmount {
                input: amount.to_string(),
            })
    }

    /// parse a human-entered amount, inferring the separator style.
    ///
    /// "19.90", "19,90", "1,234.50" and "1.234,50" all parse. With both
    /// separators present the last one is the decimal point. A single
    /// separator followed by exactly three digits ("1.234") reads either way
    /// and is rejected; use [`Money::parse_with`] for those.
    pub fn from_major_str(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let invalid = || EngineError::InvalidAmount {
            input: input.to_string(),
        };

        let (decimal, thousands) = match (trimmed.rfind('.'), trimmed.rfind(',')) {
            (Some(dot), Some(comma)) if dot > comma => ('.', Some(',')),
            (Some(_), Some(_)) => (',', Some('.')),
            (Some(_), None) => single_separator(trimmed, '.', ',', input)?,
            (None, Some(_)) => single_separator(trimmed, ',', '.', input)?,
            (None, None) => ('.', None),
        };

        let normalized = normalize(trimmed, decimal, thousands).ok_or_else(invalid)?;
        let amount = Decimal::from_str(&normalized).map_err(|_| invalid())?;

        Self::from_decimal_major(amount)
    }

    /// parse a human-entered amount written in a known currency format
    pub fn parse_with(input: &str, format: &CurrencyFormat) -> Result<Self> {
        let invalid = || EngineError::InvalidAmount {
            input: input.to_string(),
        };

        let normalized = normalize(
            input.trim(),
            format.decimal_separator,
            Some(format.thousands_separator),
        )
        .ok_or_else(invalid)?;
        let amount = Decimal::from_str(&normalized).map_err(|_| invalid())?;

        Self::from_decimal_major(amount)
    }

    pub fn cents(&self) -> i64 {
        self.0
    }

    /// amount in currency units with two decimal places
    pub fn to_decimal_major(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// plain printable amount, e.g. "19.90"
    pub fn to_major_string(&self) -> String {
        self.to_decimal_major().to_string()
    }

    /// display amount with a currency symbol and separators, e.g. "R$ 1.234,50"
    pub fn format_with(&self, format: &CurrencyFormat) -> String {
        let abs = self.0.unsigned_abs();
        let units = (abs / 100).to_string();
        let cents = abs % 100;

        let mut grouped = String::with_capacity(units.len() + units.len() / 3);
        for (i, ch) in units.chars().enumerate() {
            if i > 0 && (units.len() - i) % 3 == 0 {
                grouped.push(format.thousands_separator);
            }
            grouped.push(ch);
        }

        let sign = if self.0 < 0 { "-" } else { "" };
        format!(
            "{}{} {}{}{:02}",
            sign, format.symbol, grouped, format.decimal_separator, cents
        )
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    pub fn min(self, other: Self) -> Self {
        Money(self.0.min(other.0))
    }

    pub fn max(self, other: Self) -> Self {
        Money(self.0.max(other.0))
    }

    /// split into `parts` amounts that sum exactly to self; the first
    /// `self % parts` amounts carry one extra cent
    pub fn split_even(&self, parts: u32) -> Vec<Money> {
        if parts == 0 {
            return Vec::new();
        }

        let parts_i = i64::from(parts);
        let base = self.0.div_euclid(parts_i);
        let remainder = self.0 - base * parts_i;

        (0..parts_i)
            .map(|i| Money(base + if i < remainder { 1 } else { 0 }))
            .collect()
    }
}

/// separators for an amount containing only `sep`: repeated means thousands
/// grouping, once means a decimal point unless three digits follow it
fn single_separator(
    trimmed: &str,
    sep: char,
    other: char,
    input: &str,
) -> Result<(char, Option<char>)> {
    if trimmed.matches(sep).count() > 1 {
        return Ok((other, Some(sep)));
    }

    let (whole, fraction) = trimmed.split_once(sep).unwrap_or((trimmed, ""));
    let whole_is_zero = matches!(whole.trim_start_matches(['-', '+']), "0" | "");
    if fraction.len() == 3 && !whole_is_zero {
        return Err(EngineError::AmbiguousAmount {
            input: input.to_string(),
        });
    }

    Ok((sep, None))
}

/// rewrite to plain `[-]digits[.digits]`, checking thousands grouping
fn normalize(input: &str, decimal: char, thousands: Option<char>) -> Option<String> {
    let (sign, body) = match input.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", input.strip_prefix('+').unwrap_or(input)),
    };

    let (whole, fraction) = match body.split_once(decimal) {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (body, None),
    };

    if let Some(fraction) = fraction {
        if fraction.is_empty() || !fraction.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
    }

    let digits = match thousands {
        Some(sep) if whole.contains(sep) => {
            let groups: Vec<&str> = whole.split(sep).collect();
            let grouped = (1..=3).contains(&groups[0].len())
                && groups[1..].iter().all(|g| g.len() == 3);
            if !grouped {
                return None;
            }
            groups.concat()
        }
        _ => whole.to_string(),
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    Some(match fraction {
        Some(fraction) => format!("{sign}{digits}.{fraction}"),
        None => format!("{sign}{digits}"),
    })
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_major_string())
    }
}

impl FromStr for Money {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        Money::from_major_str(s)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Money) {
        self.0 -= other.0;
    }
}

impl Mul<u32> for Money {
    type Output = Money;

    fn mul(self, quantity: u32) -> Money {
        Money(self.0 * i64::from(quantity))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}
