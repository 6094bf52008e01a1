use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Div, Sub};
use std::str::FromStr;

/// An INR amount held at two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub fn from_decimal(decimal: Decimal) -> Self {
        Money(decimal.round_dp(2))
    }

    pub fn from_paise(paise: i64) -> Self {
        Money(Decimal::new(paise, 2))
    }

    /// Parse a document amount such as `1,23,456.78` or `2,500`.
    /// Thousands separators are stripped; anything else that is not a number
    /// yields `None`.
    pub fn parse(s: &str) -> Option<Self> {
        let clean = s.trim().replace(',', "");
        if clean.is_empty() {
            return None;
        }
        Decimal::from_str(&clean).ok().map(Self::from_decimal)
    }

    pub fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    /// `None` when the sum does not fit in a `Decimal`.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Clamps at the largest representable amount instead of panicking.
    pub fn saturating_add(self, rhs: Self) -> Self {
        Money(self.0.saturating_add(rhs.0))
    }

    /// Split into two equal halves, each rounded to the paisa.
    pub fn halve(self) -> Self {
        self / 2
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "₹{:.2}", self.0)
    }
}

impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Money(self.0 - rhs.0)
    }
}

impl Div<i64> for Money {
    type Output = Self;
    fn div(self, rhs: i64) -> Self {
        Money::from_decimal(self.0 / Decimal::from(rhs))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), Money::saturating_add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_strips_thousands_separators() {
        assert_eq!(Money::parse("1,234.56"), Some(Money::from_paise(123_456)));
        assert_eq!(Money::parse("12,34,567"), Some(Money::from_paise(1_234_567_00)));
        assert_eq!(Money::parse("2500"), Some(Money::from_paise(250_000)));
    }

    #[test]
    fn parse_rejects_non_numbers() {
        assert_eq!(Money::parse(""), None);
        assert_eq!(Money::parse(","), None);
        assert_eq!(Money::parse("abc"), None);
    }

    #[test]
    fn addition_near_decimal_max_does_not_panic() {
        let huge = Money::from_decimal(Decimal::MAX);
        assert_eq!(huge.checked_add(Money::from_paise(1_00)), None);
        assert_eq!(
            Money::from_paise(1_00).checked_add(Money::from_paise(2_50)),
            Some(Money::from_paise(3_50))
        );
        assert_eq!(huge.saturating_add(huge), huge);

        let total: Money = [huge, huge].into_iter().sum();
        assert_eq!(total, huge);
    }

    #[test]
    fn halve_rounds_to_paisa() {
        assert_eq!(Money::from_paise(1800_00).halve(), Money::from_paise(900_00));
        assert_eq!(Money::from_paise(1).halve(), Money::zero());
    }

    #[test]
    fn display_uses_rupee_sign() {
        assert_eq!(Money::from_paise(550).to_string(), "₹5.50");
        assert_eq!(Money::zero().to_string(), "₹0.00");
    }

    #[test]
    fn sum_of_amounts() {
        let total: Money = [100, 250, 5].into_iter().map(Money::from_paise).sum();
        assert_eq!(total, Money::from_paise(355));
    }
}
