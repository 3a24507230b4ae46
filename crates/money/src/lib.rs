use std::fmt;
use std::ops::Neg;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// A monetary amount stored as a whole number of minor units (cents).
///
/// Bank exports carry amounts as decimal numerals of varying fractional
/// width; parsing keeps exactly two fractional digits and never touches
/// floating point, so ledger balances stay exact.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Decimal(i64);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseDecimalError {
    #[error("amount '{0}' has no fractional part")]
    MissingFraction(String),
    #[error("amount '{0}' contains a non-numeric part")]
    InvalidDigits(String),
}

impl Decimal {
    pub const ZERO: Decimal = Decimal(0);

    pub fn from_minor_units(cents: i64) -> Decimal {
        Decimal(cents)
    }

    pub fn minor_units(self) -> i64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl Neg for Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        Decimal(-self.0)
    }
}

fn check_digits(part: &str, whole: &str) -> Result<(), ParseDecimalError> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseDecimalError::InvalidDigits(whole.to_string()));
    }
    Ok(())
}

fn digits(part: &str, whole: &str) -> Result<i64, ParseDecimalError> {
    check_digits(part, whole)?;
    part.parse()
        .map_err(|_| ParseDecimalError::InvalidDigits(whole.to_string()))
}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    /// Parses `[-]digits.digits`. A fractional part is mandatory; the
    /// exports this type is built for always carry one. Anything past two
    /// fractional digits is truncated, not rounded.
    fn from_str(s: &str) -> Result<Decimal, ParseDecimalError> {
        // The sign is remembered separately so that -0.50 does not lose it
        // on its zero integral part.
        let (negative, magnitude) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let (units_part, cents_part) = magnitude
            .split_once('.')
            .ok_or_else(|| ParseDecimalError::MissingFraction(s.to_string()))?;
        let units = digits(units_part, s)?;
        check_digits(cents_part, s)?;
        let cents = if cents_part.len() == 1 {
            digits(cents_part, s)? * 10
        } else {
            // Taking the first two digits is the truncating division by
            // ten per extra digit, without overflowing on long fractions.
            digits(&cents_part[..2], s)?
        };
        let value = 100 * units + cents;
        Ok(Decimal(if negative { -value } else { value }))
    }
}

impl fmt::Display for Decimal {
    /// Canonical form `[-]units.cc`, the sign emitted once and the
    /// fraction always two digits. Round-trips with `FromStr`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl<'de> Deserialize<'de> for Decimal {
    /// Reads a JSON number through its exact textual representation
    /// (serde_json's arbitrary_precision keeps the literal intact).
    fn deserialize<D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let number = serde_json::Number::deserialize(deserializer)?;
        number.to_string().parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_two_digit_fraction() {
        assert_eq!(parse("12.34").minor_units(), 1234);
        assert_eq!(parse("1.05").minor_units(), 105);
    }

    #[test]
    fn test_parse_normalizes_fraction_width() {
        assert_eq!(parse("5.1").minor_units(), 510);
        assert_eq!(parse("5.10").minor_units(), 510);
        assert_eq!(parse("5.100").minor_units(), 510);
    }

    #[test]
    fn test_parse_truncates_extra_precision() {
        assert_eq!(parse("5.105").minor_units(), 510);
        assert_eq!(parse("5.109").minor_units(), 510);
        assert_eq!(parse("0.999999").minor_units(), 99);
        assert_eq!(parse("1.0005").minor_units(), 100);
        assert_eq!(parse("5.1000000000000000000055").minor_units(), 510);
    }

    #[test]
    fn test_parse_keeps_sign_on_zero_units() {
        assert_eq!(parse("-0.50").minor_units(), -50);
    }

    #[test]
    fn test_parse_single_zero_fraction() {
        assert_eq!(parse("12.0").minor_units(), 1200);
        assert_eq!(parse("0.0").minor_units(), 0);
    }

    #[test]
    fn test_parse_rejects_missing_fraction() {
        assert_eq!(
            "12".parse::<Decimal>(),
            Err(ParseDecimalError::MissingFraction("12".to_string()))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("12.x4".parse::<Decimal>().is_err());
        assert!("a.50".parse::<Decimal>().is_err());
        assert!(".50".parse::<Decimal>().is_err());
        assert!("1.".parse::<Decimal>().is_err());
        assert!("".parse::<Decimal>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Decimal::from_minor_units(1234).to_string(), "12.34");
        assert_eq!(Decimal::from_minor_units(-50).to_string(), "-0.50");
        assert_eq!(Decimal::from_minor_units(5).to_string(), "0.05");
        assert_eq!(Decimal::from_minor_units(-100).to_string(), "-1.00");
        assert_eq!(Decimal::ZERO.to_string(), "0.00");
    }

    #[test]
    fn test_round_trip() {
        for value in ["0.00", "0.05", "-0.50", "12.34", "-12.34", "1000.00"] {
            let parsed = parse(value);
            assert_eq!(parsed.to_string(), value);
            assert_eq!(parse(&parsed.to_string()), parsed);
        }
    }

    #[test]
    fn test_neg() {
        assert_eq!(-parse("5.00"), parse("-5.00"));
    }

    #[test]
    fn test_deserialize_json_number() {
        let value: Decimal = serde_json::from_str("-12.5").unwrap();
        assert_eq!(value.minor_units(), -1250);
        let value: Decimal = serde_json::from_str("3.105").unwrap();
        assert_eq!(value.minor_units(), 310);
    }

    #[test]
    fn test_deserialize_rejects_integer_literal() {
        assert!(serde_json::from_str::<Decimal>("12").is_err());
    }
}
