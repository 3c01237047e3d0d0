//! Currency amounts.
//!
//! Amounts reach the service as JSON strings (`"100.50"`), JSON numbers, or
//! database decimals. Everything funnels through [`parse_amount`] so a
//! malformed value is rejected instead of silently becoming zero.

use rust_decimal::Decimal;
use serde::de::{self, Deserializer, Visitor};
use service_core::error::AppError;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Maximum number of fractional digits accepted for a currency amount.
pub const MAX_SCALE: u32 = 4;

/// Exclusive bound on the magnitude of an amount or balance (10^15). The
/// money columns carry the same range check.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,
    #[error("'{0}' is not a valid decimal amount")]
    Invalid(String),
    #[error("'{0}' has more than 4 decimal places")]
    TooPrecise(String),
    #[error("amount must be greater than zero, got {0}")]
    NotPositive(Decimal),
    #[error("{0} is out of range; amounts and balances must stay below 1000000000000000 in magnitude")]
    OutOfRange(Decimal),
    #[error("amount arithmetic overflowed")]
    Overflow,
}

impl From<AmountError> for AppError {
    fn from(err: AmountError) -> Self {
        match err {
            AmountError::Overflow => AppError::InternalError(anyhow::Error::new(err)),
            _ => AppError::BadRequest(anyhow::Error::new(err)),
        }
    }
}

/// Parse a decimal amount, failing on anything that is not a plain number.
///
/// Surrounding whitespace is ignored. Exponent notation, `NaN`, and values
/// with more than [`MAX_SCALE`] fractional digits are rejected.
pub fn parse_amount(raw: &str) -> Result<Decimal, AmountError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Empty);
    }

    let value =
        Decimal::from_str(trimmed).map_err(|_| AmountError::Invalid(trimmed.to_string()))?;

    if value.scale() > MAX_SCALE {
        return Err(AmountError::TooPrecise(trimmed.to_string()));
    }

    ensure_in_range(value).map(with_cents_scale)
}

/// Parse an amount that must be strictly positive.
pub fn parse_positive_amount(raw: &str) -> Result<Decimal, AmountError> {
    let value = parse_amount(raw)?;
    ensure_positive(value)
}

pub fn ensure_positive(value: Decimal) -> Result<Decimal, AmountError> {
    if value <= Decimal::ZERO {
        return Err(AmountError::NotPositive(value));
    }
    Ok(value)
}

pub fn ensure_in_range(value: Decimal) -> Result<Decimal, AmountError> {
    if value.abs() >= MAX_AMOUNT {
        return Err(AmountError::OutOfRange(value));
    }
    Ok(value)
}

pub fn checked_add(a: Decimal, b: Decimal) -> Result<Decimal, AmountError> {
    a.checked_add(b).ok_or(AmountError::Overflow)
}

pub fn checked_sub(a: Decimal, b: Decimal) -> Result<Decimal, AmountError> {
    a.checked_sub(b).ok_or(AmountError::Overflow)
}

pub fn checked_mul(a: Decimal, b: Decimal) -> Result<Decimal, AmountError> {
    a.checked_mul(b).ok_or(AmountError::Overflow)
}

/// Sum without panicking on overflow.
pub fn checked_sum(values: impl IntoIterator<Item = Decimal>) -> Result<Decimal, AmountError> {
    values.into_iter().try_fold(Decimal::ZERO, checked_add)
}

/// Apply a signed movement to a balance, keeping it within [`MAX_AMOUNT`].
pub fn adjust_balance(balance: Decimal, movement: Decimal) -> Result<Decimal, AmountError> {
    checked_add(balance, movement).and_then(ensure_in_range)
}

/// Keep at least two fractional digits so `"30"` and `"30.00"` render the
/// same way in responses.
pub fn with_cents_scale(mut value: Decimal) -> Decimal {
    if value.scale() < 2 {
        value.rescale(2);
    }
    value
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Decimal;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a decimal amount as a string or number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Decimal, E> {
        parse_amount(v).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Decimal, E> {
        parse_amount(&v.to_string()).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Decimal, E> {
        parse_amount(&v.to_string()).map_err(E::custom)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Decimal, E> {
        if !v.is_finite() {
            return Err(E::custom(AmountError::Invalid(v.to_string())));
        }
        // Shortest round-trip formatting: 0.1 stays "0.1" rather than the
        // binary expansion of the float.
        parse_amount(&v.to_string()).map_err(E::custom)
    }
}

/// `#[serde(deserialize_with = "deserialize_amount")]` for required amounts.
pub fn deserialize_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(AmountVisitor)
}

/// `#[serde(default, deserialize_with = "deserialize_optional_amount")]`.
pub fn deserialize_optional_amount<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OptionalAmountVisitor;

    impl<'de> Visitor<'de> for OptionalAmountVisitor {
        type Value = Option<Decimal>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a decimal amount or null")
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
            deserialize_amount(d).map(Some)
        }
    }

    deserializer.deserialize_option(OptionalAmountVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Payload {
        #[serde(deserialize_with = "deserialize_amount")]
        amount: Decimal,
        #[serde(default, deserialize_with = "deserialize_optional_amount")]
        limit: Option<Decimal>,
    }

    #[test]
    fn parses_plain_decimals() {
        assert_eq!(parse_amount("100.50").unwrap().to_string(), "100.50");
        assert_eq!(parse_amount(" 30 ").unwrap().to_string(), "30.00");
        assert_eq!(parse_amount("-12.5").unwrap().to_string(), "-12.50");
        assert_eq!(parse_amount("0.0001").unwrap().to_string(), "0.0001");
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(parse_amount(""), Err(AmountError::Empty));
        assert_eq!(parse_amount("   "), Err(AmountError::Empty));
        assert!(matches!(parse_amount("abc"), Err(AmountError::Invalid(_))));
        assert!(matches!(parse_amount("1,000"), Err(AmountError::Invalid(_))));
        assert!(matches!(parse_amount("NaN"), Err(AmountError::Invalid(_))));
        assert!(matches!(
            parse_amount("1.00001"),
            Err(AmountError::TooPrecise(_))
        ));
    }

    #[test]
    fn rejects_amounts_outside_storable_range() {
        assert!(parse_amount("999999999999999.9999").is_ok());
        assert!(parse_amount("-999999999999999.99").is_ok());
        assert!(matches!(
            parse_amount("1000000000000000"),
            Err(AmountError::OutOfRange(_))
        ));
        assert!(matches!(
            parse_amount("50000000000000000000000000000"),
            Err(AmountError::OutOfRange(_))
        ));
        assert_eq!(MAX_AMOUNT.to_string(), "1000000000000000");
    }

    #[test]
    fn checked_arithmetic_reports_overflow() {
        assert_eq!(checked_sum([Decimal::MAX, Decimal::ONE]), Err(AmountError::Overflow));
        assert_eq!(
            checked_sum([Decimal::new(150, 2), Decimal::new(25, 1)]),
            Ok(Decimal::new(400, 2))
        );
        assert_eq!(checked_mul(Decimal::MAX, Decimal::ONE_HUNDRED), Err(AmountError::Overflow));
        assert!(matches!(
            adjust_balance(Decimal::new(999_999_999_999_999, 0), Decimal::ONE),
            Err(AmountError::OutOfRange(_))
        ));
        assert_eq!(
            adjust_balance(Decimal::new(100, 0), Decimal::new(-250, 0)),
            Ok(Decimal::new(-150, 0))
        );
    }

    #[test]
    fn overflow_is_a_server_error_and_range_a_client_error() {
        assert!(matches!(
            AppError::from(AmountError::Overflow),
            AppError::InternalError(_)
        ));
        assert!(matches!(
            AppError::from(AmountError::OutOfRange(MAX_AMOUNT)),
            AppError::BadRequest(_)
        ));
    }

    #[test]
    fn positive_amounts_reject_zero_and_negatives() {
        assert!(parse_positive_amount("0.01").is_ok());
        assert!(matches!(
            parse_positive_amount("0"),
            Err(AmountError::NotPositive(_))
        ));
        assert!(matches!(
            parse_positive_amount("-5"),
            Err(AmountError::NotPositive(_))
        ));
    }

    #[test]
    fn deserializes_strings_and_numbers() {
        let p: Payload = serde_json::from_str(r#"{"amount": "100.50"}"#).unwrap();
        assert_eq!(p.amount.to_string(), "100.50");
        assert!(p.limit.is_none());

        let p: Payload = serde_json::from_str(r#"{"amount": 0.1, "limit": 250}"#).unwrap();
        assert_eq!(p.amount.to_string(), "0.10");
        assert_eq!(p.limit.unwrap().to_string(), "250.00");

        let p: Payload = serde_json::from_str(r#"{"amount": "1", "limit": null}"#).unwrap();
        assert!(p.limit.is_none());
    }

    #[test]
    fn deserialization_surfaces_bad_strings() {
        let err = serde_json::from_str::<Payload>(r#"{"amount": "twelve"}"#)
            .err()
            .unwrap();
        assert!(err.to_string().contains("not a valid decimal amount"));
    }
}
