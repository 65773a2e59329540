//! Monetary input parsing
//!
//! Amounts reach the core from form fields and JSON payloads in whatever shape
//! the sender chose: numbers, numeric strings, blanks, `null`, or garbage.
//! [`RawAmount`] holds that untrusted value; [`RawAmount::to_decimal`] is the
//! single parse-and-default step that turns it into a validated [`Decimal`].

use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::CoreError;

/// Largest magnitude accepted from untrusted input. Keeps every sum and
/// product in the core far below `Decimal::MAX`.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000);

/// An amount as received, before validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RawAmount {
    #[default]
    Missing,
    Value(Decimal),
    Text(String),
}

impl RawAmount {
    /// Strict parse. Absent, non-numeric and out-of-range inputs are errors.
    pub fn parse(&self) -> Result<Decimal, CoreError> {
        match self {
            RawAmount::Missing => Err(CoreError::InvalidInput("amount is missing".to_string())),
            RawAmount::Value(value) => check_bounds(*value),
            RawAmount::Text(text) => parse_amount(text),
        }
    }

    /// Lenient parse: absent or non-numeric inputs become zero.
    pub fn to_decimal(&self) -> Decimal {
        match self.parse() {
            Ok(value) => value,
            Err(err) => {
                if !matches!(self, RawAmount::Missing) {
                    tracing::debug!(input = ?self, %err, "defaulting monetary input to zero");
                }
                Decimal::ZERO
            }
        }
    }

    /// Lenient parse for display amounts, which are never negative.
    pub fn to_non_negative(&self) -> Decimal {
        let value = self.to_decimal();
        if value.is_sign_negative() && !value.is_zero() {
            tracing::debug!(%value, "negative display amount coerced to zero");
            Decimal::ZERO
        } else {
            value
        }
    }

    /// Whole count (installments, days). Fractions are truncated, negatives clamp to zero.
    pub fn to_count(&self) -> u32 {
        let value = self.to_decimal().trunc();
        if value.is_sign_negative() {
            return 0;
        }
        value.to_u32().unwrap_or(u32::MAX)
    }

    /// True when the sender left the field empty.
    pub fn is_blank(&self) -> bool {
        match self {
            RawAmount::Missing => true,
            RawAmount::Value(_) => false,
            RawAmount::Text(text) => text.trim().is_empty(),
        }
    }
}

/// Parse a decimal amount from text. Accepts plain (`1234.5`) and scientific
/// (`1.2e3`) notation, surrounding whitespace allowed. The whole string must
/// be numeric: `"12abc"` is rejected rather than read as 12.
pub fn parse_amount(input: &str) -> Result<Decimal, CoreError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidInput("amount is blank".to_string()));
    }

    let value = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| CoreError::InvalidInput(format!("{trimmed:?} is not a number")))?;
    check_bounds(value)
}

fn check_bounds(value: Decimal) -> Result<Decimal, CoreError> {
    if value.abs() > MAX_AMOUNT {
        return Err(CoreError::InvalidInput(format!(
            "{} exceeds the accepted range of {}",
            value, MAX_AMOUNT
        )));
    }
    Ok(value)
}

/// Clamp an already-validated amount into `-MAX_AMOUNT..=MAX_AMOUNT`.
pub fn clamp_amount(value: Decimal) -> Decimal {
    value.clamp(-MAX_AMOUNT, MAX_AMOUNT)
}

impl From<Decimal> for RawAmount {
    fn from(value: Decimal) -> Self {
        RawAmount::Value(value)
    }
}

impl From<i64> for RawAmount {
    fn from(value: i64) -> Self {
        RawAmount::Value(Decimal::from(value))
    }
}

impl From<&str> for RawAmount {
    fn from(value: &str) -> Self {
        RawAmount::Text(value.to_string())
    }
}

impl From<String> for RawAmount {
    fn from(value: String) -> Self {
        RawAmount::Text(value)
    }
}

impl fmt::Display for RawAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawAmount::Missing => Ok(()),
            RawAmount::Value(value) => write!(f, "{}", value),
            RawAmount::Text(text) => write!(f, "{}", text),
        }
    }
}

impl<'de> Deserialize<'de> for RawAmount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            None | Some(Value::Null) => RawAmount::Missing,
            Some(Value::Number(number)) => {
                let text = number.to_string();
                match parse_amount(&text) {
                    Ok(decimal) => RawAmount::Value(decimal),
                    Err(_) => RawAmount::Text(text),
                }
            }
            Some(Value::String(text)) => RawAmount::Text(text),
            Some(other) => RawAmount::Text(other.to_string()),
        })
    }
}

impl Serialize for RawAmount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            RawAmount::Missing => serializer.serialize_none(),
            RawAmount::Value(value) => rust_decimal::serde::float::serialize(value, serializer),
            RawAmount::Text(text) => serializer.serialize_str(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_plain_and_scientific() {
        assert_eq!(parse_amount("1234.5").unwrap(), dec!(1234.5));
        assert_eq!(parse_amount("  42 ").unwrap(), dec!(42));
        assert_eq!(parse_amount("1.5e3").unwrap(), dec!(1500));
        assert!(parse_amount("").is_err());
        assert!(parse_amount("R$ 10").is_err());
    }

    #[test]
    fn test_non_numeric_defaults_to_zero() {
        assert_eq!(RawAmount::from("abc").to_decimal(), Decimal::ZERO);
        assert_eq!(RawAmount::Missing.to_decimal(), Decimal::ZERO);
        assert_eq!(RawAmount::from("").to_decimal(), Decimal::ZERO);
        assert_eq!(RawAmount::from("99.90").to_decimal(), dec!(99.90));
    }

    #[test]
    fn test_negative_display_amount_clamped() {
        assert_eq!(RawAmount::from(dec!(-10)).to_non_negative(), Decimal::ZERO);
        assert_eq!(RawAmount::from(dec!(-10)).to_decimal(), dec!(-10));
    }

    #[test]
    fn test_to_count() {
        assert_eq!(RawAmount::from("12").to_count(), 12);
        assert_eq!(RawAmount::from("3.9").to_count(), 3);
        assert_eq!(RawAmount::from("-2").to_count(), 0);
        assert_eq!(RawAmount::Missing.to_count(), 0);
    }

    #[test]
    fn test_deserialize_any_json_shape() {
        let parsed: Vec<RawAmount> =
            serde_json::from_str(r#"[150.25, "300", null, "", true, {"x": 1}]"#).unwrap();
        assert_eq!(parsed[0].to_decimal(), dec!(150.25));
        assert_eq!(parsed[1].to_decimal(), dec!(300));
        assert_eq!(parsed[2], RawAmount::Missing);
        assert!(parsed[3].is_blank());
        assert_eq!(parsed[4].to_decimal(), Decimal::ZERO);
        assert_eq!(parsed[5].to_decimal(), Decimal::ZERO);
    }

    #[test]
    fn test_out_of_range_amount_defaults_to_zero() {
        let huge = RawAmount::from("50000000000000000000000000000");
        assert!(matches!(huge.parse(), Err(CoreError::InvalidInput(_))));
        assert_eq!(huge.to_decimal(), Decimal::ZERO);

        let parsed: RawAmount = serde_json::from_str("5e28").unwrap();
        assert_eq!(parsed.to_decimal(), Decimal::ZERO);

        assert_eq!(RawAmount::from(MAX_AMOUNT).to_decimal(), MAX_AMOUNT);
        assert_eq!(RawAmount::from(-MAX_AMOUNT).to_decimal(), -MAX_AMOUNT);
        assert_eq!(clamp_amount(Decimal::MAX), MAX_AMOUNT);
    }

    #[test]
    fn test_trailing_garbage_is_not_a_number() {
        assert!(parse_amount("12abc").is_err());
        assert_eq!(RawAmount::from("12abc").to_decimal(), Decimal::ZERO);
    }

    #[test]
    fn test_value_serializes_as_number() {
        let json = serde_json::to_value(RawAmount::from(dec!(450))).unwrap();
        assert_eq!(json, 450.0);
        assert!(serde_json::to_value(RawAmount::Missing).unwrap().is_null());
    }

    #[test]
    fn test_float_input_is_exact() {
        let parsed: RawAmount = serde_json::from_str("0.1").unwrap();
        assert_eq!(parsed.to_decimal(), dec!(0.1));
    }
}
