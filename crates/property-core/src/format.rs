//! Currency and percentage display.
//!
//! Amounts render with exactly two fraction digits, rounded midpoint-away-from-zero.
//! The pt-BR convention is `R$ 1.234,50`: an ASCII space after the symbol,
//! `.` between thousands, `,` before the cents. Negative values carry the
//! minus sign before the symbol (`-R$ 1.234,50`).

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::CoreError;
use crate::roi::Roi;

/// Separator and symbol conventions for one locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyFormat {
    pub symbol: &'static str,
    pub thousands_separator: char,
    pub decimal_separator: char,
}

impl CurrencyFormat {
    /// Brazilian real, the application's native locale.
    pub const fn pt_br() -> Self {
        Self {
            symbol: "R$ ",
            thousands_separator: '.',
            decimal_separator: ',',
        }
    }

    pub const fn en_us() -> Self {
        Self {
            symbol: "$",
            thousands_separator: ',',
            decimal_separator: '.',
        }
    }

    /// Render `amount` as currency. The stored value is not modified.
    pub fn currency(&self, amount: Decimal) -> String {
        let (negative, digits) = self.two_places(amount);
        let sign = if negative { "-" } else { "" };
        format!("{}{}{}", sign, self.symbol, digits)
    }

    /// Render a percentage value (already scaled, 29.55 means 29.55%).
    pub fn percent(&self, value: Decimal) -> String {
        let (negative, digits) = self.two_places(value);
        let sign = if negative { "-" } else { "" };
        format!("{}{}%", sign, digits)
    }

    fn two_places(&self, value: Decimal) -> (bool, String) {
        let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let negative = rounded.is_sign_negative() && !rounded.is_zero();
        rounded.set_sign_positive(true);
        rounded.rescale(2);

        let plain = rounded.to_string();
        let (integer, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

        let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
        for (i, c) in integer.chars().enumerate() {
            if i > 0 && (integer.len() - i) % 3 == 0 {
                grouped.push(self.thousands_separator);
            }
            grouped.push(c);
        }

        (negative, format!("{}{}{}", grouped, self.decimal_separator, fraction))
    }
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::pt_br()
    }
}

impl FromStr for CurrencyFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "pt-br" | "pt" => Ok(Self::pt_br()),
            "en-us" | "en" => Ok(Self::en_us()),
            _ => Err(CoreError::UnknownEnum {
                kind: "locale",
                value: s.to_string(),
            }),
        }
    }
}

/// pt-BR currency string, e.g. `R$ 1.234,50`.
pub fn format_currency(amount: Decimal) -> String {
    CurrencyFormat::pt_br().currency(amount)
}

/// pt-BR percentage string, e.g. `29,55%`.
pub fn format_percent(value: Decimal) -> String {
    CurrencyFormat::pt_br().percent(value)
}

/// ROI for display; `N/A` when the cost base was zero.
pub fn format_roi(roi: &Roi, format: &CurrencyFormat) -> String {
    match roi {
        Roi::Percent(value) => format.percent(*value),
        Roi::NotApplicable => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_pt_br_reference_value() {
        assert_eq!(format_currency(dec!(1234.5)), "R$ 1.234,50");
    }

    #[test]
    fn test_grouping() {
        assert_eq!(format_currency(dec!(0)), "R$ 0,00");
        assert_eq!(format_currency(dec!(999.99)), "R$ 999,99");
        assert_eq!(format_currency(dec!(1000)), "R$ 1.000,00");
        assert_eq!(format_currency(dec!(1234567.891)), "R$ 1.234.567,89");
        assert_eq!(format_currency(dec!(100000)), "R$ 100.000,00");
    }

    #[test]
    fn test_negative_sign_before_symbol() {
        assert_eq!(format_currency(dec!(-1234.5)), "-R$ 1.234,50");
        // rounds to zero, so no sign
        assert_eq!(format_currency(dec!(-0.001)), "R$ 0,00");
    }

    #[test]
    fn test_midpoint_rounds_away_from_zero() {
        assert_eq!(format_currency(dec!(0.005)), "R$ 0,01");
        assert_eq!(format_currency(dec!(-2.345)), "-R$ 2,35");
    }

    #[test]
    fn test_formatting_does_not_touch_value() {
        let amount = dec!(10.129);
        let _ = format_currency(amount);
        assert_eq!(amount, dec!(10.129));
    }

    #[test]
    fn test_en_us() {
        let us = CurrencyFormat::en_us();
        assert_eq!(us.currency(dec!(1234.5)), "$1,234.50");
        assert_eq!(us.currency(dec!(-7)), "-$7.00");
    }

    #[test]
    fn test_percent_and_roi() {
        assert_eq!(format_percent(dec!(29.5454)), "29,55%");
        let fmt = CurrencyFormat::pt_br();
        assert_eq!(format_roi(&Roi::Percent(dec!(21.36)), &fmt), "21,36%");
        assert_eq!(format_roi(&Roi::NotApplicable, &fmt), "N/A");
    }

    #[test]
    fn test_locale_from_str() {
        assert_eq!("pt-BR".parse::<CurrencyFormat>().unwrap(), CurrencyFormat::pt_br());
        assert_eq!("en_US".parse::<CurrencyFormat>().unwrap(), CurrencyFormat::en_us());
        assert!("fr-FR".parse::<CurrencyFormat>().is_err());
    }
}
