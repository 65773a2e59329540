//! Acquisition ROI Calculator
//!
//! Projects the return of buying a property at auction and reselling it at
//! market value, under the CPF (individual) or CNPJ (company) tax regime.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;
use crate::models::TaxRegime;
use crate::money::{clamp_amount, RawAmount};

/// CPF: capital gains tax on the profit.
pub const CPF_PROFIT_TAX_RATE: Decimal = dec!(0.15);
/// CNPJ: presumed-profit tax on the sale value.
pub const CNPJ_REVENUE_TAX_RATE: Decimal = dec!(0.06);

/// Validated calculator inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionInputs {
    pub bid_value: Decimal,
    pub market_value: Decimal,
    pub renovation_cost: Decimal,
    /// Percent of the market value, 5 means 5%.
    pub broker_commission_pct: Decimal,
    pub tax_regime: TaxRegime,
}

impl AcquisitionInputs {
    /// Build from untrusted form values. Absent or non-numeric amounts become zero.
    pub fn from_raw(
        bid_value: &RawAmount,
        market_value: &RawAmount,
        renovation_cost: &RawAmount,
        broker_commission_pct: &RawAmount,
        tax_regime: TaxRegime,
    ) -> Self {
        Self {
            bid_value: bid_value.to_decimal(),
            market_value: market_value.to_decimal(),
            renovation_cost: renovation_cost.to_decimal(),
            broker_commission_pct: broker_commission_pct.to_decimal(),
            tax_regime,
        }
    }

    /// Bid plus renovation: the ROI denominator.
    pub fn acquisition_cost(&self) -> Decimal {
        self.bid_value + self.renovation_cost
    }

    /// Every amount clamped to the accepted input range.
    pub fn bounded(&self) -> Self {
        Self {
            bid_value: clamp_amount(self.bid_value),
            market_value: clamp_amount(self.market_value),
            renovation_cost: clamp_amount(self.renovation_cost),
            broker_commission_pct: clamp_amount(self.broker_commission_pct),
            tax_regime: self.tax_regime,
        }
    }
}

/// Return on investment in percent, or not applicable when nothing was invested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Roi {
    Percent(Decimal),
    NotApplicable,
}

impl Roi {
    pub fn as_percent(&self) -> Option<Decimal> {
        match self {
            Roi::Percent(value) => Some(*value),
            Roi::NotApplicable => None,
        }
    }

    pub fn is_applicable(&self) -> bool {
        matches!(self, Roi::Percent(_))
    }
}

impl Serialize for Roi {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.as_percent().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Roi {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Decimal>::deserialize(deserializer)? {
            Some(value) => Roi::Percent(value),
            None => Roi::NotApplicable,
        })
    }
}

/// Every intermediate value of the projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiBreakdown {
    pub tax_regime: TaxRegime,
    pub acquisition_cost: Decimal,
    pub profit: Decimal,
    pub tax: Decimal,
    pub commission: Decimal,
    pub net_profit: Decimal,
    /// Rounded to two decimal places.
    pub roi: Roi,
}

impl RoiBreakdown {
    /// ROI as a number, or `DivisionByZero` when the cost base was zero.
    pub fn roi_percent(&self) -> Result<Decimal, CoreError> {
        self.roi.as_percent().ok_or_else(|| {
            CoreError::DivisionByZero("bid value plus renovation cost is zero".to_string())
        })
    }
}

/// Run the projection.
///
/// * CPF: `profit = market - (bid + renovation)`, `tax = profit * 15%`
/// * CNPJ: `tax = market * 6%`, `profit = market - (bid + renovation + tax)`
/// * unselected regime: profit and tax are both zero
///
/// Commission is always charged on the market value and deducted from profit.
/// Inputs are clamped with [`AcquisitionInputs::bounded`] first, so no step can overflow.
pub fn compute_roi(inputs: &AcquisitionInputs) -> RoiBreakdown {
    let inputs = inputs.bounded();
    let acquisition_cost = inputs.acquisition_cost();

    let (profit, tax) = match inputs.tax_regime {
        TaxRegime::Cpf => {
            let profit = inputs.market_value - acquisition_cost;
            (profit, profit * CPF_PROFIT_TAX_RATE)
        }
        TaxRegime::Cnpj => {
            let tax = inputs.market_value * CNPJ_REVENUE_TAX_RATE;
            (inputs.market_value - (acquisition_cost + tax), tax)
        }
        TaxRegime::Unselected => (Decimal::ZERO, Decimal::ZERO),
    };

    let commission = inputs.broker_commission_pct / Decimal::ONE_HUNDRED * inputs.market_value;
    let net_profit = profit - commission;

    let percent = net_profit
        .checked_div(acquisition_cost)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED));
    let roi = match percent {
        Some(value) if !acquisition_cost.is_zero() => Roi::Percent(
            value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        ),
        _ => {
            tracing::debug!(%net_profit, %acquisition_cost, "ROI not applicable");
            Roi::NotApplicable
        }
    };

    RoiBreakdown {
        tax_regime: inputs.tax_regime,
        acquisition_cost,
        profit,
        tax,
        commission,
        net_profit,
        roi,
    }
}
