//! Acquisition Wizard
//!
//! Multi-step registration of an auctioned property. Each step owns an
//! explicit record of raw form values; moving forward validates the step
//! being left. The wizard only lives for the registration session: submit it
//! with [`AcquisitionWizard::into_new_property`] or drop it to cancel.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::models::{closing_costs, PaymentMethod, PropertyPurpose, TaxRegime};
use crate::money::RawAmount;
use crate::roi::{compute_roi, AcquisitionInputs, RoiBreakdown};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WizardStep {
    PropertyDetails,
    Purchase,
    Investors,
    Costs,
    SaleForecast,
    Summary,
}

impl WizardStep {
    pub const ALL: [WizardStep; 6] = [
        WizardStep::PropertyDetails,
        WizardStep::Purchase,
        WizardStep::Investors,
        WizardStep::Costs,
        WizardStep::SaleForecast,
        WizardStep::Summary,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::PropertyDetails => "Dados do Imóvel",
            WizardStep::Purchase => "Dados da Compra",
            WizardStep::Investors => "Área de Investidores",
            WizardStep::Costs => "Custos",
            WizardStep::SaleForecast => "Venda e Previsão de ROI",
            WizardStep::Summary => "Resumo Final",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|step| step == self).unwrap_or(0)
    }

    fn next(&self) -> Option<WizardStep> {
        Self::ALL.get(self.index() + 1).copied()
    }

    fn previous(&self) -> Option<WizardStep> {
        self.index().checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }
}

/// Step 1.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyDetails {
    pub name: String,
    pub postal_code: String,
    pub address: String,
    pub number: String,
    pub neighborhood: String,
    pub property_type: String,
    pub state: String,
    pub purpose: PropertyPurpose,
    pub auction_origin: String,
    pub legal_status: String,
}

impl PropertyDetails {
    fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::InvalidInput("property name is required".to_string()));
        }
        let digits = self.postal_code.chars().filter(char::is_ascii_digit).count();
        if !self.postal_code.trim().is_empty() && digits != 8 {
            return Err(CoreError::InvalidInput(format!(
                "postal code {:?} must have 8 digits",
                self.postal_code
            )));
        }
        Ok(())
    }
}

/// Step 2.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PurchaseTerms {
    pub bid_value: RawAmount,
    pub market_value: RawAmount,
    pub itbi_pct: RawAmount,
    pub registration_pct: RawAmount,
    pub payment_method: PaymentMethod,
    pub down_payment: RawAmount,
    pub installments: RawAmount,
    pub installment_value: RawAmount,
}

impl PurchaseTerms {
    fn validate(&self) -> Result<(), CoreError> {
        check_percent("ITBI", &self.itbi_pct)?;
        check_percent("registration", &self.registration_pct)
    }

    pub fn closing_costs(&self) -> Decimal {
        closing_costs(
            self.bid_value.to_non_negative(),
            self.itbi_pct.to_non_negative(),
            self.registration_pct.to_non_negative(),
        )
    }
}

/// Step 3.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvestorShare {
    /// "Sim" / "Não" on the form; `None` until answered.
    pub purchased_alone: Option<bool>,
    pub investor_name: String,
    pub invested_amount: RawAmount,
    pub registered_in: String,
}

impl InvestorShare {
    fn validate(&self) -> Result<(), CoreError> {
        if self.purchased_alone == Some(false) && self.investor_name.trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "investor name is required for a shared purchase".to_string(),
            ));
        }
        Ok(())
    }
}

/// Step 4.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CarryingCosts {
    pub monthly_condo_fee: RawAmount,
    pub annual_iptu: RawAmount,
    pub condo_debt: RawAmount,
    pub iptu_debt: RawAmount,
    pub other_debts: RawAmount,
}

impl CarryingCosts {
    pub fn inherited_debts(&self) -> Decimal {
        self.condo_debt.to_non_negative()
            + self.iptu_debt.to_non_negative()
            + self.other_debts.to_non_negative()
    }
}

/// Step 5.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaleForecast {
    pub broker_name: String,
    pub broker_commission_pct: RawAmount,
    pub expected_months_to_sell: RawAmount,
    pub expected_renovation_cost: RawAmount,
    pub tax_regime: TaxRegime,
}

impl SaleForecast {
    fn validate(&self) -> Result<(), CoreError> {
        check_percent("broker commission", &self.broker_commission_pct)
    }
}

fn check_percent(field: &str, value: &RawAmount) -> Result<(), CoreError> {
    let pct = value.to_decimal();
    if pct < Decimal::ZERO || pct > Decimal::ONE_HUNDRED {
        return Err(CoreError::InvalidInput(format!(
            "{} must be between 0 and 100 percent, got {}",
            field, pct
        )));
    }
    Ok(())
}

/// What the final step shows before submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionSummary {
    pub roi: RoiBreakdown,
    pub closing_costs: Decimal,
    pub inherited_debts: Decimal,
}

/// Payload for `POST /api/properties`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProperty {
    pub name: String,
    pub postal_code: String,
    pub address: String,
    pub number: String,
    pub property_type: String,
    pub state: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub bid_value: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub market_value: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub itbi: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub registration: Decimal,
    pub payment_method: PaymentMethod,
    #[serde(with = "rust_decimal::serde::float")]
    pub down_payment: Decimal,
    pub installments: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub installment_value: Decimal,
    pub auction_origin: String,
    pub legal_status: String,
    pub registered_in: String,
    pub purchased_alone: bool,
    pub investor_name: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub invested_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_condo_fee: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub annual_iptu: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub condo_debt: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub iptu_debt: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub other_debts: Decimal,
    pub broker_name: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub broker_commission: Decimal,
    pub expected_months_to_sell: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub expected_renovation_cost: Decimal,
    pub taxation_type: Option<TaxRegime>,
    pub acquisition_date: DateTime<Utc>,
    pub purpose: PropertyPurpose,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AcquisitionWizard {
    step: WizardStep,
    pub details: PropertyDetails,
    pub purchase: PurchaseTerms,
    pub investors: InvestorShare,
    pub costs: CarryingCosts,
    pub forecast: SaleForecast,
}

impl Default for AcquisitionWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl AcquisitionWizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::PropertyDetails,
            details: PropertyDetails::default(),
            purchase: PurchaseTerms::default(),
            investors: InvestorShare::default(),
            costs: CarryingCosts::default(),
            forecast: SaleForecast::default(),
        }
    }

    pub fn current_step(&self) -> WizardStep {
        self.step
    }

    /// Validate the current step and move to the next one.
    /// On the summary step this only re-validates.
    pub fn advance(&mut self) -> Result<WizardStep, CoreError> {
        self.validate_step(self.step)?;
        if let Some(next) = self.step.next() {
            tracing::debug!(from = ?self.step, to = ?next, "wizard advanced");
            self.step = next;
        }
        Ok(self.step)
    }

    /// Go back one step; values already entered are kept.
    pub fn back(&mut self) -> WizardStep {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        self.step
    }

    fn validate_step(&self, step: WizardStep) -> Result<(), CoreError> {
        match step {
            WizardStep::PropertyDetails => self.details.validate(),
            WizardStep::Purchase => self.purchase.validate(),
            WizardStep::Investors => self.investors.validate(),
            WizardStep::Costs => Ok(()),
            WizardStep::SaleForecast => self.forecast.validate(),
            WizardStep::Summary => Ok(()),
        }
    }

    pub fn roi_inputs(&self) -> AcquisitionInputs {
        AcquisitionInputs::from_raw(
            &self.purchase.bid_value,
            &self.purchase.market_value,
            &self.forecast.expected_renovation_cost,
            &self.forecast.broker_commission_pct,
            self.forecast.tax_regime,
        )
    }

    pub fn summary(&self) -> AcquisitionSummary {
        AcquisitionSummary {
            roi: compute_roi(&self.roi_inputs()),
            closing_costs: self.purchase.closing_costs(),
            inherited_debts: self.costs.inherited_debts(),
        }
    }

    /// Validate every step and build the registration payload.
    pub fn into_new_property(self, acquisition_date: DateTime<Utc>) -> Result<NewProperty, CoreError> {
        for step in WizardStep::ALL {
            self.validate_step(step)?;
        }

        let Self {
            details,
            purchase,
            investors,
            costs,
            forecast,
            ..
        } = self;

        Ok(NewProperty {
            name: details.name.trim().to_string(),
            postal_code: details.postal_code,
            address: details.address,
            number: details.number,
            property_type: details.property_type,
            state: details.state,
            bid_value: purchase.bid_value.to_non_negative(),
            market_value: purchase.market_value.to_non_negative(),
            itbi: purchase.itbi_pct.to_non_negative(),
            registration: purchase.registration_pct.to_non_negative(),
            payment_method: purchase.payment_method,
            down_payment: purchase.down_payment.to_non_negative(),
            installments: purchase.installments.to_count(),
            installment_value: purchase.installment_value.to_non_negative(),
            auction_origin: details.auction_origin,
            legal_status: details.legal_status,
            registered_in: investors.registered_in,
            purchased_alone: investors.purchased_alone.unwrap_or(false),
            investor_name: non_blank(investors.investor_name),
            invested_amount: investors.invested_amount.to_non_negative(),
            monthly_condo_fee: costs.monthly_condo_fee.to_non_negative(),
            annual_iptu: costs.annual_iptu.to_non_negative(),
            condo_debt: costs.condo_debt.to_non_negative(),
            iptu_debt: costs.iptu_debt.to_non_negative(),
            other_debts: costs.other_debts.to_non_negative(),
            broker_name: non_blank(forecast.broker_name),
            broker_commission: forecast.broker_commission_pct.to_non_negative(),
            expected_months_to_sell: forecast.expected_months_to_sell.to_count(),
            expected_renovation_cost: forecast.expected_renovation_cost.to_non_negative(),
            taxation_type: forecast.tax_regime.is_selected().then_some(forecast.tax_regime),
            acquisition_date,
            purpose: details.purpose,
        })
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roi::Roi;
    use rust_decimal_macros::dec;

    fn filled_wizard() -> AcquisitionWizard {
        let mut wizard = AcquisitionWizard::new();
        wizard.details.name = "Apto Leilão Caixa".to_string();
        wizard.details.postal_code = "01310-100".to_string();
        wizard.details.purpose = PropertyPurpose::Sale;
        wizard.purchase.bid_value = "100000".into();
        wizard.purchase.market_value = "150000".into();
        wizard.purchase.itbi_pct = "3".into();
        wizard.purchase.registration_pct = "1".into();
        wizard.costs.condo_debt = "1200".into();
        wizard.costs.iptu_debt = "oops".into();
        wizard.forecast.expected_renovation_cost = "10000".into();
        wizard.forecast.broker_commission_pct = "5".into();
        wizard.forecast.tax_regime = TaxRegime::Cpf;
        wizard
    }

    #[test]
    fn test_walks_through_all_steps() {
        let mut wizard = filled_wizard();
        for expected in &WizardStep::ALL[1..] {
            assert_eq!(wizard.advance().unwrap(), *expected);
        }
        assert_eq!(wizard.advance().unwrap(), WizardStep::Summary);
        assert_eq!(wizard.back(), WizardStep::SaleForecast);
    }

    #[test]
    fn test_name_required_to_leave_first_step() {
        let mut wizard = AcquisitionWizard::new();
        assert!(matches!(wizard.advance(), Err(CoreError::InvalidInput(_))));
        assert_eq!(wizard.current_step(), WizardStep::PropertyDetails);
        assert_eq!(wizard.back(), WizardStep::PropertyDetails);
    }

    #[test]
    fn test_percent_out_of_range_rejected() {
        let mut wizard = filled_wizard();
        wizard.purchase.itbi_pct = "250".into();
        wizard.advance().unwrap();
        assert!(wizard.advance().is_err());
        assert_eq!(wizard.current_step(), WizardStep::Purchase);
    }

    #[test]
    fn test_summary_uses_roi_calculator() {
        let summary = filled_wizard().summary();
        assert_eq!(summary.roi.roi, Roi::Percent(dec!(29.55)));
        assert_eq!(summary.closing_costs, dec!(4000));
        assert_eq!(summary.inherited_debts, dec!(1200));
    }

    #[test]
    fn test_unselected_regime_in_summary() {
        let mut wizard = filled_wizard();
        wizard.forecast.tax_regime = TaxRegime::Unselected;
        let summary = wizard.summary();
        assert_eq!(summary.roi.profit, Decimal::ZERO);
        assert_eq!(summary.roi.tax, Decimal::ZERO);
    }

    #[test]
    fn test_payload() {
        let when = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let payload = filled_wizard().into_new_property(when).unwrap();
        assert_eq!(payload.bid_value, dec!(100000));
        assert_eq!(payload.iptu_debt, Decimal::ZERO);
        assert_eq!(payload.investor_name, None);
        assert_eq!(payload.taxation_type, Some(TaxRegime::Cpf));

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["taxation_type"], "CPF");
        assert_eq!(json["purpose"], "sale");
        assert_eq!(json["itbi"], 3.0);
        assert_eq!(json["bid_value"], 100000.0);
        assert!(json["iptu_debt"].is_number());
    }

    #[test]
    fn test_shared_purchase_needs_investor() {
        let mut wizard = filled_wizard();
        wizard.investors.purchased_alone = Some(false);
        assert!(wizard.clone().into_new_property(Utc::now()).is_err());
        wizard.investors.investor_name = "Maria".to_string();
        let payload = wizard.into_new_property(Utc::now()).unwrap();
        assert_eq!(payload.investor_name.as_deref(), Some("Maria"));
    }
}
