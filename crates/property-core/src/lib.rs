//! Property Core
//!
//! Financial aggregation and ROI computation for property investments:
//! transaction totals, per-property valuation roll-ups, acquisition ROI under
//! the CPF and CNPJ tax regimes, and pt-BR currency formatting.
//!
//! Everything here is pure and synchronous. Collections arrive already
//! fetched; untrusted monetary input is parsed and defaulted at the boundary.

pub mod aggregate;
pub mod error;
pub mod format;
pub mod models;
pub mod money;
pub mod roi;
pub mod valuation;
pub mod wizard;

pub use aggregate::{
    balance, remaining_installment_balance, sum_by_category, sum_by_payment_method,
    sum_by_property, sum_by_status, sum_by_type, sum_installments, sum_where, summarize,
    TransactionFilter, TransactionSummary,
};
pub use error::CoreError;
pub use format::{format_currency, format_percent, format_roi, CurrencyFormat};
pub use models::*;
pub use money::{clamp_amount, parse_amount, RawAmount, MAX_AMOUNT};
pub use roi::{
    compute_roi, AcquisitionInputs, Roi, RoiBreakdown, CNPJ_REVENUE_TAX_RATE,
    CPF_PROFIT_TAX_RATE,
};
pub use valuation::{roll_up, roll_up_all, with_constructions, PortfolioTotals, PropertyValuation};
pub use wizard::{
    AcquisitionSummary, AcquisitionWizard, CarryingCosts, InvestorShare, NewProperty,
    PropertyDetails, PurchaseTerms, SaleForecast, WizardStep,
};
