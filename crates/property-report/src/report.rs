//! Portfolio report: valuation roll-up, transaction totals and ROI projection
//! for every property (or a single one).

use std::fmt::Write;

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use property_client::PropertyApi;
use property_core::{
    compute_roi, format_roi, roll_up_all, summarize, with_constructions, Category, Construction,
    CurrencyFormat, Id, PortfolioTotals, Property, PropertyValuation, RoiBreakdown, Task,
    TaskStatus, Transaction, TransactionFilter, TransactionSummary, TransactionType,
};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct PropertyReport {
    #[serde(flatten)]
    pub valuation: PropertyValuation,
    pub location: String,
    pub closing_costs: Decimal,
    pub inherited_debts: Decimal,
    pub roi: RoiBreakdown,
    pub constructions_over_budget: usize,
    pub open_tasks: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryTotal {
    pub category_id: Id,
    pub name: String,
    pub total_expense: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct PortfolioReport {
    pub generated_at: DateTime<Utc>,
    pub properties: Vec<PropertyReport>,
    pub totals: PortfolioTotals,
    pub transactions: TransactionSummary,
    pub categories: Vec<CategoryTotal>,
}

impl PortfolioReport {
    /// Fetch every collection and assemble the report. With `only`, the
    /// roll-up and the transaction totals are limited to that property.
    pub async fn build(api: &dyn PropertyApi, only: Option<&Id>) -> Result<Self> {
        let (properties, transactions, categories, constructions, tasks) = tokio::try_join!(
            api.properties(),
            api.transactions(),
            api.categories(),
            api.constructions(),
            api.tasks(),
        )?;

        tracing::info!(
            properties = properties.len(),
            transactions = transactions.len(),
            "Fetched portfolio data"
        );

        Self::assemble(properties, transactions, &categories, &constructions, &tasks, only)
    }

    pub fn assemble(
        mut properties: Vec<Property>,
        mut transactions: Vec<Transaction>,
        categories: &[Category],
        constructions: &[Construction],
        tasks: &[Task],
        only: Option<&Id>,
    ) -> Result<Self> {
        if let Some(id) = only {
            properties.retain(|property| &property.id == id);
            if properties.is_empty() {
                bail!("property {} not found", id);
            }
            transactions.retain(|txn| txn.property_id.as_ref() == Some(id));
        }

        let valuations = with_constructions(roll_up_all(&properties, &transactions), constructions);
        let totals = PortfolioTotals::from_valuations(&valuations);

        let reports = properties
            .iter()
            .zip(valuations)
            .map(|(property, valuation)| PropertyReport {
                location: property.location(),
                closing_costs: property.closing_costs(),
                inherited_debts: property.inherited_debts(),
                roi: compute_roi(&property.roi_inputs()),
                constructions_over_budget: constructions
                    .iter()
                    .filter(|job| job.property_id.as_ref() == Some(&property.id))
                    .filter(|job| job.is_over_budget())
                    .count(),
                open_tasks: tasks
                    .iter()
                    .filter(|task| task.property_id.as_ref() == Some(&property.id))
                    .filter(|task| task.status != TaskStatus::Concluded)
                    .count(),
                valuation,
            })
            .collect();

        let expenses = TransactionFilter::new().kind(TransactionType::Expense);
        let categories = categories
            .iter()
            .map(|category| CategoryTotal {
                category_id: category.id.clone(),
                name: category.name.clone(),
                total_expense: expenses.clone().category(category.id.clone()).sum(&transactions),
            })
            .filter(|total| !total.total_expense.is_zero())
            .collect();

        Ok(Self {
            generated_at: Utc::now(),
            properties: reports,
            totals,
            transactions: summarize(&transactions),
            categories,
        })
    }

    pub fn render_text(&self, format: &CurrencyFormat) -> String {
        let money = |amount: Decimal| format.currency(amount);
        let mut out = String::new();

        let _ = writeln!(out, "PORTFOLIO REPORT ({})", self.generated_at.format("%d/%m/%Y %H:%M"));
        let _ = writeln!(out);

        for report in &self.properties {
            let v = &report.valuation;
            let _ = writeln!(out, "{} [{}]", v.name, v.property_id);
            if !report.location.is_empty() {
                let _ = writeln!(out, "  {}", report.location);
            }
            let _ = writeln!(out, "  Valuation:         {}", money(v.valuation));
            let _ = writeln!(out, "  Expenses:          {}", money(v.total_expenses));
            if !v.renovation_spent.is_zero() {
                let _ = writeln!(out, "  Renovation spent:  {}", money(v.renovation_spent));
            }
            let _ = writeln!(out, "  Closing costs:     {}", money(report.closing_costs));
            if !report.inherited_debts.is_zero() {
                let _ = writeln!(out, "  Inherited debts:   {}", money(report.inherited_debts));
            }
            let _ = writeln!(
                out,
                "  ROI ({}):  {}  net profit {}",
                report.roi.tax_regime.label(),
                format_roi(&report.roi.roi, format),
                money(report.roi.net_profit)
            );
            if report.constructions_over_budget > 0 {
                let _ = writeln!(
                    out,
                    "  ! {} construction(s) over budget",
                    report.constructions_over_budget
                );
            }
            if report.open_tasks > 0 {
                let _ = writeln!(out, "  Open tasks: {}", report.open_tasks);
            }
            let _ = writeln!(out);
        }

        let t = &self.transactions;
        let _ = writeln!(out, "TRANSACTIONS ({})", t.transaction_count);
        let _ = writeln!(out, "  Income:            {}", money(t.total_income));
        let _ = writeln!(out, "  Expense:           {}", money(t.total_expense));
        let _ = writeln!(out, "  Balance:           {}", money(t.balance));
        let _ = writeln!(out, "  To pay:            {}", money(t.pending_expense));
        let _ = writeln!(out, "  Installments:      {}", money(t.total_installments));
        let _ = writeln!(out, "  Still owed:        {}", money(t.remaining_installment_balance));

        if !self.categories.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "EXPENSES BY CATEGORY");
            for category in &self.categories {
                let _ = writeln!(out, "  {:<18} {}", category.name, money(category.total_expense));
            }
        }

        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "TOTAL ({} properties): valuation {}, expenses {}",
            self.totals.property_count,
            money(self.totals.total_valuation),
            money(self.totals.total_expenses)
        );

        out
    }
}
