//! Property Valuation Roll-up
//!
//! Pairs each property's market valuation with the expenses linked to it.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::aggregate::sum_where;
use crate::models::{Construction, Id, Property, Transaction, TransactionType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyValuation {
    pub property_id: Id,
    pub name: String,
    pub valuation: Decimal,
    pub total_expenses: Decimal,
    /// Spent on renovation jobs; zero unless constructions were attached.
    #[serde(default)]
    pub renovation_spent: Decimal,
}

impl PropertyValuation {
    /// Valuation net of linked expenses and renovation spend.
    pub fn net_position(&self) -> Decimal {
        self.valuation - self.total_expenses - self.renovation_spent
    }
}

/// Valuation and expense total for one property.
pub fn roll_up(property: &Property, transactions: &[Transaction]) -> PropertyValuation {
    let total_expenses = sum_where(transactions, |txn| {
        txn.kind == TransactionType::Expense && txn.property_id.as_ref() == Some(&property.id)
    });

    PropertyValuation {
        property_id: property.id.clone(),
        name: property.name.clone(),
        valuation: property.valuation(),
        total_expenses,
        renovation_spent: Decimal::ZERO,
    }
}

/// One roll-up per property, in input order. Transactions pointing at
/// properties outside the list are ignored.
pub fn roll_up_all(properties: &[Property], transactions: &[Transaction]) -> Vec<PropertyValuation> {
    let mut expenses_by_property: HashMap<&Id, Decimal> = HashMap::new();
    for txn in transactions {
        if txn.kind != TransactionType::Expense {
            continue;
        }
        if let Some(property_id) = txn.property_id.as_ref() {
            *expenses_by_property.entry(property_id).or_default() += txn.amount();
        }
    }

    properties
        .iter()
        .map(|property| PropertyValuation {
            property_id: property.id.clone(),
            name: property.name.clone(),
            valuation: property.valuation(),
            total_expenses: expenses_by_property
                .get(&property.id)
                .copied()
                .unwrap_or_default(),
            renovation_spent: Decimal::ZERO,
        })
        .collect()
}

/// Attach renovation spend from construction jobs to each roll-up.
pub fn with_constructions(
    mut valuations: Vec<PropertyValuation>,
    constructions: &[Construction],
) -> Vec<PropertyValuation> {
    let mut spent_by_property: HashMap<&Id, Decimal> = HashMap::new();
    for job in constructions {
        if let Some(property_id) = job.property_id.as_ref() {
            *spent_by_property.entry(property_id).or_default() += job.spent();
        }
    }

    for valuation in &mut valuations {
        valuation.renovation_spent = spent_by_property
            .get(&valuation.property_id)
            .copied()
            .unwrap_or_default();
    }
    valuations
}

/// Portfolio-wide totals over a roll-up.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioTotals {
    pub property_count: usize,
    pub total_valuation: Decimal,
    pub total_expenses: Decimal,
    pub total_renovation_spent: Decimal,
}

impl PortfolioTotals {
    pub fn from_valuations(valuations: &[PropertyValuation]) -> Self {
        valuations.iter().fold(
            Self::default(),
            |mut totals, valuation| {
                totals.property_count += 1;
                totals.total_valuation += valuation.valuation;
                totals.total_expenses += valuation.total_expenses;
                totals.total_renovation_spent += valuation.renovation_spent;
                totals
            },
        )
    }
}
