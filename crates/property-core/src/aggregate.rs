//! Transaction Aggregator
//!
//! Sums transaction amounts under a predicate. Amounts go through the
//! parse-and-default step, so malformed entries contribute zero instead of
//! failing the whole total. Sums are order-independent.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Id, PaymentMethod, Transaction, TransactionStatus, TransactionType};

/// Conjunction of optional criteria. An empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub kind: Option<TransactionType>,
    pub property_id: Option<Id>,
    pub category_id: Option<Id>,
    pub payment_method: Option<PaymentMethod>,
    pub status: Option<TransactionStatus>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: TransactionType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn property(mut self, property_id: Id) -> Self {
        self.property_id = Some(property_id);
        self
    }

    pub fn category(mut self, category_id: Id) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = Some(method);
        self
    }

    pub fn status(mut self, status: TransactionStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn matches(&self, txn: &Transaction) -> bool {
        self.kind.map_or(true, |kind| txn.kind == kind)
            && self
                .property_id
                .as_ref()
                .map_or(true, |id| txn.property_id.as_ref() == Some(id))
            && self
                .category_id
                .as_ref()
                .map_or(true, |id| txn.category_id.as_ref() == Some(id))
            && self
                .payment_method
                .map_or(true, |method| txn.payment_method == method)
            && self.status.map_or(true, |status| txn.status == status)
    }

    pub fn sum(&self, transactions: &[Transaction]) -> Decimal {
        sum_where(transactions, |txn| self.matches(txn))
    }
}

/// Sum of display amounts over entries matching `predicate`.
pub fn sum_where<F>(transactions: &[Transaction], predicate: F) -> Decimal
where
    F: Fn(&Transaction) -> bool,
{
    transactions
        .iter()
        .filter(|txn| predicate(txn))
        .map(Transaction::amount)
        .sum()
}

pub fn sum_by_type(transactions: &[Transaction], kind: TransactionType) -> Decimal {
    sum_where(transactions, |txn| txn.kind == kind)
}

/// All amounts linked to the property, whatever their type.
pub fn sum_by_property(transactions: &[Transaction], property_id: &Id) -> Decimal {
    sum_where(transactions, |txn| txn.property_id.as_ref() == Some(property_id))
}

pub fn sum_by_category(transactions: &[Transaction], category_id: &Id) -> Decimal {
    sum_where(transactions, |txn| txn.category_id.as_ref() == Some(category_id))
}

pub fn sum_by_payment_method(transactions: &[Transaction], method: PaymentMethod) -> Decimal {
    sum_where(transactions, |txn| txn.payment_method == method)
}

pub fn sum_by_status(transactions: &[Transaction], status: TransactionStatus) -> Decimal {
    sum_where(transactions, |txn| txn.status == status)
}

/// Sum of `installment_value` over entries paid in installments.
/// Financed entries are not included.
pub fn sum_installments(transactions: &[Transaction]) -> Decimal {
    transactions
        .iter()
        .filter(|txn| txn.payment_method == PaymentMethod::Installment)
        .map(Transaction::installment_value)
        .sum()
}

/// Income minus expense. May be negative; unknown types count on neither side.
pub fn balance(transactions: &[Transaction]) -> Decimal {
    sum_by_type(transactions, TransactionType::Income)
        - sum_by_type(transactions, TransactionType::Expense)
}

/// Value still owed on installment plans: remaining installments times their value.
pub fn remaining_installment_balance(transactions: &[Transaction]) -> Decimal {
    transactions
        .iter()
        .filter(|txn| txn.payment_method == PaymentMethod::Installment)
        .map(|txn| Decimal::from(txn.remaining_installments()) * txn.installment_value())
        .sum()
}

/// Totals shown on the finance dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionSummary {
    pub transaction_count: usize,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
    pub total_installments: Decimal,
    /// Expenses not yet paid.
    pub pending_expense: Decimal,
    pub paid_expense: Decimal,
    pub remaining_installment_balance: Decimal,
}

pub fn summarize(transactions: &[Transaction]) -> TransactionSummary {
    let total_income = sum_by_type(transactions, TransactionType::Income);
    let total_expense = sum_by_type(transactions, TransactionType::Expense);
    let expenses = TransactionFilter::new().kind(TransactionType::Expense);

    TransactionSummary {
        transaction_count: transactions.len(),
        total_income,
        total_expense,
        balance: total_income - total_expense,
        total_installments: sum_installments(transactions),
        pending_expense: expenses.clone().status(TransactionStatus::Pending).sum(transactions),
        paid_expense: expenses.status(TransactionStatus::Paid).sum(transactions),
        remaining_installment_balance: remaining_installment_balance(transactions),
    }
}
