use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::money::RawAmount;
use crate::roi::AcquisitionInputs;

/// Entity identifier. The backend may send integers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Num(i64),
    Text(String),
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Num(n) => write!(f, "{}", n),
            Id::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Id {
    fn from(value: i64) -> Self {
        Id::Num(value)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        value.parse::<i64>().map(Id::Num).unwrap_or_else(|_| Id::Text(value.to_string()))
    }
}

/// Field decoder that never fails the enclosing record: `null` and values of
/// the wrong shape become `T::default()`.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => T::default(),
        Some(value) => serde_json::from_value(value).unwrap_or_else(|err| {
            tracing::debug!(%err, "unreadable field replaced by its default");
            T::default()
        }),
    })
}

/// Optional text that may arrive as a string, a number or `null`.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    #[serde(alias = "Expense", alias = "despesa", alias = "Despesa")]
    Expense,
    #[serde(alias = "Income", alias = "receita", alias = "Receita")]
    Income,
    /// Unrecognized type; contributes to neither side of the balance.
    #[default]
    #[serde(other)]
    Unknown,
}

impl FromStr for TransactionType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "expense" | "despesa" => Ok(Self::Expense),
            "income" | "receita" => Ok(Self::Income),
            _ => Err(CoreError::UnknownEnum {
                kind: "transaction type",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    #[serde(alias = "Pending", alias = "Pendente", alias = "pendente")]
    Pending,
    #[serde(alias = "Paid", alias = "Pago", alias = "pago")]
    Paid,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[serde(alias = "Cash", alias = "A Vista", alias = "à vista", alias = "a vista")]
    Cash,
    #[serde(alias = "Financed", alias = "Financiado", alias = "financiado")]
    Financed,
    #[serde(alias = "Installment", alias = "Parcelado", alias = "parcelado")]
    Installment,
    #[default]
    #[serde(other)]
    Unknown,
}

impl FromStr for PaymentMethod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" | "a vista" | "à vista" => Ok(Self::Cash),
            "financed" | "financiado" => Ok(Self::Financed),
            "installment" | "parcelado" => Ok(Self::Installment),
            _ => Err(CoreError::UnknownEnum {
                kind: "payment method",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyPurpose {
    #[serde(alias = "Venda")]
    Sale,
    #[serde(alias = "Aluguel")]
    Rental,
    #[serde(alias = "Moradia")]
    Residence,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Taxation basis for the eventual sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaxRegime {
    /// Individual: 15% on profit.
    #[serde(rename = "CPF", alias = "cpf")]
    Cpf,
    /// Company: 6% on the sale value.
    #[serde(rename = "CNPJ", alias = "cnpj")]
    Cnpj,
    /// Not chosen yet (or unrecognized). No tax, no profit.
    #[default]
    #[serde(rename = "unselected")]
    #[serde(other)]
    Unselected,
}

impl TaxRegime {
    pub fn label(&self) -> &'static str {
        match self {
            TaxRegime::Cpf => "CPF (15% lucro)",
            TaxRegime::Cnpj => "CNPJ (6% venda)",
            TaxRegime::Unselected => "N/A",
        }
    }

    pub fn is_selected(&self) -> bool {
        !matches!(self, TaxRegime::Unselected)
    }
}

impl FromStr for TaxRegime {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CPF" => Ok(Self::Cpf),
            "CNPJ" => Ok(Self::Cnpj),
            _ => Err(CoreError::UnknownEnum {
                kind: "tax regime",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "in progress")]
    InProgress,
    #[serde(rename = "concluded")]
    Concluded,
    #[serde(rename = "unknown")]
    #[serde(other)]
    Unknown,
}

impl TaskStatus {
    /// Label shown on the task board.
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Não iniciada",
            TaskStatus::InProgress => "Em andamento",
            TaskStatus::Concluded => "Concluída",
            TaskStatus::Unknown => "N/A",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    #[default]
    #[serde(alias = "Baixa")]
    Low,
    #[serde(alias = "Média", alias = "Media")]
    Medium,
    #[serde(alias = "Alta")]
    High,
    #[serde(other)]
    Unknown,
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A registered property.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub id: Id,
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub postal_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub number: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub property_type: Option<String>,
    /// Market valuation.
    #[serde(default, rename = "market_value", alias = "valuation")]
    pub valuation: RawAmount,
    #[serde(default)]
    pub bid_value: RawAmount,
    /// ITBI transfer tax, percent of the bid.
    #[serde(default, rename = "itbi")]
    pub itbi_pct: RawAmount,
    /// Deed registration fee, percent of the bid.
    #[serde(default, rename = "registration")]
    pub registration_pct: RawAmount,
    #[serde(default, deserialize_with = "lenient")]
    pub payment_method: PaymentMethod,
    #[serde(default, deserialize_with = "lenient")]
    pub purpose: PropertyPurpose,
    #[serde(default)]
    pub down_payment: RawAmount,
    #[serde(default)]
    pub installments: RawAmount,
    #[serde(default)]
    pub installment_value: RawAmount,
    /// Broker commission, percent of the market value.
    #[serde(default)]
    pub broker_commission: RawAmount,
    #[serde(default)]
    pub expected_renovation_cost: RawAmount,
    #[serde(default)]
    pub expected_months_to_sell: RawAmount,
    #[serde(default, deserialize_with = "lenient")]
    pub taxation_type: TaxRegime,
    #[serde(default)]
    pub monthly_condo_fee: RawAmount,
    #[serde(default)]
    pub annual_iptu: RawAmount,
    #[serde(default)]
    pub condo_debt: RawAmount,
    #[serde(default)]
    pub iptu_debt: RawAmount,
    #[serde(default)]
    pub other_debts: RawAmount,
}

impl Property {
    pub fn valuation(&self) -> Decimal {
        self.valuation.to_non_negative()
    }

    pub fn bid_value(&self) -> Decimal {
        self.bid_value.to_non_negative()
    }

    /// "address, number - state", skipping blank parts.
    pub fn location(&self) -> String {
        let street = [self.address.as_deref(), self.number.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        match self.state.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(state) if !street.is_empty() => format!("{} - {}", street, state),
            Some(state) => state.to_string(),
            None => street,
        }
    }

    /// ITBI plus registration, charged on the bid value.
    pub fn closing_costs(&self) -> Decimal {
        closing_costs(
            self.bid_value(),
            self.itbi_pct.to_decimal(),
            self.registration_pct.to_decimal(),
        )
    }

    /// Condominium, IPTU and other debts inherited with the property.
    pub fn inherited_debts(&self) -> Decimal {
        self.condo_debt.to_non_negative()
            + self.iptu_debt.to_non_negative()
            + self.other_debts.to_non_negative()
    }

    /// Calculator inputs from the stored acquisition fields.
    pub fn roi_inputs(&self) -> AcquisitionInputs {
        AcquisitionInputs {
            bid_value: self.bid_value(),
            market_value: self.valuation(),
            renovation_cost: self.expected_renovation_cost.to_non_negative(),
            broker_commission_pct: self.broker_commission.to_non_negative(),
            tax_regime: self.taxation_type,
        }
    }
}

pub(crate) fn closing_costs(bid_value: Decimal, itbi_pct: Decimal, registration_pct: Decimal) -> Decimal {
    bid_value * (itbi_pct + registration_pct) / Decimal::ONE_HUNDRED
}

/// An expense or income entry, optionally linked to a property.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Id,
    #[serde(default)]
    pub property_id: Option<Id>,
    #[serde(default, deserialize_with = "lenient", rename = "type")]
    pub kind: TransactionType,
    #[serde(default)]
    pub category_id: Option<Id>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub date: Option<String>,
    #[serde(default)]
    pub amount: RawAmount,
    #[serde(default, deserialize_with = "lenient")]
    pub status: TransactionStatus,
    #[serde(default, deserialize_with = "lenient")]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub total_installments: RawAmount,
    #[serde(default)]
    pub current_installment: RawAmount,
    #[serde(default)]
    pub installment_value: RawAmount,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
}

impl Transaction {
    /// Display amount: non-negative, zero when missing or malformed.
    pub fn amount(&self) -> Decimal {
        self.amount.to_non_negative()
    }

    pub fn installment_value(&self) -> Decimal {
        self.installment_value.to_non_negative()
    }

    /// Installments still to be paid after the current one.
    pub fn remaining_installments(&self) -> u32 {
        self.total_installments
            .to_count()
            .saturating_sub(self.current_installment.to_count())
    }

    /// Calendar date; accepts `YYYY-MM-DD` and ISO timestamps.
    pub fn date(&self) -> Option<NaiveDate> {
        let raw = self.date.as_deref()?.trim();
        let day = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }
}

/// Validated transaction ready to be sent for creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_id: Option<Id>,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Id>,
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub status: TransactionStatus,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_installments: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_installment: Option<u32>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub installment_value: Option<Decimal>,
    pub description: String,
}

impl TransactionDraft {
    pub fn new(kind: TransactionType, date: NaiveDate, amount: &RawAmount) -> Self {
        Self {
            property_id: None,
            kind,
            category_id: None,
            date,
            amount: amount.to_non_negative(),
            status: TransactionStatus::Pending,
            payment_method: PaymentMethod::Cash,
            total_installments: None,
            current_installment: None,
            installment_value: None,
            description: String::new(),
        }
    }

    /// Link the category; its default text fills an empty description.
    pub fn apply_category(&mut self, category: &Category) {
        self.category_id = Some(category.id.clone());
        if self.description.trim().is_empty() {
            if let Some(text) = category.default_description.as_deref() {
                self.description = text.to_string();
            }
        }
    }

    /// Switch to installment payment. Installment fields are only sent for this method.
    pub fn with_installments(mut self, total: u32, current: u32, value: &RawAmount) -> Self {
        self.payment_method = PaymentMethod::Installment;
        self.total_installments = Some(total);
        self.current_installment = Some(current.min(total));
        self.installment_value = Some(value.to_non_negative());
        self
    }
}

/// Expense category with the description text used to pre-fill new transactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Id,
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text", alias = "description")]
    pub default_description: Option<String>,
}

/// Renovation or construction job on a property.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Construction {
    pub id: Id,
    #[serde(default)]
    pub property_id: Option<Id>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
    #[serde(default)]
    pub budget: RawAmount,
    #[serde(default)]
    pub spent: RawAmount,
    #[serde(default)]
    pub delivery_days: RawAmount,
    #[serde(default, deserialize_with = "lenient_text")]
    pub responsible_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub responsible_phone: Option<String>,
}

impl Construction {
    pub fn budget(&self) -> Decimal {
        self.budget.to_non_negative()
    }

    pub fn spent(&self) -> Decimal {
        self.spent.to_non_negative()
    }

    /// Budget left; negative once the job overruns.
    pub fn remaining_budget(&self) -> Decimal {
        self.budget() - self.spent()
    }

    pub fn is_over_budget(&self) -> bool {
        self.spent() > self.budget()
    }

    /// Share of the budget already spent, in percent. `None` without a budget.
    pub fn budget_used_pct(&self) -> Option<Decimal> {
        let budget = self.budget();
        if budget.is_zero() {
            return None;
        }
        Some((self.spent() / budget * Decimal::ONE_HUNDRED).round_dp(2))
    }
}

/// Construction job form, validated before it is sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConstructionDraft {
    pub property_id: Option<Id>,
    pub name: String,
    pub budget: RawAmount,
    pub spent: RawAmount,
    pub delivery_days: RawAmount,
    pub responsible_name: String,
    pub responsible_phone: String,
}

impl ConstructionDraft {
    /// Name, property, budget and delivery days are required.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::InvalidInput("construction name is required".to_string()));
        }
        if self.property_id.is_none() {
            return Err(CoreError::InvalidInput("construction property is required".to_string()));
        }
        if self.budget.to_non_negative().is_zero() {
            return Err(CoreError::InvalidInput("construction budget is required".to_string()));
        }
        if self.delivery_days.to_count() == 0 {
            return Err(CoreError::InvalidInput("delivery days are required".to_string()));
        }
        Ok(())
    }

    /// Validate and convert to the body sent to the API, with amounts as numbers.
    pub fn payload(&self) -> Result<ConstructionPayload, CoreError> {
        self.validate()?;
        let optional = |text: &str| Some(text.trim().to_string()).filter(|t| !t.is_empty());
        Ok(ConstructionPayload {
            property_id: self.property_id.clone(),
            name: self.name.trim().to_string(),
            budget: self.budget.to_non_negative(),
            spent: self.spent.to_non_negative(),
            delivery_days: self.delivery_days.to_count(),
            responsible_name: optional(&self.responsible_name),
            responsible_phone: optional(&self.responsible_phone),
        })
    }
}

/// Body of `POST`/`PUT /api/constructions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstructionPayload {
    pub property_id: Option<Id>,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub budget: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub spent: Decimal,
    pub delivery_days: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsible_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsible_phone: Option<String>,
}

/// Work item on a property.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Id,
    #[serde(default)]
    pub property_id: Option<Id>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub status: TaskStatus,
    #[serde(default, deserialize_with = "lenient")]
    pub priority: TaskPriority,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskDraft {
    pub property_id: Option<Id>,
    pub name: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
}

impl TaskDraft {
    /// Name, property and a known priority are required.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::InvalidInput("task name is required".to_string()));
        }
        if self.property_id.is_none() {
            return Err(CoreError::InvalidInput("task property is required".to_string()));
        }
        if self.priority == TaskPriority::Unknown {
            return Err(CoreError::UnknownEnum {
                kind: "task priority",
                value: "unknown".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_transaction_from_loose_payload() {
        let txn: Transaction = serde_json::from_str(
            r#"{
                "id": 7,
                "property_id": "3",
                "type": "expense",
                "amount": "1.250,00",
                "status": "Pago",
                "payment_method": "Parcelado",
                "total_installments": 10,
                "current_installment": "4",
                "installment_value": 125.5,
                "date": "2024-03-15T10:00:00.000Z"
            }"#,
        )
        .unwrap();

        assert_eq!(txn.id, Id::Num(7));
        assert_eq!(txn.property_id, Some(Id::Text("3".to_string())));
        assert_eq!(txn.kind, TransactionType::Expense);
        // pt-BR formatted text is not a number
        assert_eq!(txn.amount(), Decimal::ZERO);
        assert_eq!(txn.status, TransactionStatus::Paid);
        assert_eq!(txn.payment_method, PaymentMethod::Installment);
        assert_eq!(txn.remaining_installments(), 6);
        assert_eq!(txn.installment_value(), dec!(125.5));
        assert_eq!(txn.date(), NaiveDate::from_ymd_opt(2024, 3, 15));
    }

    #[test]
    fn test_unknown_enums_do_not_fail_payload() {
        let txn: Transaction = serde_json::from_str(
            r#"{"id": 1, "type": "transfer", "payment_method": "pix", "status": "late"}"#,
        )
        .unwrap();
        assert_eq!(txn.kind, TransactionType::Unknown);
        assert_eq!(txn.payment_method, PaymentMethod::Unknown);
        assert_eq!(txn.status, TransactionStatus::Unknown);
        assert_eq!(txn.amount(), Decimal::ZERO);
    }

    #[test]
    fn test_null_fields_do_not_fail_the_list() {
        let txns: Vec<Transaction> = serde_json::from_str(
            r#"[
                {"id": 1, "type": "expense", "amount": 10, "payment_method": null, "status": null},
                {"id": 2, "type": null, "amount": "20", "description": null, "date": null},
                {"id": 3, "type": "income", "amount": 30, "status": 2}
            ]"#,
        )
        .unwrap();
        assert_eq!(txns.len(), 3);
        assert_eq!(txns[0].payment_method, PaymentMethod::Unknown);
        assert_eq!(txns[0].status, TransactionStatus::Unknown);
        assert_eq!(txns[1].kind, TransactionType::Unknown);
        assert_eq!(txns[2].status, TransactionStatus::Unknown);
        assert_eq!(txns[2].amount(), dec!(30));

        let properties: Vec<Property> = serde_json::from_str(
            r#"[
                {"id": 1, "name": null, "number": 120, "taxation_type": null, "purpose": null},
                {"id": 2, "name": "Apto", "state": null, "payment_method": null}
            ]"#,
        )
        .unwrap();
        assert_eq!(properties[0].name, "");
        assert_eq!(properties[0].number.as_deref(), Some("120"));
        assert_eq!(properties[0].taxation_type, TaxRegime::Unselected);
        assert_eq!(properties[1].state, None);

        let tasks: Vec<Task> =
            serde_json::from_str(r#"[{"id": 1, "name": null, "status": null, "priority": null}]"#).unwrap();
        assert_eq!(tasks[0].status, TaskStatus::Pending);
    }

    #[test]
    fn test_tax_regime_parsing() {
        assert_eq!("cpf".parse::<TaxRegime>().unwrap(), TaxRegime::Cpf);
        assert_eq!(" CNPJ ".parse::<TaxRegime>().unwrap(), TaxRegime::Cnpj);
        assert!(matches!(
            "MEI".parse::<TaxRegime>(),
            Err(CoreError::UnknownEnum { kind: "tax regime", .. })
        ));

        let regime: TaxRegime = serde_json::from_str(r#""""#).unwrap();
        assert_eq!(regime, TaxRegime::Unselected);
    }

    #[test]
    fn test_property_payload_and_derived_values() {
        let property: Property = serde_json::from_str(
            r#"{
                "id": 1,
                "name": "Apto Centro",
                "address": "Rua A",
                "number": "10",
                "state": "SP",
                "market_value": "150000",
                "bid_value": 100000,
                "itbi": 3,
                "registration": "1.5",
                "purpose": "Venda",
                "condo_debt": 2000,
                "iptu_debt": "500",
                "other_debts": null,
                "broker_commission": 5,
                "expected_renovation_cost": 10000,
                "taxation_type": "CPF"
            }"#,
        )
        .unwrap();

        assert_eq!(property.valuation(), dec!(150000));
        assert_eq!(property.purpose, PropertyPurpose::Sale);
        assert_eq!(property.location(), "Rua A, 10 - SP");
        assert_eq!(property.closing_costs(), dec!(4500));
        assert_eq!(property.inherited_debts(), dec!(2500));

        let inputs = property.roi_inputs();
        assert_eq!(inputs.renovation_cost, dec!(10000));
        assert_eq!(inputs.tax_regime, TaxRegime::Cpf);
    }

    #[test]
    fn test_category_fills_empty_description() {
        let category = Category {
            id: Id::Num(2),
            name: "Condomínio".to_string(),
            default_description: Some("Taxa condominial mensal".to_string()),
        };
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let mut draft = TransactionDraft::new(TransactionType::Expense, date, &"450".into());
        draft.apply_category(&category);
        assert_eq!(draft.description, "Taxa condominial mensal");
        assert_eq!(draft.category_id, Some(Id::Num(2)));

        let mut typed = TransactionDraft::new(TransactionType::Expense, date, &"450".into());
        typed.description = "Cota extra".to_string();
        typed.apply_category(&category);
        assert_eq!(typed.description, "Cota extra");
    }

    #[test]
    fn test_draft_installments_only_sent_for_installment_method() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let cash = TransactionDraft::new(TransactionType::Expense, date, &"100".into());
        let json = serde_json::to_value(&cash).unwrap();
        assert!(json.get("total_installments").is_none());

        let split = cash.with_installments(12, 15, &"50".into());
        assert_eq!(split.payment_method, PaymentMethod::Installment);
        assert_eq!(split.current_installment, Some(12));
    }

    #[test]
    fn test_draft_amounts_sent_as_numbers() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let draft = TransactionDraft::new(TransactionType::Expense, date, &"1234.5".into())
            .with_installments(10, 1, &"123.45".into());
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["amount"], 1234.5);
        assert_eq!(json["installment_value"], 123.45);
        assert_eq!(json["date"], "2024-01-01");
    }

    #[test]
    fn test_construction_budget() {
        let job: Construction = serde_json::from_str(
            r#"{"id": 1, "property_id": 1, "name": "Cozinha", "budget": "20000", "spent": 25000, "delivery_days": 30}"#,
        )
        .unwrap();
        assert_eq!(job.remaining_budget(), dec!(-5000));
        assert!(job.is_over_budget());
        assert_eq!(job.budget_used_pct(), Some(dec!(125)));

        let unbudgeted: Construction =
            serde_json::from_str(r#"{"id": 2, "name": "Pintura"}"#).unwrap();
        assert_eq!(unbudgeted.budget_used_pct(), None);
    }

    #[test]
    fn test_draft_validation() {
        let mut job = ConstructionDraft {
            name: "Telhado".to_string(),
            property_id: Some(Id::Num(1)),
            budget: "8000".into(),
            delivery_days: "0".into(),
            ..Default::default()
        };
        assert!(job.validate().is_err());
        job.delivery_days = "15".into();
        assert!(job.validate().is_ok());

        job.spent = "abc".into();
        let body = serde_json::to_value(job.payload().unwrap()).unwrap();
        assert_eq!(body["budget"], 8000.0);
        assert_eq!(body["spent"], 0.0);
        assert_eq!(body["delivery_days"], 15);
        assert!(body.get("responsible_name").is_none());

        job.budget = "-1".into();
        assert!(job.payload().is_err());

        let task = TaskDraft {
            name: "Vistoria".to_string(),
            property_id: None,
            ..Default::default()
        };
        assert!(matches!(task.validate(), Err(CoreError::InvalidInput(_))));
    }

    #[test]
    fn test_task_status_labels() {
        let status: TaskStatus = serde_json::from_str(r#""in progress""#).unwrap();
        assert_eq!(status, TaskStatus::InProgress);
        assert_eq!(status.label(), "Em andamento");
        let odd: TaskStatus = serde_json::from_str(r#""archived""#).unwrap();
        assert_eq!(odd.label(), "N/A");
    }
}
