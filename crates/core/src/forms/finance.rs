//! Money-related forms: categories, transactions, saving goals, deposits and
//! investment profiles.
//!
//! Amounts are typed as text and sent as JSON numbers.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::{FieldErrors, Form, MUST_BE_POSITIVE, REQUIRED, form_fields, non_blank};
use crate::models::{Category, InvestmentProfile, SavingGoal, Transaction};
use crate::types::{CategoryId, EmotionTag, InvestmentStrategy, Money, TransactionType};

/// Message for text that is not a number at all.
pub const NOT_A_NUMBER: &str = "Must be a number";

form_fields! {
    pub enum CategoryField { Name => "name", Icon => "icon", Kind => "type" }
}

form_fields! {
    pub enum TransactionField {
        Amount => "amount",
        Kind => "type",
        OccurredAt => "occurredAt",
        EmotionTag => "emotionTag",
        Note => "note",
        CategoryId => "categoryId",
    }
}

form_fields! {
    pub enum SavingGoalField {
        Name => "name",
        TargetAmount => "targetAmount",
        TargetDate => "targetDate",
    }
}

form_fields! {
    pub enum DepositField { Amount => "amount" }
}

form_fields! {
    pub enum InvestmentField {
        Strategy => "strategy",
        MonthlyAmount => "monthlyAmount",
        ExpectedReturn => "expectedReturn",
    }
}

/// Parse a strictly positive amount.
///
/// # Errors
///
/// Returns the message to show next to the field.
pub fn positive_amount(input: &str) -> Result<Decimal, &'static str> {
    if input.trim().is_empty() {
        return Err(REQUIRED);
    }
    let money = Money::parse(input).ok_or(NOT_A_NUMBER)?;
    if money.is_positive() {
        Ok(money.amount())
    } else {
        Err(MUST_BE_POSITIVE)
    }
}

/// Parse the moment a transaction happened.
///
/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM[:SS]`, `YYYY-MM-DD HH:MM` and a bare
/// `YYYY-MM-DD` (midnight). Times without an offset are taken as UTC.
#[must_use]
pub fn parse_occurred_at(input: &str) -> Option<DateTime<Utc>> {
    let raw = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

fn format_amount(amount: Money) -> String {
    amount.amount().normalize().to_string()
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryForm {
    pub name: String,
    pub icon: String,
    pub kind: TransactionType,
}

impl Default for CategoryForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            icon: String::new(),
            kind: TransactionType::Expense,
        }
    }
}

impl From<&Category> for CategoryForm {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            icon: category.icon.clone().unwrap_or_default(),
            kind: category.kind,
        }
    }
}

/// Body of `POST /categories` and `PATCH /categories/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(rename = "type")]
    pub kind: TransactionType,
}

impl Form for CategoryForm {
    type Field = CategoryField;
    type Output = CategoryInput;

    fn validate(&self) -> Result<CategoryInput, FieldErrors<CategoryField>> {
        let mut errors = FieldErrors::new();
        let name = non_blank(&self.name);
        if name.is_none() {
            errors.add(CategoryField::Name, REQUIRED);
        }
        match name {
            Some(name) if errors.is_empty() => Ok(CategoryInput {
                name,
                icon: non_blank(&self.icon),
                kind: self.kind,
            }),
            _ => Err(errors),
        }
    }
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionForm {
    pub amount: String,
    pub kind: TransactionType,
    pub occurred_at: String,
    pub emotion_tag: Option<EmotionTag>,
    pub note: String,
    /// Empty for "no category".
    pub category_id: String,
}

impl Default for TransactionForm {
    fn default() -> Self {
        Self {
            amount: String::new(),
            kind: TransactionType::Expense,
            occurred_at: String::new(),
            emotion_tag: None,
            note: String::new(),
            category_id: String::new(),
        }
    }
}

impl TransactionForm {
    /// Empty form dated `now`.
    #[must_use]
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            occurred_at: now.format("%Y-%m-%dT%H:%M").to_string(),
            ..Self::default()
        }
    }
}

impl From<&Transaction> for TransactionForm {
    fn from(tx: &Transaction) -> Self {
        Self {
            amount: format_amount(tx.amount),
            kind: tx.kind,
            occurred_at: tx.occurred_at.format("%Y-%m-%dT%H:%M").to_string(),
            emotion_tag: tx.emotion_tag,
            note: tx.note.clone().unwrap_or_default(),
            category_id: tx
                .category
                .as_ref()
                .map(|c| c.id.to_string())
                .unwrap_or_default(),
        }
    }
}

/// Body of `POST /transactions` and `PATCH /transactions/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInput {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub occurred_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotion_tag: Option<EmotionTag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
}

impl Form for TransactionForm {
    type Field = TransactionField;
    type Output = TransactionInput;

    fn validate(&self) -> Result<TransactionInput, FieldErrors<TransactionField>> {
        let mut errors = FieldErrors::new();

        let amount = positive_amount(&self.amount)
            .map_err(|msg| errors.add(TransactionField::Amount, msg))
            .ok();

        let occurred_at = if self.occurred_at.trim().is_empty() {
            errors.add(TransactionField::OccurredAt, REQUIRED);
            None
        } else {
            let parsed = parse_occurred_at(&self.occurred_at);
            if parsed.is_none() {
                errors.add(TransactionField::OccurredAt, "Invalid date");
            }
            parsed
        };

        let category_id = match non_blank(&self.category_id) {
            None => None,
            Some(raw) => raw
                .parse::<CategoryId>()
                .map_err(|_| errors.add(TransactionField::CategoryId, "Invalid category"))
                .ok(),
        };

        match (amount, occurred_at) {
            (Some(amount), Some(occurred_at)) if errors.is_empty() => Ok(TransactionInput {
                amount,
                kind: self.kind,
                occurred_at,
                emotion_tag: self.emotion_tag,
                note: non_blank(&self.note),
                category_id,
            }),
            _ => Err(errors),
        }
    }
}

// ---------------------------------------------------------------------------
// Saving goals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavingGoalForm {
    pub name: String,
    pub target_amount: String,
    /// `YYYY-MM-DD` or empty.
    pub target_date: String,
}

impl From<&SavingGoal> for SavingGoalForm {
    fn from(goal: &SavingGoal) -> Self {
        Self {
            name: goal.name.clone(),
            target_amount: format_amount(goal.target_amount),
            target_date: goal
                .target_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }
}

/// Body of `POST /saving-goals` and `PATCH /saving-goals/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingGoalInput {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub target_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
}

impl Form for SavingGoalForm {
    type Field = SavingGoalField;
    type Output = SavingGoalInput;

    fn validate(&self) -> Result<SavingGoalInput, FieldErrors<SavingGoalField>> {
        let mut errors = FieldErrors::new();

        let name = non_blank(&self.name);
        if name.is_none() {
            errors.add(SavingGoalField::Name, REQUIRED);
        }
        let target = positive_amount(&self.target_amount)
            .map_err(|msg| errors.add(SavingGoalField::TargetAmount, msg))
            .ok();
        let target_date = match non_blank(&self.target_date) {
            None => None,
            Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                .map_err(|_| errors.add(SavingGoalField::TargetDate, "Use YYYY-MM-DD"))
                .ok(),
        };

        match (name, target) {
            (Some(name), Some(target_amount)) if errors.is_empty() => Ok(SavingGoalInput {
                name,
                target_amount,
                target_date,
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepositForm {
    pub amount: String,
}

/// Body of `PATCH /saving-goals/:id/deposit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DepositInput {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

impl Form for DepositForm {
    type Field = DepositField;
    type Output = DepositInput;

    fn validate(&self) -> Result<DepositInput, FieldErrors<DepositField>> {
        positive_amount(&self.amount)
            .map(|amount| DepositInput { amount })
            .map_err(|msg| FieldErrors::new().with(DepositField::Amount, msg))
    }
}

// ---------------------------------------------------------------------------
// Investment profiles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvestmentProfileForm {
    pub strategy: InvestmentStrategy,
    pub monthly_amount: String,
    /// Yearly return in percent.
    pub expected_return: String,
}

impl Default for InvestmentProfileForm {
    fn default() -> Self {
        Self {
            strategy: InvestmentStrategy::Balanced,
            monthly_amount: String::new(),
            expected_return: String::new(),
        }
    }
}

impl From<&InvestmentProfile> for InvestmentProfileForm {
    fn from(profile: &InvestmentProfile) -> Self {
        Self {
            strategy: profile.strategy,
            monthly_amount: format_amount(profile.monthly_amount),
            expected_return: profile.expected_return.normalize().to_string(),
        }
    }
}

/// Body of `POST /investment-profiles` and `PATCH /investment-profiles/:id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentProfileInput {
    pub strategy: InvestmentStrategy,
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub expected_return: Decimal,
}

impl Form for InvestmentProfileForm {
    type Field = InvestmentField;
    type Output = InvestmentProfileInput;

    fn validate(&self) -> Result<InvestmentProfileInput, FieldErrors<InvestmentField>> {
        let mut errors = FieldErrors::new();

        let monthly = positive_amount(&self.monthly_amount)
            .map_err(|msg| errors.add(InvestmentField::MonthlyAmount, msg))
            .ok();

        let expected = if self.expected_return.trim().is_empty() {
            errors.add(InvestmentField::ExpectedReturn, REQUIRED);
            None
        } else {
            match self.expected_return.trim().parse::<Decimal>() {
                Ok(pct) if pct >= Decimal::ZERO && pct <= Decimal::ONE_HUNDRED => Some(pct),
                Ok(_) => {
                    errors.add(InvestmentField::ExpectedReturn, "Must be between 0 and 100");
                    None
                }
                Err(_) => {
                    errors.add(InvestmentField::ExpectedReturn, NOT_A_NUMBER);
                    None
                }
            }
        };

        match (monthly, expected) {
            (Some(monthly_amount), Some(expected_return)) => Ok(InvestmentProfileInput {
                strategy: self.strategy,
                monthly_amount,
                expected_return,
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_transaction() -> TransactionForm {
        TransactionForm {
            amount: "42.50".into(),
            occurred_at: "2026-03-05T18:30".into(),
            ..TransactionForm::default()
        }
    }

    #[test]
    fn test_positive_amount() {
        assert_eq!(positive_amount("12.5").unwrap().to_string(), "12.5");
        assert_eq!(positive_amount(""), Err(REQUIRED));
        assert_eq!(positive_amount("0"), Err(MUST_BE_POSITIVE));
        assert_eq!(positive_amount("-3"), Err(MUST_BE_POSITIVE));
        assert_eq!(positive_amount("abc"), Err(NOT_A_NUMBER));
        assert_eq!(positive_amount("1,5"), Err(NOT_A_NUMBER));
        assert_eq!(positive_amount("1,200.00"), Err(NOT_A_NUMBER));
    }

    #[test]
    fn test_parse_occurred_at_forms() {
        let expected = "2026-03-05T18:30:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(parse_occurred_at("2026-03-05T18:30"), Some(expected));
        assert_eq!(parse_occurred_at("2026-03-05 18:30"), Some(expected));
        assert_eq!(
            parse_occurred_at("2026-03-05T20:30:00+02:00"),
            Some(expected)
        );
        assert_eq!(
            parse_occurred_at("2026-03-05"),
            Some("2026-03-05T00:00:00Z".parse().unwrap())
        );
        assert_eq!(parse_occurred_at("yesterday"), None);
    }

    #[test]
    fn test_transaction_payload_sends_amount_as_number() {
        let body = serde_json::to_value(valid_transaction().validate().unwrap()).unwrap();
        assert_eq!(body["amount"], json!(42.5));
        assert_eq!(body["type"], "expense");
        assert_eq!(body["occurredAt"], "2026-03-05T18:30:00Z");
        assert!(body.get("note").is_none());
        assert!(body.get("categoryId").is_none());
    }

    #[test]
    fn test_transaction_rejects_non_positive_amount() {
        let form = TransactionForm {
            amount: "0".into(),
            ..valid_transaction()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get(TransactionField::Amount), Some(MUST_BE_POSITIVE));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_transaction_category_must_be_uuid() {
        let form = TransactionForm {
            category_id: "food".into(),
            ..valid_transaction()
        };
        assert!(form
            .validate()
            .unwrap_err()
            .contains(TransactionField::CategoryId));

        let form = TransactionForm {
            category_id: "0b6c7a52-8d33-4d7e-a8a5-6a2f4f0e9c11".into(),
            ..valid_transaction()
        };
        assert!(form.validate().unwrap().category_id.is_some());
    }

    #[test]
    fn test_category_name_required() {
        let errors = CategoryForm::default().validate().unwrap_err();
        assert_eq!(errors.get(CategoryField::Name), Some(REQUIRED));

        let body = serde_json::to_value(
            CategoryForm {
                name: "Salary".into(),
                icon: String::new(),
                kind: TransactionType::Income,
            }
            .validate()
            .unwrap(),
        )
        .unwrap();
        assert_eq!(body, json!({"name": "Salary", "type": "income"}));
    }

    #[test]
    fn test_saving_goal_rules() {
        let errors = SavingGoalForm {
            name: " ".into(),
            target_amount: "-1".into(),
            target_date: "31/12/2026".into(),
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.len(), 3);

        let input = SavingGoalForm {
            name: "Trip".into(),
            target_amount: "1500".into(),
            target_date: "2026-12-31".into(),
        }
        .validate()
        .unwrap();
        let body = serde_json::to_value(input).unwrap();
        assert_eq!(body["targetAmount"], json!(1500.0));
        assert_eq!(body["targetDate"], "2026-12-31");
    }

    #[test]
    fn test_deposit_must_be_positive() {
        let errors = DepositForm { amount: "0".into() }.validate().unwrap_err();
        assert_eq!(errors.get(DepositField::Amount), Some(MUST_BE_POSITIVE));
        assert!(DepositForm { amount: "25".into() }.validate().is_ok());

        let errors = DepositForm { amount: "1,5".into() }.validate().unwrap_err();
        assert_eq!(errors.get(DepositField::Amount), Some(NOT_A_NUMBER));
    }

    #[test]
    fn test_investment_return_range() {
        let form = InvestmentProfileForm {
            monthly_amount: "200".into(),
            expected_return: "120".into(),
            ..InvestmentProfileForm::default()
        };
        assert_eq!(
            form.validate().unwrap_err().get(InvestmentField::ExpectedReturn),
            Some("Must be between 0 and 100")
        );

        let form = InvestmentProfileForm {
            expected_return: "7.5".into(),
            ..form
        };
        let body = serde_json::to_value(form.validate().unwrap()).unwrap();
        assert_eq!(body["strategy"], "balanced");
        assert_eq!(body["expectedReturn"], json!(7.5));
    }
}
