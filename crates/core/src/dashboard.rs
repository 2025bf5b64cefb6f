//! Dashboard figures derived from already-fetched lists.
//!
//! Nothing here talks to the network; the client fetches the four inputs
//! concurrently and hands them to [`summarize`].

use std::collections::BTreeMap;

use crate::models::{DailySnapshot, Habit, SavingGoal, Transaction};
use crate::types::{Money, TransactionType};

/// Transactions shown in the "recent" preview.
pub const RECENT_TRANSACTIONS: usize = 5;
/// Goals shown with a progress bar.
pub const GOAL_PREVIEWS: usize = 3;
/// Habits listed before collapsing into "+N more".
pub const HABIT_PREVIEWS: usize = 5;

/// Income and expense for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthBucket {
    /// `YYYY-MM`.
    pub month: String,
    pub income: Money,
    pub expense: Money,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalProgress {
    pub goal: SavingGoal,
    /// Whole percent, 0-100.
    pub percent: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub total_income: Money,
    pub total_expense: Money,
    /// Income minus expense.
    pub balance: Money,
    /// Number of saving goals.
    pub active_goals: usize,
    /// One bucket per month with activity, oldest first.
    pub monthly: Vec<MonthBucket>,
    pub recent_transactions: Vec<Transaction>,
    pub goals: Vec<GoalProgress>,
    pub habits: Vec<Habit>,
    /// Habits not included in `habits`.
    pub more_habits: usize,
    pub today: Option<DailySnapshot>,
}

/// Derive every dashboard figure.
///
/// Previews keep the order the server returned.
#[must_use]
pub fn summarize(
    transactions: &[Transaction],
    goals: &[SavingGoal],
    habits: &[Habit],
    today: Option<DailySnapshot>,
) -> DashboardSummary {
    let mut total_income = Money::ZERO;
    let mut total_expense = Money::ZERO;
    let mut months: BTreeMap<String, (Money, Money)> = BTreeMap::new();

    for tx in transactions {
        let bucket = months.entry(tx.month()).or_default();
        match tx.kind {
            TransactionType::Income => {
                total_income = total_income + tx.amount;
                bucket.0 = bucket.0 + tx.amount;
            }
            TransactionType::Expense => {
                total_expense = total_expense + tx.amount;
                bucket.1 = bucket.1 + tx.amount;
            }
        }
    }

    DashboardSummary {
        total_income,
        total_expense,
        balance: total_income - total_expense,
        active_goals: goals.len(),
        monthly: months
            .into_iter()
            .map(|(month, (income, expense))| MonthBucket {
                month,
                income,
                expense,
            })
            .collect(),
        recent_transactions: transactions.iter().take(RECENT_TRANSACTIONS).cloned().collect(),
        goals: goals
            .iter()
            .take(GOAL_PREVIEWS)
            .map(|goal| GoalProgress {
                percent: goal.progress_percent(),
                goal: goal.clone(),
            })
            .collect(),
        habits: habits.iter().take(HABIT_PREVIEWS).cloned().collect(),
        more_habits: habits.len().saturating_sub(HABIT_PREVIEWS),
        today,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tx(kind: &str, amount: &str, at: &str) -> Transaction {
        serde_json::from_value(json!({
            "id": uuid::Uuid::new_v4(),
            "amount": amount,
            "type": kind,
            "emotionTag": null,
            "note": null,
            "occurredAt": at,
            "createdAt": at,
            "category": null
        }))
        .unwrap()
    }

    fn habit(name: &str) -> Habit {
        serde_json::from_value(json!({
            "id": uuid::Uuid::new_v4(),
            "name": name,
            "frequency": "daily",
            "active": true,
            "createdAt": "2026-01-01T00:00:00Z"
        }))
        .unwrap()
    }

    fn money(s: &str) -> Money {
        Money::parse(s).unwrap()
    }

    #[test]
    fn test_totals_and_balance() {
        let txs = [
            tx("income", "100", "2026-02-01T10:00:00Z"),
            tx("income", "50", "2026-02-03T10:00:00Z"),
            tx("expense", "30", "2026-02-04T10:00:00Z"),
        ];
        let summary = summarize(&txs, &[], &[], None);
        assert_eq!(summary.total_income, money("150"));
        assert_eq!(summary.total_expense, money("30"));
        assert_eq!(summary.balance, money("120"));
        assert_eq!(summary.active_goals, 0);
    }

    #[test]
    fn test_monthly_buckets_sorted_ascending() {
        let txs = [
            tx("expense", "20", "2026-03-10T10:00:00Z"),
            tx("income", "500", "2026-01-31T23:00:00Z"),
            tx("expense", "5.5", "2026-03-01T00:00:00Z"),
        ];
        let summary = summarize(&txs, &[], &[], None);
        let months: Vec<_> = summary.monthly.iter().map(|b| b.month.as_str()).collect();
        assert_eq!(months, ["2026-01", "2026-03"]);
        assert_eq!(summary.monthly[1].expense, money("25.5"));
        assert_eq!(summary.monthly[1].income, Money::ZERO);
    }

    #[test]
    fn test_previews_are_capped() {
        let txs: Vec<_> = (0..8)
            .map(|_| tx("expense", "1", "2026-03-10T10:00:00Z"))
            .collect();
        let habits: Vec<_> = ["a", "b", "c", "d", "e", "f", "g"]
            .into_iter()
            .map(habit)
            .collect();
        let summary = summarize(&txs, &[], &habits, None);
        assert_eq!(summary.recent_transactions.len(), RECENT_TRANSACTIONS);
        assert_eq!(summary.habits.len(), HABIT_PREVIEWS);
        assert_eq!(summary.more_habits, 2);
    }

    #[test]
    fn test_empty_inputs() {
        let summary = summarize(&[], &[], &[], None);
        assert_eq!(summary.balance, Money::ZERO);
        assert!(summary.monthly.is_empty());
        assert_eq!(summary.more_habits, 0);
        assert!(summary.today.is_none());
    }
}
