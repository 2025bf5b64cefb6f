//! Records returned by the remote API.
//!
//! These mirror the JSON the server sends (camelCase keys). The client never
//! owns their lifecycle: pages hold them in memory until the next reload.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::types::{
    CategoryId, Email, EmotionTag, HabitFrequency, HabitId, HabitLogId, InvestmentProfileId,
    InvestmentStrategy, Language, Money, Mood, Role, SavingGoalId, SnapshotId, TransactionId,
    TransactionType, UserId,
};

/// Minimal identity returned by login and persisted between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: UserId,
    pub email: Email,
    /// Missing on older servers; treated as a regular user.
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub language: Language,
    pub timezone: String,
}

/// Payload of a successful `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: AuthUser,
}

/// Personal details attached to a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    #[serde(default, with = "flexible_date::option")]
    pub birth_date: Option<NaiveDate>,
    pub country: Option<String>,
    pub avatar_url: Option<String>,
}

/// The full account record from `GET /me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub email: Email,
    #[serde(default)]
    pub language: Language,
    pub timezone: String,
    #[serde(default)]
    pub onboarding_completed: bool,
    pub created_at: DateTime<Utc>,
    pub person: Option<Person>,
}

impl UserProfile {
    /// First name for greetings, if the profile has personal details.
    #[must_use]
    pub fn first_name(&self) -> Option<&str> {
        self.person.as_ref().map(|p| p.first_name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub icon: Option<String>,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Built-in categories cannot be deleted.
    #[serde(default)]
    pub is_system: bool,
}

/// Category summary embedded in a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: CategoryId,
    pub name: String,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    pub amount: Money,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub emotion_tag: Option<EmotionTag>,
    pub note: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub category: Option<CategoryRef>,
}

impl Transaction {
    /// `YYYY-MM` bucket the transaction falls into.
    #[must_use]
    pub fn month(&self) -> String {
        self.occurred_at.format("%Y-%m").to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingGoal {
    pub id: SavingGoalId,
    pub name: String,
    pub target_amount: Money,
    pub current_amount: Money,
    #[serde(default, with = "flexible_date::option")]
    pub target_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl SavingGoal {
    /// Progress towards the target as a whole percentage, capped at 100.
    ///
    /// A non-positive target reports 0 rather than dividing by zero.
    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        let target = self.target_amount.amount();
        if target <= Decimal::ZERO {
            return 0;
        }
        // Overflow only happens far past the target.
        let Some(pct) = self
            .current_amount
            .amount()
            .checked_div(target)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        else {
            return 100;
        };
        let pct = pct.round();
        if pct >= Decimal::ONE_HUNDRED {
            100
        } else if pct <= Decimal::ZERO {
            0
        } else {
            pct.to_u8().unwrap_or(100)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: HabitId,
    pub name: String,
    pub frequency: HabitFrequency,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// One completion record in a habit's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitLog {
    pub id: HabitLogId,
    #[serde(with = "flexible_date")]
    pub date: NaiveDate,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Once-daily mood and reflection record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySnapshot {
    pub id: SnapshotId,
    #[serde(with = "flexible_date")]
    pub date: NaiveDate,
    pub mood: Option<Mood>,
    pub reflection: Option<String>,
    pub conscious_score: Option<u8>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentProfile {
    pub id: InvestmentProfileId,
    pub strategy: InvestmentStrategy,
    pub monthly_amount: Money,
    /// Expected yearly return, in percent.
    pub expected_return: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Dates arrive either as `YYYY-MM-DD` or as a full RFC 3339 timestamp.
pub mod flexible_date {
    use chrono::{DateTime, NaiveDate};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Parse either accepted form.
    #[must_use]
    pub fn parse(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
    }

    /// Serialize as `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format("%Y-%m-%d"))
    }

    /// Deserialize from either accepted form.
    ///
    /// # Errors
    ///
    /// Fails when the string is neither a date nor a timestamp.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}")))
    }

    /// Same as the parent module, for optional fields.
    pub mod option {
        use chrono::NaiveDate;
        use serde::{Deserialize, Deserializer, Serializer};

        /// # Errors
        ///
        /// Propagates serializer errors.
        pub fn serialize<S: Serializer>(
            date: &Option<NaiveDate>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(d) => super::serialize(d, serializer),
                None => serializer.serialize_none(),
            }
        }

        /// # Errors
        ///
        /// Fails when a present value is not a date.
        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDate>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                None => Ok(None),
                Some(raw) if raw.trim().is_empty() => Ok(None),
                Some(raw) => super::parse(&raw)
                    .map(Some)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}"))),
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn goal(current: &str, target: &str) -> SavingGoal {
        serde_json::from_value(json!({
            "id": "5b0f3c1e-1111-4a4e-9b0f-1f7b2a3c4d5e",
            "name": "Trip",
            "targetAmount": target,
            "currentAmount": current,
            "targetDate": "2026-12-31T00:00:00.000Z",
            "createdAt": "2026-01-01T10:00:00.000Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(goal("0", "1000").progress_percent(), 0);
        assert_eq!(goal("333.33", "1000").progress_percent(), 33);
        assert_eq!(goal("1500", "1000").progress_percent(), 100);
        assert_eq!(goal("10", "0").progress_percent(), 0);
    }

    #[test]
    fn test_progress_percent_huge_ratio_caps_at_100() {
        let g = goal("1000000000000000000000000000", "0.01");
        assert_eq!(g.progress_percent(), 100);
    }

    #[test]
    fn test_target_date_accepts_timestamp() {
        let g = goal("0", "1");
        assert_eq!(g.target_date, NaiveDate::from_ymd_opt(2026, 12, 31));
    }

    #[test]
    fn test_transaction_deserialize() {
        let tx: Transaction = serde_json::from_value(json!({
            "id": "9a3b1f0e-2222-4a4e-9b0f-1f7b2a3c4d5e",
            "amount": "42.10",
            "type": "expense",
            "emotionTag": "impulse",
            "note": null,
            "occurredAt": "2026-03-05T18:30:00.000Z",
            "createdAt": "2026-03-05T18:31:00.000Z",
            "category": { "id": "0b6c7a52-8d33-4d7e-a8a5-6a2f4f0e9c11", "name": "Food", "icon": "🍔" }
        }))
        .unwrap();
        assert_eq!(tx.kind, TransactionType::Expense);
        assert_eq!(tx.emotion_tag, Some(EmotionTag::Impulse));
        assert_eq!(tx.month(), "2026-03");
        assert_eq!(tx.category.unwrap().name, "Food");
    }

    #[test]
    fn test_auth_user_role_defaults_to_user() {
        let user: AuthUser = serde_json::from_value(json!({
            "id": "0b6c7a52-8d33-4d7e-a8a5-6a2f4f0e9c11",
            "email": "ana@example.com",
            "language": "en",
            "timezone": "America/Lima"
        }))
        .unwrap();
        assert_eq!(user.role, Role::User);
        assert_eq!(user.language, Language::En);
    }

    #[test]
    fn test_snapshot_date_only() {
        let snap: DailySnapshot = serde_json::from_value(json!({
            "id": "0b6c7a52-8d33-4d7e-a8a5-6a2f4f0e9c11",
            "date": "2026-10-16",
            "mood": "calm",
            "reflection": null,
            "consciousScore": 7,
            "createdAt": "2026-10-16T08:00:00Z"
        }))
        .unwrap();
        assert_eq!(snap.date, NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
        assert_eq!(snap.conscious_score, Some(7));
    }
}
