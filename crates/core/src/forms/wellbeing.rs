//! Habit and daily snapshot forms.

use serde::Serialize;

use super::{FieldErrors, Form, REQUIRED, form_fields, non_blank};
use crate::models::{DailySnapshot, Habit};
use crate::types::{HabitFrequency, Mood};

/// Lowest accepted conscious score.
pub const MIN_SCORE: u8 = 1;
/// Highest accepted conscious score.
pub const MAX_SCORE: u8 = 10;

form_fields! {
    pub enum HabitField { Name => "name", Frequency => "frequency" }
}

form_fields! {
    pub enum SnapshotField {
        Mood => "mood",
        Reflection => "reflection",
        ConsciousScore => "consciousScore",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitForm {
    pub name: String,
    pub frequency: HabitFrequency,
}

impl Default for HabitForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            frequency: HabitFrequency::Daily,
        }
    }
}

impl From<&Habit> for HabitForm {
    fn from(habit: &Habit) -> Self {
        Self {
            name: habit.name.clone(),
            frequency: habit.frequency,
        }
    }
}

/// Body of `POST /habits`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitInput {
    pub name: String,
    pub frequency: HabitFrequency,
}

/// Body of `PATCH /habits/:id`. Only the given fields change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HabitPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<HabitFrequency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl From<HabitInput> for HabitPatch {
    fn from(input: HabitInput) -> Self {
        Self {
            name: Some(input.name),
            frequency: Some(input.frequency),
            active: None,
        }
    }
}

impl HabitPatch {
    /// Patch that only flips the active flag.
    #[must_use]
    pub const fn active(active: bool) -> Self {
        Self {
            name: None,
            frequency: None,
            active: Some(active),
        }
    }
}

impl Form for HabitForm {
    type Field = HabitField;
    type Output = HabitInput;

    fn validate(&self) -> Result<HabitInput, FieldErrors<HabitField>> {
        non_blank(&self.name)
            .map(|name| HabitInput {
                name,
                frequency: self.frequency,
            })
            .ok_or_else(|| FieldErrors::new().with(HabitField::Name, REQUIRED))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotForm {
    pub mood: Option<Mood>,
    pub reflection: String,
    /// Integer 1-10, or empty.
    pub conscious_score: String,
}

impl From<&DailySnapshot> for SnapshotForm {
    fn from(snapshot: &DailySnapshot) -> Self {
        Self {
            mood: snapshot.mood,
            reflection: snapshot.reflection.clone().unwrap_or_default(),
            conscious_score: snapshot
                .conscious_score
                .map(|s| s.to_string())
                .unwrap_or_default(),
        }
    }
}

/// Body of `POST /snapshots` and `PATCH /snapshots/today`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reflection: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conscious_score: Option<u8>,
}

impl Form for SnapshotForm {
    type Field = SnapshotField;
    type Output = SnapshotInput;

    fn validate(&self) -> Result<SnapshotInput, FieldErrors<SnapshotField>> {
        let conscious_score = match non_blank(&self.conscious_score) {
            None => None,
            Some(raw) => match raw.parse::<u8>() {
                Ok(score) if (MIN_SCORE..=MAX_SCORE).contains(&score) => Some(score),
                _ => {
                    return Err(FieldErrors::new().with(
                        SnapshotField::ConsciousScore,
                        format!("Must be a whole number from {MIN_SCORE} to {MAX_SCORE}"),
                    ));
                }
            },
        };
        Ok(SnapshotInput {
            mood: self.mood,
            reflection: non_blank(&self.reflection),
            conscious_score,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_habit_name_required() {
        let errors = HabitForm::default().validate().unwrap_err();
        assert_eq!(errors.get(HabitField::Name), Some(REQUIRED));
    }

    #[test]
    fn test_habit_patch_only_sends_changes() {
        assert_eq!(
            serde_json::to_value(HabitPatch::active(false)).unwrap(),
            json!({"active": false})
        );
        let input = HabitForm {
            name: "Read".into(),
            frequency: HabitFrequency::Weekly,
        }
        .validate()
        .unwrap();
        assert_eq!(
            serde_json::to_value(HabitPatch::from(input)).unwrap(),
            json!({"name": "Read", "frequency": "weekly"})
        );
    }

    #[test]
    fn test_snapshot_score_bounds() {
        for bad in ["0", "11", "7.5", "-1", "ten"] {
            let form = SnapshotForm {
                conscious_score: bad.into(),
                ..SnapshotForm::default()
            };
            assert!(
                form.validate()
                    .unwrap_err()
                    .contains(SnapshotField::ConsciousScore),
                "{bad} should be rejected"
            );
        }
        let form = SnapshotForm {
            mood: Some(Mood::Calm),
            reflection: "  quiet day ".into(),
            conscious_score: "10".into(),
        };
        let body = serde_json::to_value(form.validate().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({"mood": "calm", "reflection": "quiet day", "consciousScore": 10})
        );
    }

    #[test]
    fn test_empty_snapshot_is_valid() {
        assert_eq!(
            SnapshotForm::default().validate().unwrap(),
            SnapshotInput::default()
        );
    }
}
