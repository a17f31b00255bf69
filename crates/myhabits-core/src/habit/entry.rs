//! Per-day outcome records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of a habit on one day.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HabitStatus {
    #[default]
    Pending,
    Completed,
    Skipped,
}

impl HabitStatus {
    /// Whether the status can be written by `record_outcome`.
    pub fn is_outcome(self) -> bool {
        matches!(self, HabitStatus::Completed | HabitStatus::Skipped)
    }
}

/// One day's recorded outcome for one habit.
///
/// At most one entry exists per `(habit_id, date)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HabitEntry {
    pub id: String,
    pub habit_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub status: HabitStatus,
    #[serde(default)]
    pub completed_at: Option<NaiveDate>,
}

impl HabitEntry {
    /// Fresh entry; `completed_at` is stamped with `date` for completions.
    pub fn new(habit_id: &str, date: NaiveDate, status: HabitStatus) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            habit_id: habit_id.to_string(),
            date,
            status,
            completed_at: (status == HabitStatus::Completed).then_some(date),
        }
    }

    /// True when this entry occupies the same `(habit_id, date)` slot.
    pub fn same_slot(&self, habit_id: &str, date: NaiveDate) -> bool {
        self.habit_id == habit_id && self.date == date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_entries_carry_completion_day() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let done = HabitEntry::new("h", date, HabitStatus::Completed);
        let skipped = HabitEntry::new("h", date, HabitStatus::Skipped);
        assert_eq!(done.completed_at, Some(date));
        assert_eq!(skipped.completed_at, None);
    }

    #[test]
    fn only_completed_and_skipped_are_outcomes() {
        assert!(HabitStatus::Completed.is_outcome());
        assert!(HabitStatus::Skipped.is_outcome());
        assert!(!HabitStatus::Pending.is_outcome());
    }

    #[test]
    fn parses_unversioned_record_shape() {
        let json = r#"{"id":"e1","habitId":"h1","date":"2024-03-01","status":"SKIPPED","completedAt":null}"#;
        let entry: HabitEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.status, HabitStatus::Skipped);
        assert!(entry.same_slot("h1", NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
    }
}
