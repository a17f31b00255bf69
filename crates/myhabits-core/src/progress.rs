//! Progress aggregation over habit entries.
//!
//! Everything here is a pure function of read snapshots; nothing mutates
//! persisted state.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::habit::{HabitEntry, HabitStatus, HabitWithEntries, RepeatType};

/// Length of the trailing window, today included.
pub const WEEK_DAYS: i64 = 7;

/// View selector for the today list.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HabitFilter {
    #[default]
    All,
    Completed,
    Skipped,
}

impl std::str::FromStr for HabitFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(HabitFilter::All),
            "completed" => Ok(HabitFilter::Completed),
            "skipped" => Ok(HabitFilter::Skipped),
            other => Err(format!("unknown filter: {other}")),
        }
    }
}

/// Completed / skipped counts over the habits due today.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyProgress {
    pub completed: usize,
    pub skipped: usize,
    pub total: usize,
}

impl DailyProgress {
    pub fn from_due(due: &[HabitWithEntries]) -> Self {
        Self {
            completed: due.iter().filter(|h| h.is_completed_today()).count(),
            skipped: due.iter().filter(|h| h.is_skipped_today()).count(),
            total: due.len(),
        }
    }

    /// Completed share of the due habits, 0 when nothing is due.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }

    pub fn pending(&self) -> usize {
        self.total - self.completed - self.skipped
    }
}

/// Completed entries over all entries, 0 for an empty slice.
pub fn completion_rate(entries: &[HabitEntry]) -> f64 {
    if entries.is_empty() {
        return 0.0;
    }
    let completed = count_status(entries, HabitStatus::Completed);
    completed as f64 / entries.len() as f64
}

pub fn is_completed_today(today_entry: Option<&HabitEntry>) -> bool {
    today_entry.is_some_and(|e| e.status == HabitStatus::Completed)
}

pub fn is_skipped_today(today_entry: Option<&HabitEntry>) -> bool {
    today_entry.is_some_and(|e| e.status == HabitStatus::Skipped)
}

/// Whether `date` falls in `[today - 6, today]`.
pub fn in_trailing_week(date: NaiveDate, today: NaiveDate) -> bool {
    let start = today - Duration::days(WEEK_DAYS - 1);
    date >= start && date <= today
}

/// "completed/total" label.
pub fn ratio_label(entries: &[HabitEntry]) -> String {
    format!(
        "{}/{}",
        count_status(entries, HabitStatus::Completed),
        entries.len()
    )
}

/// Narrow the due list to the selected view.
pub fn apply_filter(due: &[HabitWithEntries], filter: HabitFilter) -> Vec<HabitWithEntries> {
    due.iter()
        .filter(|h| match filter {
            HabitFilter::All => true,
            HabitFilter::Completed => h.is_completed_today(),
            HabitFilter::Skipped => h.is_skipped_today(),
        })
        .cloned()
        .collect()
}

/// Habits shown on the weekly tab: everything except monthly habits.
pub fn weekly_view(habits: &[HabitWithEntries]) -> Vec<HabitWithEntries> {
    habits
        .iter()
        .filter(|h| h.habit.repeat_type != RepeatType::Monthly)
        .cloned()
        .collect()
}

/// Habits shown on the monthly tab.
pub fn monthly_view(habits: &[HabitWithEntries]) -> Vec<HabitWithEntries> {
    habits
        .iter()
        .filter(|h| h.habit.repeat_type == RepeatType::Monthly)
        .cloned()
        .collect()
}

fn count_status(entries: &[HabitEntry], status: HabitStatus) -> usize {
    entries.iter().filter(|e| e.status == status).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habit::Habit;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entries(statuses: &[HabitStatus]) -> Vec<HabitEntry> {
        statuses
            .iter()
            .enumerate()
            .map(|(i, s)| HabitEntry::new("h", ymd(2024, 1, 1 + i as u32), *s))
            .collect()
    }

    #[test]
    fn completion_rate_of_empty_is_zero() {
        assert_eq!(completion_rate(&[]), 0.0);
    }

    #[test]
    fn completion_rate_counts_completed_share() {
        let list = entries(&[
            HabitStatus::Completed,
            HabitStatus::Skipped,
            HabitStatus::Completed,
        ]);
        assert!((completion_rate(&list) - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn today_predicates() {
        let done = HabitEntry::new("h", ymd(2024, 1, 1), HabitStatus::Completed);
        let skipped = HabitEntry::new("h", ymd(2024, 1, 1), HabitStatus::Skipped);
        assert!(is_completed_today(Some(&done)));
        assert!(!is_completed_today(Some(&skipped)));
        assert!(is_skipped_today(Some(&skipped)));
        assert!(!is_completed_today(None));
        assert!(!is_skipped_today(None));
    }

    #[test]
    fn trailing_week_is_inclusive_of_both_ends() {
        let today = ymd(2024, 3, 10);
        assert!(in_trailing_week(ymd(2024, 3, 10), today));
        assert!(in_trailing_week(ymd(2024, 3, 4), today));
        assert!(!in_trailing_week(ymd(2024, 3, 3), today));
        assert!(!in_trailing_week(ymd(2024, 3, 11), today));
    }

    #[test]
    fn filter_and_daily_progress() {
        let today = ymd(2024, 3, 10);
        let a = Habit::new("a");
        let b = Habit::new("b");
        let c = Habit::new("c");
        let due = vec![
            HabitWithEntries::assemble(
                a.clone(),
                vec![HabitEntry::new(&a.id, today, HabitStatus::Completed)],
                today,
            ),
            HabitWithEntries::assemble(
                b.clone(),
                vec![HabitEntry::new(&b.id, today, HabitStatus::Skipped)],
                today,
            ),
            HabitWithEntries::assemble(c, vec![], today),
        ];

        assert_eq!(apply_filter(&due, HabitFilter::All).len(), 3);
        assert_eq!(apply_filter(&due, HabitFilter::Completed)[0].habit.title, "a");
        assert_eq!(apply_filter(&due, HabitFilter::Skipped)[0].habit.title, "b");

        let progress = DailyProgress::from_due(&due);
        assert_eq!(progress.completed, 1);
        assert_eq!(progress.skipped, 1);
        assert_eq!(progress.pending(), 1);
        assert!((progress.fraction() - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(DailyProgress::default().fraction(), 0.0);
    }

    #[test]
    fn weekly_and_monthly_views_partition_by_repeat_type() {
        let today = ymd(2024, 3, 10);
        let all = vec![
            HabitWithEntries::assemble(Habit::new("d"), vec![], today),
            HabitWithEntries::assemble(Habit::weekly("w", [1]), vec![], today),
            HabitWithEntries::assemble(Habit::monthly("m", 3), vec![], today),
        ];
        assert_eq!(weekly_view(&all).len(), 2);
        assert_eq!(monthly_view(&all)[0].habit.title, "m");
    }

    #[test]
    fn filter_parses_case_insensitively() {
        assert_eq!("Completed".parse::<HabitFilter>().unwrap(), HabitFilter::Completed);
        assert!("done".parse::<HabitFilter>().is_err());
    }
}
