//! Habit definitions and the derived per-habit read view.
//!
//! Records serialize with camelCase field names and SCREAMING_SNAKE_CASE
//! enum variants so the persisted shape stays readable by earlier builds.

mod entry;

pub use entry::{HabitEntry, HabitStatus};

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::progress;

/// Opaque blue, ARGB packed into a signed 32-bit integer.
pub const DEFAULT_COLOR: i32 = 0xFF00_00FF_u32 as i32;

/// All seven ISO weekdays, 1 = Monday .. 7 = Sunday.
pub const ALL_DAYS: [u8; 7] = [1, 2, 3, 4, 5, 6, 7];

/// Recurrence rule of a habit.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepeatType {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl std::str::FromStr for RepeatType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "daily" => Ok(RepeatType::Daily),
            "weekly" => Ok(RepeatType::Weekly),
            "monthly" => Ok(RepeatType::Monthly),
            other => Err(format!("unknown repeat type: {other}")),
        }
    }
}

/// A user-defined recurring task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Habit {
    pub id: String,
    pub title: String,
    pub description: String,
    pub color: i32,
    pub is_repeating: bool,
    pub repeat_type: RepeatType,
    /// ISO weekdays the habit is due on when weekly.
    pub selected_days: Vec<u8>,
    /// Day of month the habit is due on when monthly.
    pub monthly_date: u8,
    pub has_reminder: bool,
    pub has_goal: bool,
    pub goal_target: u32,
    pub routine: String,
    pub created_at: NaiveDate,
    /// Inactive habits are kept in storage but hidden from every read view.
    pub is_active: bool,
}

impl Default for Habit {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: String::new(),
            description: String::new(),
            color: DEFAULT_COLOR,
            is_repeating: true,
            repeat_type: RepeatType::Daily,
            selected_days: ALL_DAYS.to_vec(),
            monthly_date: 1,
            has_reminder: false,
            has_goal: false,
            goal_target: 1,
            routine: String::new(),
            created_at: Local::now().date_naive(),
            is_active: true,
        }
    }
}

impl Habit {
    /// New active daily habit with a fresh id.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn weekly(title: impl Into<String>, days: impl IntoIterator<Item = u8>) -> Self {
        Self {
            repeat_type: RepeatType::Weekly,
            selected_days: days.into_iter().collect(),
            ..Self::new(title)
        }
    }

    pub fn monthly(title: impl Into<String>, day_of_month: u8) -> Self {
        Self {
            repeat_type: RepeatType::Monthly,
            monthly_date: day_of_month,
            ..Self::new(title)
        }
    }
}

/// A habit joined with its entries, as seen from one particular day.
///
/// Never persisted. Built fresh by every store read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HabitWithEntries {
    pub habit: Habit,
    pub today_entry: Option<HabitEntry>,
    /// Entries dated within the trailing 7 days, today included.
    pub weekly_entries: Vec<HabitEntry>,
    pub all_entries: Vec<HabitEntry>,
}

impl HabitWithEntries {
    /// Assemble the view for `today` from the habit's full history.
    pub fn assemble(habit: Habit, all_entries: Vec<HabitEntry>, today: NaiveDate) -> Self {
        let today_entry = all_entries.iter().find(|e| e.date == today).cloned();
        let weekly_entries = all_entries
            .iter()
            .filter(|e| progress::in_trailing_week(e.date, today))
            .cloned()
            .collect();
        Self {
            habit,
            today_entry,
            weekly_entries,
            all_entries,
        }
    }

    pub fn is_completed_today(&self) -> bool {
        progress::is_completed_today(self.today_entry.as_ref())
    }

    pub fn is_skipped_today(&self) -> bool {
        progress::is_skipped_today(self.today_entry.as_ref())
    }

    pub fn has_today_entry(&self) -> bool {
        self.today_entry.is_some()
    }

    /// All-time completion rate.
    pub fn completion_rate(&self) -> f64 {
        progress::completion_rate(&self.all_entries)
    }

    pub fn weekly_completion_rate(&self) -> f64 {
        progress::completion_rate(&self.weekly_entries)
    }

    /// "completed/total" over the trailing week.
    pub fn weekly_progress(&self) -> String {
        progress::ratio_label(&self.weekly_entries)
    }

    /// "completed/total" over the full history.
    pub fn overall_progress(&self) -> String {
        progress::ratio_label(&self.all_entries)
    }
}
