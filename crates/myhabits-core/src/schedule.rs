//! Schedule evaluation: is a habit due on a given calendar date?
//!
//! Monthly habits match only when the day of month equals `monthly_date`
//! exactly. A habit set to the 31st is therefore never due in a 30-day month,
//! and one set to the 29th or later skips February in most years.

use chrono::{Datelike, NaiveDate};

use crate::habit::{Habit, HabitWithEntries, RepeatType};

const DAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Whether `habit` is due on `date`.
pub fn is_due(habit: &Habit, date: NaiveDate) -> bool {
    match habit.repeat_type {
        RepeatType::Daily => true,
        RepeatType::Weekly => {
            let iso_day = date.weekday().number_from_monday() as u8;
            habit.selected_days.contains(&iso_day)
        }
        RepeatType::Monthly => date.day() == u32::from(habit.monthly_date),
    }
}

/// Keep only the views whose habit is due on `date`.
pub fn due_habits(habits: Vec<HabitWithEntries>, date: NaiveDate) -> Vec<HabitWithEntries> {
    habits
        .into_iter()
        .filter(|h| is_due(&h.habit, date))
        .collect()
}

/// Short human label for the recurrence rule.
pub fn describe(habit: &Habit) -> String {
    match habit.repeat_type {
        RepeatType::Daily => "Everyday".to_string(),
        RepeatType::Weekly => {
            let mut days: Vec<u8> = habit
                .selected_days
                .iter()
                .copied()
                .filter(|d| (1..=7).contains(d))
                .collect();
            days.sort_unstable();
            days.dedup();
            days.iter()
                .map(|d| DAY_NAMES[usize::from(*d) - 1])
                .collect::<Vec<_>>()
                .join(", ")
        }
        RepeatType::Monthly => format!("Monthly ({})", habit.monthly_date),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn daily_is_always_due() {
        let habit = Habit::new("Drink Water");
        assert!(is_due(&habit, ymd(2024, 2, 29)));
        assert!(is_due(&habit, ymd(2025, 12, 31)));
    }

    #[test]
    fn weekly_uses_iso_weekday_numbers() {
        // 2024-05-06 is a Monday, 2024-05-12 a Sunday.
        let habit = Habit::weekly("Gym", [1, 7]);
        assert!(is_due(&habit, ymd(2024, 5, 6)));
        assert!(!is_due(&habit, ymd(2024, 5, 7)));
        assert!(is_due(&habit, ymd(2024, 5, 12)));
    }

    #[test]
    fn weekly_with_no_days_is_never_due() {
        let habit = Habit::weekly("Nothing", Vec::<u8>::new());
        for offset in 0..7 {
            let date = ymd(2024, 5, 6) + chrono::Duration::days(offset);
            assert!(!is_due(&habit, date));
        }
    }

    #[test]
    fn monthly_matches_day_of_month() {
        let habit = Habit::monthly("Pay rent", 18);
        assert!(is_due(&habit, ymd(2024, 7, 18)));
        assert!(!is_due(&habit, ymd(2024, 7, 17)));
    }

    #[test]
    fn monthly_31st_skips_short_months() {
        let habit = Habit::monthly("Review budget", 31);
        assert!(!is_due(&habit, ymd(2024, 4, 30)));
        let april_hits = (1..=30).filter(|d| is_due(&habit, ymd(2024, 4, *d))).count();
        assert_eq!(april_hits, 0);
        assert!(is_due(&habit, ymd(2024, 5, 31)));
    }

    #[test]
    fn describe_labels() {
        assert_eq!(describe(&Habit::new("a")), "Everyday");
        assert_eq!(describe(&Habit::weekly("b", [5, 1, 3])), "Mon, Wed, Fri");
        assert_eq!(describe(&Habit::monthly("c", 18)), "Monthly (18)");
    }

    #[test]
    fn due_habits_filters_views() {
        let today = ymd(2024, 5, 7); // Tuesday
        let views = vec![
            HabitWithEntries::assemble(Habit::new("daily"), vec![], today),
            HabitWithEntries::assemble(Habit::weekly("mon", [1]), vec![], today),
            HabitWithEntries::assemble(Habit::monthly("7th", 7), vec![], today),
        ];
        let titles: Vec<_> = due_habits(views, today)
            .into_iter()
            .map(|h| h.habit.title)
            .collect();
        assert_eq!(titles, vec!["daily", "7th"]);
    }

    proptest! {
        #[test]
        fn weekly_due_iff_weekday_selected(
            days in proptest::collection::vec(1u8..=7, 0..7),
            offset in 0i64..3650
        ) {
            let date = ymd(2020, 1, 1) + chrono::Duration::days(offset);
            let habit = Habit::weekly("p", days.clone());
            let iso = date.weekday().number_from_monday() as u8;
            prop_assert_eq!(is_due(&habit, date), days.contains(&iso));
        }
    }
}
