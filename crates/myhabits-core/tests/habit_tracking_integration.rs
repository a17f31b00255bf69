//! Integration tests for the habit store over a SQLite substrate.

use chrono::NaiveDate;
use myhabits_core::progress::{apply_filter, DailyProgress, HabitFilter};
use myhabits_core::storage::habit_store::{ENTRIES_KEY, HABITS_KEY};
use myhabits_core::{
    is_due, Database, Habit, HabitStatus, HabitStore, KvStore, MemoryKv,
};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_drink_water_end_to_end() {
    let store = HabitStore::new(Database::open_memory().unwrap()).unwrap();
    let today = ymd(2024, 9, 12);

    let habit = Habit::new("Drink Water");
    store.save_habit(habit.clone()).unwrap();
    store
        .record_outcome(&habit.id, today, HabitStatus::Completed)
        .unwrap();

    let views = store.list_active_habits_with_entries(today).unwrap();
    assert_eq!(views.len(), 1);
    assert!(views[0].is_completed_today());
    assert_eq!(views[0].weekly_entries.len(), 1);
    assert_eq!(views[0].weekly_progress(), "1/1");
    assert_eq!(views[0].completion_rate(), 1.0);
}

#[test]
fn test_monthly_31st_not_due_on_april_30() {
    let habit = Habit::monthly("Review budget", 31);
    assert!(!is_due(&habit, ymd(2024, 4, 30)));

    let store = HabitStore::new(MemoryKv::new()).unwrap();
    store.save_habit(habit).unwrap();
    assert!(store.today_habits(ymd(2024, 4, 30)).unwrap().is_empty());
    assert_eq!(store.today_habits(ymd(2024, 3, 31)).unwrap().len(), 1);
}

#[test]
fn test_state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("habits.db");
    let today = ymd(2024, 9, 12);
    let habit = Habit::weekly("Gym", [4]); // Thursday

    {
        let store = HabitStore::new(Database::open_at(&path).unwrap()).unwrap();
        store.save_habit(habit.clone()).unwrap();
        store.skip_habit(&habit.id, today).unwrap();
    }

    let store = HabitStore::new(Database::open_at(&path).unwrap()).unwrap();
    let due = store.today_habits(today).unwrap();
    assert_eq!(due.len(), 1);
    assert!(due[0].is_skipped_today());
    assert_eq!(store.get_habit(&habit.id).unwrap(), Some(habit));
}

#[test]
fn test_today_view_filters_and_progress() {
    let store = HabitStore::new(MemoryKv::new()).unwrap();
    let today = ymd(2024, 9, 12);

    let titles = ["Read", "Run", "Meditate", "Journal"];
    let mut ids = Vec::new();
    for title in titles {
        let habit = Habit::new(title);
        ids.push(habit.id.clone());
        store.save_habit(habit).unwrap();
    }
    store.complete_habit(&ids[0], today).unwrap();
    store.complete_habit(&ids[1], today).unwrap();
    store.skip_habit(&ids[2], today).unwrap();

    let due = store.today_habits(today).unwrap();
    let progress = DailyProgress::from_due(&due);
    assert_eq!(progress.completed, 2);
    assert_eq!(progress.skipped, 1);
    assert_eq!(progress.total, 4);
    assert_eq!(progress.fraction(), 0.5);

    let completed = apply_filter(&due, HabitFilter::Completed);
    assert_eq!(completed.len(), 2);
    let skipped = apply_filter(&due, HabitFilter::Skipped);
    assert_eq!(skipped[0].habit.title, "Meditate");

    // Filtering never writes.
    let entries_before = store.kv().get(ENTRIES_KEY).unwrap();
    let _ = apply_filter(&due, HabitFilter::All);
    assert_eq!(store.kv().get(ENTRIES_KEY).unwrap(), entries_before);
}

#[test]
fn test_delete_removes_habit_and_history() {
    let store = HabitStore::new(MemoryKv::new()).unwrap();
    let today = ymd(2024, 9, 12);
    let habit = Habit::new("Floss");
    store.save_habit(habit.clone()).unwrap();
    for day in 6..=12 {
        store.complete_habit(&habit.id, ymd(2024, 9, day)).unwrap();
    }

    store.delete_habit(&habit.id).unwrap();

    assert!(store.list_active_habits_with_entries(today).unwrap().is_empty());
    assert!(store.entries_for(&habit.id).unwrap().is_empty());
    assert!(store.get_habit(&habit.id).unwrap().is_none());
}

#[test]
fn test_unversioned_data_is_migrated_in_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");
    {
        let db = Database::open_at(&path).unwrap();
        db.set(
            HABITS_KEY,
            r#"[{"id":"a","title":"Legacy","repeatType":"WEEKLY","selectedDays":[1],"createdAt":"2023-05-01","isActive":true}]"#,
        )
        .unwrap();
    }

    let store = HabitStore::new(Database::open_at(&path).unwrap()).unwrap();
    let habits = store.list_habits().unwrap();
    assert_eq!(habits.len(), 1);
    assert_eq!(habits[0].selected_days, vec![1]);
    let raw = store.kv().get(HABITS_KEY).unwrap().unwrap();
    assert!(raw.contains(r#""version":1"#));
}
