//! Habit, entry and user persistence over a key/value substrate.
//!
//! Every collection lives under one key and is rewritten in full after each
//! mutation. There is no concurrent writer; each call reads a snapshot,
//! changes it in memory, and writes it back before returning. Calls that
//! touch two collections hand both to `KvStore::set_many`.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::kv::KvStore;
use super::records::{
    decode_collection, decode_record, encode_collection, Decoded, SCHEMA_VERSION,
};
use crate::error::{DatabaseError, Result, ValidationError};
use crate::habit::{Habit, HabitEntry, HabitStatus, HabitWithEntries};
use crate::schedule;
use crate::session::User;

pub const CURRENT_USER_KEY: &str = "current_user";
pub const USERS_KEY: &str = "all_users";
pub const HABITS_KEY: &str = "habits";
pub const ENTRIES_KEY: &str = "habit_entries";

/// Owner of the persisted users, habits and entries.
///
/// Read methods return owned snapshots; nothing handed out aliases the
/// stored collections.
pub struct HabitStore<S: KvStore> {
    kv: S,
}

impl<S: KvStore> HabitStore<S> {
    /// Wrap `kv` and upgrade any collection stored in an older layout.
    ///
    /// # Errors
    /// Returns an error if the substrate cannot be read or written.
    pub fn new(kv: S) -> Result<Self> {
        let store = Self { kv };
        store.migrate()?;
        Ok(store)
    }

    /// Get a reference to the underlying substrate.
    pub fn kv(&self) -> &S {
        &self.kv
    }

    /// Rewrite outdated collections at the current schema version.
    ///
    /// Returns the number of collections rewritten.
    pub fn migrate(&self) -> Result<usize> {
        let mut upgraded = 0;
        upgraded += self.migrate_key::<User>(USERS_KEY)?;
        upgraded += self.migrate_key::<Habit>(HABITS_KEY)?;
        upgraded += self.migrate_key::<HabitEntry>(ENTRIES_KEY)?;
        if upgraded > 0 {
            tracing::info!(upgraded, "migrated stored collections");
        }
        Ok(upgraded)
    }

    fn migrate_key<T: Serialize + DeserializeOwned>(&self, key: &str) -> Result<usize> {
        let decoded: Decoded<T> = decode_collection(key, self.kv.get(key)?.as_deref());
        if !decoded.needs_upgrade() {
            return Ok(0);
        }
        self.write(key, &decoded.items)?;
        Ok(1)
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        let raw = self.kv.get(key)?;
        Ok(decode_collection(key, raw.as_deref()).items)
    }

    /// Read a collection that is about to be rewritten.
    ///
    /// Collections from a newer schema can be read but not written back.
    fn read_for_update<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        let raw = self.kv.get(key)?;
        let decoded: Decoded<T> = decode_collection(key, raw.as_deref());
        match decoded.found_version {
            Some(version) if version > SCHEMA_VERSION => Err(DatabaseError::NewerSchema {
                key: key.to_string(),
                version,
            }
            .into()),
            _ => Ok(decoded.items),
        }
    }

    fn write<T: Serialize>(&self, key: &str, items: &[T]) -> Result<()> {
        self.kv.set(key, &encode_collection(items)?)?;
        tracing::debug!(key, count = items.len(), "collection written");
        Ok(())
    }

    // Habits

    /// Insert `habit`, or replace the stored habit with the same id in place.
    pub fn save_habit(&self, habit: Habit) -> Result<()> {
        let mut habits: Vec<Habit> = self.read_for_update(HABITS_KEY)?;
        match habits.iter().position(|h| h.id == habit.id) {
            Some(index) => habits[index] = habit,
            None => habits.push(habit),
        }
        self.write(HABITS_KEY, &habits)
    }

    pub fn get_habit(&self, id: &str) -> Result<Option<Habit>> {
        let habits: Vec<Habit> = self.read(HABITS_KEY)?;
        Ok(habits.into_iter().find(|h| h.id == id))
    }

    /// Every stored habit, inactive ones included.
    pub fn list_habits(&self) -> Result<Vec<Habit>> {
        self.read(HABITS_KEY)
    }

    /// Remove the habit and every entry recorded for it.
    ///
    /// An unknown id is a no-op.
    pub fn delete_habit(&self, id: &str) -> Result<()> {
        let mut habits: Vec<Habit> = self.read_for_update(HABITS_KEY)?;
        let before = habits.len();
        habits.retain(|h| h.id != id);
        if habits.len() == before {
            tracing::debug!(habit_id = id, "delete of unknown habit ignored");
        }

        let mut entries: Vec<HabitEntry> = self.read_for_update(ENTRIES_KEY)?;
        let removed = entries.len();
        entries.retain(|e| e.habit_id != id);
        let removed = removed - entries.len();

        self.kv.set_many(&[
            (HABITS_KEY, encode_collection(&habits)?),
            (ENTRIES_KEY, encode_collection(&entries)?),
        ])?;
        tracing::debug!(habit_id = id, removed, "habit deleted");
        Ok(())
    }

    // Entries

    /// Record the day's outcome, overwriting any earlier outcome that day.
    ///
    /// # Errors
    /// `status` must be `Completed` or `Skipped`.
    pub fn record_outcome(
        &self,
        habit_id: &str,
        date: NaiveDate,
        status: HabitStatus,
    ) -> Result<HabitEntry> {
        if !status.is_outcome() {
            return Err(ValidationError::InvalidValue {
                field: "status".to_string(),
                message: format!("{status:?} cannot be recorded as an outcome"),
            }
            .into());
        }

        let entry = HabitEntry::new(habit_id, date, status);
        let mut entries: Vec<HabitEntry> = self.read_for_update(ENTRIES_KEY)?;
        match entries.iter().position(|e| e.same_slot(habit_id, date)) {
            Some(index) => entries[index] = entry.clone(),
            None => entries.push(entry.clone()),
        }
        self.write(ENTRIES_KEY, &entries)?;
        tracing::debug!(habit_id, %date, ?status, "outcome recorded");
        Ok(entry)
    }

    pub fn complete_habit(&self, habit_id: &str, today: NaiveDate) -> Result<HabitEntry> {
        self.record_outcome(habit_id, today, HabitStatus::Completed)
    }

    pub fn skip_habit(&self, habit_id: &str, today: NaiveDate) -> Result<HabitEntry> {
        self.record_outcome(habit_id, today, HabitStatus::Skipped)
    }

    /// Full entry history of one habit, in storage order.
    pub fn entries_for(&self, habit_id: &str) -> Result<Vec<HabitEntry>> {
        let entries: Vec<HabitEntry> = self.read(ENTRIES_KEY)?;
        Ok(entries
            .into_iter()
            .filter(|e| e.habit_id == habit_id)
            .collect())
    }

    /// One view per active habit, seen from `today`.
    pub fn list_active_habits_with_entries(
        &self,
        today: NaiveDate,
    ) -> Result<Vec<HabitWithEntries>> {
        let habits: Vec<Habit> = self.read(HABITS_KEY)?;
        let entries: Vec<HabitEntry> = self.read(ENTRIES_KEY)?;

        let mut by_habit: HashMap<String, Vec<HabitEntry>> = HashMap::new();
        for entry in entries {
            by_habit.entry(entry.habit_id.clone()).or_default().push(entry);
        }

        Ok(habits
            .into_iter()
            .filter(|h| h.is_active)
            .map(|habit| {
                let history = by_habit.remove(&habit.id).unwrap_or_default();
                HabitWithEntries::assemble(habit, history, today)
            })
            .collect())
    }

    /// Active habits due on `today`.
    pub fn today_habits(&self, today: NaiveDate) -> Result<Vec<HabitWithEntries>> {
        let all = self.list_active_habits_with_entries(today)?;
        Ok(schedule::due_habits(all, today))
    }

    // Users

    /// Add `user` unless the email is already registered.
    ///
    /// Returns `false`, leaving the user list untouched, on a duplicate.
    pub fn register(&self, user: User) -> Result<bool> {
        let mut users: Vec<User> = self.read_for_update(USERS_KEY)?;
        if users.iter().any(|u| u.email == user.email) {
            return Ok(false);
        }
        users.push(user);
        self.write(USERS_KEY, &users)?;
        Ok(true)
    }

    /// Linear scan for a user with exactly these credentials.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<Option<User>> {
        let users: Vec<User> = self.read(USERS_KEY)?;
        Ok(users
            .into_iter()
            .find(|u| u.email == email && u.password == password))
    }

    pub fn list_users(&self) -> Result<Vec<User>> {
        self.read(USERS_KEY)
    }

    pub fn set_current_session(&self, user: &User) -> Result<()> {
        self.kv
            .set(CURRENT_USER_KEY, &serde_json::to_string(user)?)
    }

    pub fn current_session(&self) -> Result<Option<User>> {
        let raw = self.kv.get(CURRENT_USER_KEY)?;
        Ok(decode_record(CURRENT_USER_KEY, raw.as_deref()))
    }

    pub fn clear_session(&self) -> Result<()> {
        self.kv.remove(CURRENT_USER_KEY)
    }
}
