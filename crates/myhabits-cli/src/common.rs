//! Shared state and helpers for store-backed commands.

use chrono::{Local, NaiveDate};
use myhabits_core::{AuthGate, Config, Database, HabitStore, Session, User};
use serde::Serialize;

/// Everything a store-backed command needs.
pub struct Context {
    pub config: Config,
    pub store: HabitStore<Database>,
    /// The calendar day commands treat as today.
    pub today: NaiveDate,
}

impl Context {
    /// Open the configured database; `date` overrides today.
    pub fn open(config: Config, date: Option<&str>) -> Result<Self, Box<dyn std::error::Error>> {
        let today = match date {
            Some(raw) => parse_date(raw)?,
            None => Local::now().date_naive(),
        };
        let store = HabitStore::new(Database::open(&config.storage.db_file)?)?;
        Ok(Self {
            config,
            store,
            today,
        })
    }

    pub fn gate(&self) -> AuthGate<'_, Database> {
        AuthGate::new(&self.store)
    }

    pub fn restore_session(&self) -> Result<Session, Box<dyn std::error::Error>> {
        Ok(self.gate().restore()?)
    }
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{raw}' (expected YYYY-MM-DD): {e}").into())
}

/// The logged-in user, or an error telling the caller to log in.
pub fn require_login(session: &Session) -> Result<&User, Box<dyn std::error::Error>> {
    session
        .user()
        .ok_or_else(|| "not logged in (run `myhabits auth login` first)".into())
}

/// Parse "1,3,5" into ISO weekdays, rejecting anything outside 1..=7.
pub fn parse_days(raw: &str) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let mut days = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let day: u8 = part
            .parse()
            .map_err(|_| format!("invalid weekday '{part}'"))?;
        if !(1..=7).contains(&day) {
            return Err(format!("weekday out of range (1-7): {day}").into());
        }
        if !days.contains(&day) {
            days.push(day);
        }
    }
    days.sort_unstable();
    Ok(days)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_days_sorts_and_dedups() {
        assert_eq!(parse_days("5, 1,3,1").unwrap(), vec![1, 3, 5]);
        assert!(parse_days("0").is_err());
        assert!(parse_days("mon").is_err());
        assert!(parse_days("").unwrap().is_empty());
    }

    #[test]
    fn parse_date_requires_iso_format() {
        assert_eq!(
            parse_date("2024-04-30").unwrap(),
            NaiveDate::from_ymd_opt(2024, 4, 30).unwrap()
        );
        assert!(parse_date("30/04/2024").is_err());
    }

    #[test]
    fn require_login_rejects_logged_out() {
        assert!(require_login(&Session::LoggedOut).is_err());
        let user = User::new("a", "a@x.io", "secret1");
        let session = Session::LoggedIn(user.clone());
        assert_eq!(require_login(&session).unwrap(), &user);
    }
}
